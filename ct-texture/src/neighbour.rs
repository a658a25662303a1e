//! 三维邻域几何.
//!
//! 所有纹理矩阵共享同一套方向定义. 方向 `d` 与 `-d` 代表同一条无向轴,
//! 因此只需要枚举 "半个" 26-邻域.

use crate::{Idx3d, Offset3d};
use itertools::iproduct;

/// 26-邻域中互不冗余的 13 个方向. 每个向量的第一个非零分量为正.
pub const DIRECTIONS: [Offset3d; 13] = [
    (0, 0, 1),
    (0, 1, -1),
    (0, 1, 0),
    (0, 1, 1),
    (1, -1, -1),
    (1, -1, 0),
    (1, -1, 1),
    (1, 0, -1),
    (1, 0, 0),
    (1, 0, 1),
    (1, 1, -1),
    (1, 1, 0),
    (1, 1, 1),
];

/// 完整的 26-邻域. 前 13 个为 [`DIRECTIONS`], 后 13 个依次为其反向.
pub const NEIGHBOURS_26: [Offset3d; 26] = {
    let mut ans = [(0, 0, 0); 26];
    let mut i = 0;
    while i < 13 {
        ans[i] = DIRECTIONS[i];
        ans[i + 13] = negate(DIRECTIONS[i]);
        i += 1;
    }
    ans
};

/// 前后上下左右 6-邻域 (钻石型).
pub const DIAMOND: [Offset3d; 6] = [
    (-1, 0, 0),
    (1, 0, 0),
    (0, -1, 0),
    (0, 1, 0),
    (0, 0, -1),
    (0, 0, 1),
];

/// 反向偏移.
#[inline]
pub const fn negate((z, h, w): Offset3d) -> Offset3d {
    (-z, -h, -w)
}

/// 计算 `pos + offset`. 若结果越出 `shape` 则返回 `None`.
#[inline]
pub fn shift((z, h, w): Idx3d, (dz, dh, dw): Offset3d, (lz, lh, lw): Idx3d) -> Option<Idx3d> {
    let z = z.checked_add_signed(dz).filter(|&z| z < lz)?;
    let h = h.checked_add_signed(dh).filter(|&h| h < lh)?;
    let w = w.checked_add_signed(dw).filter(|&w| w < lw)?;
    Some((z, h, w))
}

/// 切比雪夫半径为 `radius` 的邻域偏移 (不含原点), 共 `(2r + 1)^3 - 1` 个.
///
/// `radius == 1` 时与 [`NEIGHBOURS_26`] 集合相同 (顺序不同).
pub fn chebyshev_ball(radius: usize) -> Vec<Offset3d> {
    let r = radius as isize;
    iproduct!(-r..=r, -r..=r, -r..=r)
        .filter(|&off| off != (0, 0, 0))
        .collect()
}
