use super::{per_direction, CountMatrix, SparseCounts};
use crate::neighbour::{negate, shift};
use crate::{Offset3d, Roi};

/// 沿方向 `dir` 构建灰度游程矩阵 (GLRLM).
///
/// 一个体素是游程的起点, 当且仅当它沿 `-dir` 的前驱不在 ROI 内、越出体数据,
/// 或灰度编码不同. 从每个起点沿 `dir` 前进, 直到离开 ROI 或编码改变,
/// 记录 `(code, 游程长度)`. 不限制最大游程长度.
pub fn glrlm(roi: &Roi, dir: Offset3d) -> CountMatrix {
    let shape = roi.shape();
    let back = negate(dir);
    let mut sparse = SparseCounts::new();

    for (pos, level) in roi.positions() {
        let is_head = shift(pos, back, shape).and_then(|p| roi.level_at(p)) != Some(level);
        if !is_head {
            continue;
        }

        let mut len = 1u64;
        let mut cur = pos;
        while let Some(next) = shift(cur, dir, shape).filter(|&n| roi.level_at(n) == Some(level)) {
            len += 1;
            cur = next;
        }
        *sparse.entry((level, len)).or_insert(0) += 1;
    }

    CountMatrix::from_sparse(roi.levels(), &sparse)
}

/// 13 个方向的 GLRLM, 顺序与 [`crate::neighbour::DIRECTIONS`] 一致.
pub fn glrlm_directions(roi: &Roi) -> Vec<CountMatrix> {
    per_direction(roi, glrlm)
}
