use super::{CountMatrix, SparseCounts};
use crate::consts::DEFAULT_ALPHA;
use crate::neighbour::{chebyshev_ball, shift};
use crate::{Offset3d, Roi};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 判定邻居是否 "依赖" 中心体素的规则: `|code_n - code| <= alpha`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DependenceRule {
    alpha: u32,
}

impl Default for DependenceRule {
    fn default() -> Self {
        Self::with_tolerance(DEFAULT_ALPHA)
    }
}

impl DependenceRule {
    /// 灰度编码必须完全相同.
    #[inline]
    pub const fn exact() -> Self {
        Self { alpha: 0 }
    }

    /// 允许灰度编码相差不超过 `alpha`.
    #[inline]
    pub const fn with_tolerance(alpha: u32) -> Self {
        Self { alpha }
    }

    /// 容差.
    #[inline]
    pub fn alpha(&self) -> u32 {
        self.alpha
    }

    /// `other` 是否依赖 `center`.
    #[inline]
    pub fn is_dependent(&self, center: u32, other: u32) -> bool {
        center.abs_diff(other) <= self.alpha
    }
}

/// 邻域灰度依赖矩阵 (NGLDM) 构建器. 邻域和依赖规则在构建时固定.
#[derive(Debug, Clone)]
pub struct NgldmBuilder {
    distance: usize,
    offsets: Vec<Offset3d>,
    rule: DependenceRule,
}

impl NgldmBuilder {
    /// 以切比雪夫距离 `distance` 和规则 `rule` 初始化.
    pub fn new(distance: usize, rule: DependenceRule) -> Self {
        Self {
            distance,
            offsets: chebyshev_ball(distance),
            rule,
        }
    }

    /// 邻域距离.
    #[inline]
    pub fn distance(&self) -> usize {
        self.distance
    }

    /// 依赖规则.
    #[inline]
    pub fn rule(&self) -> DependenceRule {
        self.rule
    }

    /// 对 `roi` 的每个体素统计依赖邻居个数 `k`, 记录 `(code, k)`.
    ///
    /// 列取值为 `k` 本身 (可以为 0). 计算特征时再整体偏移为 `k + 1`.
    pub fn build(&self, roi: &Roi) -> CountMatrix {
        let shape = roi.shape();
        let mut sparse = SparseCounts::new();

        for (pos, level) in roi.positions() {
            let code = roi.levels()[level];
            let k = self
                .offsets
                .iter()
                .filter_map(|&off| shift(pos, off, shape).and_then(|p| roi.code_at(p)))
                .filter(|&c| self.rule.is_dependent(code, c))
                .count();
            *sparse.entry((level, k as u64)).or_insert(0) += 1;
        }

        CountMatrix::from_sparse(roi.levels(), &sparse)
    }
}
