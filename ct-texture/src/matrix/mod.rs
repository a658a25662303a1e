//! 纹理矩阵构建.
//!
//! 六种矩阵相互独立, 只读共享输入 (ROI, 区域划分, 距离图), 各自写入私有的计数矩阵.
//! 计数一律以 `u64` 精确保存, 因此任何拆分/并行方式归约后的结果都完全一致.

mod glcm;
mod gldzm;
mod glrlm;
mod glszm;
mod ngldm;
mod ngtdm;

pub use glcm::{glcm, glcm_directions};
pub use gldzm::gldzm;
pub use glrlm::{glrlm, glrlm_directions};
pub use glszm::glszm;
pub use ngldm::{DependenceRule, NgldmBuilder};
pub use ngtdm::{ngtdm, NgtdmTable};

use crate::neighbour::DIRECTIONS;
use crate::{Offset3d, Roi};
use ndarray::{Array2, ArrayView2};
use std::collections::{BTreeMap, BTreeSet};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 稀疏计数, 键为 `(行下标, 列取值)`.
pub(crate) type SparseCounts = BTreeMap<(usize, u64), u64>;

/// 灰度级 x 某种取值 (灰度级, 游程长度, 区域大小, 区域距离, 依赖计数) 的计数矩阵.
///
/// 行永远对应 ROI 中出现的全部灰度编码 (升序). 对 GLCM, 列与行相同;
/// 对其它矩阵, 列只包含实际出现过的取值 (升序), 以免游程或区域很大时矩阵过于稀疏.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CountMatrix {
    counts: Array2<u64>,
    row_values: Vec<u32>,
    col_values: Vec<u64>,
}

impl CountMatrix {
    /// 直接初始化. 形状不一致时 panic.
    pub(crate) fn new(counts: Array2<u64>, row_values: Vec<u32>, col_values: Vec<u64>) -> Self {
        assert_eq!(counts.dim(), (row_values.len(), col_values.len()));
        Self {
            counts,
            row_values,
            col_values,
        }
    }

    /// 从稀疏计数构建. 列为 `sparse` 中出现过的所有取值.
    pub(crate) fn from_sparse(row_values: &[u32], sparse: &SparseCounts) -> Self {
        let col_values: Vec<u64> = sparse
            .keys()
            .map(|&(_, c)| c)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let mut counts = Array2::<u64>::zeros((row_values.len(), col_values.len()));
        for (&(row, col), &n) in sparse {
            // `col_values` 由 `sparse` 的键构成, 一定能找到.
            let j = col_values.binary_search(&col).unwrap();
            counts[(row, j)] += n;
        }
        Self::new(counts, row_values.to_vec(), col_values)
    }

    /// 计数矩阵视图.
    #[inline]
    pub fn counts(&self) -> ArrayView2<'_, u64> {
        self.counts.view()
    }

    /// 行对应的灰度编码.
    #[inline]
    pub fn row_values(&self) -> &[u32] {
        &self.row_values
    }

    /// 列对应的取值.
    #[inline]
    pub fn col_values(&self) -> &[u64] {
        &self.col_values
    }

    /// 矩阵形状 `(行, 列)`.
    #[inline]
    pub fn dim(&self) -> (usize, usize) {
        self.counts.dim()
    }

    /// 所有计数之和.
    #[inline]
    pub fn total(&self) -> u64 {
        self.counts.sum()
    }

    /// 是否全零.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }

    /// 按取值获取计数. 不存在的行/列视为 0.
    pub fn get(&self, row_value: u32, col_value: u64) -> u64 {
        match (
            self.row_values.binary_search(&row_value),
            self.col_values.binary_search(&col_value),
        ) {
            (Ok(i), Ok(j)) => self.counts[(i, j)],
            _ => 0,
        }
    }

    /// `Σ 计数 × 列取值`. 对 GLSZM 而言即 ROI 体素总数.
    pub fn weighted_column_sum(&self) -> u64 {
        self.counts
            .columns()
            .into_iter()
            .zip(self.col_values.iter())
            .map(|(col, &v)| col.sum() * v)
            .sum()
    }

    /// 矩阵是否与其转置完全相同 (要求行列取值也相同).
    pub fn is_symmetric(&self) -> bool {
        self.row_values.iter().map(|&r| r as u64).eq(self.col_values.iter().copied())
            && self.counts == self.counts.t()
    }

    /// 把 `other` 的计数加到 `self` 上. 两者行必须相同, 列取并集.
    fn add(mut self, other: &CountMatrix) -> CountMatrix {
        assert_eq!(self.row_values, other.row_values, "合并矩阵的行不一致");
        if self.col_values == other.col_values {
            self.counts += &other.counts;
            return self;
        }

        let col_values: Vec<u64> = self
            .col_values
            .iter()
            .chain(other.col_values.iter())
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let mut counts = Array2::<u64>::zeros((self.row_values.len(), col_values.len()));
        for src in [&self, other] {
            for (j, c) in src.col_values.iter().enumerate() {
                // 并集包含两者的所有列.
                let k = col_values.binary_search(c).unwrap();
                let mut dst = counts.column_mut(k);
                dst += &src.counts.column(j);
            }
        }
        CountMatrix::new(counts, self.row_values, col_values)
    }

    /// 合并 (逐元素求和) 一组矩阵. `mats` 为空时返回 `None`.
    pub fn merge<'a, I>(mats: I) -> Option<CountMatrix>
    where
        I: IntoIterator<Item = &'a CountMatrix>,
    {
        let mut it = mats.into_iter();
        let first = it.next()?.clone();
        Some(it.fold(first, CountMatrix::add))
    }
}

/// 对 13 个方向分别构建矩阵, 结果按 [`DIRECTIONS`] 的顺序排列.
pub(crate) fn per_direction<F>(roi: &Roi, build: F) -> Vec<CountMatrix>
where
    F: Fn(&Roi, Offset3d) -> CountMatrix + Sync + Send,
{
    cfg_if::cfg_if! {
        if #[cfg(feature = "rayon")] {
            use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
            DIRECTIONS.par_iter().map(|&d| build(roi, d)).collect()
        } else {
            DIRECTIONS.iter().map(|&d| build(roi, d)).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CountMatrix, SparseCounts};
    use ndarray::array;

    #[test]
    fn test_from_sparse() {
        let mut sparse = SparseCounts::new();
        sparse.insert((0, 4), 2);
        sparse.insert((1, 1), 3);
        sparse.insert((1, 4), 1);
        let m = CountMatrix::from_sparse(&[3, 7], &sparse);

        assert_eq!(m.col_values(), &[1, 4]);
        assert_eq!(m.counts(), array![[0u64, 2], [3, 1]]);
        assert_eq!(m.total(), 6);
        assert_eq!(m.get(7, 1), 3);
        assert_eq!(m.get(7, 2), 0);
        assert_eq!(m.get(5, 1), 0);
        assert_eq!(m.weighted_column_sum(), 2 * 4 + 3 + 4);
    }

    #[test]
    fn test_merge_column_union() {
        let a = CountMatrix::new(array![[1, 0], [0, 2]], vec![1, 2], vec![1, 3]);
        let b = CountMatrix::new(array![[5], [1]], vec![1, 2], vec![2]);
        let c = CountMatrix::new(array![[1, 1], [1, 1]], vec![1, 2], vec![1, 3]);

        let m = CountMatrix::merge([&a, &b, &c]).unwrap();
        assert_eq!(m.col_values(), &[1, 2, 3]);
        assert_eq!(m.counts(), array![[2u64, 5, 1], [1, 1, 3]]);
        assert_eq!(m.total(), a.total() + b.total() + c.total());

        assert!(CountMatrix::merge(std::iter::empty()).is_none());
    }

    #[test]
    fn test_symmetric() {
        let m = CountMatrix::new(array![[2, 1], [1, 0]], vec![1, 2], vec![1, 2]);
        assert!(m.is_symmetric());
        let m = CountMatrix::new(array![[2, 1], [0, 0]], vec![1, 2], vec![1, 2]);
        assert!(!m.is_symmetric());
        let m = CountMatrix::new(array![[2, 1], [1, 0]], vec![1, 2], vec![1, 3]);
        assert!(!m.is_symmetric());
        assert!(CountMatrix::new(array![[0]], vec![1], vec![1]).is_empty());
    }
}
