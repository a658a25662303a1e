//! 方向聚合与归一化.
//!
//! GLCM 与 GLRLM 对每个方向各有一个矩阵, 支持两种聚合约定:
//!
//! 1. [`Aggregation::Merge`]: 先把 13 个矩阵逐元素相加, 再归一化并计算特征;
//! 2. [`Aggregation::Average`]: 对每个方向分别归一化并计算特征, 再取平均.
//!   没有任何计数的方向不参与平均 (不计入分母). 对单个特征而言,
//!   值为 `NaN` 的方向同样不计入; 所有方向都为 `NaN` 时结果才为 `NaN`.
//!
//! 其它矩阵 (GLSZM, GLDZM, NGLDM) 与方向无关, 直接归一化后计算.

use crate::matrix::{CountMatrix, NgtdmTable};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 方向聚合约定.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Aggregation {
    /// 先合并矩阵, 再计算特征.
    #[default]
    Merge,

    /// 逐方向计算特征, 再取平均.
    Average,
}

/// 归一化后的计数矩阵. 特征公式只读取该结构.
#[derive(Debug, Clone)]
pub struct NormalizedMatrix {
    probs: Array2<f64>,
    row_values: Array1<f64>,
    col_values: Array1<f64>,
    row_marginal: Array1<f64>,
    col_marginal: Array1<f64>,
    total: f64,
    voxels: f64,
}

impl NormalizedMatrix {
    /// 以计数总和归一化 `m`. `voxels` 为该矩阵对应的体素个数 `Nv`
    /// (只在 "百分比" 类特征中使用).
    ///
    /// `m` 全零时返回 `None`.
    pub fn new(m: &CountMatrix, voxels: usize) -> Option<Self> {
        let total = m.total();
        if total == 0 {
            return None;
        }
        let total = total as f64;
        let probs = m.counts().mapv(|c| c as f64 / total);
        let row_marginal = probs.sum_axis(Axis(1));
        let col_marginal = probs.sum_axis(Axis(0));

        Some(Self {
            probs,
            row_values: m.row_values().iter().map(|&v| v as f64).collect(),
            col_values: m.col_values().iter().map(|&v| v as f64).collect(),
            row_marginal,
            col_marginal,
            total,
            voxels: voxels as f64,
        })
    }

    /// 所有列取值加上 `by`.
    pub fn shift_columns(mut self, by: f64) -> Self {
        self.col_values += by;
        self
    }

    /// 概率矩阵 `p(i, j)`.
    #[inline]
    pub fn probs(&self) -> ArrayView2<'_, f64> {
        self.probs.view()
    }

    /// 行取值 (灰度编码).
    #[inline]
    pub fn row_values(&self) -> ArrayView1<'_, f64> {
        self.row_values.view()
    }

    /// 列取值.
    #[inline]
    pub fn col_values(&self) -> ArrayView1<'_, f64> {
        self.col_values.view()
    }

    /// 行边缘分布 `Σ_j p(i, j)`.
    #[inline]
    pub fn row_marginal(&self) -> ArrayView1<'_, f64> {
        self.row_marginal.view()
    }

    /// 列边缘分布 `Σ_i p(i, j)`.
    #[inline]
    pub fn col_marginal(&self) -> ArrayView1<'_, f64> {
        self.col_marginal.view()
    }

    /// 归一化之前的计数总和 `Ns`.
    #[inline]
    pub fn total(&self) -> f64 {
        self.total
    }

    /// 对应的体素个数 `Nv`.
    #[inline]
    pub fn voxels(&self) -> f64 {
        self.voxels
    }

    /// 灰度级个数 `Ng`.
    #[inline]
    pub fn len_levels(&self) -> usize {
        self.row_values.len()
    }
}

/// 归一化后的 NGTDM. 只保留 `n_i > 0` 的灰度级.
#[derive(Debug, Clone)]
pub struct NormalizedNgtdm {
    values: Vec<f64>,
    probs: Vec<f64>,
    sums: Vec<f64>,
    valid: f64,
}

impl NormalizedNgtdm {
    /// 没有任何有效体素时返回 `None`.
    pub fn new(table: &NgtdmTable) -> Option<Self> {
        let valid = table.valid_voxels();
        if valid == 0 {
            return None;
        }
        let valid = valid as f64;

        let mut ans = Self {
            values: vec![],
            probs: vec![],
            sums: vec![],
            valid,
        };
        for (&v, &n, &s) in itertools::izip!(table.levels(), table.counts(), table.sums()) {
            if n > 0 {
                ans.values.push(v as f64);
                ans.probs.push(n as f64 / valid);
                ans.sums.push(s);
            }
        }
        Some(ans)
    }

    /// 灰度编码 `i`.
    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// `p_i = n_i / Nvc`.
    #[inline]
    pub fn probs(&self) -> &[f64] {
        &self.probs
    }

    /// `s_i`.
    #[inline]
    pub fn sums(&self) -> &[f64] {
        &self.sums
    }

    /// `Nvc`.
    #[inline]
    pub fn valid_voxels(&self) -> f64 {
        self.valid
    }

    /// `Ngp`, 即 `p_i > 0` 的灰度级个数.
    #[inline]
    pub fn len_levels(&self) -> usize {
        self.values.len()
    }
}

/// 对单个 (可能不存在的) 归一化矩阵计算 `width` 个特征. `nm` 为 `None` 时全为 `NaN`.
pub fn evaluate_single<F>(nm: Option<&NormalizedMatrix>, width: usize, compute: F) -> Vec<f64>
where
    F: Fn(&NormalizedMatrix) -> Vec<f64>,
{
    nm.map(compute).unwrap_or_else(|| vec![f64::NAN; width])
}

/// 按照 `agg` 聚合逐方向矩阵 `mats` 并计算 `width` 个特征.
///
/// `voxels` 为 ROI 体素个数. 合并时, 合并矩阵的 `Nv` 为 `voxels × mats.len()`.
/// 平均时, 每个特征只对该特征有定义 (非 `NaN`) 的方向取平均.
/// 所有方向都为空时, 结果全为 `NaN`.
pub fn aggregate<F>(
    mats: &[CountMatrix],
    agg: Aggregation,
    voxels: usize,
    width: usize,
    compute: F,
) -> Vec<f64>
where
    F: Fn(&NormalizedMatrix) -> Vec<f64>,
{
    match agg {
        Aggregation::Merge => {
            let merged = CountMatrix::merge(mats)
                .and_then(|m| NormalizedMatrix::new(&m, voxels * mats.len()));
            evaluate_single(merged.as_ref(), width, compute)
        }
        Aggregation::Average => {
            let per_dir: Vec<Vec<f64>> = mats
                .iter()
                .filter_map(|m| NormalizedMatrix::new(m, voxels))
                .map(|nm| compute(&nm))
                .collect();
            if per_dir.is_empty() {
                return vec![f64::NAN; width];
            }
            (0..width)
                .map(|k| {
                    let (sum, n) = per_dir
                        .iter()
                        .map(|v| v[k])
                        .filter(|x| !x.is_nan())
                        .fold((0.0, 0usize), |(s, n), x| (s + x, n + 1));
                    match n {
                        0 => f64::NAN,
                        n => sum / n as f64,
                    }
                })
                .collect()
        }
    }
}
