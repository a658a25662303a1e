//! 游程/区域类矩阵 (GLRLM, GLSZM, GLDZM, NGLDM) 共用的特征公式.
//!
//! 四种矩阵的行都是灰度编码 `i`, 列分别为游程长度、区域大小、区域距离和
//! 依赖计数 (`k + 1`), 统一记为 `j`. 同一个公式在不同族中有不同的名称.

use super::{plogp, ratio, Registry};
use crate::aggregate::NormalizedMatrix;
use itertools::izip;

/// `Σ p(i, j) · f(i, j)`, 只遍历 `p > 0` 的格子.
fn expect<F: Fn(f64, f64) -> f64>(nm: &NormalizedMatrix, f: F) -> f64 {
    let (rows, cols) = (nm.row_values(), nm.col_values());
    nm.probs()
        .indexed_iter()
        .filter(|(_, &p)| p > 0.0)
        .map(|((i, j), &p)| p * f(rows[i], cols[j]))
        .sum()
}

fn low_column_emphasis(nm: &NormalizedMatrix) -> f64 {
    expect(nm, |_, j| ratio(1.0, j * j))
}

fn high_column_emphasis(nm: &NormalizedMatrix) -> f64 {
    expect(nm, |_, j| j * j)
}

fn low_grey_emphasis(nm: &NormalizedMatrix) -> f64 {
    expect(nm, |i, _| ratio(1.0, i * i))
}

fn high_grey_emphasis(nm: &NormalizedMatrix) -> f64 {
    expect(nm, |i, _| i * i)
}

fn low_column_low_grey_emphasis(nm: &NormalizedMatrix) -> f64 {
    expect(nm, |i, j| ratio(1.0, i * i * j * j))
}

fn low_column_high_grey_emphasis(nm: &NormalizedMatrix) -> f64 {
    expect(nm, |i, j| ratio(i * i, j * j))
}

fn high_column_low_grey_emphasis(nm: &NormalizedMatrix) -> f64 {
    expect(nm, |i, j| ratio(j * j, i * i))
}

fn high_column_high_grey_emphasis(nm: &NormalizedMatrix) -> f64 {
    expect(nm, |i, j| i * i * j * j)
}

fn grey_non_uniformity(nm: &NormalizedMatrix) -> f64 {
    normalised_grey_non_uniformity(nm) * nm.total()
}

fn normalised_grey_non_uniformity(nm: &NormalizedMatrix) -> f64 {
    nm.row_marginal().iter().map(|p| p * p).sum()
}

fn column_non_uniformity(nm: &NormalizedMatrix) -> f64 {
    normalised_column_non_uniformity(nm) * nm.total()
}

fn normalised_column_non_uniformity(nm: &NormalizedMatrix) -> f64 {
    nm.col_marginal().iter().map(|p| p * p).sum()
}

fn percentage(nm: &NormalizedMatrix) -> f64 {
    ratio(nm.total(), nm.voxels())
}

fn marginal_variance<'a>(
    values: impl Iterator<Item = &'a f64> + Clone,
    probs: impl Iterator<Item = &'a f64> + Clone,
) -> f64 {
    let mu: f64 = izip!(values.clone(), probs.clone()).map(|(v, p)| v * p).sum();
    izip!(values, probs).map(|(v, p)| (v - mu).powi(2) * p).sum()
}

fn grey_variance(nm: &NormalizedMatrix) -> f64 {
    marginal_variance(nm.row_values().iter(), nm.row_marginal().iter())
}

fn column_variance(nm: &NormalizedMatrix) -> f64 {
    marginal_variance(nm.col_values().iter(), nm.col_marginal().iter())
}

fn entropy(nm: &NormalizedMatrix) -> f64 {
    -nm.probs().iter().copied().map(plogp).sum::<f64>()
}

fn energy(nm: &NormalizedMatrix) -> f64 {
    nm.probs().iter().map(|p| p * p).sum()
}

/// GLRLM 特征登记表 (16 个).
pub static GLRLM_FEATURES: Registry<NormalizedMatrix> = &[
    ("short_runs_emphasis", low_column_emphasis),
    ("long_runs_emphasis", high_column_emphasis),
    ("low_grey_level_run_emphasis", low_grey_emphasis),
    ("high_grey_level_run_emphasis", high_grey_emphasis),
    ("short_run_low_grey_level_emphasis", low_column_low_grey_emphasis),
    ("short_run_high_grey_level_emphasis", low_column_high_grey_emphasis),
    ("long_run_low_grey_level_emphasis", high_column_low_grey_emphasis),
    ("long_run_high_grey_level_emphasis", high_column_high_grey_emphasis),
    ("grey_level_non_uniformity", grey_non_uniformity),
    ("normalised_grey_level_non_uniformity", normalised_grey_non_uniformity),
    ("run_length_non_uniformity", column_non_uniformity),
    ("normalised_run_length_non_uniformity", normalised_column_non_uniformity),
    ("run_percentage", percentage),
    ("grey_level_variance", grey_variance),
    ("run_length_variance", column_variance),
    ("run_entropy", entropy),
];

/// GLSZM 特征登记表 (16 个).
pub static GLSZM_FEATURES: Registry<NormalizedMatrix> = &[
    ("small_zone_emphasis", low_column_emphasis),
    ("large_zone_emphasis", high_column_emphasis),
    ("low_grey_level_zone_emphasis", low_grey_emphasis),
    ("high_grey_level_zone_emphasis", high_grey_emphasis),
    ("small_zone_low_grey_level_emphasis", low_column_low_grey_emphasis),
    ("small_zone_high_grey_level_emphasis", low_column_high_grey_emphasis),
    ("large_zone_low_grey_level_emphasis", high_column_low_grey_emphasis),
    ("large_zone_high_grey_level_emphasis", high_column_high_grey_emphasis),
    ("grey_level_non_uniformity", grey_non_uniformity),
    ("normalised_grey_level_non_uniformity", normalised_grey_non_uniformity),
    ("zone_size_non_uniformity", column_non_uniformity),
    ("normalised_zone_size_non_uniformity", normalised_column_non_uniformity),
    ("zone_percentage", percentage),
    ("grey_level_variance", grey_variance),
    ("zone_size_variance", column_variance),
    ("zone_size_entropy", entropy),
];

/// GLDZM 特征登记表 (16 个).
pub static GLDZM_FEATURES: Registry<NormalizedMatrix> = &[
    ("small_distance_emphasis", low_column_emphasis),
    ("large_distance_emphasis", high_column_emphasis),
    ("low_grey_level_zone_emphasis", low_grey_emphasis),
    ("high_grey_level_zone_emphasis", high_grey_emphasis),
    ("small_distance_low_grey_level_emphasis", low_column_low_grey_emphasis),
    ("small_distance_high_grey_level_emphasis", low_column_high_grey_emphasis),
    ("large_distance_low_grey_level_emphasis", high_column_low_grey_emphasis),
    ("large_distance_high_grey_level_emphasis", high_column_high_grey_emphasis),
    ("grey_level_non_uniformity", grey_non_uniformity),
    ("normalised_grey_level_non_uniformity", normalised_grey_non_uniformity),
    ("zone_distance_non_uniformity", column_non_uniformity),
    ("normalised_zone_distance_non_uniformity", normalised_column_non_uniformity),
    ("zone_percentage", percentage),
    ("grey_level_variance", grey_variance),
    ("zone_distance_variance", column_variance),
    ("zone_distance_entropy", entropy),
];

/// NGLDM 特征登记表 (17 个). 列取值须已偏移为 `k + 1`.
pub static NGLDM_FEATURES: Registry<NormalizedMatrix> = &[
    ("low_dependence_emphasis", low_column_emphasis),
    ("high_dependence_emphasis", high_column_emphasis),
    ("low_grey_level_count_emphasis", low_grey_emphasis),
    ("high_grey_level_count_emphasis", high_grey_emphasis),
    ("low_dependence_low_grey_level_emphasis", low_column_low_grey_emphasis),
    ("low_dependence_high_grey_level_emphasis", low_column_high_grey_emphasis),
    ("high_dependence_low_grey_level_emphasis", high_column_low_grey_emphasis),
    ("high_dependence_high_grey_level_emphasis", high_column_high_grey_emphasis),
    ("grey_level_non_uniformity", grey_non_uniformity),
    ("normalised_grey_level_non_uniformity", normalised_grey_non_uniformity),
    ("dependence_count_non_uniformity", column_non_uniformity),
    ("normalised_dependence_count_non_uniformity", normalised_column_non_uniformity),
    ("dependence_count_percentage", percentage),
    ("grey_level_variance", grey_variance),
    ("dependence_count_variance", column_variance),
    ("dependence_count_entropy", entropy),
    ("dependence_count_energy", energy),
];

/// 按登记表 `registry` 计算全部特征.
pub fn compute(nm: &NormalizedMatrix, registry: Registry<NormalizedMatrix>) -> Vec<f64> {
    registry.iter().map(|(_, f)| f(nm)).collect()
}
