use super::{plogp, ratio};
use crate::aggregate::NormalizedMatrix;
use ndarray::ArrayView1;
use ordered_float::NotNan;
use std::collections::BTreeMap;

/// GLCM 特征共用的统计量. 由一个归一化的 (对称) GLCM 一次性计算得到.
#[derive(Debug, Clone)]
pub struct CoStats<'a> {
    nm: &'a NormalizedMatrix,
    values: ArrayView1<'a, f64>,
    ng: f64,

    /// `(k, p_{x-y}(k))`, `k = |i - j|` 升序.
    diff: Vec<(f64, f64)>,

    /// `(k, p_{x+y}(k))`, `k = i + j` 升序.
    sum: Vec<(f64, f64)>,

    mu_i: f64,
    mu_j: f64,
    sigma_i: f64,
    sigma_j: f64,
    hx: f64,
    hy: f64,
    hxy: f64,
    hxy1: f64,
    hxy2: f64,
}

impl<'a> CoStats<'a> {
    /// 计算 `nm` 的全部共用统计量.
    pub fn new(nm: &'a NormalizedMatrix) -> Self {
        let values = nm.row_values();
        let p = nm.probs();
        let px = nm.row_marginal();
        let py = nm.col_marginal();

        let mut diff = BTreeMap::<u64, f64>::new();
        let mut sum = BTreeMap::<u64, f64>::new();
        let mut hxy = 0.0;
        let mut hxy1 = 0.0;
        for ((i, j), &pij) in p.indexed_iter().filter(|(_, &x)| x > 0.0) {
            let (a, b) = (values[i], values[j]);
            *diff.entry((a - b).abs() as u64).or_default() += pij;
            *sum.entry((a + b) as u64).or_default() += pij;
            hxy -= plogp(pij);
            hxy1 -= pij * (px[i] * py[j]).log2();
        }

        let mut hxy2 = 0.0;
        for (&pi, &pj) in itertools::iproduct!(px.iter(), py.iter()) {
            hxy2 -= plogp(pi * pj);
        }

        let mu_i = values.dot(&px);
        let mu_j = values.dot(&py);
        let sigma_i = values.mapv(|v| (v - mu_i).powi(2)).dot(&px).sqrt();
        let sigma_j = values.mapv(|v| (v - mu_j).powi(2)).dot(&py).sqrt();

        let entropy = |m: ArrayView1<f64>| -m.iter().copied().map(plogp).sum::<f64>();
        let to_pairs = |m: BTreeMap<u64, f64>| -> Vec<(f64, f64)> {
            m.into_iter().map(|(k, p)| (k as f64, p)).collect()
        };

        Self {
            nm,
            values,
            ng: nm.len_levels() as f64,
            diff: to_pairs(diff),
            sum: to_pairs(sum),
            mu_i,
            mu_j,
            sigma_i,
            sigma_j,
            hx: entropy(px),
            hy: entropy(py),
            hxy,
            hxy1,
            hxy2,
        }
    }

    /// `Σ p(i, j) · f(i, j)`, 只遍历 `p > 0` 的格子.
    fn expect<F: Fn(f64, f64) -> f64>(&self, f: F) -> f64 {
        self.nm
            .probs()
            .indexed_iter()
            .filter(|(_, &p)| p > 0.0)
            .map(|((i, j), &p)| p * f(self.values[i], self.values[j]))
            .sum()
    }
}

fn joint_max(s: &CoStats<'_>) -> f64 {
    s.nm.probs()
        .iter()
        .filter_map(|&p| NotNan::new(p).ok())
        .max()
        .map_or(f64::NAN, NotNan::into_inner)
}

fn joint_average(s: &CoStats<'_>) -> f64 {
    s.mu_i
}

fn joint_variance(s: &CoStats<'_>) -> f64 {
    s.expect(|i, _| (i - s.mu_i).powi(2))
}

fn joint_entropy(s: &CoStats<'_>) -> f64 {
    s.hxy
}

fn dist_mean(d: &[(f64, f64)]) -> f64 {
    d.iter().map(|&(k, p)| k * p).sum()
}

fn dist_variance(d: &[(f64, f64)]) -> f64 {
    let mu = dist_mean(d);
    d.iter().map(|&(k, p)| (k - mu).powi(2) * p).sum()
}

fn dist_entropy(d: &[(f64, f64)]) -> f64 {
    -d.iter().map(|&(_, p)| plogp(p)).sum::<f64>()
}

fn difference_average(s: &CoStats<'_>) -> f64 {
    dist_mean(&s.diff)
}

fn difference_variance(s: &CoStats<'_>) -> f64 {
    dist_variance(&s.diff)
}

fn difference_entropy(s: &CoStats<'_>) -> f64 {
    dist_entropy(&s.diff)
}

fn sum_average(s: &CoStats<'_>) -> f64 {
    dist_mean(&s.sum)
}

fn sum_variance(s: &CoStats<'_>) -> f64 {
    dist_variance(&s.sum)
}

fn sum_entropy(s: &CoStats<'_>) -> f64 {
    dist_entropy(&s.sum)
}

fn angular_second_moment(s: &CoStats<'_>) -> f64 {
    s.nm.probs().iter().map(|p| p * p).sum()
}

fn contrast(s: &CoStats<'_>) -> f64 {
    s.expect(|i, j| (i - j).powi(2))
}

fn dissimilarity(s: &CoStats<'_>) -> f64 {
    s.expect(|i, j| (i - j).abs())
}

fn inverse_difference(s: &CoStats<'_>) -> f64 {
    s.expect(|i, j| 1.0 / (1.0 + (i - j).abs()))
}

fn normalised_inverse_difference(s: &CoStats<'_>) -> f64 {
    s.expect(|i, j| 1.0 / (1.0 + (i - j).abs() / s.ng))
}

fn inverse_difference_moment(s: &CoStats<'_>) -> f64 {
    s.expect(|i, j| 1.0 / (1.0 + (i - j).powi(2)))
}

fn normalised_inverse_difference_moment(s: &CoStats<'_>) -> f64 {
    s.expect(|i, j| 1.0 / (1.0 + (i - j).powi(2) / (s.ng * s.ng)))
}

fn inverse_variance(s: &CoStats<'_>) -> f64 {
    s.diff
        .iter()
        .filter(|&&(k, _)| k > 0.0)
        .map(|&(k, p)| p / (k * k))
        .sum()
}

fn correlation(s: &CoStats<'_>) -> f64 {
    let cov = s.expect(|i, j| (i - s.mu_i) * (j - s.mu_j));
    ratio(cov, s.sigma_i * s.sigma_j)
}

fn autocorrelation(s: &CoStats<'_>) -> f64 {
    s.expect(|i, j| i * j)
}

fn cluster_moment(s: &CoStats<'_>, n: i32) -> f64 {
    s.expect(|i, j| (i + j - s.mu_i - s.mu_j).powi(n))
}

fn cluster_tendency(s: &CoStats<'_>) -> f64 {
    cluster_moment(s, 2)
}

fn cluster_shade(s: &CoStats<'_>) -> f64 {
    cluster_moment(s, 3)
}

fn cluster_prominence(s: &CoStats<'_>) -> f64 {
    cluster_moment(s, 4)
}

fn information_correlation_1(s: &CoStats<'_>) -> f64 {
    ratio(s.hxy - s.hxy1, s.hx.max(s.hy))
}

fn information_correlation_2(s: &CoStats<'_>) -> f64 {
    (1.0 - (-2.0 * (s.hxy2 - s.hxy)).exp()).max(0.0).sqrt()
}

/// GLCM 特征登记表 (25 个).
pub static GLCM_FEATURES: &[(&str, fn(&CoStats<'_>) -> f64)] = &[
    ("joint_max", joint_max),
    ("joint_average", joint_average),
    ("joint_variance", joint_variance),
    ("joint_entropy", joint_entropy),
    ("difference_average", difference_average),
    ("difference_variance", difference_variance),
    ("difference_entropy", difference_entropy),
    ("sum_average", sum_average),
    ("sum_variance", sum_variance),
    ("sum_entropy", sum_entropy),
    ("angular_second_moment", angular_second_moment),
    ("contrast", contrast),
    ("dissimilarity", dissimilarity),
    ("inverse_difference", inverse_difference),
    ("normalised_inverse_difference", normalised_inverse_difference),
    ("inverse_difference_moment", inverse_difference_moment),
    (
        "normalised_inverse_difference_moment",
        normalised_inverse_difference_moment,
    ),
    ("inverse_variance", inverse_variance),
    ("correlation", correlation),
    ("autocorrelation", autocorrelation),
    ("cluster_tendency", cluster_tendency),
    ("cluster_shade", cluster_shade),
    ("cluster_prominence", cluster_prominence),
    ("information_correlation_1", information_correlation_1),
    ("information_correlation_2", information_correlation_2),
];

/// 对一个归一化 GLCM 计算全部特征, 顺序与 [`GLCM_FEATURES`] 一致.
pub fn compute(nm: &NormalizedMatrix) -> Vec<f64> {
    let stats = CoStats::new(nm);
    GLCM_FEATURES.iter().map(|(_, f)| f(&stats)).collect()
}

#[cfg(test)]
mod tests {
    use super::{compute, GLCM_FEATURES};
    use crate::aggregate::NormalizedMatrix;
    use crate::CountMatrix;
    use ndarray::array;

    fn f64_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    fn feature(values: &[f64], name: &str) -> f64 {
        let k = GLCM_FEATURES.iter().position(|(n, _)| *n == name).unwrap();
        values[k]
    }

    /// 两个相邻体素, 编码分别为 1 和 2.
    #[test]
    fn test_glcm_features_pair() {
        let m = CountMatrix::new(array![[0, 1], [1, 0]], vec![1, 2], vec![1, 2]);
        let v = compute(&NormalizedMatrix::new(&m, 2).unwrap());

        assert!(f64_eq(feature(&v, "contrast"), 1.0));
        assert!(f64_eq(feature(&v, "joint_entropy"), 1.0));
        assert!(f64_eq(feature(&v, "angular_second_moment"), 0.5));
        assert!(f64_eq(feature(&v, "correlation"), -1.0));
        assert!(f64_eq(feature(&v, "joint_average"), 1.5));
        assert!(f64_eq(feature(&v, "joint_max"), 0.5));
        assert!(f64_eq(feature(&v, "dissimilarity"), 1.0));
        assert!(f64_eq(feature(&v, "difference_average"), 1.0));
        assert!(f64_eq(feature(&v, "difference_entropy"), 0.0));
        assert!(f64_eq(feature(&v, "sum_average"), 3.0));
        assert!(f64_eq(feature(&v, "inverse_difference"), 0.5));
        assert!(f64_eq(feature(&v, "inverse_variance"), 1.0));
        assert!(f64_eq(feature(&v, "autocorrelation"), 2.0));
        assert!(f64_eq(feature(&v, "cluster_tendency"), 0.0));
        // HX = HY = HXY = 1, HXY1 = HXY2 = 2.
        assert!(f64_eq(feature(&v, "information_correlation_1"), -1.0));
        assert!(f64_eq(
            feature(&v, "information_correlation_2"),
            (1.0 - (-2.0f64).exp()).sqrt()
        ));
    }

    /// 单一灰度: 熵为 0, 方差为 0 导致相关性为 `NaN`.
    #[test]
    fn test_glcm_features_uniform() {
        let m = CountMatrix::new(array![[8]], vec![3], vec![3]);
        let v = compute(&NormalizedMatrix::new(&m, 8).unwrap());

        assert!(f64_eq(feature(&v, "joint_entropy"), 0.0));
        assert!(f64_eq(feature(&v, "angular_second_moment"), 1.0));
        assert!(f64_eq(feature(&v, "joint_average"), 3.0));
        assert!(f64_eq(feature(&v, "contrast"), 0.0));
        assert!(f64_eq(feature(&v, "inverse_variance"), 0.0));
        assert!(f64_eq(feature(&v, "information_correlation_2"), 0.0));
        assert!(feature(&v, "correlation").is_nan());
        assert!(feature(&v, "information_correlation_1").is_nan());
    }
}
