use super::{ratio, Registry};
use crate::aggregate::NormalizedNgtdm;
use itertools::iproduct;

/// `Σ_i Σ_j f(i, j)`, 遍历所有有序灰度级对.
fn pairwise<F: Fn(usize, usize) -> f64>(t: &NormalizedNgtdm, f: F) -> f64 {
    let n = t.len_levels();
    iproduct!(0..n, 0..n).map(|(i, j)| f(i, j)).sum()
}

fn weighted_sum(t: &NormalizedNgtdm) -> f64 {
    t.probs().iter().zip(t.sums()).map(|(p, s)| p * s).sum()
}

fn coarseness(t: &NormalizedNgtdm) -> f64 {
    ratio(1.0, weighted_sum(t))
}

fn contrast(t: &NormalizedNgtdm) -> f64 {
    let ngp = t.len_levels();
    if ngp <= 1 {
        return 0.0;
    }
    let (v, p) = (t.values(), t.probs());
    let spread = pairwise(t, |i, j| p[i] * p[j] * (v[i] - v[j]).powi(2));
    let s: f64 = t.sums().iter().sum();
    spread / (ngp * (ngp - 1)) as f64 * s / t.valid_voxels()
}

fn busyness(t: &NormalizedNgtdm) -> f64 {
    let (v, p) = (t.values(), t.probs());
    let denom = pairwise(t, |i, j| (v[i] * p[i] - v[j] * p[j]).abs());
    ratio(weighted_sum(t), denom)
}

fn complexity(t: &NormalizedNgtdm) -> f64 {
    let (v, p, s) = (t.values(), t.probs(), t.sums());
    let acc = pairwise(t, |i, j| {
        (v[i] - v[j]).abs() * (p[i] * s[i] + p[j] * s[j]) / (p[i] + p[j])
    });
    acc / t.valid_voxels()
}

fn strength(t: &NormalizedNgtdm) -> f64 {
    let (v, p) = (t.values(), t.probs());
    let num = pairwise(t, |i, j| (p[i] + p[j]) * (v[i] - v[j]).powi(2));
    ratio(num, t.sums().iter().sum())
}

/// NGTDM 特征登记表 (5 个).
pub static NGTDM_FEATURES: Registry<NormalizedNgtdm> = &[
    ("coarseness", coarseness),
    ("contrast", contrast),
    ("busyness", busyness),
    ("complexity", complexity),
    ("strength", strength),
];

/// 计算全部 NGTDM 特征. 没有任何有效体素时全为 `NaN`.
pub fn compute(t: Option<&NormalizedNgtdm>) -> Vec<f64> {
    match t {
        Some(t) => NGTDM_FEATURES.iter().map(|(_, f)| f(t)).collect(),
        None => vec![f64::NAN; NGTDM_FEATURES.len()],
    }
}

#[cfg(test)]
mod tests {
    use super::compute;
    use crate::aggregate::NormalizedNgtdm;
    use crate::matrix::ngtdm;
    use crate::Roi;
    use ndarray::{array, Array3};

    fn f64_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    /// 直线 `[1, 2, 3]`: n = [1, 1, 1], s = [1, 0, 1].
    #[test]
    fn test_ngtdm_features_line() {
        let volume = array![[[1u8, 2, 3]]];
        let mask = array![[[true, true, true]]];
        let roi = Roi::new(volume.view(), mask.view()).unwrap();
        let t = NormalizedNgtdm::new(&ngtdm(&roi, 1));
        let v = compute(t.as_ref());

        assert!(f64_eq(v[0], 1.5));
        assert!(f64_eq(v[1], 4.0 / 27.0));
        assert!(f64_eq(v[2], 0.25));
        assert!(f64_eq(v[3], 2.0));
        assert!(f64_eq(v[4], 4.0));
    }

    /// 均匀 ROI: 对比度、复杂度为 0, 其余分母为 0 的特征为 `NaN`.
    #[test]
    fn test_ngtdm_features_uniform() {
        let volume = Array3::<u8>::from_elem((3, 3, 3), 2);
        let mask = Array3::from_elem((3, 3, 3), true);
        let roi = Roi::new(volume.view(), mask.view()).unwrap();
        let t = NormalizedNgtdm::new(&ngtdm(&roi, 1));
        let v = compute(t.as_ref());

        assert!(v[0].is_nan());
        assert_eq!(v[1], 0.0);
        assert!(v[2].is_nan());
        assert_eq!(v[3], 0.0);
        assert!(v[4].is_nan());
    }

    #[test]
    fn test_ngtdm_features_empty() {
        assert!(compute(None).iter().all(|x| x.is_nan()));
    }
}
