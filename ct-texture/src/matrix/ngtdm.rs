use crate::neighbour::{chebyshev_ball, shift};
use crate::Roi;
use log::trace;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 邻域灰度差分表 (NGTDM).
///
/// 第 `i` 项对应灰度编码 `levels[i]`: `counts[i]` 为拥有有效邻域的体素个数 `n_i`,
/// `sums[i]` 为这些体素 `|code - 邻域均值|` 之和 `s_i`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NgtdmTable {
    levels: Vec<u32>,
    counts: Vec<u64>,
    sums: Vec<f64>,
}

impl NgtdmTable {
    /// 灰度编码.
    #[inline]
    pub fn levels(&self) -> &[u32] {
        &self.levels
    }

    /// `n_i`.
    #[inline]
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// `s_i`.
    #[inline]
    pub fn sums(&self) -> &[f64] {
        &self.sums
    }

    /// 拥有有效邻域的体素总数 `Nvc`.
    #[inline]
    pub fn valid_voxels(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// 是否没有任何体素拥有有效邻域.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.valid_voxels() == 0
    }
}

/// 以切比雪夫距离 `distance` 为邻域构建 NGTDM.
///
/// 邻域内没有任何 ROI 体素的体素被完全排除, 不计入 `n_i`.
pub fn ngtdm(roi: &Roi, distance: usize) -> NgtdmTable {
    let offsets = chebyshev_ball(distance);
    let shape = roi.shape();
    let ng = roi.len_levels();
    let mut counts = vec![0u64; ng];
    let mut sums = vec![0f64; ng];

    for (pos, level) in roi.positions() {
        let (n, acc) = offsets
            .iter()
            .filter_map(|&off| shift(pos, off, shape).and_then(|p| roi.code_at(p)))
            .fold((0u64, 0u64), |(n, acc), c| (n + 1, acc + c as u64));
        if n == 0 {
            continue;
        }
        let code = roi.levels()[level] as f64;
        counts[level] += 1;
        sums[level] += (code - acc as f64 / n as f64).abs();
    }

    trace!("NGTDM: {} 个有效体素", counts.iter().sum::<u64>());
    NgtdmTable {
        levels: roi.levels().to_vec(),
        counts,
        sums,
    }
}

#[cfg(test)]
mod tests {
    use super::ngtdm;
    use crate::Roi;
    use ndarray::{array, Array3};

    fn f64_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn test_ngtdm_line() {
        let volume = array![[[1u8, 2, 3]]];
        let mask = array![[[true, true, true]]];
        let roi = Roi::new(volume.view(), mask.view()).unwrap();
        let t = ngtdm(&roi, 1);

        assert_eq!(t.levels(), &[1, 2, 3]);
        assert_eq!(t.counts(), &[1, 1, 1]);
        assert!(f64_eq(t.sums()[0], 1.0));
        assert!(f64_eq(t.sums()[1], 0.0));
        assert!(f64_eq(t.sums()[2], 1.0));
        assert_eq!(t.valid_voxels(), 3);
    }

    /// 孤立体素没有有效邻域, 不被计数.
    #[test]
    fn test_ngtdm_isolated() {
        let volume = array![[[1u8, 0, 2, 2]]];
        let mask = array![[[true, false, true, true]]];
        let roi = Roi::new(volume.view(), mask.view()).unwrap();
        let t = ngtdm(&roi, 1);

        assert_eq!(t.counts(), &[0, 2]);
        assert_eq!(t.valid_voxels(), 2);

        // 距离 2 时两者可以 "看到" 彼此.
        let t = ngtdm(&roi, 2);
        assert_eq!(t.counts(), &[1, 2]);
        assert!(f64_eq(t.sums()[0], 1.0));
    }

    #[test]
    fn test_ngtdm_uniform() {
        let volume = Array3::<u8>::from_elem((3, 3, 3), 5);
        let mask = Array3::from_elem((3, 3, 3), true);
        let roi = Roi::new(volume.view(), mask.view()).unwrap();
        let t = ngtdm(&roi, 1);
        assert_eq!(t.counts(), &[27]);
        assert_eq!(t.sums(), &[0.0]);

        let volume = array![[[5u8]]];
        let mask = array![[[true]]];
        let roi = Roi::new(volume.view(), mask.view()).unwrap();
        assert!(ngtdm(&roi, 1).is_empty());
    }
}
