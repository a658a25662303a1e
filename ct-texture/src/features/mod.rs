//! 特征公式.
//!
//! 每个特征族对应一张静态登记表 `(名称, 公式)`. 公式只读取归一化后的矩阵,
//! 输出标识符为 `"<族前缀>_<名称>"`, 例如 `glcm_joint_entropy`.
//!
//! 约定:
//!
//! 1. 分母可能恰为 0 的除法一律先判断, 为 0 时结果为 `NaN`;
//! 2. `0 · log(0) = 0`;
//! 3. 对数以 2 为底.

mod glcm;
mod ngtdm;
mod run_zone;

pub use glcm::{CoStats, GLCM_FEATURES};
pub use ngtdm::NGTDM_FEATURES;
pub use run_zone::{GLDZM_FEATURES, GLRLM_FEATURES, GLSZM_FEATURES, NGLDM_FEATURES};

pub(crate) use glcm::compute as compute_glcm;
pub(crate) use ngtdm::compute as compute_ngtdm;
pub(crate) use run_zone::compute as compute_run_zone;

use once_cell::sync::Lazy;
use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 特征标识符到特征值的映射. 按标识符排序, 输出顺序确定.
pub type FeatureMap = BTreeMap<String, f64>;

/// 单个特征公式.
pub type Formula<S> = fn(&S) -> f64;

/// 特征登记表.
pub type Registry<S> = &'static [(&'static str, Formula<S>)];

/// 特征族.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Family {
    /// 灰度共生矩阵.
    Glcm,
    /// 灰度游程矩阵.
    Glrlm,
    /// 灰度区域大小矩阵.
    Glszm,
    /// 灰度区域距离矩阵.
    Gldzm,
    /// 邻域灰度差分矩阵.
    Ngtdm,
    /// 邻域灰度依赖矩阵.
    Ngldm,
}

impl Family {
    /// 全部特征族.
    pub const ALL: [Family; 6] = [
        Family::Glcm,
        Family::Glrlm,
        Family::Glszm,
        Family::Gldzm,
        Family::Ngtdm,
        Family::Ngldm,
    ];

    /// 标识符前缀.
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Glcm => "glcm",
            Self::Glrlm => "glrlm",
            Self::Glszm => "glszm",
            Self::Gldzm => "gldzm",
            Self::Ngtdm => "ngtdm",
            Self::Ngldm => "ngldm",
        }
    }

    /// 该族所有特征的名称 (不含前缀), 顺序与登记表一致.
    pub fn feature_suffixes(&self) -> Vec<&'static str> {
        fn names<S>(r: Registry<S>) -> Vec<&'static str> {
            r.iter().map(|(n, _)| *n).collect()
        }
        match self {
            Self::Glcm => GLCM_FEATURES.iter().map(|(n, _)| *n).collect(),
            Self::Glrlm => names(GLRLM_FEATURES),
            Self::Glszm => names(GLSZM_FEATURES),
            Self::Gldzm => names(GLDZM_FEATURES),
            Self::Ngtdm => names(NGTDM_FEATURES),
            Self::Ngldm => names(NGLDM_FEATURES),
        }
    }

    /// 该族特征个数.
    #[inline]
    pub fn feature_count(&self) -> usize {
        self.feature_suffixes().len()
    }

    /// 该族所有特征的完整标识符.
    pub fn feature_names(&self) -> impl Iterator<Item = String> {
        let prefix = self.prefix();
        self.feature_suffixes()
            .into_iter()
            .map(move |s| format!("{prefix}_{s}"))
    }

    /// 是否需要区域划分.
    #[inline]
    pub fn needs_zones(&self) -> bool {
        matches!(self, Self::Glszm | Self::Gldzm)
    }

    /// 是否需要边界距离图.
    #[inline]
    pub fn needs_distances(&self) -> bool {
        matches!(self, Self::Gldzm)
    }
}

static FEATURE_NAMES: Lazy<Vec<String>> =
    Lazy::new(|| Family::ALL.iter().flat_map(Family::feature_names).collect());

/// 全部特征标识符, 按族的顺序排列.
pub fn all_feature_names() -> &'static [String] {
    &FEATURE_NAMES
}

/// `a / b`, `b == 0` 时为 `NaN`.
#[inline]
pub(crate) fn ratio(a: f64, b: f64) -> f64 {
    if b == 0.0 {
        f64::NAN
    } else {
        a / b
    }
}

/// `p · log2(p)`, 约定 `0 · log(0) = 0`.
#[inline]
pub(crate) fn plogp(p: f64) -> f64 {
    if p > 0.0 {
        p * p.log2()
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::{all_feature_names, plogp, ratio, Family};
    use std::collections::HashSet;

    #[test]
    fn test_catalogue() {
        let lens: Vec<usize> = Family::ALL.iter().map(Family::feature_count).collect();
        assert_eq!(lens, vec![25, 16, 16, 16, 5, 17]);

        let names = all_feature_names();
        assert_eq!(names.len(), 95);
        let uniq: HashSet<&String> = names.iter().collect();
        assert_eq!(uniq.len(), names.len());

        assert!(names.contains(&"glcm_joint_entropy".to_string()));
        assert!(names.contains(&"gldzm_small_distance_emphasis".to_string()));
        assert!(names.contains(&"ngldm_dependence_count_energy".to_string()));
        assert!(names.contains(&"ngtdm_coarseness".to_string()));
    }

    #[test]
    fn test_helpers() {
        assert!(ratio(1.0, 0.0).is_nan());
        assert_eq!(ratio(1.0, 4.0), 0.25);
        assert_eq!(plogp(0.0), 0.0);
        assert_eq!(plogp(0.5), -0.5);
        assert!(Family::Gldzm.needs_zones() && Family::Gldzm.needs_distances());
        assert!(!Family::Glcm.needs_zones());
    }
}
