//! 特征提取入口.

use crate::aggregate::{aggregate, evaluate_single, Aggregation, NormalizedMatrix, NormalizedNgtdm};
use crate::consts::{DEFAULT_ALPHA, DEFAULT_DISTANCE, DEPENDENCE_COLUMN_OFFSET};
use crate::error::{ExtractError, ExtractResult};
use crate::features::{
    compute_glcm, compute_ngtdm, compute_run_zone, Family, FeatureMap, GLCM_FEATURES,
    GLDZM_FEATURES, GLRLM_FEATURES, GLSZM_FEATURES, NGLDM_FEATURES,
};
use crate::matrix::{
    gldzm, glcm_directions, glrlm_directions, glszm, ngtdm, DependenceRule, NgldmBuilder,
};
use crate::{DistanceMap, DistanceMetric, Idx3d, Roi, ZoneMap};
use log::{debug, trace};
use ndarray::ArrayView3;
use num::ToPrimitive;
use std::collections::BTreeSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 特征提取参数.
///
/// ```
/// use ct_texture::{Aggregation, Family, TextureSettings};
///
/// let settings = TextureSettings::default()
///     .with_alpha(1)
///     .with_glcm_aggregation(Aggregation::Average)
///     .with_families([Family::Glcm, Family::Ngldm]);
/// assert_eq!(settings.distance(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TextureSettings {
    distance: usize,
    alpha: u32,
    glcm_aggregation: Aggregation,
    glrlm_aggregation: Aggregation,
    distance_metric: DistanceMetric,
    families: BTreeSet<Family>,
}

impl Default for TextureSettings {
    fn default() -> Self {
        Self {
            distance: DEFAULT_DISTANCE,
            alpha: DEFAULT_ALPHA,
            glcm_aggregation: Aggregation::default(),
            glrlm_aggregation: Aggregation::default(),
            distance_metric: DistanceMetric::default(),
            families: Family::ALL.into_iter().collect(),
        }
    }
}

impl TextureSettings {
    /// NGTDM / NGLDM 的邻域 (切比雪夫) 距离.
    pub fn with_distance(mut self, distance: usize) -> Self {
        self.distance = distance;
        self
    }

    /// NGLDM 的灰度容差.
    pub fn with_alpha(mut self, alpha: u32) -> Self {
        self.alpha = alpha;
        self
    }

    /// GLCM 的方向聚合约定.
    pub fn with_glcm_aggregation(mut self, agg: Aggregation) -> Self {
        self.glcm_aggregation = agg;
        self
    }

    /// GLRLM 的方向聚合约定.
    pub fn with_glrlm_aggregation(mut self, agg: Aggregation) -> Self {
        self.glrlm_aggregation = agg;
        self
    }

    /// GLDZM 使用的边界距离度量.
    pub fn with_distance_metric(mut self, metric: DistanceMetric) -> Self {
        self.distance_metric = metric;
        self
    }

    /// 需要计算的特征族.
    pub fn with_families<I: IntoIterator<Item = Family>>(mut self, families: I) -> Self {
        self.families = families.into_iter().collect();
        self
    }

    /// 邻域距离.
    #[inline]
    pub fn distance(&self) -> usize {
        self.distance
    }

    /// 灰度容差.
    #[inline]
    pub fn alpha(&self) -> u32 {
        self.alpha
    }

    /// GLCM 聚合约定.
    #[inline]
    pub fn glcm_aggregation(&self) -> Aggregation {
        self.glcm_aggregation
    }

    /// GLRLM 聚合约定.
    #[inline]
    pub fn glrlm_aggregation(&self) -> Aggregation {
        self.glrlm_aggregation
    }

    /// 边界距离度量.
    #[inline]
    pub fn distance_metric(&self) -> DistanceMetric {
        self.distance_metric
    }

    /// 需要计算的特征族.
    #[inline]
    pub fn families(&self) -> &BTreeSet<Family> {
        &self.families
    }

    /// 检查参数组合是否合法.
    pub fn validate(&self) -> ExtractResult<()> {
        if self.distance == 0 {
            return Err(ExtractError::InvalidSettings("邻域距离必须为正数".into()));
        }
        if self.families.is_empty() {
            return Err(ExtractError::InvalidSettings("未选择任何特征族".into()));
        }
        Ok(())
    }

    /// 针对形状为 `shape` 的体数据检查参数. 邻域距离不得超过体数据的最大边长.
    pub fn validate_for(&self, shape: Idx3d) -> ExtractResult<()> {
        self.validate()?;
        let longest = shape.0.max(shape.1).max(shape.2);
        if self.distance > longest {
            return Err(ExtractError::InvalidSettings(format!(
                "邻域距离 {} 超过体数据最大边长 {longest}",
                self.distance
            )));
        }
        Ok(())
    }
}

/// 一次调用中由多个特征族共享的中间结构.
struct Shared<'a> {
    roi: &'a Roi,
    settings: &'a TextureSettings,
    zones: Option<ZoneMap>,
    distances: Option<DistanceMap>,
}

impl Shared<'_> {
    fn zones(&self) -> &ZoneMap {
        // 只有在需要区域的族存在时才会调用.
        self.zones.as_ref().unwrap()
    }

    /// 计算单个特征族, 结果顺序与该族的登记表一致.
    fn evaluate(&self, family: Family) -> Vec<f64> {
        let roi = self.roi;
        let voxels = roi.voxel_count();
        trace!("计算特征族 {family:?}");

        match family {
            Family::Glcm => aggregate(
                &glcm_directions(roi),
                self.settings.glcm_aggregation,
                voxels,
                GLCM_FEATURES.len(),
                compute_glcm,
            ),
            Family::Glrlm => aggregate(
                &glrlm_directions(roi),
                self.settings.glrlm_aggregation,
                voxels,
                GLRLM_FEATURES.len(),
                |nm| compute_run_zone(nm, GLRLM_FEATURES),
            ),
            Family::Glszm => {
                let m = glszm(roi, self.zones());
                let nm = NormalizedMatrix::new(&m, voxels);
                evaluate_single(nm.as_ref(), GLSZM_FEATURES.len(), |nm| {
                    compute_run_zone(nm, GLSZM_FEATURES)
                })
            }
            Family::Gldzm => {
                // 同上, 需要距离的族存在时距离图一定已经计算.
                let distances = self.distances.as_ref().unwrap();
                let m = gldzm(roi, self.zones(), distances);
                let nm = NormalizedMatrix::new(&m, voxels);
                evaluate_single(nm.as_ref(), GLDZM_FEATURES.len(), |nm| {
                    compute_run_zone(nm, GLDZM_FEATURES)
                })
            }
            Family::Ngtdm => {
                let table = ngtdm(roi, self.settings.distance);
                compute_ngtdm(NormalizedNgtdm::new(&table).as_ref())
            }
            Family::Ngldm => {
                let rule = DependenceRule::with_tolerance(self.settings.alpha);
                let m = NgldmBuilder::new(self.settings.distance, rule).build(roi);
                let nm = NormalizedMatrix::new(&m, voxels)
                    .map(|nm| nm.shift_columns(DEPENDENCE_COLUMN_OFFSET));
                evaluate_single(nm.as_ref(), NGLDM_FEATURES.len(), |nm| {
                    compute_run_zone(nm, NGLDM_FEATURES)
                })
            }
        }
    }
}

/// 对离散化体数据 `volume` 中由 `mask` 指定的 ROI 计算纹理特征.
///
/// 先校验参数与输入 (见 [`Roi::new`]), 校验通过后才会构建任何矩阵.
/// 返回的映射包含 `settings` 中每个特征族的全部特征, 数值上退化的特征为 `NaN`.
///
/// # 错误
///
/// 见 [`ExtractError`].
pub fn extract<T: ToPrimitive>(
    volume: ArrayView3<T>,
    mask: ArrayView3<bool>,
    settings: &TextureSettings,
) -> ExtractResult<FeatureMap> {
    settings.validate()?;
    let roi = Roi::new(volume, mask)?;
    extract_roi(&roi, settings)
}

/// 对已经校验过的 `roi` 计算纹理特征. 语义同 [`extract`].
pub fn extract_roi(roi: &Roi, settings: &TextureSettings) -> ExtractResult<FeatureMap> {
    settings.validate_for(roi.shape())?;
    debug!(
        "开始提取: 形状 {:?}, {} 个 ROI 体素, {} 个灰度级, {} 个特征族",
        roi.shape(),
        roi.voxel_count(),
        roi.len_levels(),
        settings.families.len()
    );

    let need_zones = settings.families.iter().any(Family::needs_zones);
    let need_distances = settings.families.iter().any(Family::needs_distances);
    let shared = Shared {
        roi,
        settings,
        zones: need_zones.then(|| ZoneMap::label(roi)),
        distances: need_distances.then(|| DistanceMap::compute(roi, settings.distance_metric)),
    };

    let families: Vec<Family> = settings.families.iter().copied().collect();
    let values: Vec<Vec<f64>> = {
        cfg_if::cfg_if! {
            if #[cfg(feature = "rayon")] {
                use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
                families.par_iter().map(|&f| shared.evaluate(f)).collect()
            } else {
                families.iter().map(|&f| shared.evaluate(f)).collect()
            }
        }
    };

    let mut ans = FeatureMap::new();
    for (family, vals) in families.into_iter().zip(values) {
        ans.extend(family.feature_names().zip(vals));
    }
    debug!("提取完成: {} 个特征", ans.len());
    Ok(ans)
}
