#![warn(missing_docs)] // <= 合适时移除它.
// #![warn(clippy::missing_docs_in_private_items)]  // <= too strict.

//! 核心库. 对离散化后的三维 CT 体数据 (及其 ROI 掩膜) 计算纹理矩阵特征.
//!
//! 所有矩阵和特征的定义均遵循 IBSI (Image Biomarker Standardisation Initiative)
//! 的公开定义. 该 crate 只负责 "离散化灰度编码 + ROI -> 特征值" 这一步,
//! 文件读写、重采样、离散化本身都不在本 crate 的职责范围内.
//!
//! 该 crate 目前仅提供 `safe` 接口.
//!
//! # 注意
//!
//! 1. 仅支持三维体数据, 不提供逐切片 (2D) 的计算.
//! 2. 非法输入 (形状不一致, 空 ROI, 非法灰度编码) 以 [`ExtractError`] 返回,
//!   且一定在构建任何矩阵之前返回. 数值上的退化情况 (如方差为零) 不是错误,
//!   对应特征值为 `NaN`.
//! 3. 一次 [`extract`] 调用内部创建的所有中间结构都在返回时销毁,
//!   库本身不持有任何全局可变状态.
//!
//! # 开发计划
//!
//! ### 26-邻域方向枚举 ✅
//!
//! 13 个互不冗余的方向, 以及 26/6-邻域与切比雪夫球.
//!
//! 实现位于 `ct-texture/src/neighbour.rs`.
//!
//! ### 输入校验与 ROI 视图 ✅
//!
//! 实现位于 `ct-texture/src/data/mod.rs`.
//!
//! ### 三维形态学操作 ✅
//!
//! 26-连通等灰度区域标记, 以及 ROI 边界距离图 (棋盘距离 / 曼哈顿距离).
//!
//! 实现位于 `ct-texture/src/data/morph_3d`.
//!
//! ### 六种纹理矩阵 ✅
//!
//! GLCM, GLRLM, GLSZM, GLDZM, NGTDM, NGLDM.
//!
//! 实现位于 `ct-texture/src/matrix`.
//!
//! ### 方向聚合 (merge / average) 与归一化 ✅
//!
//! 两种约定均为一等公民, 可分别对 GLCM 和 GLRLM 指定.
//!
//! 实现位于 `ct-texture/src/aggregate.rs`.
//!
//! ### 特征公式 ✅
//!
//! 共 95 个特征, 以静态表登记.
//!
//! 实现位于 `ct-texture/src/features`.
//!
//! ### 多线程 ✅
//!
//! 打开 `rayon` feature 后, 逐方向矩阵和各特征族并行计算, 结果与串行版本逐位一致.
//!
//! ### 完善代码文档 ✅
//!
//! 给每个 public API 提供文档, 并视情况给 private API 提供文档.

/// 三维索引 `(z, h, w)`, 同时也可一定程度上用作非负整数向量.
pub type Idx3d = (usize, usize, usize);

/// 三维有符号偏移 `(dz, dh, dw)`.
pub type Offset3d = (isize, isize, isize);

pub mod consts;

mod error;

pub use error::{ExtractError, ExtractResult};

/// 经过校验的体数据与 ROI, 以及三维形态学操作.
pub mod data;

pub use data::morph_3d::{DistanceMap, DistanceMetric, Zone, ZoneMap};
pub use data::Roi;

pub mod neighbour;

pub mod matrix;

pub use matrix::CountMatrix;

pub mod aggregate;

pub use aggregate::Aggregation;

pub mod features;

pub use features::{Family, FeatureMap};

mod extract;

pub use extract::{extract, extract_roi, TextureSettings};

pub mod prelude;
