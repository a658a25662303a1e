//! 3D 形态学操作.
//!
//! 两者都是区域类矩阵 (GLSZM, GLDZM) 的共享输入, 每次特征提取最多计算一次.

mod distance;
mod zone;

pub use distance::{DistanceMap, DistanceMetric};
pub use zone::{Zone, ZoneMap};
