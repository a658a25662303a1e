//! 输入校验错误.

use crate::Idx3d;
use thiserror::Error;

/// 特征提取的输入校验错误.
///
/// 所有错误都在构建任何纹理矩阵之前产生, 因此不存在 "算了一半" 的结果.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExtractError {
    /// 体数据与 ROI 掩膜形状不一致.
    #[error("体数据形状 {volume:?} 与 ROI 掩膜形状 {mask:?} 不一致")]
    ShapeMismatch {
        /// 体数据形状 `(z, h, w)`.
        volume: Idx3d,

        /// 掩膜形状 `(z, h, w)`.
        mask: Idx3d,
    },

    /// ROI 掩膜中没有任何 `true` 体素.
    #[error("ROI 掩膜为空")]
    EmptyRoi,

    /// ROI 内存在负数、非整数、非有限值或超出 `u32` 范围的灰度编码.
    #[error("ROI 内体素 {pos:?} 的灰度编码 {value} 不是合法的非负整数")]
    InvalidCode {
        /// 出错体素的索引.
        pos: Idx3d,

        /// 原始值 (转换为 `f64` 后).
        value: f64,
    },

    /// 非法参数组合.
    #[error("非法参数: {0}")]
    InvalidSettings(String),
}

/// 特征提取结果.
pub type ExtractResult<T> = Result<T, ExtractError>;

#[cfg(test)]
mod tests {
    use super::ExtractError;

    #[test]
    fn test_error_display() {
        let e = ExtractError::ShapeMismatch {
            volume: (1, 2, 3),
            mask: (3, 2, 1),
        };
        assert!(e.to_string().contains("(1, 2, 3)"));
        assert!(e.to_string().contains("(3, 2, 1)"));

        let e = ExtractError::InvalidCode {
            pos: (0, 0, 1),
            value: -2.0,
        };
        assert!(e.to_string().contains("-2"));

        let e = ExtractError::InvalidSettings("distance 必须为正".to_string());
        assert!(e.to_string().contains("distance"));
    }
}
