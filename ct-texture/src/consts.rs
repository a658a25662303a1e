//! 通用常量.

/// 26-邻域中互不冗余的方向个数.
pub const DIRECTION_COUNT: usize = 13;

/// NGTDM / NGLDM 默认的邻域 (切比雪夫) 距离.
pub const DEFAULT_DISTANCE: usize = 1;

/// NGLDM 默认的灰度容差. 0 代表灰度编码必须完全相同.
pub const DEFAULT_ALPHA: u32 = 0;

/// NGLDM 在计算特征时为依赖计数附加的偏移量 (IBSI: `j = k + 1`).
pub const DEPENDENCE_COLUMN_OFFSET: f64 = 1.0;

/// 3x3x3 实心立方体在 26-邻接下有序相邻体素对的个数.
///
/// 按方向统计: 3 个面方向各 18 对, 6 个棱方向各 12 对, 4 个顶点方向各 8 对,
/// 共 158 个无序对.
pub const CUBE3_ORDERED_PAIRS: u64 = 316;
