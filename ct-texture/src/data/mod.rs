use std::collections::BTreeSet;
use std::ops::Index;

use ndarray::{Array3, ArrayView3};
use num::ToPrimitive;

use crate::error::{ExtractError, ExtractResult};
use crate::Idx3d;

pub mod morph_3d;

/// 一次特征提取调用内使用的、已校验的 ROI 体数据.
///
/// 构建时会检查体数据与掩膜形状一致、ROI 非空, 并将 ROI 内每个体素的灰度编码
/// 映射到灰度级下标 (即该编码在 [`Roi::levels`] 中的位置). ROI 外的体素不保存
/// 任何灰度信息, 其原始值也不会被检查.
#[derive(Debug, Clone)]
pub struct Roi {
    /// 每个体素的灰度级下标. ROI 外为 `None`.
    grid: Array3<Option<u32>>,

    /// ROI 内出现过的所有灰度编码, 严格升序.
    levels: Vec<u32>,

    /// ROI 体素个数.
    voxels: usize,
}

/// 将 ROI 内单个体素的原始值转换为灰度编码.
fn parse_code<T: ToPrimitive>(raw: &T, pos: Idx3d) -> ExtractResult<u32> {
    let value = raw.to_f64().unwrap_or(f64::NAN);
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= u32::MAX as f64 {
        Ok(value as u32)
    } else {
        Err(ExtractError::InvalidCode { pos, value })
    }
}

impl Roi {
    /// 从离散化体数据 `volume` 和同形状的掩膜 `mask` 构建 ROI.
    ///
    /// # 错误
    ///
    /// 1. 形状不一致时返回 [`ExtractError::ShapeMismatch`];
    /// 2. 掩膜全为 `false` 时返回 [`ExtractError::EmptyRoi`];
    /// 3. ROI 内出现负数、非整数等编码时返回 [`ExtractError::InvalidCode`].
    pub fn new<T: ToPrimitive>(volume: ArrayView3<T>, mask: ArrayView3<bool>) -> ExtractResult<Self> {
        if volume.dim() != mask.dim() {
            return Err(ExtractError::ShapeMismatch {
                volume: volume.dim(),
                mask: mask.dim(),
            });
        }

        // 第一遍: 收集灰度编码, 暂存于 `grid` 中.
        let mut grid = Array3::<Option<u32>>::from_elem(mask.dim(), None);
        let mut present = BTreeSet::new();
        let mut voxels = 0usize;
        for (pos, _) in mask.indexed_iter().filter(|(_, inside)| **inside) {
            let code = parse_code(&volume[pos], pos)?;
            present.insert(code);
            grid[pos] = Some(code);
            voxels += 1;
        }
        if voxels == 0 {
            return Err(ExtractError::EmptyRoi);
        }

        // 第二遍: 编码 -> 灰度级下标.
        let levels: Vec<u32> = present.into_iter().collect();
        grid.map_inplace(|cell| {
            if let Some(code) = cell {
                // `levels` 由 `grid` 中全部编码构成, 一定能找到.
                *code = levels.binary_search(code).unwrap() as u32;
            }
        });

        Ok(Self {
            grid,
            levels,
            voxels,
        })
    }

    /// 体数据形状 `(z, h, w)`.
    #[inline]
    pub fn shape(&self) -> Idx3d {
        self.grid.dim()
    }

    /// ROI 体素个数.
    #[inline]
    pub fn voxel_count(&self) -> usize {
        self.voxels
    }

    /// ROI 内出现过的所有灰度编码 (集合 `G`), 严格升序.
    #[inline]
    pub fn levels(&self) -> &[u32] {
        &self.levels
    }

    /// `Ng = |G|`.
    #[inline]
    pub fn len_levels(&self) -> usize {
        self.levels.len()
    }

    /// 获取 `pos` 处的灰度级下标. 越界或位于 ROI 外时返回 `None`.
    #[inline]
    pub fn level_at(&self, pos: Idx3d) -> Option<usize> {
        self.grid.get(pos).copied().flatten().map(|l| l as usize)
    }

    /// 获取 `pos` 处的灰度编码. 越界或位于 ROI 外时返回 `None`.
    #[inline]
    pub fn code_at(&self, pos: Idx3d) -> Option<u32> {
        self.level_at(pos).map(|l| self.levels[l])
    }

    /// `pos` 是否位于 ROI 内. 越界时返回 `false`.
    #[inline]
    pub fn contains(&self, pos: Idx3d) -> bool {
        self.level_at(pos).is_some()
    }

    /// 以行优先规则, 获取能迭代所有 ROI 体素 `(索引, 灰度级下标)` 的迭代器.
    #[inline]
    pub fn positions(&self) -> impl Iterator<Item = (Idx3d, usize)> + '_ {
        self.grid
            .indexed_iter()
            .filter_map(|(pos, l)| l.map(|l| (pos, l as usize)))
    }

    /// ROI 掩膜的一份拷贝.
    pub fn mask(&self) -> Array3<bool> {
        self.grid.map(Option::is_some)
    }
}

impl Index<Idx3d> for Roi {
    type Output = Option<u32>;

    /// 获取 `pos` 处的灰度级下标. 越界时 panic.
    #[inline]
    fn index(&self, index: Idx3d) -> &Self::Output {
        &self.grid[index]
    }
}

#[cfg(test)]
mod tests {
    use super::Roi;
    use crate::ExtractError;
    use ndarray::{Array3, array};

    #[test]
    fn test_roi_shape_mismatch() {
        let volume = Array3::<u8>::zeros((2, 2, 2));
        let mask = Array3::from_elem((2, 2, 3), true);
        let e = Roi::new(volume.view(), mask.view()).unwrap_err();
        assert_eq!(
            e,
            ExtractError::ShapeMismatch {
                volume: (2, 2, 2),
                mask: (2, 2, 3)
            }
        );
    }

    #[test]
    fn test_roi_empty() {
        let volume = Array3::<u8>::ones((2, 2, 2));
        let mask = Array3::from_elem((2, 2, 2), false);
        let e = Roi::new(volume.view(), mask.view()).unwrap_err();
        assert_eq!(e, ExtractError::EmptyRoi);
    }

    #[test]
    fn test_roi_invalid_codes() {
        let mask = Array3::from_elem((1, 1, 2), true);

        let volume = array![[[1i32, -1]]];
        let e = Roi::new(volume.view(), mask.view()).unwrap_err();
        assert_eq!(
            e,
            ExtractError::InvalidCode {
                pos: (0, 0, 1),
                value: -1.0
            }
        );

        let volume = array![[[1.5f64, 2.0]]];
        assert!(matches!(
            Roi::new(volume.view(), mask.view()),
            Err(ExtractError::InvalidCode { pos: (0, 0, 0), .. })
        ));

        let volume = array![[[f64::NAN, 2.0]]];
        assert!(Roi::new(volume.view(), mask.view()).is_err());

        // 整数值的浮点编码是合法的.
        let volume = array![[[3.0f32, 2.0]]];
        let roi = Roi::new(volume.view(), mask.view()).unwrap();
        assert_eq!(roi.levels(), &[2, 3]);
    }

    /// ROI 外的值不会被检查, 也不会出现在 `G` 中.
    #[test]
    fn test_roi_levels_ignore_outside() {
        let volume = array![[[5i64, -7, 2], [9, 2, 5]]];
        let mask = array![[[true, false, true], [false, true, true]]];
        let roi = Roi::new(volume.view(), mask.view()).unwrap();

        assert_eq!(roi.shape(), (1, 2, 3));
        assert_eq!(roi.voxel_count(), 4);
        assert_eq!(roi.levels(), &[2, 5]);
        assert_eq!(roi.len_levels(), 2);

        assert_eq!(roi.level_at((0, 0, 0)), Some(1));
        assert_eq!(roi.code_at((0, 0, 0)), Some(5));
        assert_eq!(roi.code_at((0, 0, 1)), None);
        assert_eq!(roi.code_at((0, 1, 1)), Some(2));
        assert_eq!(roi.code_at((3, 3, 3)), None);
        assert!(!roi.contains((0, 1, 0)));
        assert_eq!(roi[(0, 0, 2)], Some(0));

        let pos: Vec<_> = roi.positions().collect();
        assert_eq!(
            pos,
            vec![((0, 0, 0), 1), ((0, 0, 2), 0), ((0, 1, 1), 0), ((0, 1, 2), 1)]
        );
        assert_eq!(roi.mask(), mask);
    }
}
