use crate::neighbour::{shift, DIAMOND, NEIGHBOURS_26};
use crate::{Idx3d, Offset3d, Roi};
use log::trace;
use ndarray::{Array3, ArrayView3};
use std::collections::VecDeque;
use std::ops::Index;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 边界距离所使用的离散度量.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DistanceMetric {
    /// 棋盘距离, 基于 26-邻域. 与区域划分使用的连通性一致.
    #[default]
    Chessboard,

    /// 曼哈顿距离, 基于 6-邻域 (钻石型). IBSI 参考实现中 GLDZM 使用该度量.
    Manhattan,
}

impl DistanceMetric {
    /// 该度量下一步可以到达的邻居偏移.
    #[inline]
    pub fn offsets(&self) -> &'static [Offset3d] {
        match self {
            Self::Chessboard => &NEIGHBOURS_26,
            Self::Manhattan => &DIAMOND,
        }
    }
}

/// ROI 边界距离图.
///
/// 对每个 ROI 体素, 记录其到最近的 ROI 外体素 (掩膜为 `false`, 或位于体数据之外)
/// 的步数. 紧邻 ROI 外的体素距离为 1.
#[derive(Debug, Clone)]
pub struct DistanceMap {
    /// 0 代表 ROI 外.
    data: Array3<u32>,

    metric: DistanceMetric,
}

impl DistanceMap {
    /// 计算 `roi` 的边界距离图.
    ///
    /// 以所有 "表面" 体素 (在 `metric` 邻域中存在 ROI 外邻居的体素) 为源点,
    /// 向 ROI 内部做多源 BFS. 等价于逐层腐蚀并记录层数.
    pub fn compute(roi: &Roi, metric: DistanceMetric) -> Self {
        let shape = roi.shape();
        let offsets = metric.offsets();
        let mut data = Array3::<u32>::zeros(shape);
        let mut bfs_q: VecDeque<Idx3d> = VecDeque::with_capacity(256);

        for (pos, _) in roi.positions() {
            let is_surface = offsets
                .iter()
                .any(|&off| shift(pos, off, shape).map_or(true, |n| !roi.contains(n)));
            if is_surface {
                data[pos] = 1;
                bfs_q.push_back(pos);
            }
        }

        while let Some(cur) = bfs_q.pop_front() {
            let next_d = data[cur] + 1;
            for &off in offsets {
                match shift(cur, off, shape) {
                    Some(n) if data[n] == 0 && roi.contains(n) => {
                        data[n] = next_d;
                        bfs_q.push_back(n);
                    }
                    _ => {}
                }
            }
        }

        // 有限体数据中, 每个 ROI 连通分量都至少有一个表面体素.
        debug_assert!(roi.positions().all(|(p, _)| data[p] >= 1));
        trace!("边界距离图完成 ({metric:?})");
        Self { data, metric }
    }

    /// 形状 `(z, h, w)`.
    #[inline]
    pub fn shape(&self) -> Idx3d {
        self.data.dim()
    }

    /// 使用的度量.
    #[inline]
    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    /// 获取 `pos` 的边界距离. 越界或位于 ROI 外时返回 `None`.
    #[inline]
    pub fn get(&self, pos: Idx3d) -> Option<u32> {
        self.data.get(pos).copied().filter(|&d| d != 0)
    }

    /// 最大边界距离.
    #[inline]
    pub fn max(&self) -> u32 {
        self.data.iter().copied().max().unwrap_or(0)
    }

    /// 底层数据视图. 0 代表 ROI 外.
    #[inline]
    pub fn data(&self) -> ArrayView3<'_, u32> {
        self.data.view()
    }
}

impl Index<Idx3d> for DistanceMap {
    type Output = u32;

    #[inline]
    fn index(&self, index: Idx3d) -> &Self::Output {
        &self.data[index]
    }
}

#[cfg(test)]
mod tests {
    use super::{DistanceMap, DistanceMetric};
    use crate::neighbour::{shift, NEIGHBOURS_26};
    use crate::Roi;
    use ndarray::{array, Array3};

    fn full_roi(n: usize) -> Roi {
        let volume = Array3::<u8>::ones((n, n, n));
        let mask = Array3::from_elem((n, n, n), true);
        Roi::new(volume.view(), mask.view()).unwrap()
    }

    #[test]
    fn test_single_voxel_distance() {
        let volume = array![[[1u8]]];
        let mask = array![[[true]]];
        let roi = Roi::new(volume.view(), mask.view()).unwrap();
        for metric in [DistanceMetric::Chessboard, DistanceMetric::Manhattan] {
            let dm = DistanceMap::compute(&roi, metric);
            assert_eq!(dm.get((0, 0, 0)), Some(1));
            assert_eq!(dm.max(), 1);
        }
    }

    #[test]
    fn test_cube_distance() {
        let roi = full_roi(5);
        let dm = DistanceMap::compute(&roi, DistanceMetric::Chessboard);
        assert_eq!(dm[(0, 0, 0)], 1);
        assert_eq!(dm[(1, 1, 1)], 2);
        assert_eq!(dm[(1, 2, 2)], 2);
        assert_eq!(dm[(2, 2, 2)], 3);
        assert_eq!(dm.max(), 3);
        assert_eq!(dm.metric(), DistanceMetric::Chessboard);
    }

    /// 紧邻 ROI 外体素 (或体数据边缘) 的体素距离恰为 1.
    #[test]
    fn test_boundary_is_one() {
        let mut mask = Array3::from_elem((6, 6, 6), true);
        mask[(2, 3, 3)] = false;
        mask[(4, 1, 2)] = false;
        let volume = Array3::<u16>::ones((6, 6, 6));
        let roi = Roi::new(volume.view(), mask.view()).unwrap();
        let dm = DistanceMap::compute(&roi, DistanceMetric::Chessboard);

        for (pos, _) in roi.positions() {
            let near_outside = NEIGHBOURS_26
                .iter()
                .any(|&off| shift(pos, off, roi.shape()).map_or(true, |n| !mask[n]));
            assert_eq!(near_outside, dm[pos] == 1, "{pos:?}");
            assert!(dm[pos] >= 1);
        }
        assert_eq!(dm.get((2, 3, 3)), None);
    }

    /// 只隔一个对角体素的 "空洞", 两种度量结果不同.
    #[test]
    fn test_manhattan_vs_chessboard() {
        let mut mask = Array3::from_elem((5, 5, 5), true);
        mask[(1, 1, 1)] = false;
        let volume = Array3::<u8>::ones((5, 5, 5));
        let roi = Roi::new(volume.view(), mask.view()).unwrap();

        let cb = DistanceMap::compute(&roi, DistanceMetric::Chessboard);
        let mh = DistanceMap::compute(&roi, DistanceMetric::Manhattan);
        assert_eq!(cb[(2, 2, 2)], 1);
        assert_eq!(mh[(2, 2, 2)], 3);

        for (pos, _) in roi.positions() {
            assert!(mh[pos] >= cb[pos]);
        }
    }
}
