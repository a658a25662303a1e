use super::DistanceMap;
use crate::neighbour::{shift, NEIGHBOURS_26};
use crate::{Idx3d, Roi};
use log::trace;
use ndarray::{Array3, ArrayView3};
use std::collections::VecDeque;

/// 区域 (zone): ROI 内 26-连通、灰度编码相同的极大体素集合.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Zone {
    /// 灰度级下标.
    level: usize,

    /// 体素个数.
    size: usize,
}

impl Zone {
    /// 灰度级下标 (对应 [`Roi::levels`] 中的位置).
    #[inline]
    pub fn level(&self) -> usize {
        self.level
    }

    /// 区域体素个数.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }
}

/// ROI 的区域划分结果.
#[derive(Debug, Clone)]
pub struct ZoneMap {
    /// 每个体素所属区域的编号. 0 代表 ROI 外, 区域 `k` 的编号为 `k + 1`.
    labels: Array3<u32>,

    /// 按首个 (行优先) 体素的顺序排列的区域.
    zones: Vec<Zone>,
}

impl ZoneMap {
    /// 按照 26-相邻规则划分 `roi` 中的所有区域. 两个体素属于同一个区域,
    /// 当且仅当存在一条从其一到另一的 26-相邻路径, 且路径上的所有体素都位于
    /// ROI 内并拥有相同的灰度编码.
    ///
    /// 每个体素只入队一次, 时间复杂度与 ROI 体素个数成线性关系.
    pub fn label(roi: &Roi) -> Self {
        let shape = roi.shape();
        let mut labels = Array3::<u32>::zeros(shape);
        let mut zones = Vec::with_capacity(16);
        let mut bfs_q: VecDeque<Idx3d> = VecDeque::with_capacity(64);

        for (seed, level) in roi.positions() {
            if labels[seed] != 0 {
                continue;
            }
            let id = zones.len() as u32 + 1;
            labels[seed] = id;
            bfs_q.push_back(seed);

            let mut size = 0usize;
            while let Some(cur) = bfs_q.pop_front() {
                size += 1;
                for off in NEIGHBOURS_26 {
                    let Some(next) = shift(cur, off, shape) else {
                        continue;
                    };
                    if labels[next] == 0 && roi.level_at(next) == Some(level) {
                        labels[next] = id;
                        bfs_q.push_back(next);
                    }
                }
            }
            zones.push(Zone { level, size });
        }

        trace!("区域划分完成: {} 个区域", zones.len());
        Self { labels, zones }
    }

    /// 所有区域.
    #[inline]
    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    /// 区域个数.
    #[inline]
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    /// 是否没有任何区域. 对合法 ROI 而言永远为 `false`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// 区域编号图. 0 代表 ROI 外.
    #[inline]
    pub fn labels(&self) -> ArrayView3<'_, u32> {
        self.labels.view()
    }

    /// 获取 `pos` 所属的区域. 越界或位于 ROI 外时返回 `None`.
    #[inline]
    pub fn zone_at(&self, pos: Idx3d) -> Option<&Zone> {
        match self.labels.get(pos) {
            Some(&id) if id != 0 => self.zones.get(id as usize - 1),
            _ => None,
        }
    }

    /// 每个区域内所有体素边界距离的最小值, 与 [`Self::zones`] 一一对应.
    ///
    /// `distances` 必须由同一个 ROI 计算得到, 否则程序 panic.
    pub fn min_distances(&self, distances: &DistanceMap) -> Vec<u32> {
        assert_eq!(self.labels.dim(), distances.shape(), "区域图与距离图形状不一致");
        let mut ans = vec![u32::MAX; self.zones.len()];
        for (pos, &id) in self.labels.indexed_iter().filter(|(_, id)| **id != 0) {
            let d = &mut ans[id as usize - 1];
            *d = (*d).min(distances[pos]);
        }
        ans
    }
}
