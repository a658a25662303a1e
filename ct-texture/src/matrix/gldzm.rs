use super::{CountMatrix, SparseCounts};
use crate::{DistanceMap, Roi, ZoneMap};

/// 构建灰度区域距离矩阵 (GLDZM).
///
/// 使用与 GLSZM 相同的区域划分. 区域的距离为其所有体素边界距离的最小值,
/// 每个区域贡献一次 `(code, 区域距离)`.
pub fn gldzm(roi: &Roi, zones: &ZoneMap, distances: &DistanceMap) -> CountMatrix {
    let mut sparse = SparseCounts::new();
    for (zone, d) in zones.zones().iter().zip(zones.min_distances(distances)) {
        *sparse.entry((zone.level(), d as u64)).or_insert(0) += 1;
    }
    CountMatrix::from_sparse(roi.levels(), &sparse)
}
