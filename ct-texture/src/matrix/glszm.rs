use super::{CountMatrix, SparseCounts};
use crate::{Roi, ZoneMap};

/// 由区域划分构建灰度区域大小矩阵 (GLSZM), 与方向无关.
///
/// 每个区域贡献一次 `(code, 区域大小)`.
pub fn glszm(roi: &Roi, zones: &ZoneMap) -> CountMatrix {
    let mut sparse = SparseCounts::new();
    for zone in zones.zones() {
        *sparse.entry((zone.level(), zone.size() as u64)).or_insert(0) += 1;
    }
    CountMatrix::from_sparse(roi.levels(), &sparse)
}
