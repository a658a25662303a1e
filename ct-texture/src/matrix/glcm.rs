use super::{per_direction, CountMatrix};
use crate::neighbour::shift;
use crate::{Offset3d, Roi};
use ndarray::Array2;

/// 沿方向 `dir` 构建对称化的灰度共生矩阵 (GLCM).
///
/// 对每个 ROI 体素 `v`, 若 `v + dir` 也位于 ROI 内, 则 `(code(v), code(v + dir))`
/// 计数加一. 最后与转置相加, 因此 `d` 与 `-d` 被视作同一条轴.
/// 行与列都是 ROI 中的全部灰度编码; 没有任何体素对的方向得到全零矩阵.
pub fn glcm(roi: &Roi, dir: Offset3d) -> CountMatrix {
    let shape = roi.shape();
    let ng = roi.len_levels();
    let mut counts = Array2::<u64>::zeros((ng, ng));

    for (pos, level) in roi.positions() {
        if let Some(other) = shift(pos, dir, shape).and_then(|n| roi.level_at(n)) {
            counts[(level, other)] += 1;
        }
    }

    let transposed = counts.t().to_owned();
    counts += &transposed;

    let codes = roi.levels();
    CountMatrix::new(
        counts,
        codes.to_vec(),
        codes.iter().map(|&c| c as u64).collect(),
    )
}

/// 13 个方向的 GLCM, 顺序与 [`crate::neighbour::DIRECTIONS`] 一致.
pub fn glcm_directions(roi: &Roi) -> Vec<CountMatrix> {
    per_direction(roi, glcm)
}

#[cfg(test)]
mod tests {
    use super::{glcm, glcm_directions};
    use crate::consts::{CUBE3_ORDERED_PAIRS, DIRECTION_COUNT};
    use crate::{CountMatrix, Roi};
    use ndarray::{array, Array3};

    #[test]
    fn test_glcm_pair() {
        let volume = array![[[1u8, 2]]];
        let mask = array![[[true, true]]];
        let roi = Roi::new(volume.view(), mask.view()).unwrap();

        let m = glcm(&roi, (0, 0, 1));
        assert_eq!(m.counts(), array![[0u64, 1], [1, 0]]);
        assert_eq!(m.col_values(), &[1, 2]);

        let all = glcm_directions(&roi);
        assert_eq!(all.len(), DIRECTION_COUNT);
        assert_eq!(all.iter().filter(|m| !m.is_empty()).count(), 1);
    }

    /// 3x3x3 均匀立方体: 合并后共 316 个有序相邻体素对, 全部落在同一个格子上.
    #[test]
    fn test_glcm_uniform_cube() {
        let volume = Array3::<u8>::from_elem((3, 3, 3), 4);
        let mask = Array3::from_elem((3, 3, 3), true);
        let roi = Roi::new(volume.view(), mask.view()).unwrap();

        let dirs = glcm_directions(&roi);
        for m in &dirs {
            assert!(m.is_symmetric());
        }
        // 面方向 18 对, 棱方向 12 对, 顶点方向 8 对 (对称化后翻倍).
        assert_eq!(dirs[0].total(), 36);
        assert_eq!(dirs[1].total(), 24);
        assert_eq!(dirs[12].total(), 16);

        let merged = CountMatrix::merge(&dirs).unwrap();
        assert_eq!(merged.total(), CUBE3_ORDERED_PAIRS);
        assert_eq!(merged.get(4, 4), CUBE3_ORDERED_PAIRS);
        assert!(merged.is_symmetric());
    }

    /// 两个互不相邻的体素: 所有方向都没有体素对.
    #[test]
    fn test_glcm_disjoint_voxels() {
        let volume = array![[[1u8, 0, 2]]];
        let mask = array![[[true, false, true]]];
        let roi = Roi::new(volume.view(), mask.view()).unwrap();
        let dirs = glcm_directions(&roi);

        assert!(dirs.iter().all(CountMatrix::is_empty));
        assert_eq!(dirs[0].dim(), (2, 2));
    }

    #[test]
    fn test_glcm_mixed_symmetric() {
        let mut volume = Array3::<u8>::zeros((3, 4, 5));
        for ((z, h, w), v) in volume.indexed_iter_mut() {
            *v = ((z * 7 + h * 3 + w * w) % 4) as u8;
        }
        let mut mask = Array3::from_elem((3, 4, 5), true);
        mask[(1, 2, 2)] = false;
        let roi = Roi::new(volume.view(), mask.view()).unwrap();

        let merged = CountMatrix::merge(&glcm_directions(&roi)).unwrap();
        assert!(merged.is_symmetric());
        assert_eq!(merged.total() % 2, 0);
    }
}
