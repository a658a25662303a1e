//! 确定性的合成体数据 (体模). 不依赖任何外部数据集, 多次运行结果完全相同.

use ndarray::Array3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::env;

/// 默认体模边长.
pub const DEFAULT_SIZE: usize = 32;

/// 体模边长.
///
/// 1. 若环境变量 `$CT_TEXTURE_ABLATION_SIZE` 是正整数, 则返回其值;
/// 2. 否则, 返回 [`DEFAULT_SIZE`].
pub fn size_from_env() -> usize {
    env::var("CT_TEXTURE_ABLATION_SIZE")
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .filter(|&n: &usize| n > 0)
        .unwrap_or(DEFAULT_SIZE)
}

/// 边长为 `n` 的球形 ROI 掩膜.
fn ball_mask(n: usize) -> Array3<bool> {
    let c = (n as f64 - 1.0) / 2.0;
    let r2 = (n as f64 / 2.0).powi(2);
    Array3::from_shape_fn((n, n, n), |(z, h, w)| {
        let (dz, dh, dw) = (z as f64 - c, h as f64 - c, w as f64 - c);
        dz * dz + dh * dh + dw * dw <= r2
    })
}

/// 各向同性体模: 球形 ROI, 灰度由独立噪声生成, `levels` 个灰度级 (编码从 1 开始).
pub fn isotropic(n: usize, levels: u32, seed: u64) -> (Array3<u32>, Array3<bool>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let levels = levels.max(1);
    let volume = Array3::from_shape_simple_fn((n, n, n), || 1 + rng.gen_range(0..levels));
    (volume, ball_mask(n))
}

/// 各向异性体模: 沿 `w` 轴的条纹, 条纹宽度为 `period`, 叠加少量噪声.
pub fn striped(n: usize, levels: u32, period: usize, seed: u64) -> (Array3<u32>, Array3<bool>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let levels = levels.max(1);
    let period = period.max(1);
    let mut volume = Array3::<u32>::zeros((n, n, n));
    for ((_, _, w), v) in volume.indexed_iter_mut() {
        let base = (w / period) as u32 % levels;
        let noise = u32::from(rng.gen_bool(0.125));
        *v = 1 + (base + noise) % levels;
    }
    (volume, ball_mask(n))
}

/// 分块体模: 边长为 `block` 的同灰度立方块, 用于产生较大的区域.
pub fn blocky(n: usize, levels: u32, block: usize) -> (Array3<u32>, Array3<bool>) {
    let block = block.max(1);
    let volume = Array3::from_shape_fn((n, n, n), |(z, h, w)| {
        1 + ((z / block) * 7 + (h / block) * 3 + (w / block)) as u32 % levels
    });
    (volume, ball_mask(n))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phantoms_deterministic() {
        assert_eq!(isotropic(8, 4, 7), isotropic(8, 4, 7));
        assert_eq!(striped(8, 4, 2, 7), striped(8, 4, 2, 7));
        assert_ne!(isotropic(8, 4, 7).0, isotropic(8, 4, 8).0);

        let (v, _) = isotropic(8, 4, 7);
        assert!(v.iter().all(|&c| (1..=4).contains(&c)));
        let (v, _) = striped(8, 4, 2, 7);
        assert!(v.iter().all(|&c| (1..=4).contains(&c)));

        let (v, m) = blocky(8, 5, 3);
        assert_eq!(v.dim(), m.dim());
        assert!(v.iter().all(|&c| (1..=5).contains(&c)));
        assert!(m.iter().any(|&b| b));
    }
}
