//! 程序运行函数.

use crate::profile::Profile;
use crate::result::{AblationResult, Gap};
use ct_texture::prelude::*;
use log::info;
use ndarray::Array3;
use ordered_float::NotNan;
use std::thread;
use utils::phantom;

type Phantom = (&'static str, Array3<u32>, Array3<bool>);

fn phantoms(n: usize) -> Vec<Phantom> {
    let (v1, m1) = phantom::isotropic(n, 16, 42);
    let (v2, m2) = phantom::striped(n, 16, 3, 42);
    let (v3, m3) = phantom::blocky(n, 8, 4);
    vec![("isotropic", v1, m1), ("striped", v2, m2), ("blocky", v3, m3)]
}

/// 用同一种聚合约定处理所有体模.
fn run_with(agg: Aggregation, data: &[Phantom]) -> (Profile, Vec<FeatureMap>) {
    let settings = TextureSettings::default()
        .with_families([Family::Glcm, Family::Glrlm])
        .with_glcm_aggregation(agg)
        .with_glrlm_aggregation(agg);

    let mut profile = Profile::new();
    let mut maps = Vec::with_capacity(data.len());
    for (name, volume, mask) in data {
        info!("{agg:?}: phantom `{name}`...");
        profile.extract_start();
        let ans = extract(volume.view(), mask.view(), &settings);
        profile.extract_elapsed();
        match ans {
            Ok(m) => maps.push(m),
            Err(e) => panic!("Extraction error on `{name}`: {e}"),
        }
    }
    (profile.finish(), maps)
}

/// 比较两种约定的结果.
fn gap(merged: &FeatureMap, averaged: &FeatureMap) -> Gap {
    let mut compared = 0;
    let mut nan_mismatch = 0;
    let mut largest: Option<(NotNan<f64>, &String)> = None;

    for (key, &a) in merged {
        let b = averaged.get(key).copied().unwrap_or(f64::NAN);
        match (a.is_nan(), b.is_nan()) {
            (true, true) => continue,
            (false, false) => compared += 1,
            _ => {
                nan_mismatch += 1;
                continue;
            }
        }
        let scale = a.abs().max(b.abs()).max(f64::EPSILON);
        let Ok(rel) = NotNan::new((a - b).abs() / scale) else {
            continue;
        };
        if largest.map_or(true, |(cur, _)| rel > cur) {
            largest = Some((rel, key));
        }
    }

    Gap {
        compared,
        nan_mismatch,
        largest: largest.map(|(d, k)| (k.clone(), d.into_inner())),
    }
}

/// 实际运行.
pub fn run() -> AblationResult {
    let n = phantom::size_from_env();
    info!("Phantom size: {n}^3, {} cpus", utils::cpus());
    let data = phantoms(n);

    println!("Running ablation studies...");
    utils::sep();
    let (profiles, results) = thread::scope(|s| {
        let data = data.as_slice();
        let handles = [Aggregation::Merge, Aggregation::Average]
            .map(|agg| s.spawn(move || run_with(agg, data)));
        let [merged, averaged] = handles.map(|th| th.join().expect("Thread joining error"));
        (
            vec![("merge", merged.0), ("average", averaged.0)],
            (merged.1, averaged.1),
        )
    });

    let gaps = data
        .iter()
        .zip(results.0.iter().zip(results.1.iter()))
        .map(|((name, _, _), (m, a))| (*name, gap(m, a)))
        .collect();

    AblationResult::new(profiles, gaps)
}
