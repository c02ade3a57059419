/// Shared synthetic datasets.
use erpkit::RawDataset;
use ndarray::{Array1, Array4};
use std::path::PathBuf;

pub const N_TIMES: usize = 64;
pub const N_TRIALS: usize = 10;
pub const N_BLOCKS: usize = 4;

/// -100 .. 400 ms.
#[allow(unused)]
pub fn timeline() -> Array1<f64> {
    Array1::linspace(-100.0, 400.0, N_TIMES)
}

/// Deterministic value of one cell, distinct per (subject, time, trial, block).
#[allow(unused)]
pub fn cell(s: usize, t: usize, tr: usize, b: usize) -> f64 {
    let time = -100.0 + 500.0 * t as f64 / (N_TIMES - 1) as f64;
    let n100 = -5.0 * (-((time - 100.0) / 20.0).powi(2)).exp();
    let p200 = 4.0 * (-((time - 200.0) / 30.0).powi(2)).exp();
    n100 + p200 + s as f64 * 0.5 + tr as f64 * 0.01 + b as f64 * 0.1
}

/// Five subjects, groups Control (S01, S03, S05) and ASD (S02, S04).
#[allow(unused)]
pub fn dataset() -> RawDataset {
    let values = Array4::from_shape_fn((5, N_TIMES, N_TRIALS, N_BLOCKS), |(s, t, tr, b)| {
        cell(s, t, tr, b)
    });
    let subjects = (1..=5).map(|i| format!("S{i:02}")).collect();
    let groups = ["Control", "ASD", "Control", "ASD", "Control"]
        .iter()
        .map(|g| g.to_string())
        .collect();
    RawDataset::new(values, subjects, groups, timeline()).unwrap()
}

/// Build a dataset from explicit values with generic ids and one group.
#[allow(unused)]
pub fn dataset_from(values: Array4<f64>, group: &str) -> RawDataset {
    let (n_s, n_t, _, _) = values.dim();
    let subjects = (1..=n_s).map(|i| format!("S{i:02}")).collect();
    let groups = vec![group.to_string(); n_s];
    let tl = Array1::linspace(0.0, n_t.saturating_sub(1) as f64, n_t);
    RawDataset::new(values, subjects, groups, tl).unwrap()
}

#[allow(unused)]
pub fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("erpkit_{}_{name}", std::process::id()))
}
