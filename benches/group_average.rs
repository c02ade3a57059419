use std::hint::black_box;
use criterion::{criterion_group, criterion_main, Criterion};
use erpkit::{group_average, subject_average, Component, Orientation, RawDataset};
use ndarray::{Array1, Array4};

/// 40 subjects × 512 samples × 10 trials × 34 blocks.
fn dataset() -> RawDataset {
    let values = Array4::from_shape_fn((40, 512, 10, 34), |(s, t, tr, b)| {
        ((s * 7 + t * 3 + tr + b) as f64 * 0.01).sin()
    });
    let subjects = (0..40).map(|i| format!("S{i:02}")).collect();
    let groups = (0..40)
        .map(|i| if i % 2 == 0 { "Control" } else { "ASD" }.to_string())
        .collect();
    RawDataset::new(values, subjects, groups, Array1::linspace(-500.0, 1500.0, 512)).unwrap()
}

fn bench_subject_full(c: &mut Criterion) {
    let ds = dataset();
    c.bench_function("subject_average full [512×10×34]", |b| {
        b.iter(|| {
            let sig = subject_average(&ds, black_box("S00"), (1, 10), (1, 34)).unwrap();
            black_box(sig.len())
        })
    });
}

fn bench_group_trial(c: &mut Criterion) {
    let ds = dataset();
    c.bench_function("group_average trial mode [20 subjects]", |b| {
        b.iter(|| {
            let sig = group_average(&ds, black_box("Control"), (1, 10), 1).unwrap();
            black_box(sig.len())
        })
    });
}

fn bench_component_stats(c: &mut Criterion) {
    let ds = dataset();
    let sig = group_average(&ds, "ASD", (1, 10), (1, 34)).unwrap();
    c.bench_function("component stats N100", |b| {
        b.iter(|| {
            let comp = Component::new(Orientation::Negative, 50.0, 150.0, &sig, 0.0).unwrap();
            black_box(comp.stats())
        })
    });
}

criterion_group!(benches, bench_subject_full, bench_group_trial, bench_component_stats);
criterion_main!(benches);
