mod common;
use common::{dataset, N_TIMES};
use erpkit::{
    component_report, group_average, AnalysisConfig, Component, Orientation, Selection, Signal,
    Target,
};
use ndarray::{array, Array1};

#[test]
fn full_range_window_reproduces_signal() {
    let ds = dataset();
    let sig = group_average(&ds, "Control", (1, 10), 1).unwrap();
    let tl = sig.timeline();
    let c = Component::new(Orientation::Positive, tl[0], tl[N_TIMES - 1], &sig, 0.0).unwrap();
    assert_eq!(c.values(), sig.values());
    assert_eq!(c.timeline(), tl);

    let c = Component::new(Orientation::Positive, f64::NEG_INFINITY, f64::INFINITY, &sig, 0.0)
        .unwrap();
    assert_eq!(c.values().len(), N_TIMES);
}

#[test]
fn peak_orientation() {
    let sig = Signal::new(array![-5.0, 2.0, 8.0, -1.0, 0.0], Array1::linspace(0.0, 40.0, 5))
        .unwrap();
    let neg = Component::new(Orientation::Negative, 0.0, 40.0, &sig, 0.0).unwrap();
    let pos = Component::new(Orientation::Positive, 0.0, 40.0, &sig, 0.0).unwrap();
    assert_eq!(neg.peak(), -5.0);
    assert_eq!(pos.peak(), 8.0);
}

#[test]
fn area_under_curve_triangle() {
    let sig = Signal::new(array![0.0, 2.0, 0.0], array![0.0, 1.0, 2.0]).unwrap();
    let c = Component::new(Orientation::Positive, 0.0, 2.0, &sig, 0.0).unwrap();
    approx::assert_abs_diff_eq!(c.area_under_curve(false), 2.0, epsilon = 1e-12);
}

#[test]
fn n100_and_p200_found_in_synthetic_erp() {
    let ds = dataset();
    let sig = group_average(&ds, "Control", (1, 10), (1, 4)).unwrap();
    let n100 = Component::new(Orientation::Negative, 50.0, 150.0, &sig, 0.0).unwrap();
    let p200 = Component::new(Orientation::Positive, 150.0, 250.0, &sig, 0.0).unwrap();
    assert!(n100.peak() < -2.0, "N100 peak {}", n100.peak());
    assert!(p200.peak() > 2.0, "P200 peak {}", p200.peak());
    assert!(n100.area_under_curve(false) < 0.0);
}

#[test]
fn report_covers_every_stimulus_and_component() {
    let ds = dataset();
    let cfg = AnalysisConfig {
        stimulus_times: vec![0.0, 100.0],
        ..AnalysisConfig::default()
    };
    let report = component_report(
        &ds,
        &Target::Subject("S01".into()),
        Selection::Range(1, 10),
        Selection::Single(1),
        &cfg,
    )
    .unwrap();
    assert_eq!(report.rows.len(), 4);
    assert_eq!(report.rows[0].component.to_string(), "N100");
    assert_eq!(report.rows[3].window, (250.0, 350.0));
    assert!(report.signal.noise().is_some());
}

#[test]
fn report_propagates_lookup_errors() {
    let ds = dataset();
    let err = component_report(
        &ds,
        &Target::Group("Nobody".into()),
        Selection::Single(1),
        Selection::Single(1),
        &AnalysisConfig::default(),
    )
    .unwrap_err();
    assert_eq!(err.kind(), erpkit::ErrorKind::Lookup);
}
