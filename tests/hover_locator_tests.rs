use cems_chart::api::{PlotBounds, PlotProjection, value_axis};
use cems_chart::core::Sample;
use cems_chart::interaction::HoverLocator;

fn samples() -> Vec<Sample> {
    [0, 1_000, 2_000, 3_000]
        .into_iter()
        .map(|t| Sample::new(t, t as f64 / 100.0))
        .collect()
}

/// 1 px per ms over `0..=3000`, so pixel x equals time.
fn projection() -> PlotProjection {
    let bounds = PlotBounds {
        left: 0.0,
        top: 0.0,
        right: 3_000.0,
        bottom: 200.0,
    };
    PlotProjection::new(bounds, 0, 3_000, value_axis(30.0)).expect("projection")
}

#[test]
fn nearest_sample_wins_on_either_side_of_midpoint() {
    let projection = projection();

    let left = HoverLocator::locate(1_490.0, 100.0, &samples(), &projection);
    let right = HoverLocator::locate(1_510.0, 100.0, &samples(), &projection);

    assert_eq!(left.map(|sample| sample.t), Some(1_000));
    assert_eq!(right.map(|sample| sample.t), Some(2_000));
}

#[test]
fn exact_midpoint_prefers_later_sample() {
    let hit = HoverLocator::nearest_to_time(&samples(), 1_500.0);
    assert_eq!(hit.map(|sample| sample.t), Some(2_000));
}

#[test]
fn queries_outside_the_series_clamp_to_its_ends() {
    assert_eq!(
        HoverLocator::nearest_to_time(&samples(), -5_000.0).map(|sample| sample.t),
        Some(0)
    );
    assert_eq!(
        HoverLocator::nearest_to_time(&samples(), 9_000.0).map(|sample| sample.t),
        Some(3_000)
    );
}

#[test]
fn pointer_outside_plot_bounds_yields_nothing() {
    let projection = projection();

    assert!(HoverLocator::locate(-1.0, 100.0, &samples(), &projection).is_none());
    assert!(HoverLocator::locate(1_000.0, 250.0, &samples(), &projection).is_none());
}

#[test]
fn empty_series_yields_nothing() {
    assert!(HoverLocator::locate(1_000.0, 100.0, &[], &projection()).is_none());
    assert!(HoverLocator::nearest_to_time(&[], 1_000.0).is_none());
}

#[test]
fn single_sample_is_always_the_answer() {
    let only = [Sample::new(42, 1.0)];
    assert_eq!(
        HoverLocator::nearest_to_time(&only, 1_000_000.0),
        Some(Sample::new(42, 1.0))
    );
}
