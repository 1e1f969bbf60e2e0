use cems_chart::api::{ChartSeries, RenderOptions, RenderOutcome, build_chart_frame};
use cems_chart::core::{CanvasSurface, Sample};
use proptest::prelude::*;

proptest! {
    #[test]
    fn frames_are_valid_for_arbitrary_samples(
        raw in prop::collection::vec((-1_000_000i64..1_000_000, -1.0e6f64..1.0e6), 0..150),
        css_width in 0.0f64..1600.0,
        css_height in 0.0f64..900.0,
        max_points in 1usize..400
    ) {
        let samples: Vec<Sample> = raw.into_iter().map(|(t, y)| Sample::new(t, y)).collect();
        let series = [ChartSeries::new("SO2", &samples)];
        let options = RenderOptions::card().with_max_points(max_points);
        let surface = CanvasSurface::new(css_width, css_height, 1.0);

        let (frame, outcome) = build_chart_frame(surface, &series, &options);

        prop_assert!(frame.validate().is_ok());
        prop_assert_eq!(samples.is_empty(), outcome == RenderOutcome::NoData);
    }

    #[test]
    fn plotted_line_stays_inside_plot_bounds(
        raw in prop::collection::vec((0i64..3_600_000, 0.0f64..5_000.0), 2..200)
    ) {
        let mut samples: Vec<Sample> = raw.into_iter().map(|(t, y)| Sample::new(t, y)).collect();
        samples.sort_by_key(|sample| sample.t);
        let series = [ChartSeries::new("NOx", &samples)];

        let (frame, outcome) =
            build_chart_frame(CanvasSurface::default(), &series, &RenderOptions::expanded());
        let projection = *outcome.projection().expect("plotted");
        let bounds = projection.bounds;

        for polyline in frame.polylines() {
            for point in &polyline.points {
                prop_assert!(point.x >= bounds.left - 1e-6 && point.x <= bounds.right + 1e-6);
                prop_assert!(point.y >= bounds.top - 1e-6 && point.y <= bounds.bottom + 1e-6);
            }
        }
    }
}
