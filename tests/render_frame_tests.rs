use approx::assert_relative_eq;
use cems_chart::api::{
    ChartRenderer, ChartSeries, MarkerMode, RenderOptions, RenderOutcome, build_chart_frame,
};
use cems_chart::core::{CanvasSurface, Sample, Series, SeriesSpec, Viewport};
use cems_chart::render::{CanvasLayerKind, Color, LineStrokeStyle, NullRenderer};

fn ramp(count: i64) -> Vec<Sample> {
    (0..count)
        .map(|i| Sample::new(i * 1_000, 10.0 + i as f64 * 10.0))
        .collect()
}

fn texts(frame: &cems_chart::render::RenderFrame) -> Vec<String> {
    frame.texts().map(|text| text.text.clone()).collect()
}

#[test]
fn empty_series_list_renders_no_data_path() {
    let mut renderer = NullRenderer::default();
    let outcome = ChartRenderer::render(
        &mut renderer,
        CanvasSurface::default(),
        &[],
        &RenderOptions::card(),
    )
    .expect("render");

    assert_eq!(outcome, RenderOutcome::NoData);
    assert_eq!(renderer.frames_rendered, 1);
    let frame = renderer.last_frame.expect("frame");
    assert_eq!(texts(&frame), vec!["No data available".to_owned()]);
}

#[test]
fn series_emptied_by_window_filter_renders_no_data_path() {
    let samples = ramp(3);
    let series = [ChartSeries::new("NOx", &samples)];
    let options = RenderOptions::card().with_window(Some(50_000), Some(60_000));

    let (frame, outcome) = build_chart_frame(CanvasSurface::default(), &series, &options);

    assert_eq!(outcome, RenderOutcome::NoData);
    assert_eq!(frame.polylines().count(), 0);
    assert!(texts(&frame).contains(&"No data available".to_owned()));
}

#[test]
fn three_points_draw_line_area_markers_and_latest_value() {
    let samples = ramp(3);
    let series = [ChartSeries::new("SO2", &samples)];
    let options = RenderOptions::card().with_title("SO2 Real-time Monitoring");

    let (frame, outcome) = build_chart_frame(CanvasSurface::default(), &series, &options);
    let projection = *outcome.projection().expect("plotted");

    assert_eq!(frame.polylines().count(), 1);
    assert_eq!(frame.areas().count(), 1);
    // three adaptive markers plus the latest-value dot
    assert_eq!(frame.circles().count(), 4);

    let labels = texts(&frame);
    assert!(labels.contains(&"SO2 Real-time Monitoring".to_owned()));
    assert!(labels.contains(&"ppm".to_owned()));
    assert!(labels.contains(&"30.00 ppm".to_owned()));
    assert!(labels.contains(&"SO2".to_owned()));
    for grid_label in ["50", "25", "0"] {
        assert!(labels.contains(&grid_label.to_owned()), "missing {grid_label}");
    }

    assert_eq!(projection.x_min, 0);
    assert_eq!(projection.x_max, 2_000);
    assert_relative_eq!(projection.value_axis.nice_max, 50.0);
    let polyline = frame.polylines().next().expect("polyline");
    assert_relative_eq!(polyline.points[0].x, projection.bounds.left);
    assert_relative_eq!(polyline.points[2].x, projection.bounds.right);
}

#[test]
fn layers_keep_series_between_grid_and_overlay() {
    let samples = ramp(4);
    let series = [ChartSeries::new("CO", &samples)];
    let (frame, _) = build_chart_frame(CanvasSurface::default(), &series, &RenderOptions::card());

    let grid = frame.layer(CanvasLayerKind::Grid).expect("grid layer");
    let plotted = frame.layer(CanvasLayerKind::Series).expect("series layer");
    let overlay = frame.layer(CanvasLayerKind::Overlay).expect("overlay layer");

    assert!(!grid.lines.is_empty());
    assert_eq!(plotted.polylines.len(), 1);
    assert_eq!(overlay.rects.len(), 1);
    assert_eq!(overlay.circles.len(), 1);
}

#[test]
fn single_point_has_no_line_but_keeps_latest_marker() {
    let samples = [Sample::new(5_000, 7.5)];
    let series = [ChartSeries::new("O2", &samples)];
    let options = RenderOptions::card().with_unit("%");

    let (frame, outcome) = build_chart_frame(CanvasSurface::default(), &series, &options);

    assert!(matches!(outcome, RenderOutcome::Plotted(_)));
    assert_eq!(frame.polylines().count(), 0);
    assert_eq!(frame.circles().count(), 1);
    assert!(texts(&frame).contains(&"7.50 %".to_owned()));
    assert!(frame.validate().is_ok());
}

#[test]
fn coincident_timestamps_still_produce_valid_frame() {
    let samples = [Sample::new(1_000, 2.0), Sample::new(1_000, 4.0)];
    let series = [ChartSeries::new("Dust", &samples)];

    let (frame, outcome) = build_chart_frame(CanvasSurface::default(), &series, &RenderOptions::card());

    assert!(matches!(outcome, RenderOutcome::Plotted(_)));
    assert!(frame.validate().is_ok());
}

#[test]
fn render_keeps_most_recent_points_only() {
    let samples = ramp(500);
    let series = [ChartSeries::new("SO2", &samples)];
    let options = RenderOptions::card().with_max_points(120);

    let (frame, outcome) = build_chart_frame(CanvasSurface::default(), &series, &options);

    let polyline = frame.polylines().next().expect("polyline");
    assert_eq!(polyline.points.len(), 120);
    let projection = outcome.projection().expect("plotted");
    assert_eq!(projection.x_min, 380_000);
    assert_eq!(projection.x_max, 499_000);
}

#[test]
fn marker_modes_control_marker_count() {
    let samples = ramp(50);
    let series = [ChartSeries::new("SO2", &samples)];

    let (all, _) = build_chart_frame(
        CanvasSurface::default(),
        &series,
        &RenderOptions::expanded(),
    );
    assert_eq!(all.circles().count(), 51);

    let (none, _) = build_chart_frame(
        CanvasSurface::default(),
        &series,
        &RenderOptions::card().with_marker_mode(MarkerMode::None),
    );
    assert_eq!(none.circles().count(), 1);

    let (auto, _) = build_chart_frame(CanvasSurface::default(), &series, &RenderOptions::card());
    let markers = auto.circles().count() - 1;
    assert!(markers > 1 && markers < 50, "adaptive markers: {markers}");
}

#[test]
fn baseline_draws_dashed_reference_with_label() {
    let samples = ramp(3);
    let series = [ChartSeries::new("SO2", &samples)];
    let options = RenderOptions::card().with_baseline(Some(15.0));

    let (frame, _) = build_chart_frame(CanvasSurface::default(), &series, &options);

    assert!(texts(&frame).contains(&"Baseline: 15".to_owned()));
}

#[test]
fn legend_lists_only_series_with_samples() {
    let first = ramp(3);
    let empty: Vec<Sample> = Vec::new();
    let red = Color::from_hex("#ff0000").expect("color");
    let series = [
        ChartSeries::new("SO2", &first).with_color(red),
        ChartSeries::new("NOx", &empty),
    ];

    let (frame, _) = build_chart_frame(CanvasSurface::default(), &series, &RenderOptions::card());

    let legend = frame.layer(CanvasLayerKind::Legend).expect("legend layer");
    let entries: Vec<&str> = legend
        .texts
        .iter()
        .filter(|text| text.text == "SO2" || text.text == "NOx")
        .map(|text| text.text.as_str())
        .collect();
    assert_eq!(entries, vec!["SO2"]);
    let polyline = frame.polylines().next().expect("polyline");
    assert_eq!(polyline.color, red);
}

#[test]
fn legend_packs_visible_series_from_the_left() {
    let empty: Vec<Sample> = Vec::new();
    let samples = ramp(3);
    let series = [
        ChartSeries::new("NOx", &empty),
        ChartSeries::new("SO2", &samples),
    ];

    let (frame, outcome) =
        build_chart_frame(CanvasSurface::default(), &series, &RenderOptions::card());
    let bounds = outcome.projection().expect("plotted").bounds;

    let legend = frame.layer(CanvasLayerKind::Legend).expect("legend layer");
    let entry = legend
        .texts
        .iter()
        .find(|text| text.text == "SO2")
        .expect("legend entry");
    assert_relative_eq!(entry.x, bounds.left + 8.0);
}

#[test]
fn legend_uses_parameter_name_and_pill_uses_series_unit() {
    let series = Series::with_samples(
        SeriesSpec::new("SO2Corr", "mg/Nm3").with_label("SO2 Corrected"),
        ramp(3),
    );
    let ppm = ramp(2);
    let views = [
        ChartSeries::from(&series),
        ChartSeries::new("O2", &ppm).with_unit("%"),
    ];

    let (frame, _) = build_chart_frame(CanvasSurface::default(), &views, &RenderOptions::card());

    let labels = texts(&frame);
    assert!(labels.contains(&"SO2Corr".to_owned()));
    assert!(!labels.contains(&"SO2 Corrected".to_owned()));
    assert!(labels.contains(&"30.00 mg/Nm3".to_owned()));
    assert!(labels.contains(&"20.00 %".to_owned()));
    assert!(!labels.iter().any(|label| label.ends_with("ppm") && label != "ppm"));
}

#[test]
fn hovered_sample_draws_crosshair_guides() {
    let samples = ramp(3);
    let series = [ChartSeries::new("SO2", &samples)];
    let plain = RenderOptions::card().with_marker_mode(MarkerMode::None);
    let hovered = plain.clone().with_hover(Some(samples[1]));

    let (without, _) = build_chart_frame(CanvasSurface::default(), &series, &plain);
    let (with, outcome) = build_chart_frame(CanvasSurface::default(), &series, &hovered);
    let projection = *outcome.projection().expect("plotted");

    let overlay = with.layer(CanvasLayerKind::Overlay).expect("overlay layer");
    let guides: Vec<_> = overlay
        .lines
        .iter()
        .filter(|line| {
            line.stroke_style
                == LineStrokeStyle::Dashed {
                    dash_px: 4.0,
                    gap_px: 4.0,
                }
        })
        .collect();
    assert_eq!(guides.len(), 2);

    let x = projection.x_for_time(1_000.0);
    let y = projection.y_for_value(20.0);
    assert!(guides.iter().any(|line| line.x1 == x && line.x2 == x));
    assert!(guides.iter().any(|line| line.y1 == y && line.y2 == y));
    assert_eq!(with.circles().count(), without.circles().count() + 1);
    assert!(with.validate().is_ok());
}

#[test]
fn high_density_surface_uses_scaled_backing_raster() {
    let samples = ramp(3);
    let series = [ChartSeries::new("SO2", &samples)];
    let mut renderer = NullRenderer::default();

    ChartRenderer::render(
        &mut renderer,
        CanvasSurface::new(400.0, 250.0, 2.0),
        &series,
        &RenderOptions::card(),
    )
    .expect("render");

    assert_eq!(renderer.last_viewport, Some(Viewport::new(800, 500)));
}

#[test]
fn zero_sized_surface_falls_back_to_default_size() {
    let samples = ramp(3);
    let series = [ChartSeries::new("SO2", &samples)];

    let (frame, _) = build_chart_frame(CanvasSurface::new(0.0, 0.0, 1.0), &series, &RenderOptions::card());

    assert_eq!(frame.backing_viewport(), Viewport::new(600, 300));
    assert!(frame.validate().is_ok());
}
