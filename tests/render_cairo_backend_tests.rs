#![cfg(feature = "cairo-backend")]

use cairo::{Context, Format, ImageSurface};
use cems_chart::ChartError;
use cems_chart::api::{ChartRenderer, ChartSeries, RenderOptions, build_chart_frame};
use cems_chart::core::{CanvasSurface, Sample};
use cems_chart::render::{CairoContextRenderer, CairoRenderer};

fn samples() -> Vec<Sample> {
    (0..12)
        .map(|i| Sample::new(i * 5_000, 20.0 + (i % 4) as f64 * 3.0))
        .collect()
}

#[test]
fn cairo_renderer_rejects_invalid_surface_size() {
    let err = CairoRenderer::new(0, 480).expect_err("invalid width must fail");
    assert!(matches!(err, ChartError::InvalidData(_)));
}

#[test]
fn cairo_renderer_draws_every_primitive_kind() {
    let samples = samples();
    let series = [ChartSeries::new("SO2", &samples)];
    let mut renderer = CairoRenderer::new(600, 300).expect("renderer");

    ChartRenderer::render(
        &mut renderer,
        CanvasSurface::default(),
        &series,
        &RenderOptions::card().with_baseline(Some(25.0)),
    )
    .expect("render");

    let stats = renderer.last_stats();
    assert_eq!(stats.areas_drawn, 1);
    assert_eq!(stats.polylines_drawn, 1);
    assert_eq!(stats.rects_drawn, 2);
    assert!(stats.lines_drawn >= 10);
    assert!(stats.circles_drawn >= 2);
    assert!(stats.texts_drawn >= 10);
}

#[test]
fn cairo_surface_follows_pixel_ratio() {
    let samples = samples();
    let series = [ChartSeries::new("SO2", &samples)];
    let mut renderer = CairoRenderer::new(10, 10).expect("renderer");

    ChartRenderer::render(
        &mut renderer,
        CanvasSurface::new(320.0, 200.0, 2.0),
        &series,
        &RenderOptions::card(),
    )
    .expect("render");

    assert_eq!(renderer.surface().width(), 640);
    assert_eq!(renderer.surface().height(), 400);
}

#[test]
fn cairo_renderer_can_draw_on_external_context() {
    let samples = samples();
    let series = [ChartSeries::new("SO2", &samples)];
    let (frame, _) = build_chart_frame(CanvasSurface::default(), &series, &RenderOptions::expanded());
    let mut renderer = CairoRenderer::new(600, 300).expect("renderer");

    let surface = ImageSurface::create(Format::ARgb32, 600, 300).expect("surface");
    let context = Context::new(&surface).expect("context");
    renderer
        .render_on_cairo_context(&context, &frame)
        .expect("render on context");

    assert_eq!(renderer.last_stats().circles_drawn, 13);
}
