use tracing::trace;

use crate::core::CanvasSurface;
use crate::error::ChartResult;
use crate::render::Renderer;

use super::{ChartSeries, RenderOptions, RenderOutcome, build_chart_frame};

/// Stateless chart painter: every call rebuilds and repaints the whole frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChartRenderer;

impl ChartRenderer {
    /// Paints `series` onto `renderer`.
    ///
    /// Degenerate data never fails; only backend errors are returned.
    pub fn render<R: Renderer + ?Sized>(
        renderer: &mut R,
        surface: CanvasSurface,
        series: &[ChartSeries<'_>],
        options: &RenderOptions,
    ) -> ChartResult<RenderOutcome> {
        let (frame, outcome) = build_chart_frame(surface, series, options);
        trace!(
            series_count = series.len(),
            primitive_count = frame.primitive_count(),
            no_data = matches!(outcome, RenderOutcome::NoData),
            "render chart frame"
        );
        renderer.render(&frame)?;
        Ok(outcome)
    }
}
