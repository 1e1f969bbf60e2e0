use crate::core::{CanvasSurface, Sample, Series, most_recent, samples_in_time_window};
use crate::render::{
    AreaFillPrimitive, CanvasLayerKind, CirclePrimitive, Color, LinePrimitive, PixelPoint,
    PolylinePrimitive, RectPrimitive, RenderFrame, TextHAlign, TextPrimitive, TextVAlign,
    VerticalGradient,
};

use super::axis_label_format::{
    estimate_text_width, format_time_label, format_value_label, format_value_pill, utc_offset,
};
use super::axis_ticks::{TIME_GRID_DIVISIONS, time_grid_ticks, value_axis};
use super::{MarkerMode, PlotBounds, PlotProjection, RenderOptions};

const NO_DATA_TEXT: &str = "No data available";
const AREA_TOP_ALPHA: f64 = 0x55 as f64 / 255.0;
const AREA_BOTTOM_ALPHA: f64 = 0x0a as f64 / 255.0;
const SERIES_LINE_WIDTH: f64 = 2.0;
const LATEST_DOT_RADIUS: f64 = 3.5;
const PILL_OFFSET_PX: f64 = 6.0;
const PILL_PADDING_X: f64 = 8.0;
const PILL_HEIGHT: f64 = 22.0;
const PILL_CORNER_RADIUS: f64 = 6.0;
const LEGEND_SLOT_PX: f64 = 110.0;
const HOVER_DOT_RADIUS: f64 = 5.0;

/// Borrowed view of one series for a draw pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartSeries<'a> {
    /// Parameter name, shown in the legend.
    pub name: &'a str,
    /// Unit of the latest-value pill; falls back to the chart unit.
    pub unit: Option<&'a str>,
    pub color: Option<Color>,
    pub samples: &'a [Sample],
}

impl<'a> ChartSeries<'a> {
    #[must_use]
    pub fn new(name: &'a str, samples: &'a [Sample]) -> Self {
        Self {
            name,
            unit: None,
            color: None,
            samples,
        }
    }

    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    #[must_use]
    pub fn with_unit(mut self, unit: &'a str) -> Self {
        self.unit = Some(unit);
        self
    }
}

impl<'a> From<&'a Series> for ChartSeries<'a> {
    fn from(series: &'a Series) -> Self {
        Self {
            name: &series.spec.name,
            unit: Some(&series.spec.unit),
            color: series.spec.color,
            samples: series.samples(),
        }
    }
}

/// What a draw pass ended up showing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderOutcome {
    /// Nothing survived window filtering; the "No data available" message was drawn.
    NoData,
    Plotted(PlotProjection),
}

impl RenderOutcome {
    #[must_use]
    pub fn projection(&self) -> Option<&PlotProjection> {
        match self {
            Self::NoData => None,
            Self::Plotted(projection) => Some(projection),
        }
    }
}

/// Builds the full frame for one chart.
///
/// Total over its input: empty, single-point and coincident-timestamp series
/// produce a valid frame rather than an error.
#[must_use]
pub fn build_chart_frame(
    surface: CanvasSurface,
    series: &[ChartSeries<'_>],
    options: &RenderOptions,
) -> (RenderFrame, RenderOutcome) {
    let theme = &options.theme;
    let width = surface.width();
    let height = surface.height();
    let mut frame = RenderFrame::new(surface);

    frame.push_rect(
        CanvasLayerKind::Background,
        RectPrimitive::new(0.0, 0.0, width, height, theme.background),
    );

    let visible: Vec<Vec<Sample>> = series
        .iter()
        .map(|entry| visible_samples(entry.samples, options))
        .collect();

    let Some((x_min, x_max, y_max)) = data_extent(&visible) else {
        frame.push_text(
            CanvasLayerKind::Overlay,
            TextPrimitive::new(
                NO_DATA_TEXT,
                width / 2.0,
                height / 2.0,
                theme.no_data_font_px,
                theme.no_data_text,
                TextHAlign::Center,
            )
            .with_v_align(TextVAlign::Middle),
        );
        return (frame, RenderOutcome::NoData);
    };

    let bounds = PlotBounds::from_surface(surface, options.padding);
    let axis = value_axis(y_max);
    let Some(projection) = PlotProjection::new(bounds, x_min, x_max, axis) else {
        return (frame, RenderOutcome::NoData);
    };

    push_value_grid(&mut frame, &projection, options);
    push_time_grid(&mut frame, &projection, options);
    push_header(&mut frame, &projection, options);
    if let Some(baseline) = options.baseline.filter(|value| value.is_finite()) {
        push_baseline(&mut frame, &projection, baseline, options);
    }

    for (index, (entry, points)) in series.iter().zip(&visible).enumerate() {
        let color = entry.color.unwrap_or_else(|| theme.palette_color(index));
        let unit = entry.unit.unwrap_or(options.unit.as_str());
        push_series(&mut frame, &projection, points, color, unit, options);
    }

    if let Some(hover) = options.hover.filter(|sample| sample.y.is_finite()) {
        push_crosshair(&mut frame, &projection, hover, options);
    }

    let legend = series
        .iter()
        .zip(&visible)
        .enumerate()
        .filter(|(_, (entry, points))| !points.is_empty() && !entry.name.is_empty());
    for (slot, (index, (entry, _))) in legend.enumerate() {
        let color = entry.color.unwrap_or_else(|| theme.palette_color(index));
        frame.push_text(
            CanvasLayerKind::Legend,
            TextPrimitive::new(
                entry.name,
                bounds.left + 8.0 + slot as f64 * LEGEND_SLOT_PX,
                height - 14.0,
                theme.label_font_px,
                color,
                TextHAlign::Left,
            ),
        );
    }

    (frame, RenderOutcome::Plotted(projection))
}

/// Window filter, time ordering and most-recent cap for one series.
#[must_use]
pub fn visible_samples(samples: &[Sample], options: &RenderOptions) -> Vec<Sample> {
    let mut filtered = samples_in_time_window(samples, options.window_start, options.window_end);
    filtered.sort_by_key(|sample| sample.t);
    most_recent(&filtered, options.max_points.max(1)).to_vec()
}

fn data_extent(visible: &[Vec<Sample>]) -> Option<(i64, i64, f64)> {
    let mut samples = visible.iter().flatten();
    let first = samples.next()?;
    let init = (first.t, first.t, first.y);
    Some(samples.fold(init, |(x_min, x_max, y_max), sample| {
        (x_min.min(sample.t), x_max.max(sample.t), y_max.max(sample.y))
    }))
}

fn push_value_grid(frame: &mut RenderFrame, projection: &PlotProjection, options: &RenderOptions) {
    let theme = &options.theme;
    let bounds = projection.bounds;
    for value in projection.value_axis.gridline_values() {
        let y = projection.y_for_value(value);
        frame.push_line(
            CanvasLayerKind::Grid,
            LinePrimitive::new(bounds.left, y, bounds.right, y, 1.0, theme.grid_line),
        );
        frame.push_text(
            CanvasLayerKind::Grid,
            TextPrimitive::new(
                format_value_label(value),
                bounds.left - 8.0,
                y,
                theme.axis_font_px,
                theme.axis_label,
                TextHAlign::Right,
            )
            .with_v_align(TextVAlign::Middle),
        );
    }
}

fn push_time_grid(frame: &mut RenderFrame, projection: &PlotProjection, options: &RenderOptions) {
    let theme = &options.theme;
    let bounds = projection.bounds;
    let offset = utc_offset(options.utc_offset_minutes);
    let span = projection.x_span_ms();
    for t in time_grid_ticks(projection.x_min, span, TIME_GRID_DIVISIONS) {
        let x = projection.x_for_time(t);
        frame.push_line(
            CanvasLayerKind::Grid,
            LinePrimitive::new(x, bounds.top, x, bounds.bottom, 1.0, theme.grid_line),
        );
        frame.push_text(
            CanvasLayerKind::Grid,
            TextPrimitive::new(
                format_time_label(t, span, offset),
                x,
                bounds.bottom + 6.0,
                theme.axis_font_px,
                theme.axis_label,
                TextHAlign::Center,
            )
            .with_v_align(TextVAlign::Top),
        );
    }
}

fn push_header(frame: &mut RenderFrame, projection: &PlotProjection, options: &RenderOptions) {
    let theme = &options.theme;
    let bounds = projection.bounds;
    let y = bounds.top - 14.0;
    if !options.title.is_empty() {
        frame.push_text(
            CanvasLayerKind::Legend,
            TextPrimitive::new(
                options.title.as_str(),
                bounds.left,
                y,
                theme.title_font_px,
                theme.title,
                TextHAlign::Left,
            ),
        );
    }
    if !options.unit.is_empty() {
        frame.push_text(
            CanvasLayerKind::Legend,
            TextPrimitive::new(
                options.unit.as_str(),
                bounds.right,
                y,
                theme.label_font_px,
                theme.title,
                TextHAlign::Right,
            ),
        );
    }
}

fn push_baseline(
    frame: &mut RenderFrame,
    projection: &PlotProjection,
    baseline: f64,
    options: &RenderOptions,
) {
    let theme = &options.theme;
    let bounds = projection.bounds;
    let y = projection.y_for_value(baseline);
    frame.push_line(
        CanvasLayerKind::Grid,
        LinePrimitive::new(bounds.left, y, bounds.right, y, 1.0, theme.baseline_line)
            .dashed(6.0, 6.0),
    );
    frame.push_text(
        CanvasLayerKind::Grid,
        TextPrimitive::new(
            format!("Baseline: {baseline}"),
            bounds.left + 6.0,
            y - 6.0,
            theme.axis_font_px,
            theme.baseline_label,
            TextHAlign::Left,
        ),
    );
}

fn push_series(
    frame: &mut RenderFrame,
    projection: &PlotProjection,
    points: &[Sample],
    color: Color,
    unit: &str,
    options: &RenderOptions,
) {
    let Some(last) = points.last().copied() else {
        return;
    };
    let theme = &options.theme;
    let bounds = projection.bounds;
    let mapped: Vec<PixelPoint> = points
        .iter()
        .map(|sample| {
            PixelPoint::new(
                projection.x_for_time(sample.t as f64),
                projection.y_for_value(sample.y),
            )
        })
        .collect();

    if mapped.len() >= 2 {
        let mut polygon = mapped.clone();
        if let (Some(first), Some(end)) = (mapped.first(), mapped.last()) {
            polygon.push(PixelPoint::new(end.x, bounds.bottom));
            polygon.push(PixelPoint::new(first.x, bounds.bottom));
        }
        frame.push_area(
            CanvasLayerKind::Series,
            AreaFillPrimitive {
                polygon,
                gradient: VerticalGradient {
                    top_y: bounds.top,
                    bottom_y: bounds.bottom,
                    top_color: color.with_alpha(AREA_TOP_ALPHA),
                    bottom_color: color.with_alpha(AREA_BOTTOM_ALPHA),
                },
            },
        );
        frame.push_polyline(
            CanvasLayerKind::Series,
            PolylinePrimitive {
                points: mapped.clone(),
                stroke_width: SERIES_LINE_WIDTH,
                color,
            },
        );
        push_markers(frame, &mapped, color, options);
    }

    let lx = projection.x_for_time(last.t as f64);
    let ly = projection.y_for_value(last.y);
    frame.push_line(
        CanvasLayerKind::Overlay,
        LinePrimitive::new(lx, bounds.top, lx, bounds.bottom, 1.0, theme.now_line).dashed(3.0, 3.0),
    );
    frame.push_circle(
        CanvasLayerKind::Overlay,
        CirclePrimitive::filled(lx, ly, LATEST_DOT_RADIUS, color),
    );

    let label = format_value_pill(last.y, unit);
    let pill_x = bounds.right + PILL_OFFSET_PX;
    let pill_width = estimate_text_width(&label, theme.label_font_px) + PILL_PADDING_X * 2.0;
    frame.push_line(
        CanvasLayerKind::Overlay,
        LinePrimitive::new(lx, ly, pill_x - PILL_OFFSET_PX, ly, 1.0, color),
    );
    frame.push_rect(
        CanvasLayerKind::Overlay,
        RectPrimitive::new(pill_x, ly - PILL_HEIGHT / 2.0, pill_width, PILL_HEIGHT, theme.value_pill_fill)
            .with_border(color, 1.2)
            .with_corner_radius(PILL_CORNER_RADIUS),
    );
    frame.push_text(
        CanvasLayerKind::Overlay,
        TextPrimitive::new(
            label,
            pill_x + PILL_PADDING_X,
            ly,
            theme.label_font_px,
            theme.value_pill_text,
            TextHAlign::Left,
        )
        .with_v_align(TextVAlign::Middle),
    );
}

/// Dashed guides through the hovered sample plus a highlighted dot.
fn push_crosshair(
    frame: &mut RenderFrame,
    projection: &PlotProjection,
    hover: Sample,
    options: &RenderOptions,
) {
    let theme = &options.theme;
    let bounds = projection.bounds;
    let x = projection.x_for_time(hover.t as f64);
    let y = projection.y_for_value(hover.y);
    if !bounds.contains(x, y) {
        return;
    }
    frame.push_line(
        CanvasLayerKind::Overlay,
        LinePrimitive::new(x, bounds.top, x, bounds.bottom, 1.0, theme.crosshair).dashed(4.0, 4.0),
    );
    frame.push_line(
        CanvasLayerKind::Overlay,
        LinePrimitive::new(bounds.left, y, bounds.right, y, 1.0, theme.crosshair).dashed(4.0, 4.0),
    );
    frame.push_circle(
        CanvasLayerKind::Overlay,
        CirclePrimitive::filled(x, y, HOVER_DOT_RADIUS, theme.crosshair)
            .with_border(theme.marker_outline, 1.5),
    );
}

fn push_markers(frame: &mut RenderFrame, mapped: &[PixelPoint], color: Color, options: &RenderOptions) {
    if options.marker_mode == MarkerMode::None || options.marker_radius <= 0.0 {
        return;
    }
    let mut last_marker_x = f64::NEG_INFINITY;
    for point in mapped {
        let draw = match options.marker_mode {
            MarkerMode::All => true,
            MarkerMode::Auto => point.x - last_marker_x >= options.marker_pixel_gap,
            MarkerMode::None => false,
        };
        if !draw {
            continue;
        }
        last_marker_x = point.x;
        frame.push_circle(
            CanvasLayerKind::Series,
            CirclePrimitive::filled(point.x, point.y, options.marker_radius, color)
                .with_border(options.theme.marker_outline, 1.0),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::{ChartSeries, RenderOutcome, build_chart_frame};
    use crate::api::RenderOptions;
    use crate::core::{CanvasSurface, Sample};

    #[test]
    fn empty_input_draws_no_data_message() {
        let (frame, outcome) = build_chart_frame(CanvasSurface::default(), &[], &RenderOptions::card());
        assert_eq!(outcome, RenderOutcome::NoData);
        assert!(frame.texts().any(|text| text.text == "No data available"));
        assert!(frame.validate().is_ok());
    }

    #[test]
    fn single_point_gets_latest_marker_but_no_line() {
        let samples = [Sample::new(1_000, 4.0)];
        let series = [ChartSeries::new("SO2", &samples)];
        let (frame, outcome) = build_chart_frame(CanvasSurface::default(), &series, &RenderOptions::card());
        assert!(matches!(outcome, RenderOutcome::Plotted(_)));
        assert_eq!(frame.polylines().count(), 0);
        assert_eq!(frame.areas().count(), 0);
        assert_eq!(frame.circles().count(), 1);
        assert!(frame.texts().any(|text| text.text == "4.00 ppm"));
    }
}
