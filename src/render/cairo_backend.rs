use cairo::{Context, Format, ImageSurface, LinearGradient};
use pango::FontDescription;
use std::f64::consts::{FRAC_PI_2, PI, TAU};
use tracing::debug;

use crate::core::Viewport;
use crate::error::{ChartError, ChartResult};
use crate::render::{
    AreaFillPrimitive, CirclePrimitive, Color, LayerPrimitives, LinePrimitive, LineStrokeStyle,
    PolylinePrimitive, RectPrimitive, RenderFrame, Renderer, TextHAlign, TextPrimitive,
    TextVAlign,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CairoRenderStats {
    pub areas_drawn: usize,
    pub polylines_drawn: usize,
    pub lines_drawn: usize,
    pub circles_drawn: usize,
    pub rects_drawn: usize,
    pub texts_drawn: usize,
}

/// Optional extension trait for renderers that can draw into an external Cairo
/// context (for example a GTK `DrawingArea` callback).
pub trait CairoContextRenderer {
    fn render_on_cairo_context(
        &mut self,
        context: &Context,
        frame: &RenderFrame,
    ) -> ChartResult<()>;
}

/// Cairo + Pango + PangoCairo renderer backend.
///
/// Offscreen rendering through `Renderer::render` resizes the image surface to
/// the frame's backing viewport and scales drawing by the pixel ratio, so
/// frames stay crisp on high-density displays.
#[derive(Debug)]
pub struct CairoRenderer {
    surface: ImageSurface,
    last_stats: CairoRenderStats,
}

impl CairoRenderer {
    pub fn new(width: i32, height: i32) -> ChartResult<Self> {
        Ok(Self {
            surface: create_surface(width, height)?,
            last_stats: CairoRenderStats::default(),
        })
    }

    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        "cairo+pango+pangocairo"
    }

    #[must_use]
    pub fn surface(&self) -> &ImageSurface {
        &self.surface
    }

    #[must_use]
    pub fn last_stats(&self) -> CairoRenderStats {
        self.last_stats
    }

    fn ensure_surface(&mut self, viewport: Viewport) -> ChartResult<()> {
        let width = i32::try_from(viewport.width).map_err(|_| invalid_viewport(viewport))?;
        let height = i32::try_from(viewport.height).map_err(|_| invalid_viewport(viewport))?;
        if self.surface.width() != width || self.surface.height() != height {
            debug!(width, height, "resizing cairo surface to backing viewport");
            self.surface = create_surface(width, height)?;
        }
        Ok(())
    }

    fn render_with_context(&mut self, context: &Context, frame: &RenderFrame) -> ChartResult<()> {
        frame.validate()?;

        let ratio = frame.surface.pixel_ratio();
        context
            .save()
            .map_err(|err| map_backend_error("failed to save context", err))?;
        context.scale(ratio, ratio);

        let mut stats = CairoRenderStats::default();
        let drawn = frame
            .layers
            .iter()
            .try_for_each(|layer| draw_layer(context, layer, &mut stats));

        context
            .restore()
            .map_err(|err| map_backend_error("failed to restore context", err))?;
        drawn?;

        self.last_stats = stats;
        Ok(())
    }
}

impl Renderer for CairoRenderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        self.ensure_surface(frame.backing_viewport())?;
        let context = Context::new(&self.surface)
            .map_err(|err| map_backend_error("failed to create cairo context", err))?;
        self.render_with_context(&context, frame)
    }
}

impl CairoContextRenderer for CairoRenderer {
    fn render_on_cairo_context(
        &mut self,
        context: &Context,
        frame: &RenderFrame,
    ) -> ChartResult<()> {
        self.render_with_context(context, frame)
    }
}

fn draw_layer(
    context: &Context,
    layer: &LayerPrimitives,
    stats: &mut CairoRenderStats,
) -> ChartResult<()> {
    for area in &layer.areas {
        draw_area(context, area)?;
        stats.areas_drawn += 1;
    }
    for polyline in &layer.polylines {
        draw_polyline(context, polyline)?;
        stats.polylines_drawn += 1;
    }
    for line in &layer.lines {
        draw_line(context, line)?;
        stats.lines_drawn += 1;
    }
    for circle in &layer.circles {
        draw_circle(context, circle)?;
        stats.circles_drawn += 1;
    }
    for rect in &layer.rects {
        draw_rect(context, *rect)?;
        stats.rects_drawn += 1;
    }
    for text in &layer.texts {
        draw_text(context, text);
        stats.texts_drawn += 1;
    }
    Ok(())
}

fn draw_area(context: &Context, area: &AreaFillPrimitive) -> ChartResult<()> {
    let gradient = LinearGradient::new(0.0, area.gradient.top_y, 0.0, area.gradient.bottom_y);
    let top = area.gradient.top_color;
    let bottom = area.gradient.bottom_color;
    gradient.add_color_stop_rgba(0.0, top.red, top.green, top.blue, top.alpha);
    gradient.add_color_stop_rgba(1.0, bottom.red, bottom.green, bottom.blue, bottom.alpha);

    context.new_path();
    for (index, vertex) in area.polygon.iter().enumerate() {
        if index == 0 {
            context.move_to(vertex.x, vertex.y);
        } else {
            context.line_to(vertex.x, vertex.y);
        }
    }
    context.close_path();
    context
        .set_source(&gradient)
        .map_err(|err| map_backend_error("failed to set area gradient", err))?;
    context
        .fill()
        .map_err(|err| map_backend_error("failed to fill area", err))
}

fn draw_polyline(context: &Context, polyline: &PolylinePrimitive) -> ChartResult<()> {
    context.new_path();
    for (index, point) in polyline.points.iter().enumerate() {
        if index == 0 {
            context.move_to(point.x, point.y);
        } else {
            context.line_to(point.x, point.y);
        }
    }
    apply_color(context, polyline.color);
    context.set_line_width(polyline.stroke_width);
    context.set_line_join(cairo::LineJoin::Round);
    context.set_dash(&[], 0.0);
    context
        .stroke()
        .map_err(|err| map_backend_error("failed to stroke polyline", err))
}

fn draw_line(context: &Context, line: &LinePrimitive) -> ChartResult<()> {
    match line.stroke_style {
        LineStrokeStyle::Solid => context.set_dash(&[], 0.0),
        LineStrokeStyle::Dashed { dash_px, gap_px } => context.set_dash(&[dash_px, gap_px], 0.0),
    }
    apply_color(context, line.color);
    context.set_line_width(line.stroke_width);
    context.new_path();
    context.move_to(line.x1, line.y1);
    context.line_to(line.x2, line.y2);
    let stroked = context
        .stroke()
        .map_err(|err| map_backend_error("failed to stroke line", err));
    context.set_dash(&[], 0.0);
    stroked
}

fn draw_circle(context: &Context, circle: &CirclePrimitive) -> ChartResult<()> {
    context.new_path();
    context.arc(circle.cx, circle.cy, circle.radius, 0.0, TAU);
    apply_color(context, circle.fill_color);
    if circle.border_width > 0.0 {
        context
            .fill_preserve()
            .map_err(|err| map_backend_error("failed to fill circle", err))?;
        apply_color(context, circle.border_color);
        context.set_line_width(circle.border_width);
        context
            .stroke()
            .map_err(|err| map_backend_error("failed to stroke circle border", err))
    } else {
        context
            .fill()
            .map_err(|err| map_backend_error("failed to fill circle", err))
    }
}

fn draw_rect(context: &Context, rect: RectPrimitive) -> ChartResult<()> {
    context.new_path();
    append_rect_path(context, rect);
    apply_color(context, rect.fill_color);
    if rect.border_width > 0.0 {
        context
            .fill_preserve()
            .map_err(|err| map_backend_error("failed to fill rectangle", err))?;
        apply_color(context, rect.border_color);
        context.set_line_width(rect.border_width);
        context
            .stroke()
            .map_err(|err| map_backend_error("failed to stroke rectangle border", err))
    } else {
        context
            .fill()
            .map_err(|err| map_backend_error("failed to fill rectangle", err))
    }
}

fn draw_text(context: &Context, text: &TextPrimitive) {
    let layout = pangocairo::functions::create_layout(context);
    let font_description = FontDescription::from_string(&format!("Sans {}px", text.font_size_px));
    layout.set_font_description(Some(&font_description));
    layout.set_text(&text.text);

    let (text_width, text_height) = layout.pixel_size();
    let x = match text.h_align {
        TextHAlign::Left => text.x,
        TextHAlign::Center => text.x - f64::from(text_width) / 2.0,
        TextHAlign::Right => text.x - f64::from(text_width),
    };
    let y = match text.v_align {
        TextVAlign::Top => text.y,
        TextVAlign::Middle => text.y - f64::from(text_height) / 2.0,
        TextVAlign::Baseline => text.y - f64::from(layout.baseline()) / f64::from(pango::SCALE),
    };

    apply_color(context, text.color);
    context.move_to(x, y);
    pangocairo::functions::show_layout(context, &layout);
}

fn apply_color(context: &Context, color: Color) {
    context.set_source_rgba(color.red, color.green, color.blue, color.alpha);
}

fn append_rect_path(context: &Context, rect: RectPrimitive) {
    if rect.corner_radius <= 0.0 {
        context.rectangle(rect.x, rect.y, rect.width, rect.height);
        return;
    }

    let radius = rect
        .corner_radius
        .min(rect.width * 0.5)
        .min(rect.height * 0.5);
    let left = rect.x;
    let top = rect.y;
    let right = rect.x + rect.width;
    let bottom = rect.y + rect.height;

    context.new_sub_path();
    context.arc(right - radius, top + radius, radius, -FRAC_PI_2, 0.0);
    context.arc(right - radius, bottom - radius, radius, 0.0, FRAC_PI_2);
    context.arc(left + radius, bottom - radius, radius, FRAC_PI_2, PI);
    context.arc(left + radius, top + radius, radius, PI, PI + FRAC_PI_2);
    context.close_path();
}

fn create_surface(width: i32, height: i32) -> ChartResult<ImageSurface> {
    if width <= 0 || height <= 0 {
        return Err(ChartError::InvalidData(
            "cairo surface size must be > 0".to_owned(),
        ));
    }
    ImageSurface::create(Format::ARgb32, width, height)
        .map_err(|err| map_backend_error("failed to create cairo surface", err))
}

fn invalid_viewport(viewport: Viewport) -> ChartError {
    ChartError::InvalidViewport {
        width: viewport.width,
        height: viewport.height,
    }
}

fn map_backend_error(prefix: &str, err: cairo::Error) -> ChartError {
    ChartError::InvalidData(format!("{prefix}: {err}"))
}
