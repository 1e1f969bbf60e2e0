//! Chart composition: frame building, hover-ready projections and the
//! controller that ties buffers, transport and canvases together.

mod axis_label_format;
mod axis_ticks;
mod chart_controller;
mod chart_renderer;
mod controller_config;
mod plot_layout;
mod render_frame_builder;
mod render_options;
mod series_summary;

pub use axis_label_format::{
    estimate_text_width, format_time_label, format_tooltip_time, format_value_label,
    format_value_pill, utc_offset,
};
pub use axis_ticks::{TIME_GRID_DIVISIONS, ValueAxis, time_grid_ticks, value_axis};
pub use chart_controller::{CanvasHandle, ChartController, ChartNotice, ControllerStatus};
pub use chart_renderer::ChartRenderer;
pub use controller_config::{ControllerConfig, HistoricalRange};
pub use plot_layout::{PlotBounds, PlotProjection};
pub use render_frame_builder::{ChartSeries, RenderOutcome, build_chart_frame, visible_samples};
pub use render_options::{ChartTheme, MarkerMode, PlotPadding, RenderOptions};
pub use series_summary::SeriesSummary;
