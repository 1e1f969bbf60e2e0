//! cems-chart: real-time streaming charts for continuous emissions monitoring.
//!
//! Samples arrive over a push channel (or from range queries), land in
//! bounded per-parameter buffers and are turned into backend-agnostic
//! render frames. Painting is delegated to a [`render::Renderer`]; the
//! `cairo-backend` feature ships a Cairo/Pango implementation and the
//! `live-client` feature ships WebSocket and HTTP transports.

pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod render;
pub mod telemetry;
pub mod transport;

pub use api::{
    ChartController, ChartRenderer, ControllerConfig, HistoricalRange, RenderOptions,
    build_chart_frame,
};
pub use crate::core::{Sample, SampleBuffer, SeriesSpec};
pub use error::{ChartError, ChartResult};
pub use interaction::HoverLocator;
pub use transport::{ConnectionState, StreamingTransport};
