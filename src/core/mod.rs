pub mod sample_buffer;
pub mod scale;
pub mod series;
pub mod types;
pub mod windowing;

pub use sample_buffer::{AppendOutcome, BufferPolicy, SampleBuffer};
pub use scale::LinearScale;
pub use series::{Series, SeriesSpec, ValueSource, default_cems_parameters};
pub use types::{CanvasSurface, Sample, Viewport};
pub use windowing::{
    ChartWindow, WindowMode, canonicalize_samples, most_recent, prune_window,
    samples_in_time_window,
};
