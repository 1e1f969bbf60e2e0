use serde::{Deserialize, Serialize};

use crate::core::{BufferPolicy, Sample, SampleBuffer};
use crate::render::Color;

/// Which value map of a live record feeds a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ValueSource {
    /// `data` map of the record.
    #[default]
    Raw,
    /// `corrected_data` map of the record.
    Corrected,
}

/// Presentation metadata for one parameter, keyed by `name`.
///
/// `name` is the join key against transport records; everything else is
/// opaque metadata from the gas configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesSpec {
    pub name: String,
    pub display_label: String,
    pub unit: String,
    #[serde(default)]
    pub color: Option<Color>,
    #[serde(default)]
    pub source: ValueSource,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

impl SeriesSpec {
    #[must_use]
    pub fn new(name: impl Into<String>, unit: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            display_label: name.clone(),
            name,
            unit: unit.into(),
            color: None,
            source: ValueSource::Raw,
            enabled: true,
        }
    }

    #[must_use]
    pub fn with_label(mut self, display_label: impl Into<String>) -> Self {
        self.display_label = display_label.into();
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: ValueSource) -> Self {
        self.source = source;
        self
    }

    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// A parameter's metadata together with its sample buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub spec: SeriesSpec,
    buffer: SampleBuffer,
}

impl Series {
    #[must_use]
    pub fn new(spec: SeriesSpec, policy: BufferPolicy) -> Self {
        Self {
            spec,
            buffer: SampleBuffer::new(policy),
        }
    }

    #[must_use]
    pub fn with_samples(spec: SeriesSpec, samples: Vec<Sample>) -> Self {
        Self {
            spec,
            buffer: SampleBuffer::with_samples(BufferPolicy::default(), samples),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.spec.name
    }

    #[must_use]
    pub fn samples(&self) -> &[Sample] {
        self.buffer.all()
    }

    #[must_use]
    pub fn buffer(&self) -> &SampleBuffer {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut SampleBuffer {
        &mut self.buffer
    }
}

/// Stock parameter set of a single-stack CEMS installation.
#[must_use]
pub fn default_cems_parameters() -> Vec<SeriesSpec> {
    [
        ("SO2", "ppm", 0x10b981),
        ("NOx", "ppm", 0x3b82f6),
        ("O2", "%", 0xeab308),
        ("CO", "ppm", 0xf59e0b),
        ("Dust", "mg/m³", 0xef4444),
        ("Temperature", "°C", 0xf97316),
        ("Velocity", "m/s", 0x8b5cf6),
        ("Flowrate", "m³/h", 0x06b6d4),
        ("Pressure", "Pa", 0xec4899),
    ]
    .into_iter()
    .map(|(name, unit, rgb)| SeriesSpec::new(name, unit).with_color(Color::from_rgb_u32(rgb)))
    .collect()
}
