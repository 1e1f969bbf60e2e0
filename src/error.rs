use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("failed to decode payload: {0}")]
    Decode(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("history query failed: {0}")]
    History(String),

    #[error("history query timed out after {after_ms} ms")]
    Timeout { after_ms: u64 },

    #[error("unknown series `{0}`")]
    UnknownSeries(String),
}

impl From<serde_json::Error> for ChartError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
