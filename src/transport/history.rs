use serde::{Deserialize, Serialize};

use crate::error::ChartResult;

use super::envelope::SampleBatch;

/// One-shot range query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryQuery {
    pub start_ms: i64,
    pub end_ms: i64,
    pub limit: usize,
    pub stack_id: Option<String>,
}

impl HistoryQuery {
    #[must_use]
    pub fn new(start_ms: i64, end_ms: i64, limit: usize) -> Self {
        Self {
            start_ms,
            end_ms,
            limit,
            stack_id: None,
        }
    }

    #[must_use]
    pub fn with_stack_id(mut self, stack_id: Option<String>) -> Self {
        self.stack_id = stack_id;
        self
    }
}

/// Pull side of the backend: answers range queries with time-stamped records.
///
/// Calls may block up to the client's own timeout, which should surface as
/// [`crate::error::ChartError::Timeout`].
pub trait HistoryClient {
    fn fetch_range(&mut self, query: &HistoryQuery) -> ChartResult<Vec<SampleBatch>>;
}

impl<H: HistoryClient + ?Sized> HistoryClient for Box<H> {
    fn fetch_range(&mut self, query: &HistoryQuery) -> ChartResult<Vec<SampleBatch>> {
        (**self).fetch_range(query)
    }
}

/// Location and timeout of the HTTP range endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpHistoryConfig {
    pub base_url: String,
    pub range_path: String,
    pub start_param: String,
    pub end_param: String,
    pub limit_param: String,
    pub stack_param: String,
    pub timeout_ms: u64,
}

impl Default for HttpHistoryConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_owned(),
            range_path: "/api/sqlite/data/range".to_owned(),
            start_param: "start_time".to_owned(),
            end_param: "end_time".to_owned(),
            limit_param: "limit".to_owned(),
            stack_param: "stack_id".to_owned(),
            timeout_ms: 10_000,
        }
    }
}

impl HttpHistoryConfig {
    #[must_use]
    pub fn range_url(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            self.range_path
        )
    }
}
