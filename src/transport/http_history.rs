use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::blocking::Client;
use tracing::{debug, warn};

use crate::error::{ChartError, ChartResult};

use super::envelope::{SampleBatch, decode_history_response};
use super::history::{HistoryClient, HistoryQuery, HttpHistoryConfig};

/// Blocking HTTP client for the range endpoint.
#[derive(Debug, Clone)]
pub struct HttpHistoryClient {
    client: Client,
    config: HttpHistoryConfig,
}

impl HttpHistoryClient {
    pub fn new(config: HttpHistoryConfig) -> ChartResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|err| ChartError::History(format!("failed to build http client: {err}")))?;
        Ok(Self { client, config })
    }

    #[must_use]
    pub fn config(&self) -> &HttpHistoryConfig {
        &self.config
    }

    fn query_params(&self, query: &HistoryQuery) -> ChartResult<Vec<(String, String)>> {
        let mut params = vec![
            (self.config.start_param.clone(), iso_timestamp(query.start_ms)?),
            (self.config.end_param.clone(), iso_timestamp(query.end_ms)?),
            (self.config.limit_param.clone(), query.limit.to_string()),
        ];
        if let Some(stack_id) = &query.stack_id {
            params.push((self.config.stack_param.clone(), stack_id.clone()));
        }
        Ok(params)
    }
}

impl HistoryClient for HttpHistoryClient {
    fn fetch_range(&mut self, query: &HistoryQuery) -> ChartResult<Vec<SampleBatch>> {
        let url = self.config.range_url();
        let params = self.query_params(query)?;
        debug!(%url, start_ms = query.start_ms, end_ms = query.end_ms, limit = query.limit, "fetching history range");

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .map_err(|err| self.map_request_error(err))?;
        let status = response.status();
        if !status.is_success() {
            warn!(%status, %url, "history endpoint returned error status");
            return Err(ChartError::History(format!("http status {status}")));
        }
        let body = response.text().map_err(|err| self.map_request_error(err))?;
        decode_history_response(&body)
    }
}

impl HttpHistoryClient {
    fn map_request_error(&self, err: reqwest::Error) -> ChartError {
        if err.is_timeout() {
            ChartError::Timeout {
                after_ms: self.config.timeout_ms,
            }
        } else {
            ChartError::History(err.to_string())
        }
    }
}

fn iso_timestamp(epoch_ms: i64) -> ChartResult<String> {
    DateTime::<Utc>::from_timestamp_millis(epoch_ms)
        .map(|time| time.to_rfc3339_opts(SecondsFormat::Millis, true))
        .ok_or_else(|| ChartError::InvalidData(format!("timestamp {epoch_ms} out of range")))
}
