//! Wire codecs for the live channel and the range query endpoint.

use chrono::{DateTime, NaiveDateTime};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{trace, warn};

use crate::core::ValueSource;
use crate::error::{ChartError, ChartResult};

/// `status` value marking a backend with no devices attached.
pub const OFFLINE_STATUS: &str = "no devices configured";

/// Control messages sent to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Asks the server to push its most recent record; sent once per open.
    GetLatestData,
}

impl ClientMessage {
    pub fn encode(self) -> ChartResult<String> {
        Ok(serde_json::to_string(&self)?)
    }
}

/// One timestamped record of parameter values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SampleBatch {
    pub timestamp_ms: i64,
    pub values: IndexMap<String, f64>,
    pub corrected: IndexMap<String, f64>,
    pub status: Option<String>,
}

impl SampleBatch {
    #[must_use]
    pub fn new(timestamp_ms: i64) -> Self {
        Self {
            timestamp_ms,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_value(mut self, name: impl Into<String>, value: f64) -> Self {
        self.values.insert(name.into(), value);
        self
    }

    #[must_use]
    pub fn with_corrected(mut self, name: impl Into<String>, value: f64) -> Self {
        self.corrected.insert(name.into(), value);
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    #[must_use]
    pub fn value_for(&self, name: &str, source: ValueSource) -> Option<f64> {
        match source {
            ValueSource::Raw => self.values.get(name).copied(),
            ValueSource::Corrected => self.corrected.get(name).copied(),
        }
    }

    /// `Some(false)` when the record reports that no devices are configured.
    #[must_use]
    pub fn source_online(&self) -> Option<bool> {
        self.status
            .as_deref()
            .map(|status| !status.eq_ignore_ascii_case(OFFLINE_STATUS))
    }
}

#[derive(Debug, Deserialize)]
struct RawEnvelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: Value,
}

#[derive(Debug, Deserialize)]
struct RawLiveRecord {
    timestamp: Value,
    #[serde(default)]
    data: Option<IndexMap<String, Value>>,
    #[serde(default)]
    corrected_data: Option<IndexMap<String, Value>>,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawHistoryResponse {
    success: bool,
    #[serde(default)]
    data: Vec<IndexMap<String, Value>>,
    #[serde(default)]
    count: Option<usize>,
    #[serde(default)]
    message: Option<String>,
}

/// Decodes one live-channel text frame.
///
/// Returns `Ok(None)` for envelopes of any type other than `data`. Records with
/// an unreadable timestamp are dropped individually.
pub fn decode_server_message(text: &str) -> ChartResult<Option<Vec<SampleBatch>>> {
    let envelope: RawEnvelope = serde_json::from_str(text)?;
    if envelope.kind != "data" {
        trace!(kind = %envelope.kind, "ignoring non-data envelope");
        return Ok(None);
    }

    let records: Vec<RawLiveRecord> = match envelope.data {
        Value::Array(_) => serde_json::from_value(envelope.data)?,
        Value::Object(_) => vec![serde_json::from_value(envelope.data)?],
        other => {
            return Err(ChartError::Decode(format!(
                "data envelope payload must be an array, got {other}"
            )));
        }
    };

    let batches = records
        .into_iter()
        .filter_map(|record| {
            let timestamp_ms = match parse_timestamp_value(&record.timestamp) {
                Ok(timestamp_ms) => timestamp_ms,
                Err(err) => {
                    warn!(error = %err, "dropping live record with bad timestamp");
                    return None;
                }
            };
            Some(SampleBatch {
                timestamp_ms,
                values: numeric_values(record.data.unwrap_or_default()),
                corrected: numeric_values(record.corrected_data.unwrap_or_default()),
                status: record.status,
            })
        })
        .collect();
    Ok(Some(batches))
}

/// Decodes a range query response body.
///
/// `success: false` is an error; every other top-level key of a record besides
/// `timestamp` is read as a parameter value.
pub fn decode_history_response(body: &str) -> ChartResult<Vec<SampleBatch>> {
    let response: RawHistoryResponse = serde_json::from_str(body)?;
    if !response.success {
        return Err(ChartError::History(
            response
                .message
                .unwrap_or_else(|| "server reported failure".to_owned()),
        ));
    }

    let mut batches = Vec::with_capacity(response.data.len());
    for mut record in response.data {
        let Some(timestamp) = record.shift_remove("timestamp") else {
            warn!("dropping history record without timestamp");
            continue;
        };
        match parse_timestamp_value(&timestamp) {
            Ok(timestamp_ms) => batches.push(SampleBatch {
                timestamp_ms,
                values: numeric_values(record),
                ..SampleBatch::default()
            }),
            Err(err) => warn!(error = %err, "dropping history record with bad timestamp"),
        }
    }
    trace!(
        records = batches.len(),
        reported = response.count,
        "decoded history response"
    );
    Ok(batches)
}

/// Parses an RFC 3339 timestamp, or a naive ISO 8601 one taken as UTC.
pub fn parse_timestamp_ms(text: &str) -> ChartResult<i64> {
    let text = text.trim();
    if let Ok(time) = DateTime::parse_from_rfc3339(text) {
        return Ok(time.timestamp_millis());
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, pattern) {
            return Ok(naive.and_utc().timestamp_millis());
        }
    }
    Err(ChartError::Decode(format!("unrecognized timestamp `{text}`")))
}

fn parse_timestamp_value(value: &Value) -> ChartResult<i64> {
    match value {
        Value::String(text) => parse_timestamp_ms(text),
        Value::Number(number) => number
            .as_i64()
            .ok_or_else(|| ChartError::Decode(format!("timestamp {number} is not epoch ms"))),
        other => Err(ChartError::Decode(format!(
            "timestamp must be a string or number, got {other}"
        ))),
    }
}

fn numeric_values(map: IndexMap<String, Value>) -> IndexMap<String, f64> {
    map.into_iter()
        .filter_map(|(name, value)| {
            value
                .as_f64()
                .filter(|number| number.is_finite())
                .map(|number| (name, number))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{ClientMessage, parse_timestamp_ms};

    #[test]
    fn request_latest_encodes_as_tagged_object() {
        assert_eq!(
            ClientMessage::GetLatestData.encode().expect("encode"),
            r#"{"type":"get_latest_data"}"#
        );
    }

    #[test]
    fn naive_timestamps_are_utc() {
        let with_offset = parse_timestamp_ms("2025-09-12T08:30:15+00:00").expect("rfc3339");
        let naive = parse_timestamp_ms("2025-09-12T08:30:15.000").expect("naive");
        assert_eq!(with_offset, naive);
        assert_eq!(naive, 1_757_665_815_000);
        assert!(parse_timestamp_ms("yesterday").is_err());
    }
}
