//! Live push channel and one-shot range queries against the CEMS backend.

mod envelope;
mod history;
mod streaming;

#[cfg(feature = "live-client")]
mod http_history;
#[cfg(feature = "live-client")]
mod websocket_channel;

pub use envelope::{
    ClientMessage, OFFLINE_STATUS, SampleBatch, decode_history_response, decode_server_message,
    parse_timestamp_ms,
};
pub use history::{HistoryClient, HistoryQuery, HttpHistoryConfig};
pub use streaming::{
    ChannelEvent, ConnectionState, LiveChannel, NORMAL_CLOSURE, StreamingTransport,
    TransportConfig, TransportEvent,
};

#[cfg(feature = "live-client")]
pub use http_history::HttpHistoryClient;
#[cfg(feature = "live-client")]
pub use websocket_channel::WebSocketChannel;
