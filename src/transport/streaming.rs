use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

use crate::error::ChartResult;

use super::envelope::{ClientMessage, SampleBatch, decode_server_message};

/// Close code for an intentional shutdown; it never triggers a reconnect.
pub const NORMAL_CLOSURE: u16 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Fixed delay between an unexpected close and the next connect attempt.
    pub reconnect_delay_ms: i64,
    pub normal_close_reason: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            reconnect_delay_ms: 3_000,
            normal_close_reason: "client shutdown".to_owned(),
        }
    }
}

/// Event reported by a [`LiveChannel`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    Opened,
    Message(String),
    Error(String),
    Closed { code: u16, reason: String },
}

/// Duplex text channel the transport drives (a WebSocket in production).
///
/// Implementations must not block: `open` starts an attempt whose outcome is
/// reported later through `poll_event`.
pub trait LiveChannel {
    fn open(&mut self) -> ChartResult<()>;
    fn send_text(&mut self, text: &str) -> ChartResult<()>;
    fn close(&mut self, code: u16, reason: &str) -> ChartResult<()>;
    fn poll_event(&mut self) -> Option<ChannelEvent>;
}

/// Output of [`StreamingTransport::poll`], in delivery order.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    StateChanged(ConnectionState),
    Batches(Vec<SampleBatch>),
}

/// Reconnecting state machine over a [`LiveChannel`].
///
/// The transport is sans-IO with respect to time: the host passes the current
/// epoch milliseconds to every call that can schedule or fire the single
/// reconnect timer.
#[derive(Debug)]
pub struct StreamingTransport<C: LiveChannel> {
    channel: C,
    config: TransportConfig,
    state: ConnectionState,
    reconnect_at_ms: Option<i64>,
    closing: bool,
    disposed: bool,
    events: VecDeque<TransportEvent>,
}

impl<C: LiveChannel> StreamingTransport<C> {
    #[must_use]
    pub fn new(channel: C, config: TransportConfig) -> Self {
        Self {
            channel,
            config,
            state: ConnectionState::Disconnected,
            reconnect_at_ms: None,
            closing: false,
            disposed: false,
            events: VecDeque::new(),
        }
    }

    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    #[must_use]
    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Time at which the pending reconnect fires, if one is scheduled.
    #[must_use]
    pub fn reconnect_at_ms(&self) -> Option<i64> {
        self.reconnect_at_ms
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    #[must_use]
    pub fn channel(&self) -> &C {
        &self.channel
    }

    pub fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }

    /// Starts a connection attempt unless one is in flight or open.
    pub fn connect(&mut self, now_ms: i64) {
        if self.disposed {
            debug!("ignoring connect on disposed transport");
            return;
        }
        if matches!(
            self.state,
            ConnectionState::Connecting | ConnectionState::Connected
        ) {
            trace!(state = ?self.state, "connect is a no-op");
            return;
        }

        self.reconnect_at_ms = None;
        self.closing = false;
        self.set_state(ConnectionState::Connecting);
        if let Err(err) = self.channel.open() {
            warn!(error = %err, "live channel failed to open");
            self.on_closed(1006, &err.to_string(), now_ms);
        }
    }

    /// Closes with normal closure and cancels any pending reconnect.
    pub fn disconnect(&mut self) {
        self.reconnect_at_ms = None;
        if self.state == ConnectionState::Disconnected {
            return;
        }
        self.closing = true;
        let reason = self.config.normal_close_reason.clone();
        if let Err(err) = self.channel.close(NORMAL_CLOSURE, &reason) {
            warn!(error = %err, "live channel close failed");
        }
        self.set_state(ConnectionState::Disconnected);
        info!("live channel disconnected");
    }

    /// Tears the transport down. Afterwards every call is a no-op and no
    /// event or timer fires.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disconnect();
        self.disposed = true;
        self.events.clear();
        debug!("transport disposed");
    }

    /// Feeds one channel event through the state machine.
    pub fn handle_channel_event(&mut self, event: ChannelEvent, now_ms: i64) {
        if self.disposed {
            return;
        }
        match event {
            ChannelEvent::Opened => self.on_opened(),
            ChannelEvent::Message(text) => self.on_message(&text),
            ChannelEvent::Error(message) => {
                warn!(error = %message, state = ?self.state, "live channel error");
            }
            ChannelEvent::Closed { code, reason } => self.on_closed(code, &reason, now_ms),
        }
    }

    /// Drains channel events, fires a due reconnect and returns everything
    /// that happened since the last call.
    pub fn poll(&mut self, now_ms: i64) -> Vec<TransportEvent> {
        if self.disposed {
            return Vec::new();
        }
        while let Some(event) = self.channel.poll_event() {
            self.handle_channel_event(event, now_ms);
        }
        if self.reconnect_at_ms.is_some_and(|due| now_ms >= due) {
            info!("reconnecting live channel");
            self.reconnect_at_ms = None;
            self.connect(now_ms);
        }
        self.events.drain(..).collect()
    }

    fn on_opened(&mut self) {
        if self.state != ConnectionState::Connecting {
            trace!(state = ?self.state, "ignoring open outside connecting state");
            return;
        }
        self.set_state(ConnectionState::Connected);
        info!("live channel connected");

        let sent = ClientMessage::GetLatestData
            .encode()
            .and_then(|request| self.channel.send_text(&request));
        if let Err(err) = sent {
            warn!(error = %err, "failed to request latest data");
        }
    }

    fn on_message(&mut self, text: &str) {
        match decode_server_message(text) {
            Ok(Some(batches)) => {
                trace!(records = batches.len(), "received data envelope");
                self.events.push_back(TransportEvent::Batches(batches));
            }
            Ok(None) => {}
            Err(err) => warn!(error = %err, "dropping malformed live message"),
        }
    }

    fn on_closed(&mut self, code: u16, reason: &str, now_ms: i64) {
        self.set_state(ConnectionState::Disconnected);
        if code == NORMAL_CLOSURE || self.closing {
            info!(code, reason, "live channel closed");
            return;
        }
        let due = now_ms.saturating_add(self.config.reconnect_delay_ms.max(0));
        self.reconnect_at_ms = Some(due);
        info!(
            code,
            reason,
            delay_ms = self.config.reconnect_delay_ms,
            "live channel closed unexpectedly, reconnect scheduled"
        );
    }

    fn set_state(&mut self, state: ConnectionState) {
        if self.state == state {
            return;
        }
        debug!(from = ?self.state, to = ?state, "connection state changed");
        self.state = state;
        self.events.push_back(TransportEvent::StateChanged(state));
    }
}

impl<C: LiveChannel> Drop for StreamingTransport<C> {
    fn drop(&mut self) {
        self.dispose();
    }
}
