use std::net::TcpStream;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;
use std::time::Duration;

use tracing::{debug, warn};
use tungstenite::protocol::CloseFrame;
use tungstenite::protocol::frame::coding::CloseCode;
use tungstenite::stream::MaybeTlsStream;
use tungstenite::{Message, WebSocket, connect};

use crate::error::{ChartError, ChartResult};

use super::streaming::{ChannelEvent, LiveChannel, NORMAL_CLOSURE};

const READ_POLL_INTERVAL: Duration = Duration::from_millis(200);
const ABNORMAL_CLOSURE: u16 = 1006;

enum Command {
    Send(String),
    Close { code: u16, reason: String },
}

/// WebSocket [`LiveChannel`] backed by a reader thread.
///
/// Each `open` spawns a worker that owns the socket; frames and lifecycle
/// changes come back through an `mpsc` queue drained by `poll_event`.
#[derive(Debug)]
pub struct WebSocketChannel {
    url: String,
    events_rx: Option<Receiver<ChannelEvent>>,
    commands_tx: Option<Sender<Command>>,
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Send(text) => f.debug_tuple("Send").field(&text.len()).finish(),
            Self::Close { code, .. } => f.debug_struct("Close").field("code", code).finish(),
        }
    }
}

impl WebSocketChannel {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            events_rx: None,
            commands_tx: None,
        }
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl LiveChannel for WebSocketChannel {
    fn open(&mut self) -> ChartResult<()> {
        // dropping the previous sender stops its worker
        self.commands_tx = None;

        let (events_tx, events_rx) = mpsc::channel();
        let (commands_tx, commands_rx) = mpsc::channel();
        let url = self.url.clone();
        thread::Builder::new()
            .name("cems-live-channel".to_owned())
            .spawn(move || run_worker(&url, &events_tx, &commands_rx))
            .map_err(|err| ChartError::Transport(format!("failed to spawn channel worker: {err}")))?;

        self.events_rx = Some(events_rx);
        self.commands_tx = Some(commands_tx);
        Ok(())
    }

    fn send_text(&mut self, text: &str) -> ChartResult<()> {
        let sender = self
            .commands_tx
            .as_ref()
            .ok_or_else(|| ChartError::Transport("channel is not open".to_owned()))?;
        sender
            .send(Command::Send(text.to_owned()))
            .map_err(|_| ChartError::Transport("channel worker has stopped".to_owned()))
    }

    fn close(&mut self, code: u16, reason: &str) -> ChartResult<()> {
        let Some(sender) = self.commands_tx.take() else {
            return Ok(());
        };
        sender
            .send(Command::Close {
                code,
                reason: reason.to_owned(),
            })
            .map_err(|_| ChartError::Transport("channel worker has stopped".to_owned()))
    }

    fn poll_event(&mut self) -> Option<ChannelEvent> {
        self.events_rx.as_ref()?.try_recv().ok()
    }
}

fn run_worker(url: &str, events: &Sender<ChannelEvent>, commands: &Receiver<Command>) {
    let mut socket = match connect(url) {
        Ok((socket, _response)) => socket,
        Err(err) => {
            warn!(%url, error = %err, "websocket connect failed");
            let _ = events.send(ChannelEvent::Error(err.to_string()));
            let _ = events.send(ChannelEvent::Closed {
                code: ABNORMAL_CLOSURE,
                reason: err.to_string(),
            });
            return;
        }
    };
    if let Err(err) = set_read_timeout(&socket) {
        warn!(error = %err, "failed to set websocket read timeout");
    }
    debug!(%url, "websocket connected");
    if events.send(ChannelEvent::Opened).is_err() {
        return;
    }

    let mut requested_close: Option<u16> = None;
    loop {
        if requested_close.is_none() {
            match commands.try_recv() {
                Ok(Command::Send(text)) => {
                    if let Err(err) = socket.send(Message::Text(text)) {
                        let _ = events.send(ChannelEvent::Error(err.to_string()));
                    }
                }
                Ok(Command::Close { code, reason }) => {
                    requested_close = Some(code);
                    let frame = CloseFrame {
                        code: CloseCode::from(code),
                        reason: reason.into(),
                    };
                    let _ = socket.close(Some(frame));
                }
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => {
                    requested_close = Some(NORMAL_CLOSURE);
                    let _ = socket.close(None);
                }
            }
        }

        match socket.read() {
            Ok(Message::Text(text)) => {
                if events.send(ChannelEvent::Message(text)).is_err() {
                    let _ = socket.close(None);
                    return;
                }
            }
            Ok(Message::Close(frame)) => {
                let (code, reason) = frame
                    .map(|frame| (u16::from(frame.code), frame.reason.to_string()))
                    .unwrap_or((requested_close.unwrap_or(NORMAL_CLOSURE), String::new()));
                let _ = events.send(ChannelEvent::Closed { code, reason });
                return;
            }
            Ok(_) => {}
            Err(tungstenite::Error::Io(err))
                if matches!(
                    err.kind(),
                    std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut
                ) => {}
            Err(tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed) => {
                let _ = events.send(ChannelEvent::Closed {
                    code: requested_close.unwrap_or(ABNORMAL_CLOSURE),
                    reason: String::new(),
                });
                return;
            }
            Err(err) => {
                let _ = events.send(ChannelEvent::Error(err.to_string()));
                let _ = events.send(ChannelEvent::Closed {
                    code: requested_close.unwrap_or(ABNORMAL_CLOSURE),
                    reason: err.to_string(),
                });
                return;
            }
        }
    }
}

fn set_read_timeout(socket: &WebSocket<MaybeTlsStream<TcpStream>>) -> std::io::Result<()> {
    match socket.get_ref() {
        MaybeTlsStream::Plain(stream) => stream.set_read_timeout(Some(READ_POLL_INTERVAL)),
        MaybeTlsStream::Rustls(stream) => stream.get_ref().set_read_timeout(Some(READ_POLL_INTERVAL)),
        _ => Ok(()),
    }
}
