use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use cems_chart::ChartError;
use cems_chart::error::ChartResult;
use cems_chart::transport::{
    ChannelEvent, ConnectionState, LiveChannel, NORMAL_CLOSURE, StreamingTransport,
    TransportConfig, TransportEvent,
};

#[derive(Debug, Default)]
struct Script {
    opens: usize,
    fail_open: bool,
    sent: Vec<String>,
    closes: Vec<u16>,
    inbox: VecDeque<ChannelEvent>,
}

#[derive(Debug, Clone, Default)]
struct ScriptedChannel(Rc<RefCell<Script>>);

impl ScriptedChannel {
    fn push(&self, event: ChannelEvent) {
        self.0.borrow_mut().inbox.push_back(event);
    }

    fn opens(&self) -> usize {
        self.0.borrow().opens
    }
}

impl LiveChannel for ScriptedChannel {
    fn open(&mut self) -> ChartResult<()> {
        let mut script = self.0.borrow_mut();
        script.opens += 1;
        if script.fail_open {
            return Err(ChartError::Transport("connection refused".to_owned()));
        }
        Ok(())
    }

    fn send_text(&mut self, text: &str) -> ChartResult<()> {
        self.0.borrow_mut().sent.push(text.to_owned());
        Ok(())
    }

    fn close(&mut self, code: u16, _reason: &str) -> ChartResult<()> {
        self.0.borrow_mut().closes.push(code);
        Ok(())
    }

    fn poll_event(&mut self) -> Option<ChannelEvent> {
        self.0.borrow_mut().inbox.pop_front()
    }
}

fn connected(now_ms: i64) -> (StreamingTransport<ScriptedChannel>, ScriptedChannel) {
    let channel = ScriptedChannel::default();
    let mut transport = StreamingTransport::new(channel.clone(), TransportConfig::default());
    transport.connect(now_ms);
    channel.push(ChannelEvent::Opened);
    transport.poll(now_ms);
    assert_eq!(transport.state(), ConnectionState::Connected);
    (transport, channel)
}

fn states(events: &[TransportEvent]) -> Vec<ConnectionState> {
    events
        .iter()
        .filter_map(|event| match event {
            TransportEvent::StateChanged(state) => Some(*state),
            TransportEvent::Batches(_) => None,
        })
        .collect()
}

#[test]
fn open_requests_latest_data_and_reports_states() {
    let channel = ScriptedChannel::default();
    let mut transport = StreamingTransport::new(channel.clone(), TransportConfig::default());

    transport.connect(0);
    channel.push(ChannelEvent::Opened);
    let events = transport.poll(10);

    assert_eq!(
        states(&events),
        vec![ConnectionState::Connecting, ConnectionState::Connected]
    );
    assert_eq!(
        channel.0.borrow().sent,
        vec![r#"{"type":"get_latest_data"}"#.to_owned()]
    );
}

#[test]
fn connect_is_a_no_op_while_connecting_or_connected() {
    let (mut transport, channel) = connected(0);
    transport.connect(5);
    transport.connect(6);
    assert_eq!(channel.opens(), 1);
}

#[test]
fn data_messages_become_batches() {
    let (mut transport, channel) = connected(0);
    channel.push(ChannelEvent::Message(
        r#"{"type":"data","data":[{"timestamp":"2025-09-12T08:30:15Z","data":{"SO2":12.5,"NOx":40}}]}"#
            .to_owned(),
    ));
    channel.push(ChannelEvent::Message(r#"{"type":"pong"}"#.to_owned()));
    channel.push(ChannelEvent::Message("not json".to_owned()));

    let events = transport.poll(100);

    assert_eq!(events.len(), 1);
    let TransportEvent::Batches(batches) = &events[0] else {
        panic!("expected batches, got {events:?}");
    };
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].timestamp_ms, 1_757_665_815_000);
    assert_eq!(batches[0].values.get("SO2"), Some(&12.5));
    assert_eq!(transport.state(), ConnectionState::Connected);
}

#[test]
fn disconnect_suppresses_reconnect() {
    let (mut transport, channel) = connected(0);

    transport.disconnect();
    // a late abnormal close from the socket must not re-arm the timer
    channel.push(ChannelEvent::Closed {
        code: 1006,
        reason: "abnormal".to_owned(),
    });
    transport.poll(1_000);
    transport.poll(10_000);

    assert_eq!(transport.state(), ConnectionState::Disconnected);
    assert_eq!(transport.reconnect_at_ms(), None);
    assert_eq!(channel.opens(), 1);
    assert_eq!(channel.0.borrow().closes, vec![NORMAL_CLOSURE]);
}

#[test]
fn unexpected_close_reconnects_after_fixed_delay() {
    let (mut transport, channel) = connected(0);

    channel.push(ChannelEvent::Closed {
        code: 1006,
        reason: "abnormal".to_owned(),
    });
    let events = transport.poll(1_000);
    assert_eq!(states(&events), vec![ConnectionState::Disconnected]);
    assert_eq!(transport.reconnect_at_ms(), Some(4_000));

    assert!(transport.poll(3_999).is_empty());
    assert_eq!(channel.opens(), 1);

    let events = transport.poll(4_000);
    assert_eq!(states(&events), vec![ConnectionState::Connecting]);
    assert_eq!(channel.opens(), 2);
    assert_eq!(transport.reconnect_at_ms(), None);
}

#[test]
fn normal_close_from_server_does_not_reconnect() {
    let (mut transport, channel) = connected(0);

    channel.push(ChannelEvent::Closed {
        code: NORMAL_CLOSURE,
        reason: "bye".to_owned(),
    });
    transport.poll(10);
    transport.poll(60_000);

    assert_eq!(transport.state(), ConnectionState::Disconnected);
    assert_eq!(channel.opens(), 1);
}

#[test]
fn failed_open_schedules_a_retry() {
    let channel = ScriptedChannel::default();
    channel.0.borrow_mut().fail_open = true;
    let mut transport = StreamingTransport::new(channel.clone(), TransportConfig::default());

    transport.connect(0);
    assert_eq!(transport.state(), ConnectionState::Disconnected);
    assert_eq!(transport.reconnect_at_ms(), Some(3_000));

    channel.0.borrow_mut().fail_open = false;
    transport.poll(3_000);
    assert_eq!(transport.state(), ConnectionState::Connecting);
    assert_eq!(channel.opens(), 2);
}

#[test]
fn channel_errors_do_not_change_state() {
    let (mut transport, channel) = connected(0);
    channel.push(ChannelEvent::Error("hiccup".to_owned()));

    let events = transport.poll(10);

    assert!(events.is_empty());
    assert_eq!(transport.state(), ConnectionState::Connected);
}

#[test]
fn dispose_makes_transport_inert() {
    let (mut transport, channel) = connected(0);
    channel.push(ChannelEvent::Closed {
        code: 1011,
        reason: "server error".to_owned(),
    });
    transport.poll(0);
    assert!(transport.reconnect_at_ms().is_some());

    transport.dispose();
    channel.push(ChannelEvent::Opened);

    assert!(transport.poll(100_000).is_empty());
    transport.connect(100_000);
    assert!(transport.is_disposed());
    assert_eq!(transport.reconnect_at_ms(), None);
    assert_eq!(channel.opens(), 1);
}
