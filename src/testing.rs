//! In-memory connector/session used by unit tests

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

use crate::core::{Credentials, Error, Result};
use crate::fix::{
    Continuation, FixMessage, FixSession, SecureConnector, SecureStream, SessionEvent,
    SessionEvents, TransportEvent, TransportEvents, tag,
};

pub const SECRET: &str = "c2VjcmV0LWtleQ==";

pub fn creds() -> Credentials {
    Credentials::new("key", SECRET, "pass").unwrap()
}

#[derive(Default)]
struct LoopbackState {
    opened: Vec<(String, u16)>,
    sent: Vec<(FixMessage, bool)>,
    fail_open: bool,
    hang_open: bool,
    fail_sends: bool,
    end_calls: usize,
    next_seq: u64,
    session_tx: Option<mpsc::UnboundedSender<SessionEvent>>,
    transport_tx: Option<mpsc::UnboundedSender<TransportEvent>>,
}

/// Records everything sent and lets tests inject inbound traffic
#[derive(Clone)]
pub struct LoopbackConnector {
    state: Arc<Mutex<LoopbackState>>,
}

impl LoopbackConnector {
    pub fn new() -> Self {
        let state = LoopbackState {
            next_seq: 1,
            ..Default::default()
        };
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub fn session_with_seq(&self, sender: &str, target: &str, seq: u64) -> Arc<LoopbackSession> {
        self.state.lock().next_seq = seq;
        Arc::new(LoopbackSession {
            state: self.state.clone(),
            sender: sender.to_string(),
            target: target.to_string(),
        })
    }

    pub fn fail_open(&self, fail: bool) {
        self.state.lock().fail_open = fail;
    }

    /// Make `open` pend forever, like a TLS handshake that never answers
    pub fn hang_open(&self, hang: bool) {
        self.state.lock().hang_open = hang;
    }

    pub fn fail_sends(&self, fail: bool) {
        self.state.lock().fail_sends = fail;
    }

    pub fn opened(&self) -> Vec<(String, u16)> {
        self.state.lock().opened.clone()
    }

    pub fn sent(&self) -> Vec<(FixMessage, bool)> {
        self.state.lock().sent.clone()
    }

    pub fn end_calls(&self) -> usize {
        self.state.lock().end_calls
    }

    /// Deliver an inbound message; the receiver fires when it is processed
    pub fn inbound(&self, msg: FixMessage) -> oneshot::Receiver<()> {
        let (cont, done) = Continuation::new();
        self.push_session(SessionEvent::Message(msg, cont));
        done
    }

    pub fn session_end(&self) {
        self.push_session(SessionEvent::End);
    }

    pub fn session_error(&self, err: &str) {
        self.push_session(SessionEvent::Error(err.to_string()));
    }

    pub fn transport_end(&self) {
        self.push_transport(TransportEvent::End);
    }

    pub fn transport_error(&self, err: &str) {
        self.push_transport(TransportEvent::Error(err.to_string()));
    }

    fn push_session(&self, event: SessionEvent) {
        if let Some(tx) = self.state.lock().session_tx.as_ref() {
            let _ = tx.send(event);
        }
    }

    fn push_transport(&self, event: TransportEvent) {
        if let Some(tx) = self.state.lock().transport_tx.as_ref() {
            let _ = tx.send(event);
        }
    }
}

#[async_trait]
impl SecureConnector for LoopbackConnector {
    async fn open(&self, host: &str, port: u16) -> Result<(Box<dyn SecureStream>, TransportEvents)> {
        let hang = {
            let mut state = self.state.lock();
            state.opened.push((host.to_string(), port));
            state.hang_open
        };
        if hang {
            return std::future::pending().await;
        }

        let mut state = self.state.lock();
        if state.fail_open {
            return Err(Error::Transport("connection refused".to_string()));
        }

        let (tx, rx) = mpsc::unbounded_channel();
        state.transport_tx = Some(tx);
        let stream = LoopbackStream {
            state: self.state.clone(),
        };
        Ok((Box::new(stream), rx))
    }
}

struct LoopbackStream {
    state: Arc<Mutex<LoopbackState>>,
}

impl SecureStream for LoopbackStream {
    fn create_session(
        &self,
        sender_comp_id: &str,
        target_comp_id: &str,
    ) -> Result<(Arc<dyn FixSession>, SessionEvents)> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.state.lock().session_tx = Some(tx);
        let session = LoopbackSession {
            state: self.state.clone(),
            sender: sender_comp_id.to_string(),
            target: target_comp_id.to_string(),
        };
        Ok((Arc::new(session), rx))
    }

    /// Closing completes immediately and is reported like a real socket
    fn end(&self) {
        let mut state = self.state.lock();
        state.end_calls += 1;
        if let Some(tx) = state.transport_tx.as_ref() {
            let _ = tx.send(TransportEvent::End);
        }
    }
}

pub struct LoopbackSession {
    state: Arc<Mutex<LoopbackState>>,
    sender: String,
    target: String,
}

impl FixSession for LoopbackSession {
    fn send(&self, msg: FixMessage, high_priority: bool) -> Result<()> {
        let mut state = self.state.lock();
        if state.fail_sends {
            return Err(Error::Session("send queue closed".to_string()));
        }
        if high_priority {
            state.sent.insert(0, (msg, true));
        } else {
            state.sent.push((msg, false));
        }
        state.next_seq += 1;
        Ok(())
    }

    fn outgoing_seq_num(&self) -> u64 {
        self.state.lock().next_seq
    }

    fn sender_comp_id(&self) -> &str {
        &self.sender
    }

    fn target_comp_id(&self) -> &str {
        &self.target
    }
}

/// ExecutionReport (35=8) with the fields the venue always fills
pub fn exec_report(exec_type: &str, side: &str) -> FixMessage {
    FixMessage::new(tag::msg_type::EXECUTION_REPORT)
        .with(tag::EXEC_TYPE, exec_type)
        .with(tag::SYMBOL, "BTC-USD")
        .with(tag::ORDER_ID, "7e0e2b8c-order")
        .with(tag::CL_ORD_ID, "client-1")
        .with(tag::PRICE, "100.50")
        .with(tag::ORDER_QTY, "2")
        .with(tag::LAST_SHARES, "0.5")
        .with(tag::SIDE, side)
}
