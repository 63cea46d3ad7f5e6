//! Seams to the transport and FIX session engine supplied by the host.
//!
//! The engine frames messages, owns sequence numbers and heartbeats. This
//! crate only builds message bodies, hands them to [`FixSession::send`], and
//! consumes the inbound event streams.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::warn;

use crate::core::Result;
use super::FixMessage;

/// Transport-level notifications
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// Peer or local side closed the stream
    End,
    Error(String),
}

pub type TransportEvents = mpsc::UnboundedReceiver<TransportEvent>;

/// Flow-control token handed out with every inbound message.
///
/// The engine holds back the next message until this is completed.
#[derive(Debug)]
pub struct Continuation {
    tx: Option<oneshot::Sender<()>>,
}

impl Continuation {
    /// Create a token and the receiver the engine waits on
    pub fn new() -> (Self, oneshot::Receiver<()>) {
        let (tx, rx) = oneshot::channel();
        (Self { tx: Some(tx) }, rx)
    }

    /// Signal that processing of the message is complete
    pub fn complete(mut self) {
        if let Some(tx) = self.tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for Continuation {
    fn drop(&mut self) {
        if let Some(tx) = self.tx.take() {
            warn!("Continuation dropped without completion, releasing session");
            let _ = tx.send(());
        }
    }
}

/// Session-level notifications
#[derive(Debug)]
pub enum SessionEvent {
    /// Inbound application or admin message
    Message(FixMessage, Continuation),
    /// Engine finished the session (logout exchange done)
    End,
    Error(String),
}

pub type SessionEvents = mpsc::UnboundedReceiver<SessionEvent>;

/// Opens encrypted byte streams
#[async_trait]
pub trait SecureConnector: Send + Sync {
    /// Connect and complete the TLS handshake
    async fn open(&self, host: &str, port: u16) -> Result<(Box<dyn SecureStream>, TransportEvents)>;
}

/// An open encrypted stream
pub trait SecureStream: Send + Sync {
    /// Bind a FIX session to this stream. The returned receiver carries every
    /// inbound message and session notification.
    fn create_session(
        &self,
        sender_comp_id: &str,
        target_comp_id: &str,
    ) -> Result<(Arc<dyn FixSession>, SessionEvents)>;

    /// Half-close the stream. The connector reports `TransportEvent::End`
    /// once the close completes.
    fn end(&self);
}

/// FIX session primitive
pub trait FixSession: Send + Sync {
    /// Queue a message. `high_priority` jumps ahead of queued application
    /// messages.
    fn send(&self, msg: FixMessage, high_priority: bool) -> Result<()>;

    /// MsgSeqNum the next outgoing message will carry
    fn outgoing_seq_num(&self) -> u64;

    fn sender_comp_id(&self) -> &str;

    fn target_comp_id(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_continuation_complete() {
        let (cont, mut rx) = Continuation::new();
        cont.complete();
        assert_eq!(rx.try_recv(), Ok(()));
    }

    #[test]
    fn test_continuation_released_on_drop() {
        let (cont, mut rx) = Continuation::new();
        drop(cont);
        assert_eq!(rx.try_recv(), Ok(()));
    }
}
