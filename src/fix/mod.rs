//! FIX vocabulary and session-engine seams

pub mod tag;
pub mod message;
pub mod session;

pub use message::{FixMessage, utc_timestamp};
pub use session::{
    Continuation, FixSession, SecureConnector, SecureStream, SessionEvent, SessionEvents,
    TransportEvent, TransportEvents,
};
