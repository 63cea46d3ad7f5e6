//! Error handling - Hierarchical errors for the FIX client

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// aleph-fix error hierarchy
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Missing or malformed key/secret/passphrase. Never reaches the network.
    #[error("Invalid credential: {0}")]
    InvalidCredential(String),

    /// Malformed venue URI
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// TLS/socket failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// Protocol-level failure reported by the session engine
    #[error("Session error: {0}")]
    Session(String),

    /// Order type with no FIX OrdType mapping
    #[error("Invalid order type: {0}")]
    InvalidOrderType(String),

    /// Command issued with no active session
    #[error("Not connected")]
    NotConnected,

    /// Invalid lifecycle transition
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Configuration file errors
    #[error("Configuration error: {0}")]
    Config(String),
}
