//! aleph-fix - FIX order-entry client
//!
//! Authenticated FIX session to the Coinbase (ex-GDAX) order gateway:
//! signed logon, order and cancel translation, and normalization of
//! execution reports into venue-agnostic events.
//!
//! The FIX session engine and the TLS transport are supplied by the host
//! through the traits in [`fix::session`].

// Public modules
pub mod core;
pub mod fix;
pub mod signer;
pub mod handshake;
pub mod translator;
pub mod normalizer;
pub mod client;

#[cfg(test)]
pub(crate) mod testing;

// Re-exports
pub use core::{CancelIntent, Credentials, Error, FixConfig, OrderIntent, OrderParams, OrderType, Result, Side, Symbol};
pub use client::{ClientEvent, EventReceiver, FixClient};
pub use normalizer::{DoneReason, NormalizedEvent};
pub use signer::sign;
