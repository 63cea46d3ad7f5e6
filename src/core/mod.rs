//! Core module - Common types, configuration, and error handling

pub mod error;
pub mod types;
pub mod config;

pub use error::{Error, Result};
pub use types::*;
pub use config::FixConfig;
