//! Configuration - Type-safe FIX session settings
//!
//! Credentials are never read from here; they are passed to the client
//! directly.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default Coinbase (ex-GDAX) FIX order-entry endpoint
pub const DEFAULT_FIX_URI: &str = "fix.gdax.com:4198";

/// TargetCompID the venue expects on every session
pub const DEFAULT_TARGET_COMP_ID: &str = "Coinbase";

/// Heartbeat interval advertised on logon
pub const DEFAULT_HEARTBEAT_SECS: u32 = 30;

/// FIX client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixConfig {
    /// Venue endpoint as `host:port`
    #[serde(default = "default_uri")]
    pub uri: String,

    /// TargetCompID used when creating the session
    #[serde(default = "default_target_comp_id")]
    pub target_comp_id: String,

    /// HeartBtInt sent on logon (seconds)
    #[serde(default = "default_heartbeat_secs")]
    pub heartbeat_interval_secs: u32,
}

fn default_uri() -> String {
    DEFAULT_FIX_URI.to_string()
}

fn default_target_comp_id() -> String {
    DEFAULT_TARGET_COMP_ID.to_string()
}

fn default_heartbeat_secs() -> u32 {
    DEFAULT_HEARTBEAT_SECS
}

impl Default for FixConfig {
    fn default() -> Self {
        Self {
            uri: default_uri(),
            target_comp_id: default_target_comp_id(),
            heartbeat_interval_secs: default_heartbeat_secs(),
        }
    }
}

impl FixConfig {
    /// Config pointing at a non-default venue URI
    pub fn with_uri(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            ..Self::default()
        }
    }

    /// Load from TOML file
    pub fn load(path: &Path) -> crate::core::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::core::Error::Config(format!("Failed to read config: {}", e)))?;

        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> crate::core::Result<Self> {
        toml::from_str(content)
            .map_err(|e| crate::core::Error::Config(format!("Failed to parse config: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_toml() {
        let config = FixConfig::from_toml_str("").unwrap();
        assert_eq!(config, FixConfig::default());
        assert_eq!(config.uri, "fix.gdax.com:4198");
        assert_eq!(config.heartbeat_interval_secs, 30);
    }

    #[test]
    fn test_partial_override() {
        let config = FixConfig::from_toml_str(r#"uri = "fix-public.sandbox.gdax.com:4198""#).unwrap();
        assert_eq!(config.uri, "fix-public.sandbox.gdax.com:4198");
        assert_eq!(config.target_comp_id, "Coinbase");
    }

    #[test]
    fn test_bad_toml() {
        assert!(matches!(
            FixConfig::from_toml_str("uri = ").unwrap_err(),
            crate::core::Error::Config(_)
        ));
    }
}
