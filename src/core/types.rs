//! Core types - Strong typing for order entry

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};

/// Venue product identifier (e.g., "BTC-USD"), sent as given
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Order side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    Market,
    Limit,
    Stop,
}

impl std::str::FromStr for OrderType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "market" => Ok(OrderType::Market),
            "limit" => Ok(OrderType::Limit),
            "stop" => Ok(OrderType::Stop),
            other => Err(Error::InvalidOrderType(other.to_string())),
        }
    }
}

impl std::fmt::Display for OrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderType::Market => write!(f, "market"),
            OrderType::Limit => write!(f, "limit"),
            OrderType::Stop => write!(f, "stop"),
        }
    }
}

/// API credentials for the FIX logon.
///
/// `key` doubles as the SenderCompID, `secret` is the base64 HMAC key and
/// `passphrase` is sent in the Password field and mixed into the signature.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    key: String,
    secret: String,
    passphrase: String,
}

impl Credentials {
    /// Validate and build credentials. All three fields are required and the
    /// secret must decode as base64.
    pub fn new(
        key: impl Into<String>,
        secret: impl Into<String>,
        passphrase: impl Into<String>,
    ) -> Result<Self> {
        let key = key.into();
        let secret = secret.into();
        let passphrase = passphrase.into();

        let missing: Vec<&str> = [("key", &key), ("secret", &secret), ("passphrase", &passphrase)]
            .into_iter()
            .filter(|(_, v)| v.trim().is_empty())
            .map(|(name, _)| name)
            .collect();

        if !missing.is_empty() {
            return Err(Error::InvalidCredential(format!(
                "incomplete credentials, missing: {}",
                missing.join(", ")
            )));
        }

        BASE64
            .decode(&secret)
            .map_err(|e| Error::InvalidCredential(format!("secret is not valid base64: {}", e)))?;

        Ok(Self { key, secret, passphrase })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn passphrase(&self) -> &str {
        &self.passphrase
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("key", &self.key)
            .field("secret", &"<redacted>")
            .field("passphrase", &"<redacted>")
            .finish()
    }
}

/// Caller-facing order parameters for `buy` / `sell`.
///
/// `order_type` stays a string until translation so that an unmapped type is
/// reported as [`Error::InvalidOrderType`] instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderParams {
    #[serde(rename = "type")]
    pub order_type: String,
    pub size: Decimal,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default, rename = "client_oid")]
    pub client_order_id: Option<String>,
    #[serde(default)]
    pub post_only: Option<bool>,
}

impl OrderParams {
    pub fn limit(size: Decimal, price: Decimal) -> Self {
        Self {
            order_type: OrderType::Limit.to_string(),
            size,
            price: Some(price),
            client_order_id: None,
            post_only: None,
        }
    }

    pub fn market(size: Decimal) -> Self {
        Self {
            order_type: OrderType::Market.to_string(),
            size,
            price: None,
            client_order_id: None,
            post_only: None,
        }
    }

    pub fn with_client_order_id(mut self, id: impl Into<String>) -> Self {
        self.client_order_id = Some(id.into());
        self
    }

    pub fn with_post_only(mut self, post_only: bool) -> Self {
        self.post_only = Some(post_only);
        self
    }

    /// Attach symbol and side to produce a full intent
    pub fn into_intent(self, symbol: Symbol, side: Side) -> OrderIntent {
        OrderIntent {
            symbol,
            side,
            order_type: self.order_type,
            size: self.size,
            price: self.price,
            client_order_id: self.client_order_id,
            post_only: self.post_only,
        }
    }
}

/// A single order placement request
#[derive(Debug, Clone, PartialEq)]
pub struct OrderIntent {
    pub symbol: Symbol,
    pub side: Side,
    pub order_type: String,
    pub size: Decimal,
    pub price: Option<Decimal>,
    pub client_order_id: Option<String>,
    /// `None` means post-only; only an explicit `Some(false)` disables it.
    pub post_only: Option<bool>,
}

impl OrderIntent {
    pub fn is_post_only(&self) -> bool {
        self.post_only != Some(false)
    }
}

/// A single cancel request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancelIntent {
    pub symbol: Symbol,
    /// ClOrdID of the cancel request itself
    pub request_id: String,
    /// ClOrdID of the order being cancelled
    pub client_order_id: String,
    pub order_id: String,
}
