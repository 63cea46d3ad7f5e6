//! Tag/value FIX message
//!
//! Header fields that the session engine owns (BeginString, BodyLength,
//! MsgSeqNum, SenderCompID, TargetCompID, CheckSum) are never stored here;
//! the engine adds them when framing.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;

use super::tag;

/// UTCTimestamp format with millisecond precision
pub const UTC_TIMESTAMP_FORMAT: &str = "%Y%m%d-%H:%M:%S%.3f";

pub fn utc_timestamp(ts: DateTime<Utc>) -> String {
    ts.format(UTC_TIMESTAMP_FORMAT).to_string()
}

/// A FIX application or admin message body in field insertion order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixMessage {
    msg_type: String,
    fields: Vec<(u32, String)>,
}

impl FixMessage {
    pub fn new(msg_type: impl Into<String>) -> Self {
        Self {
            msg_type: msg_type.into(),
            fields: Vec::new(),
        }
    }

    pub fn msg_type(&self) -> &str {
        &self.msg_type
    }

    /// Set a field, replacing any previous value for the same tag
    pub fn set(&mut self, tag: u32, value: impl ToString) -> &mut Self {
        let value = value.to_string();
        if tag == tag::MSG_TYPE {
            self.msg_type = value;
            return self;
        }
        match self.fields.iter_mut().find(|(t, _)| *t == tag) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((tag, value)),
        }
        self
    }

    pub fn with(mut self, tag: u32, value: impl ToString) -> Self {
        self.set(tag, value);
        self
    }

    pub fn get(&self, tag: u32) -> Option<&str> {
        if tag == tag::MSG_TYPE {
            return Some(&self.msg_type);
        }
        self.fields
            .iter()
            .find(|(t, _)| *t == tag)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, tag: u32) -> bool {
        self.get(tag).is_some()
    }

    /// Decimal field; absent or unparsable values yield `None`
    pub fn get_decimal(&self, tag: u32) -> Option<Decimal> {
        self.get(tag).and_then(|v| Decimal::from_str(v.trim()).ok())
    }

    /// Owned string copy of a field
    pub fn get_string(&self, tag: u32) -> Option<String> {
        self.get(tag).map(str::to_string)
    }

    pub fn fields(&self) -> impl Iterator<Item = (u32, &str)> {
        self.fields.iter().map(|(t, v)| (*t, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl std::fmt::Display for FixMessage {
    /// `|`-separated rendering for logs
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "35={}", self.msg_type)?;
        for (t, v) in &self.fields {
            if *t == tag::PASSWORD || *t == tag::RAW_DATA {
                write!(f, "|{}=***", t)?;
            } else {
                write!(f, "|{}={}", t, v)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_set_replaces_in_place() {
        let mut msg = FixMessage::new(tag::msg_type::NEW_ORDER_SINGLE);
        msg.set(tag::SYMBOL, "BTC-USD").set(tag::SIDE, "1");
        msg.set(tag::SYMBOL, "ETH-USD");

        assert_eq!(msg.get(tag::SYMBOL), Some("ETH-USD"));
        assert_eq!(msg.fields().map(|(t, _)| t).collect::<Vec<_>>(), vec![tag::SYMBOL, tag::SIDE]);
        assert_eq!(msg.get(tag::MSG_TYPE), Some("D"));
    }

    #[test]
    fn test_get_decimal() {
        let msg = FixMessage::new("8")
            .with(tag::PRICE, "5884.99")
            .with(tag::ORDER_QTY, "abc");
        assert_eq!(msg.get_decimal(tag::PRICE), Some(Decimal::new(588499, 2)));
        assert_eq!(msg.get_decimal(tag::ORDER_QTY), None);
        assert_eq!(msg.get_decimal(tag::LAST_SHARES), None);
    }

    #[test]
    fn test_timestamp_format() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(utc_timestamp(ts), "20240102-03:04:05.000");
    }

    #[test]
    fn test_display_masks_secrets() {
        let msg = FixMessage::new("A")
            .with(tag::PASSWORD, "hunter2")
            .with(tag::RAW_DATA, "sig");
        let rendered = msg.to_string();
        assert_eq!(rendered, "35=A|554=***|96=***");
    }
}
