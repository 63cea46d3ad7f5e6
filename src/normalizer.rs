//! Execution normalizer - inbound FIX messages to venue-agnostic events
//!
//! One inbound message yields at most one [`NormalizedEvent`]. Reserved and
//! unknown codes yield `None`; they are never errors, so a venue adding a new
//! ExecType cannot take the session down.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, trace};

use crate::core::Side;
use crate::fix::{FixMessage, tag};

/// Why an order left the book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DoneReason {
    Filled,
    Canceled,
}

/// Venue-agnostic order and session event
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum NormalizedEvent {
    Logon,
    Logout,
    TestRequest {
        test_req_id: Option<String>,
        /// The request as received
        #[serde(skip)]
        raw: FixMessage,
    },
    Received {
        product_id: Option<String>,
        order_id: Option<String>,
        client_oid: Option<String>,
        price: Option<Decimal>,
        size: Option<Decimal>,
        side: Side,
    },
    Match {
        product_id: Option<String>,
        order_id: Option<String>,
        price: Option<Decimal>,
        /// LastShares of this fill
        size: Option<Decimal>,
        side: Side,
    },
    Done {
        product_id: Option<String>,
        order_id: Option<String>,
        price: Option<Decimal>,
        size: Option<Decimal>,
        side: Side,
        done_reason: DoneReason,
    },
    Rejected {
        product_id: Option<String>,
        client_oid: Option<String>,
        order_id: Option<String>,
        price: Option<Decimal>,
        size: Option<Decimal>,
        side: Side,
        /// Venue's reason, e.g. "post only" or "Insufficient funds"
        message: Option<String>,
    },
    OrderCancelReject {
        request_oid: Option<String>,
        order_id: Option<String>,
        too_late: bool,
    },
    MessageReject {
        ref_type: Option<String>,
        text: Option<String>,
    },
}

impl NormalizedEvent {
    /// Wire name of the variant, as used in the serialized `type` tag
    pub fn kind(&self) -> &'static str {
        match self {
            NormalizedEvent::Logon => "logon",
            NormalizedEvent::Logout => "logout",
            NormalizedEvent::TestRequest { .. } => "test-request",
            NormalizedEvent::Received { .. } => "received",
            NormalizedEvent::Match { .. } => "match",
            NormalizedEvent::Done { .. } => "done",
            NormalizedEvent::Rejected { .. } => "rejected",
            NormalizedEvent::OrderCancelReject { .. } => "order-cancel-reject",
            NormalizedEvent::MessageReject { .. } => "message-reject",
        }
    }
}

/// ExecType (150) classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecType {
    New,
    Fill,
    Filled,
    Canceled,
    Rejected,
    /// Unsolicited reduce from self-trade prevention
    Restated,
    OrderStatus,
    Unknown(String),
}

impl ExecType {
    pub fn from_code(code: &str) -> Self {
        match code {
            "0" => ExecType::New,
            "1" => ExecType::Fill,
            "3" => ExecType::Filled,
            "4" => ExecType::Canceled,
            "8" => ExecType::Rejected,
            "D" => ExecType::Restated,
            "I" => ExecType::OrderStatus,
            other => ExecType::Unknown(other.to_string()),
        }
    }
}

/// Side (54): "1" is buy, everything else is sell
pub fn decode_side(code: Option<&str>) -> Side {
    match code.map(str::trim) {
        Some(tag::side::BUY) => Side::Buy,
        _ => Side::Sell,
    }
}

/// Map one inbound message to its event
pub fn normalize(msg: &FixMessage) -> Option<NormalizedEvent> {
    match msg.msg_type() {
        tag::msg_type::LOGON => Some(NormalizedEvent::Logon),
        tag::msg_type::LOGOUT => Some(NormalizedEvent::Logout),
        tag::msg_type::TEST_REQUEST => Some(NormalizedEvent::TestRequest {
            test_req_id: msg.get_string(tag::TEST_REQ_ID),
            raw: msg.clone(),
        }),
        tag::msg_type::EXECUTION_REPORT => normalize_execution_report(msg),
        tag::msg_type::ORDER_CANCEL_REJECT => Some(NormalizedEvent::OrderCancelReject {
            request_oid: msg.get_string(tag::CL_ORD_ID),
            order_id: msg.get_string(tag::ORDER_ID),
            too_late: msg.get(tag::CXL_REJ_RESPONSE_TO) == Some(tag::CXL_REJ_TOO_LATE),
        }),
        tag::msg_type::REJECT => Some(NormalizedEvent::MessageReject {
            ref_type: msg.get_string(tag::REF_MSG_TYPE),
            text: msg.get_string(tag::TEXT),
        }),
        other => {
            trace!(msg_type = other, "No handler for inbound message type");
            None
        }
    }
}

fn normalize_execution_report(msg: &FixMessage) -> Option<NormalizedEvent> {
    let Some(code) = msg.get(tag::EXEC_TYPE) else {
        debug!("ExecutionReport without ExecType, ignoring");
        return None;
    };

    let product_id = msg.get_string(tag::SYMBOL);
    let order_id = msg.get_string(tag::ORDER_ID);
    let price = msg.get_decimal(tag::PRICE);
    let side = decode_side(msg.get(tag::SIDE));

    match ExecType::from_code(code.trim()) {
        ExecType::New => Some(NormalizedEvent::Received {
            product_id,
            order_id,
            client_oid: msg.get_string(tag::CL_ORD_ID),
            price,
            size: msg.get_decimal(tag::ORDER_QTY),
            side,
        }),
        ExecType::Fill => Some(NormalizedEvent::Match {
            product_id,
            order_id,
            price,
            size: msg.get_decimal(tag::LAST_SHARES),
            side,
        }),
        exec @ (ExecType::Filled | ExecType::Canceled) => Some(NormalizedEvent::Done {
            product_id,
            order_id,
            price,
            size: msg.get_decimal(tag::ORDER_QTY),
            side,
            done_reason: if exec == ExecType::Filled {
                DoneReason::Filled
            } else {
                DoneReason::Canceled
            },
        }),
        ExecType::Rejected => Some(NormalizedEvent::Rejected {
            product_id,
            client_oid: msg.get_string(tag::CL_ORD_ID),
            order_id,
            price,
            size: msg.get_decimal(tag::ORDER_QTY),
            side,
            message: msg.get_string(tag::TEXT),
        }),
        // Reserved: order changed by STP, and order status snapshots
        ExecType::Restated | ExecType::OrderStatus => None,
        ExecType::Unknown(code) => {
            debug!(exec_type = %code, order_id = ?order_id, "Ignoring unknown ExecType");
            None
        }
    }
}
