//! FIX tag numbers and enumerated values used by the order-entry session
//!
//! Standard FIX 4.2 tags plus the venue's private `7928` (self-trade
//! prevention).

pub const CL_ORD_ID: u32 = 11;
pub const HANDL_INST: u32 = 21;
pub const LAST_SHARES: u32 = 32;
pub const MSG_TYPE: u32 = 35;
pub const ORDER_ID: u32 = 37;
pub const ORDER_QTY: u32 = 38;
pub const ORD_TYPE: u32 = 40;
pub const ORIG_CL_ORD_ID: u32 = 41;
pub const PRICE: u32 = 44;
pub const SENDING_TIME: u32 = 52;
pub const SIDE: u32 = 54;
pub const SYMBOL: u32 = 55;
pub const TEXT: u32 = 58;
pub const TIME_IN_FORCE: u32 = 59;
pub const TRANSACT_TIME: u32 = 60;
pub const RAW_DATA_LENGTH: u32 = 95;
pub const RAW_DATA: u32 = 96;
pub const ENCRYPT_METHOD: u32 = 98;
pub const HEART_BT_INT: u32 = 108;
pub const TEST_REQ_ID: u32 = 112;
pub const EXEC_TYPE: u32 = 150;
pub const REF_MSG_TYPE: u32 = 372;
pub const CXL_REJ_RESPONSE_TO: u32 = 434;
pub const PASSWORD: u32 = 554;
pub const SELF_TRADE_PREVENTION: u32 = 7928;

/// MsgType (35) values
pub mod msg_type {
    pub const HEARTBEAT: &str = "0";
    pub const TEST_REQUEST: &str = "1";
    pub const REJECT: &str = "3";
    pub const LOGOUT: &str = "5";
    pub const EXECUTION_REPORT: &str = "8";
    pub const ORDER_CANCEL_REJECT: &str = "9";
    pub const LOGON: &str = "A";
    pub const NEW_ORDER_SINGLE: &str = "D";
    pub const ORDER_CANCEL_REQUEST: &str = "F";
}

/// Side (54) values
pub mod side {
    pub const BUY: &str = "1";
    pub const SELL: &str = "2";
}

/// OrdType (40) values
pub mod ord_type {
    pub const MARKET: &str = "1";
    pub const LIMIT: &str = "2";
    pub const STOP: &str = "3";
}

/// TimeInForce (59) values
pub mod time_in_force {
    pub const GOOD_TILL_CANCEL: &str = "1";
    pub const POST_ONLY: &str = "P";
}

/// HandlInst (21): automated execution, no broker intervention
pub const HANDL_INST_AUTOMATED: &str = "1";

/// SelfTradePrevention (7928): decrement and cancel
pub const STP_DECREMENT_AND_CANCEL: &str = "D";

/// EncryptMethod (98): none, TLS already encrypts the stream
pub const ENCRYPT_METHOD_NONE: &str = "0";

/// CxlRejResponseTo (434) value the venue uses for a too-late cancel
pub const CXL_REJ_TOO_LATE: &str = "1";
