//! Order translator - intents to FIX order-entry messages

use chrono::{DateTime, Utc};

use crate::core::{CancelIntent, OrderIntent, OrderType, Result, Side};
use crate::fix::{FixMessage, tag, utc_timestamp};

fn ord_type_code(order_type: OrderType) -> &'static str {
    match order_type {
        OrderType::Market => tag::ord_type::MARKET,
        OrderType::Limit => tag::ord_type::LIMIT,
        OrderType::Stop => tag::ord_type::STOP,
    }
}

/// Side(54) goes out as the FIX code, the same encoding `decode_side` reads back
fn side_code(side: Side) -> &'static str {
    match side {
        Side::Buy => tag::side::BUY,
        Side::Sell => tag::side::SELL,
    }
}

/// NewOrderSingle (35=D) stamped with the current time
pub fn to_new_order(intent: &OrderIntent) -> Result<FixMessage> {
    to_new_order_at(intent, Utc::now())
}

/// NewOrderSingle (35=D) with an explicit TransactTime.
///
/// Fails with `InvalidOrderType` before anything is built when the order type
/// has no OrdType code.
pub fn to_new_order_at(intent: &OrderIntent, transact_time: DateTime<Utc>) -> Result<FixMessage> {
    let order_type: OrderType = intent.order_type.parse()?;

    let mut order = FixMessage::new(tag::msg_type::NEW_ORDER_SINGLE);
    order.set(tag::SYMBOL, intent.symbol.as_str());
    if let Some(client_oid) = &intent.client_order_id {
        order.set(tag::CL_ORD_ID, client_oid);
    }
    order
        .set(tag::SIDE, side_code(intent.side))
        .set(tag::HANDL_INST, tag::HANDL_INST_AUTOMATED)
        .set(tag::TRANSACT_TIME, utc_timestamp(transact_time))
        .set(tag::ORD_TYPE, ord_type_code(order_type))
        .set(tag::ORDER_QTY, intent.size);
    if let Some(price) = intent.price {
        order.set(tag::PRICE, price);
    }

    let tif = if intent.is_post_only() {
        tag::time_in_force::POST_ONLY
    } else {
        tag::time_in_force::GOOD_TILL_CANCEL
    };
    order
        .set(tag::TIME_IN_FORCE, tif)
        .set(tag::SELF_TRADE_PREVENTION, tag::STP_DECREMENT_AND_CANCEL);

    Ok(order)
}

/// OrderCancelRequest (35=F)
pub fn to_cancel(intent: &CancelIntent) -> FixMessage {
    FixMessage::new(tag::msg_type::ORDER_CANCEL_REQUEST)
        .with(tag::SYMBOL, intent.symbol.as_str())
        .with(tag::ORIG_CL_ORD_ID, &intent.client_order_id)
        .with(tag::CL_ORD_ID, &intent.request_id)
        .with(tag::ORDER_ID, &intent.order_id)
}
