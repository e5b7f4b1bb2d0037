//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// Core data types shared across the matching engine: the two-sided `Side`
// enum, the resting/in-flight `OrderRecord`, `TradeEvent`, and `PricePoint`.
//--------------------------------------------------------------------------------------------------

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::price::Price;

/// Which side of the book an order rests on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

/// A resting or in-flight order.
///
/// `order_id` and `timestamp` are assigned once at admission and never
/// change, even if the order partially fills and rests (same identity
/// throughout its life). `volume` is the only field matching mutates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRecord {
    pub order_id: u64,
    pub client: String,
    pub side: Side,
    pub price: Price,
    pub volume: u64,
    pub timestamp: DateTime<Utc>,
}

impl OrderRecord {
    pub fn new(order_id: u64, client: String, side: Side, price: Price, volume: u64) -> Self {
        Self {
            order_id,
            client,
            side,
            price,
            volume,
            timestamp: Utc::now(),
        }
    }
}

/// A single match between a resting maker order and an incoming taker order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeEvent {
    /// Milliseconds since epoch.
    pub timestamp: i64,
    pub price: Price,
    pub volume: u64,
    pub maker_order_id: u64,
    pub taker_order_id: u64,
    pub maker_client: String,
    pub taker_client: String,
}

/// One sample of the mid-price history ring.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: i64,
    pub price: Price,
}
