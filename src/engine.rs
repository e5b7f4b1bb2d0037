//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// The core matching engine: owns both BookSides, the order-location index,
// the trade log, and the price-history ring. This is the dominant component
// of the system, implementing price-time priority matching, cancellation,
// depth snapshots, and mid-price history tracking.
//--------------------------------------------------------------------------------------------------

use std::collections::{HashMap, VecDeque};

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, warn};

use crate::book_side::{BookSide, BookSideKind};
use crate::ids::OrderIdAllocator;
use crate::price::Price;
use crate::types::{OrderRecord, PricePoint, Side, TradeEvent};

/// Errors the engine can report to a caller. Structural inconsistencies
/// (an id present in the location index but absent from its level) are
/// logged as diagnostics and tolerated, not surfaced here.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("price must be positive")]
    InvalidPrice,
    #[error("volume must be positive")]
    InvalidVolume,
    #[error("engine worker unavailable: {0}")]
    Unavailable(String),
}

pub type EngineResult<T> = Result<T, EngineError>;

/// Top-N aggregated depth per side, best-first.
#[derive(Debug, Clone, Default)]
pub struct DepthSnapshot {
    pub bids: Vec<(Price, u64)>,
    pub asks: Vec<(Price, u64)>,
}

pub struct MatchingEngine {
    ids: OrderIdAllocator,
    bids: BookSide,
    asks: BookSide,
    /// order_id -> (side, price): locates an order's resting level. Entries
    /// exist only for orders currently resting in a BookSide.
    locations: HashMap<u64, (Side, Price)>,
    trade_log: VecDeque<TradeEvent>,
    trade_log_cap: usize,
    price_history: VecDeque<PricePoint>,
    history_limit: usize,
    last_recorded_mid: Option<Price>,
}

impl MatchingEngine {
    pub fn new(history_limit: usize) -> Self {
        Self {
            ids: OrderIdAllocator::new(),
            bids: BookSide::new(BookSideKind::Bids),
            asks: BookSide::new(BookSideKind::Asks),
            locations: HashMap::new(),
            trade_log: VecDeque::new(),
            trade_log_cap: history_limit.saturating_mul(50).max(1),
            price_history: VecDeque::with_capacity(history_limit),
            history_limit: history_limit.max(1),
            last_recorded_mid: None,
        }
    }

    pub fn best_bid(&self) -> Option<Price> {
        self.bids.best_price()
    }

    pub fn best_ask(&self) -> Option<Price> {
        self.asks.best_price()
    }

    pub fn volume_at(&self, price: Price, side: Side) -> u64 {
        match side {
            Side::Buy => self.bids.volume_at(price),
            Side::Sell => self.asks.volume_at(price),
        }
    }

    pub fn price_history(&self) -> Vec<PricePoint> {
        self.price_history.iter().copied().collect()
    }

    pub fn trades(&self, limit: usize) -> Vec<TradeEvent> {
        self.trade_log.iter().rev().take(limit).rev().cloned().collect()
    }

    /// The current side, price, and residual volume of a still-resting
    /// order, or `None` if it has fully filled or been cancelled.
    pub fn resting_order(&self, order_id: u64) -> Option<(Side, Price, u64)> {
        let (side, price) = *self.locations.get(&order_id)?;
        let book = match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        };
        book.order_volume(price, order_id).map(|volume| (side, price, volume))
    }

    pub fn snapshot(&self, levels: usize) -> DepthSnapshot {
        DepthSnapshot {
            bids: self.bids.top_levels(levels),
            asks: self.asks.top_levels(levels),
        }
    }

    /// Places a new order, matching it against the opposite side until it
    /// no longer crosses or is exhausted, then resting any residual volume.
    pub fn place(
        &mut self,
        client: String,
        side: Side,
        price: Price,
        volume: u64,
    ) -> EngineResult<(u64, Vec<TradeEvent>)> {
        if !price.is_positive() {
            return Err(EngineError::InvalidPrice);
        }
        if volume == 0 {
            return Err(EngineError::InvalidVolume);
        }

        let order_id = self.ids.next_id();
        let mut taker = OrderRecord::new(order_id, client, side, price, volume);
        let mut trades = Vec::new();
        let mut filled_makers = Vec::new();

        let opposite = match side {
            Side::Buy => &mut self.asks,
            Side::Sell => &mut self.bids,
        };

        while taker.volume > 0 {
            let Some(best_price) = opposite.best_price() else {
                break;
            };
            let crosses = match side {
                Side::Buy => taker.price.as_decimal() >= best_price.as_decimal(),
                Side::Sell => taker.price.as_decimal() <= best_price.as_decimal(),
            };
            if !crosses {
                break;
            }

            let (level_price, level) = opposite.peek_best_mut().expect("best_price implies a level");
            let Some(head) = level.peek_front_mut() else {
                // A live level always has a head order; this branch exists
                // only to tolerate a structural inconsistency defensively.
                warn!(price = %level_price, "best level had no head order, dropping");
                opposite.drop_if_empty(level_price);
                continue;
            };

            let traded = taker.volume.min(head.volume);
            let trade_price = head.price;
            let maker_order_id = head.order_id;
            let maker_client = head.client.clone();

            head.volume -= traded;
            taker.volume -= traded;
            level.decrement_volume(traded);

            trades.push(TradeEvent {
                timestamp: Utc::now().timestamp_millis(),
                price: trade_price,
                volume: traded,
                maker_order_id,
                taker_order_id: order_id,
                maker_client,
                taker_client: taker.client.clone(),
            });

            if head.volume == 0 {
                level.pop_front();
                filled_makers.push(maker_order_id);
            }
            if level.is_empty() {
                opposite.drop_if_empty(level_price);
            }
        }

        for maker_order_id in filled_makers {
            self.locations.remove(&maker_order_id);
        }

        if taker.volume > 0 {
            let resting_side = match side {
                Side::Buy => &mut self.bids,
                Side::Sell => &mut self.asks,
            };
            self.locations.insert(order_id, (side, taker.price));
            resting_side.push(taker);
        }

        self.record_trades(&trades);
        self.update_price_history();

        Ok((order_id, trades))
    }

    /// Actively cancels a resting order. Returns `false` if the id is
    /// unknown or already fully filled.
    pub fn cancel(&mut self, order_id: u64) -> bool {
        let Some((side, price)) = self.locations.remove(&order_id) else {
            return false;
        };

        let book = match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        };

        match book.remove(price, order_id) {
            Some(_) => {
                self.update_price_history();
                true
            }
            None => {
                warn!(order_id, "order location index pointed at an empty level; dropping");
                false
            }
        }
    }

    fn record_trades(&mut self, trades: &[TradeEvent]) {
        for trade in trades {
            self.trade_log.push_back(trade.clone());
        }
        while self.trade_log.len() > self.trade_log_cap {
            self.trade_log.pop_front();
        }
    }

    /// Recomputes the mid-price and appends it to the history ring if it
    /// has changed from the last recorded value.
    fn update_price_history(&mut self) {
        let mid = match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some(Price::midpoint(bid, ask)),
            (Some(bid), None) => Some(bid),
            (None, Some(ask)) => Some(ask),
            (None, None) => None,
        };

        let Some(mid) = mid else { return };
        if self.last_recorded_mid == Some(mid) {
            return;
        }

        self.last_recorded_mid = Some(mid);
        self.price_history.push_back(PricePoint {
            timestamp: Utc::now().timestamp_millis(),
            price: mid,
        });
        while self.price_history.len() > self.history_limit {
            self.price_history.pop_front();
        }
        debug!(%mid, "price history updated");
    }
}
