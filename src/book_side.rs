//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// One side (bids or asks) of the book: an ordered map of price to PriceLevel
// giving O(log n) access to the best live level. Levels are removed eagerly
// once empty, so there are never stale tombstones to skip past.
//--------------------------------------------------------------------------------------------------

use std::collections::BTreeMap;

use crate::price::Price;
use crate::price_level::PriceLevel;
use crate::types::{OrderRecord, Side};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookSideKind {
    Bids,
    Asks,
}

#[derive(Debug)]
pub struct BookSide {
    kind: BookSideKind,
    levels: BTreeMap<Price, PriceLevel>,
}

impl BookSide {
    pub fn new(kind: BookSideKind) -> Self {
        Self {
            kind,
            levels: BTreeMap::new(),
        }
    }

    /// Appends `order` to its price level, creating the level if needed.
    pub fn push(&mut self, order: OrderRecord) {
        self.levels.entry(order.price).or_default().push_back(order);
    }

    /// The best live level: highest price for bids, lowest for asks. Every
    /// level in the map has aggregate_volume > 0 by construction (empty
    /// levels are dropped eagerly), so no liveness filtering is needed here.
    pub fn best_price(&self) -> Option<Price> {
        match self.kind {
            BookSideKind::Bids => self.levels.keys().next_back().copied(),
            BookSideKind::Asks => self.levels.keys().next().copied(),
        }
    }

    pub fn peek_best_mut(&mut self) -> Option<(Price, &mut PriceLevel)> {
        let price = self.best_price()?;
        self.levels.get_mut(&price).map(|level| (price, level))
    }

    /// Drops the level at `price` if it has become empty. Called by the
    /// matching loop after a head order is fully filled and popped.
    pub fn drop_if_empty(&mut self, price: Price) {
        if self.levels.get(&price).is_some_and(PriceLevel::is_empty) {
            self.levels.remove(&price);
        }
    }

    /// Removes a specific resting order by (price, id), dropping the level
    /// if it becomes empty as a result.
    pub fn remove(&mut self, price: Price, order_id: u64) -> Option<OrderRecord> {
        let level = self.levels.get_mut(&price)?;
        let removed = level.remove(order_id);
        if level.is_empty() {
            self.levels.remove(&price);
        }
        removed
    }

    pub fn volume_at(&self, price: Price) -> u64 {
        self.levels.get(&price).map_or(0, PriceLevel::total_volume)
    }

    pub fn order_volume(&self, price: Price, order_id: u64) -> Option<u64> {
        self.levels.get(&price)?.volume_of(order_id)
    }

    /// Up to `levels` best levels, best-first, as (price, volume) pairs.
    pub fn top_levels(&self, levels: usize) -> Vec<(Price, u64)> {
        let iter = self.levels.iter().map(|(p, l)| (*p, l.total_volume()));
        match self.kind {
            BookSideKind::Bids => iter.rev().take(levels).collect(),
            BookSideKind::Asks => iter.take(levels).collect(),
        }
    }

    pub fn side(&self) -> Side {
        match self.kind {
            BookSideKind::Bids => Side::Buy,
            BookSideKind::Asks => Side::Sell,
        }
    }
}
