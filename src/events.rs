//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// EventFanout delivers typed depth/trade events to every attached observer
// without letting one slow or dead observer block delivery to the rest.
// Each observer gets its own channel, so a full or closed one is simply
// dropped from the registry on its next failed send rather than stalling
// or disconnecting anyone else.
//--------------------------------------------------------------------------------------------------

use std::sync::Mutex;

use serde::Serialize;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::debug;

use crate::engine::DepthSnapshot;
use crate::price::Price;
use crate::types::{Side, TradeEvent};

#[derive(Debug, Clone, Serialize)]
pub struct DepthLevelDto {
    pub price: Price,
    pub volume: u64,
}

impl From<(Price, u64)> for DepthLevelDto {
    fn from((price, volume): (Price, u64)) -> Self {
        Self { price, volume }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DepthSnapshotDto {
    pub bids: Vec<DepthLevelDto>,
    pub asks: Vec<DepthLevelDto>,
}

impl From<DepthSnapshot> for DepthSnapshotDto {
    fn from(snapshot: DepthSnapshot) -> Self {
        Self {
            bids: snapshot.bids.into_iter().map(Into::into).collect(),
            asks: snapshot.asks.into_iter().map(Into::into).collect(),
        }
    }
}

/// Details of a taker order that rested after partially filling, included
/// in an `ORDER_BOOK_UPDATE` event so observers can render it immediately.
#[derive(Debug, Clone, Serialize)]
pub struct TakerOrderDetails {
    pub order_id: u64,
    pub client: String,
    pub side: Side,
    pub price: Price,
    pub volume: u64,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum EngineEvent {
    #[serde(rename = "CONNECTION_ESTABLISHED")]
    ConnectionEstablished { initial_snapshot: DepthSnapshotDto },
    #[serde(rename = "ORDER_BOOK_UPDATE")]
    OrderBookUpdate {
        depth_snapshot: DepthSnapshotDto,
        #[serde(skip_serializing_if = "Option::is_none")]
        taker_order_details: Option<TakerOrderDetails>,
        #[serde(skip_serializing_if = "Option::is_none")]
        trades: Option<Vec<TradeEvent>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        cancelled_order_id: Option<u64>,
    },
    #[serde(rename = "PONG")]
    Pong,
}

/// A single observer's private delivery channel.
pub struct Observer {
    pub receiver: UnboundedReceiver<EngineEvent>,
}

/// Fans state-change events out to every currently attached observer. Each
/// observer has its own unbounded channel so one slow or dead consumer
/// never blocks delivery to the others; a failed send simply detaches it.
#[derive(Default)]
pub struct EventFanout {
    observers: Mutex<Vec<UnboundedSender<EngineEvent>>>,
}

impl EventFanout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new observer and immediately queues its
    /// `CONNECTION_ESTABLISHED` event.
    pub fn attach(&self, initial_snapshot: DepthSnapshotDto) -> Observer {
        let (tx, rx) = mpsc::unbounded_channel();
        let _ = tx.send(EngineEvent::ConnectionEstablished { initial_snapshot });
        self.observers.lock().unwrap().push(tx);
        Observer { receiver: rx }
    }

    /// Delivers `event` to every attached observer, dropping any whose
    /// channel has closed. Ordering for a given observer always matches
    /// call order since each observer's channel is FIFO.
    pub fn broadcast(&self, event: EngineEvent) {
        let mut observers = self.observers.lock().unwrap();
        let before = observers.len();
        observers.retain(|tx| tx.send(event.clone()).is_ok());
        let dropped = before - observers.len();
        if dropped > 0 {
            debug!(dropped, "dropped observers with closed channels");
        }
    }

    pub fn observer_count(&self) -> usize {
        self.observers.lock().unwrap().len()
    }
}
