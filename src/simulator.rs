//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// A toggleable background task that derives a reference price from the
// current top of book and submits randomized orders through the engine,
// broadcasting an `ORDER_BOOK_UPDATE` after each one. Runs on a 500ms
// cadence gated by an active flag, with a 5s backoff on error.
//--------------------------------------------------------------------------------------------------

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use rand_distr::{Distribution, Normal};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::{error, info};

use crate::engine_handle::EngineHandle;
use crate::events::{EngineEvent, EventFanout, TakerOrderDetails};
use crate::price::Price;
use crate::types::Side;

const AUTOTRADER_CLIENT: &str = "AutoTrader";
const STEP_INTERVAL: Duration = Duration::from_millis(500);
const ERROR_BACKOFF: Duration = Duration::from_secs(5);

/// Shared on/off switch for the simulator loop. Only `set_active` mutates
/// it; the loop itself only ever reads it.
#[derive(Clone, Default)]
pub struct SimulatorControl {
    active: Arc<AtomicBool>,
}

impl SimulatorControl {
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    pub fn set_active(&self, active: bool) {
        self.active.store(active, Ordering::SeqCst);
    }
}

pub struct Simulator {
    engine: EngineHandle,
    fanout: Arc<EventFanout>,
    control: SimulatorControl,
}

impl Simulator {
    pub fn new(engine: EngineHandle, fanout: Arc<EventFanout>) -> Self {
        Self { engine, fanout, control: SimulatorControl::default() }
    }

    pub fn control(&self) -> SimulatorControl {
        self.control.clone()
    }

    /// Spawns the generator loop. Dropping the returned `JoinHandle` (or
    /// calling `.abort()` on it) is how a caller asks it to stop; it exits
    /// promptly at its next suspension point.
    pub fn spawn(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(self.run())
    }

    async fn run(self) {
        let mut last_reference_mid = Decimal::from(100);
        loop {
            tokio::time::sleep(STEP_INTERVAL).await;
            if !self.control.is_active() {
                continue;
            }

            match self.step(last_reference_mid).await {
                Ok(new_reference) => last_reference_mid = new_reference,
                Err(err) => {
                    error!(%err, "simulator step failed, backing off");
                    tokio::time::sleep(ERROR_BACKOFF).await;
                }
            }
        }
    }

    /// Runs one iteration: derive a reference price, draw a random order,
    /// place it, and broadcast the resulting book state. Returns the
    /// reference mid price used, so the caller can carry it forward when
    /// the book is empty on both sides.
    async fn step(&self, last_reference_mid: Decimal) -> Result<Decimal, String> {
        let best_bid = self.engine.best_bid().await.map_err(|e| e.to_string())?;
        let best_ask = self.engine.best_ask().await.map_err(|e| e.to_string())?;

        let reference = match (best_bid, best_ask) {
            (Some(bid), Some(ask)) => (bid.as_decimal() + ask.as_decimal()) / Decimal::from(2),
            (Some(bid), None) => bid.as_decimal() + Decimal::new(1, 2),
            (None, Some(ask)) => ask.as_decimal() - Decimal::new(1, 2),
            (None, None) => last_reference_mid,
        };

        let (side, order_price, volume) = {
            let mut rng = rand::thread_rng();
            let side = if rng.gen_bool(0.5) { Side::Buy } else { Side::Sell };
            let normal = Normal::new(0.0, 0.25).map_err(|e| e.to_string())?;
            let offset = normal.sample(&mut rng);
            let reference_f64 = reference.to_f64().ok_or("reference price out of range")?;
            let raw_price = reference_f64 + offset;
            let rounded = Decimal::from_f64_retain(raw_price)
                .unwrap_or(reference)
                .round_dp(2);
            let price = rounded.max(Decimal::new(1, 2));
            let volume = rng.gen_range(5..=25u64);
            (side, price, volume)
        };

        let (order_id, trades) = self
            .engine
            .place(AUTOTRADER_CLIENT.to_string(), side, Price(order_price), volume)
            .await
            .map_err(|e| e.to_string())?;

        info!(order_id, ?side, %order_price, volume, trades = trades.len(), "simulator placed order");

        let snapshot = self.engine.snapshot(15).await.map_err(|e| e.to_string())?;
        let taker_order_details = self
            .engine
            .resting_order(order_id)
            .await
            .map_err(|e| e.to_string())?
            .map(|(side, price, volume)| TakerOrderDetails {
                order_id,
                client: AUTOTRADER_CLIENT.to_string(),
                side,
                price,
                volume,
                timestamp: chrono::Utc::now().timestamp_millis(),
            });

        self.fanout.broadcast(EngineEvent::OrderBookUpdate {
            depth_snapshot: snapshot.into(),
            taker_order_details,
            trades: if trades.is_empty() { None } else { Some(trades) },
            cancelled_order_id: None,
        });

        Ok(reference)
    }
}
