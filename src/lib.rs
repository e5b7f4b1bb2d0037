//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// A single-symbol limit order book matching engine with price-time
// priority, continuous matching, active cancellation, depth snapshots, a
// mid-price history ring, an event fanout for live observers, and a
// bounded stochastic order generator for demo/load purposes.
//--------------------------------------------------------------------------------------------------

pub mod api;
pub mod book_side;
pub mod config;
pub mod engine;
pub mod engine_handle;
pub mod events;
pub mod ids;
pub mod price;
pub mod price_level;
pub mod simulator;
pub mod types;

pub use config::Config;
pub use engine::{DepthSnapshot, EngineError, MatchingEngine};
pub use engine_handle::EngineHandle;
pub use events::{EngineEvent, EventFanout};
pub use price::Price;
pub use simulator::{Simulator, SimulatorControl};
pub use types::{OrderRecord, PricePoint, Side, TradeEvent};
