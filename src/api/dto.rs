//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// Request/response wire types for the HTTP surface.
//--------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use crate::events::DepthLevelDto;
use crate::price::Price;
use crate::types::{PricePoint, Side, TradeEvent};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrderRequest {
    pub client: String,
    pub side: Side,
    pub price: Price,
    pub volume: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateOrderResponse {
    pub message: String,
    pub order_id: u64,
    pub trades_executed: Vec<TradeEvent>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CancelOrderResponse {
    pub message: String,
    pub order_id: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DepthQuery {
    pub levels: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DepthResponse {
    pub bids: Vec<DepthLevelDto>,
    pub asks: Vec<DepthLevelDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TradesQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TradesResponse {
    pub trades: Vec<TradeEvent>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PriceHistoryResponse {
    pub history: Vec<PricePoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatorStatusResponse {
    pub active: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimulatorToggleRequest {
    pub active: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RootResponse {
    pub message: String,
}
