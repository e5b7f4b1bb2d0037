//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// | Handler            | Endpoint                  |
// |--------------------|---------------------------|
// | root               | GET  /                    |
// | create_order       | POST /order               |
// | cancel_order       | DELETE /order/:id         |
// | depth_snapshot     | GET  /lob                 |
// | trade_log          | GET  /trades              |
// | price_history      | GET  /price_history       |
// | simulator_status   | GET  /simulator/status    |
// | simulator_toggle   | POST /simulator/toggle    |
//--------------------------------------------------------------------------------------------------

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::info;

use super::dto::{
    CancelOrderResponse, CreateOrderRequest, CreateOrderResponse, DepthQuery, DepthResponse,
    PriceHistoryResponse, RootResponse, SimulatorStatusResponse, SimulatorToggleRequest,
    TradesQuery, TradesResponse,
};
use super::error::{ApiError, ApiResult};
use super::AppState;
use crate::events::{EngineEvent, TakerOrderDetails};

const DEFAULT_DEPTH_LEVELS: usize = 5;
const MAX_DEPTH_LEVELS: usize = 50;
const DEFAULT_TRADES_LIMIT: usize = 50;

pub async fn root() -> Json<RootResponse> {
    Json(RootResponse { message: "Welcome to the limit order book matching engine.".to_string() })
}

pub async fn create_order(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateOrderRequest>,
) -> ApiResult<(StatusCode, Json<CreateOrderResponse>)> {
    let client = req.client.clone();
    let (order_id, trades) = state.engine.place(client, req.side, req.price, req.volume).await?;

    info!(order_id, trades = trades.len(), "order placed");

    let snapshot = state.engine.snapshot(15).await?;
    let taker_order_details =
        state.engine.resting_order(order_id).await?.map(|(side, price, volume)| {
            TakerOrderDetails {
                order_id,
                client: req.client.clone(),
                side,
                price,
                volume,
                timestamp: chrono::Utc::now().timestamp_millis(),
            }
        });
    state.fanout.broadcast(EngineEvent::OrderBookUpdate {
        depth_snapshot: snapshot.into(),
        taker_order_details,
        trades: if trades.is_empty() { None } else { Some(trades.clone()) },
        cancelled_order_id: None,
    });

    Ok((
        StatusCode::CREATED,
        Json(CreateOrderResponse {
            message: "Order received and processed.".to_string(),
            order_id,
            trades_executed: trades,
        }),
    ))
}

pub async fn cancel_order(
    State(state): State<Arc<AppState>>,
    Path(order_id): Path<u64>,
) -> ApiResult<Json<CancelOrderResponse>> {
    if !state.engine.cancel(order_id).await? {
        return Err(ApiError::NotFound(format!(
            "order {order_id} not found or cannot be cancelled"
        )));
    }

    info!(order_id, "order cancelled");

    let snapshot = state.engine.snapshot(15).await?;
    state.fanout.broadcast(EngineEvent::OrderBookUpdate {
        depth_snapshot: snapshot.into(),
        taker_order_details: None,
        trades: None,
        cancelled_order_id: Some(order_id),
    });

    Ok(Json(CancelOrderResponse { message: "Order cancelled successfully.".to_string(), order_id }))
}

pub async fn depth_snapshot(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DepthQuery>,
) -> ApiResult<Json<DepthResponse>> {
    let levels = query.levels.unwrap_or(DEFAULT_DEPTH_LEVELS);
    if levels < 1 || levels > MAX_DEPTH_LEVELS {
        return Err(ApiError::BadRequest(format!(
            "levels must be between 1 and {MAX_DEPTH_LEVELS}"
        )));
    }

    let snapshot = state.engine.snapshot(levels).await?;
    let dto: crate::events::DepthSnapshotDto = snapshot.into();
    Ok(Json(DepthResponse { bids: dto.bids, asks: dto.asks }))
}

pub async fn trade_log(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TradesQuery>,
) -> ApiResult<Json<TradesResponse>> {
    let limit = query.limit.unwrap_or(DEFAULT_TRADES_LIMIT);
    Ok(Json(TradesResponse { trades: state.engine.trades(limit).await? }))
}

pub async fn price_history(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<PriceHistoryResponse>> {
    Ok(Json(PriceHistoryResponse { history: state.engine.price_history().await? }))
}

pub async fn simulator_status(State(state): State<Arc<AppState>>) -> Json<SimulatorStatusResponse> {
    Json(SimulatorStatusResponse { active: state.simulator_control.is_active() })
}

pub async fn simulator_toggle(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SimulatorToggleRequest>,
) -> Json<SimulatorStatusResponse> {
    state.simulator_control.set_active(req.active);
    info!(active = req.active, "simulator toggled");
    Json(SimulatorStatusResponse { active: state.simulator_control.is_active() })
}
