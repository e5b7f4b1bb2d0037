//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// This module implements a REST + WebSocket API using Axum for the matching
// engine. It provides endpoints for order management, market data, the
// simulator toggle, and the live push channel.
//
// | Component | Description                                  |
// |-----------|-----------------------------------------------|
// | API       | Main API structure coordinating routes        |
// | Routes    | Handler functions for API endpoints           |
// | AppState  | Shared application state                      |
// | DTOs      | Data transfer objects for API requests/responses |
//--------------------------------------------------------------------------------------------------

mod dto;
mod error;
mod routes;
mod ws;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::Method;
use axum::routing::{delete, get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::engine_handle::EngineHandle;
use crate::events::EventFanout;
use crate::simulator::SimulatorControl;

pub use error::{ApiError, ApiResult};

/// Shared application state accessible by all handlers.
pub struct AppState {
    pub engine: EngineHandle,
    pub fanout: Arc<EventFanout>,
    pub simulator_control: SimulatorControl,
}

/// Main API structure.
pub struct Api {
    addr: SocketAddr,
    state: Arc<AppState>,
}

impl Api {
    pub fn new(
        addr: SocketAddr,
        engine: EngineHandle,
        fanout: Arc<EventFanout>,
        simulator_control: SimulatorControl,
    ) -> Self {
        let state = Arc::new(AppState { engine, fanout, simulator_control });
        Self { addr, state }
    }

    /// Creates all routes for the API.
    pub fn routes(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers(Any);

        Router::new()
            .route("/", get(routes::root))
            .route("/order", post(routes::create_order))
            .route("/order/:id", delete(routes::cancel_order))
            .route("/lob", get(routes::depth_snapshot))
            .route("/trades", get(routes::trade_log))
            .route("/price_history", get(routes::price_history))
            .route("/simulator/status", get(routes::simulator_status))
            .route("/simulator/toggle", post(routes::simulator_toggle))
            .route("/ws", get(ws::websocket_handler))
            .with_state(self.state.clone())
            .layer(TraceLayer::new_for_http())
            .layer(cors)
    }

    /// Starts the API server and runs until shutdown.
    pub async fn serve(self) -> Result<(), std::io::Error> {
        let addr = self.addr;
        let app = self.routes();

        info!(%addr, "API listening");
        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, app).await
    }
}
