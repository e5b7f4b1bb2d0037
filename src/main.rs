//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// Entry point: initializes logging, reads configuration, spawns the engine
// worker task and the event fanout, starts the simulator, and serves the
// HTTP/WebSocket API until shutdown.
//--------------------------------------------------------------------------------------------------

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;

use lob_engine::api::Api;
use lob_engine::{Config, EngineHandle, EventFanout, Simulator};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env();
    info!(?config, "starting limit order book matching engine");

    let engine = EngineHandle::spawn(config.history_limit);
    let fanout = Arc::new(EventFanout::new());

    let simulator = Simulator::new(engine.clone(), fanout.clone());
    let simulator_control = simulator.control();
    simulator.spawn();

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let api = Api::new(addr, engine, fanout, simulator_control);
    api.serve().await
}
