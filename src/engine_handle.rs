//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// The single-writer concurrency discipline: a dedicated task owns the one
// `MatchingEngine` value exclusively and processes commands one at a time
// off an mpsc channel, replying per-command over a oneshot channel. HTTP
// handlers and the Simulator both hold cheap `Clone`s of `EngineHandle` and
// never touch the engine directly, so mutations never interleave.
//--------------------------------------------------------------------------------------------------

use tokio::sync::{mpsc, oneshot};
use tracing::error;

use crate::engine::{DepthSnapshot, EngineError, MatchingEngine};
use crate::price::Price;
use crate::types::{PricePoint, Side, TradeEvent};

enum Command {
    Place {
        client: String,
        side: Side,
        price: Price,
        volume: u64,
        reply: oneshot::Sender<Result<(u64, Vec<TradeEvent>), EngineError>>,
    },
    Cancel {
        order_id: u64,
        reply: oneshot::Sender<bool>,
    },
    BestBid(oneshot::Sender<Option<Price>>),
    BestAsk(oneshot::Sender<Option<Price>>),
    Snapshot {
        levels: usize,
        reply: oneshot::Sender<DepthSnapshot>,
    },
    VolumeAt {
        price: Price,
        side: Side,
        reply: oneshot::Sender<u64>,
    },
    PriceHistory(oneshot::Sender<Vec<PricePoint>>),
    Trades {
        limit: usize,
        reply: oneshot::Sender<Vec<TradeEvent>>,
    },
    RestingOrder {
        order_id: u64,
        reply: oneshot::Sender<Option<(Side, Price, u64)>>,
    },
}

/// A cheaply cloneable front-end to the engine's worker task. Every method
/// sends a command and awaits its one-shot reply. If the worker task is gone
/// (send fails) or drops the reply sender without answering (the task
/// panicked mid-command), the call reports `EngineError::Unavailable`
/// instead of panicking the caller — a single bad command must not take
/// down every other caller sharing the handle.
#[derive(Clone)]
pub struct EngineHandle {
    commands: mpsc::Sender<Command>,
}

impl EngineHandle {
    /// Spawns the engine's worker task and returns a handle to it.
    pub fn spawn(history_limit: usize) -> Self {
        let (tx, rx) = mpsc::channel(1024);
        tokio::spawn(run(MatchingEngine::new(history_limit), rx));
        Self { commands: tx }
    }

    pub async fn place(
        &self,
        client: String,
        side: Side,
        price: Price,
        volume: u64,
    ) -> Result<(u64, Vec<TradeEvent>), EngineError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Place { client, side, price, volume, reply }).await?;
        self.recv(rx).await?
    }

    pub async fn cancel(&self, order_id: u64) -> Result<bool, EngineError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Cancel { order_id, reply }).await?;
        self.recv(rx).await
    }

    pub async fn best_bid(&self) -> Result<Option<Price>, EngineError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::BestBid(reply)).await?;
        self.recv(rx).await
    }

    pub async fn best_ask(&self) -> Result<Option<Price>, EngineError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::BestAsk(reply)).await?;
        self.recv(rx).await
    }

    pub async fn snapshot(&self, levels: usize) -> Result<DepthSnapshot, EngineError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Snapshot { levels, reply }).await?;
        self.recv(rx).await
    }

    pub async fn volume_at(&self, price: Price, side: Side) -> Result<u64, EngineError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::VolumeAt { price, side, reply }).await?;
        self.recv(rx).await
    }

    pub async fn price_history(&self) -> Result<Vec<PricePoint>, EngineError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::PriceHistory(reply)).await?;
        self.recv(rx).await
    }

    pub async fn trades(&self, limit: usize) -> Result<Vec<TradeEvent>, EngineError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Trades { limit, reply }).await?;
        self.recv(rx).await
    }

    pub async fn resting_order(
        &self,
        order_id: u64,
    ) -> Result<Option<(Side, Price, u64)>, EngineError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::RestingOrder { order_id, reply }).await?;
        self.recv(rx).await
    }

    async fn send(&self, command: Command) -> Result<(), EngineError> {
        self.commands.send(command).await.map_err(|_| {
            error!("engine worker task is gone; rejecting command");
            EngineError::Unavailable("engine worker task is gone".to_string())
        })
    }

    async fn recv<T>(&self, rx: oneshot::Receiver<T>) -> Result<T, EngineError> {
        rx.await.map_err(|_| {
            error!("engine worker task dropped its reply sender");
            EngineError::Unavailable("engine worker task dropped its reply sender".to_string())
        })
    }
}

/// The worker loop: owns `engine` exclusively and applies one command at a
/// time, in arrival order, which is what makes every mutation atomic from
/// every caller's point of view.
async fn run(mut engine: MatchingEngine, mut commands: mpsc::Receiver<Command>) {
    while let Some(command) = commands.recv().await {
        match command {
            Command::Place { client, side, price, volume, reply } => {
                let _ = reply.send(engine.place(client, side, price, volume));
            }
            Command::Cancel { order_id, reply } => {
                let _ = reply.send(engine.cancel(order_id));
            }
            Command::BestBid(reply) => {
                let _ = reply.send(engine.best_bid());
            }
            Command::BestAsk(reply) => {
                let _ = reply.send(engine.best_ask());
            }
            Command::Snapshot { levels, reply } => {
                let _ = reply.send(engine.snapshot(levels));
            }
            Command::VolumeAt { price, side, reply } => {
                let _ = reply.send(engine.volume_at(price, side));
            }
            Command::PriceHistory(reply) => {
                let _ = reply.send(engine.price_history());
            }
            Command::Trades { limit, reply } => {
                let _ = reply.send(engine.trades(limit));
            }
            Command::RestingOrder { order_id, reply } => {
                let _ = reply.send(engine.resting_order(order_id));
            }
        }
    }
}
