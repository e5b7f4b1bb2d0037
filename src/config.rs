//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// Environment-driven configuration: history ring capacity and listening
// port, each falling back to a sane default when unset.
//--------------------------------------------------------------------------------------------------

use std::env;

const HISTORY_LIMIT: &str = "HISTORY_LIMIT";
const PORT: &str = "PORT";

const DEFAULT_HISTORY_LIMIT: usize = 200;
const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Clone)]
pub struct Config {
    /// Capacity of the mid-price history ring.
    pub history_limit: usize,
    /// Listening port for the HTTP/WebSocket server.
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Self {
        let history_limit = env::var(HISTORY_LIMIT)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_HISTORY_LIMIT);

        let port = env::var(PORT)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        Self { history_limit, port }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self { history_limit: DEFAULT_HISTORY_LIMIT, port: DEFAULT_PORT }
    }
}
