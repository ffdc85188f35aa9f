//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::models::IdFormat;

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of orders the cache can hold
    pub cache_size: usize,
    /// HTTP server port
    pub http_port: u16,
    /// Number of orders returned by the recent orders endpoint
    pub recent_orders_limit: usize,
    /// Accepted format for order identifiers
    pub order_id_format: IdFormat,
    /// Pause after a failed stream receive before trying again
    pub receive_backoff: Duration,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_SIZE` - Maximum cached orders (default: 100, zero is ignored)
    /// - `HTTP_PORT` - HTTP server port (default: 8081)
    /// - `RECENT_ORDERS_LIMIT` - Size of the recent orders list (default: 10)
    /// - `ORDER_ID_FORMAT` - `uuid` or `token` (default: uuid)
    /// - `RECEIVE_BACKOFF_MS` - Delay after a stream error (default: 100)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cache_size: env_parse::<usize>("CACHE_SIZE")
                .filter(|size| *size > 0)
                .unwrap_or(defaults.cache_size),
            http_port: env_parse("HTTP_PORT").unwrap_or(defaults.http_port),
            recent_orders_limit: env_parse("RECENT_ORDERS_LIMIT")
                .unwrap_or(defaults.recent_orders_limit),
            order_id_format: env_parse("ORDER_ID_FORMAT").unwrap_or(defaults.order_id_format),
            receive_backoff: env_parse("RECEIVE_BACKOFF_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.receive_backoff),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_size: 100,
            http_port: 8081,
            recent_orders_limit: 10,
            order_id_format: IdFormat::Uuid,
            receive_backoff: Duration::from_millis(100),
        }
    }
}

fn env_parse<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
