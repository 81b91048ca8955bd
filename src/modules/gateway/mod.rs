//! Remote table gateway
//!
//! Generic table-scoped CRUD against the hosted data store. Entity
//! services never build requests themselves; they go through
//! [`TableGateway`] (usually via the typed [`Table`] repository).

mod query;
mod rest_client;
mod table;

use async_trait::async_trait;
use serde_json::Value;

pub use query::{Filter, Order, SelectQuery, SortDirection};
pub use rest_client::RestGateway;
pub use table::{Record, Table};

/// Failure reported by the gateway (the `error` half of `{data, error}`)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("HTTP {status}: {message}")]
    Remote { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),
}

impl GatewayError {
    pub fn message(&self) -> &str {
        match self {
            GatewayError::Transport(msg) => msg,
            GatewayError::Remote { message, .. } => message,
            GatewayError::Parse(msg) => msg,
        }
    }
}

pub type GatewayResult<T> = std::result::Result<T, GatewayError>;

/// Table-scoped operations exposed by the hosted store.
///
/// Rows travel as JSON objects. Uniqueness, cascades and concurrent
/// write resolution belong to the backing store.
#[async_trait]
pub trait TableGateway: Send + Sync {
    async fn select(&self, table: &str, query: &SelectQuery) -> GatewayResult<Vec<Value>>;

    /// Insert rows and return them as stored
    async fn insert(&self, table: &str, rows: Vec<Value>) -> GatewayResult<Vec<Value>>;

    /// Apply `patch` to every row matching `filters`, returning the updated rows
    async fn update(&self, table: &str, patch: Value, filters: &[Filter])
        -> GatewayResult<Vec<Value>>;

    async fn delete(&self, table: &str, filters: &[Filter]) -> GatewayResult<()>;
}
