//! Collaborator seams: cache projection, durable log and event channel.
//!
//! The coordinator and reconciler only see these traits, so each engine can
//! be swapped (or replaced by a failing fake in tests) without touching the
//! write/read path.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::model::DurableRow;

mod channel;
mod memory;
mod sqlite;

pub use channel::{BroadcastChannel, ChannelEvent};
pub use memory::MemoryCache;
pub use sqlite::SqliteDurableStore;

/// Key-value hash holding the projection of index -> value.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Write one entry. Last write wins.
    async fn set_entry(&self, key: &str, value: &str) -> StoreResult<()>;

    /// All keys, in no particular order.
    async fn keys(&self) -> StoreResult<Vec<String>>;

    /// The full projection.
    async fn entries(&self) -> StoreResult<HashMap<String, String>>;
}

/// Append-only relational log of accepted submissions.
#[async_trait]
pub trait DurableStore: Send + Sync {
    /// Create the values table. A no-op when it already exists.
    async fn create_table_if_absent(&self) -> StoreResult<()>;

    /// Append one row. Duplicates are kept.
    async fn insert(&self, number: i64) -> StoreResult<()>;

    /// Full scan of the table.
    async fn select_all(&self) -> StoreResult<Vec<DurableRow>>;
}

/// Publish side of a pub/sub bus.
#[async_trait]
pub trait EventChannel: Send + Sync {
    /// Publish `payload` on `topic`, returning how many subscribers got it.
    async fn publish(&self, topic: &str, payload: &str) -> StoreResult<usize>;
}
