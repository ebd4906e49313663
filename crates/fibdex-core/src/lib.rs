//! Dual-store write/read path for index submissions.
//!
//! A submitted index is written to a cache projection, announced on an
//! event channel for an external worker, and appended to a durable store.
//! None of the three writes share a transaction:
//!
//! - the cache write is what the caller can rely on right after acceptance
//! - the publish and the durable insert are best-effort and only logged on failure
//! - reads prefer the durable store and fall back to the cache projection
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use fibdex_core::{
//!     BroadcastChannel, MemoryCache, ReadReconciler, SchemaInitializer, SqliteDurableStore,
//!     WriteCoordinator,
//! };
//!
//! # async fn example() -> anyhow::Result<()> {
//! let cache = Arc::new(MemoryCache::new());
//! let durable = Arc::new(SqliteDurableStore::in_memory());
//! let channel = Arc::new(BroadcastChannel::new(64));
//!
//! Arc::new(SchemaInitializer::new(durable.clone())).spawn();
//!
//! let writer = WriteCoordinator::new(cache.clone(), channel, durable.clone());
//! writer.submit(&serde_json::json!(5)).await?;
//!
//! let reader = ReadReconciler::new(cache, durable);
//! let all = reader.read_all().await;
//! println!("{} rows from {:?}", all.rows.len(), all.source);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod coordinator;
pub mod error;
pub mod model;
pub mod reconciler;
pub mod schema;
pub mod store;

pub use config::{DatabaseTarget, ServiceConfig};
pub use coordinator::{Accepted, WriteCoordinator};
pub use error::{StoreError, StoreResult, ValidationError};
pub use model::{DurableRow, Index, INSERT_TOPIC, MAX_INDEX, PLACEHOLDER, VALUES_TABLE};
pub use reconciler::{ReadReconciler, ReadSource, Reconciled};
pub use schema::{RetryPolicy, SchemaInitializer, SchemaState};
pub use store::{
    BroadcastChannel, CacheStore, ChannelEvent, DurableStore, EventChannel, MemoryCache,
    SqliteDurableStore,
};
