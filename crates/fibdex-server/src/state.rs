//! Shared handler state and collaborator wiring.

use std::sync::Arc;

use fibdex_core::{
    BroadcastChannel, MemoryCache, ReadReconciler, SchemaInitializer, ServiceConfig,
    SqliteDurableStore, WriteCoordinator,
};

/// Shared state for route handlers.
#[derive(Clone)]
pub struct AppState {
    pub writer: Arc<WriteCoordinator>,
    pub reader: Arc<ReadReconciler>,
}

impl AppState {
    pub fn new(writer: WriteCoordinator, reader: ReadReconciler) -> Self {
        Self {
            writer: Arc::new(writer),
            reader: Arc::new(reader),
        }
    }
}

/// Process-wide collaborators, built once and shared by every request.
///
/// Cache and event channel live in-process, so the binary alone never
/// replaces [`fibdex_core::PLACEHOLDER`]. A worker has to be embedded in the
/// same process: subscribe to `channel` and write computed values back
/// through `cache`.
pub struct Services {
    pub state: AppState,
    pub schema: Arc<SchemaInitializer>,
    pub cache: Arc<MemoryCache>,
    pub durable: Arc<SqliteDurableStore>,
    /// Workers subscribe here for insert events.
    pub channel: Arc<BroadcastChannel>,
}

impl Services {
    pub fn build(config: &ServiceConfig) -> Self {
        let cache = Arc::new(MemoryCache::new());
        let durable = Arc::new(SqliteDurableStore::new(config.database.clone()));
        let channel = Arc::new(BroadcastChannel::new(config.channel_capacity));

        let schema = Arc::new(SchemaInitializer::with_policy(
            durable.clone(),
            config.schema_retry,
        ));
        let writer = WriteCoordinator::new(cache.clone(), channel.clone(), durable.clone());
        let reader = ReadReconciler::new(cache.clone(), durable.clone());

        Self {
            state: AppState::new(writer, reader),
            schema,
            cache,
            durable,
            channel,
        }
    }
}
