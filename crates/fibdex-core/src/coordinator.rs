//! Write path: validate a submission and fan it out to the three collaborators.

use std::sync::Arc;

use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::ValidationError;
use crate::model::{Index, INSERT_TOPIC, PLACEHOLDER};
use crate::store::{CacheStore, DurableStore, EventChannel};

/// An accepted submission.
///
/// Acceptance means "dispatched for processing", not "durably persisted".
#[derive(Debug)]
pub struct Accepted {
    pub index: Index,
    /// Background durable insert. Callers normally drop it; the task keeps
    /// running and logs its own failure.
    pub persisted: JoinHandle<()>,
}

/// Dispatches submissions to cache, event channel and durable store.
#[derive(Clone)]
pub struct WriteCoordinator {
    cache: Arc<dyn CacheStore>,
    channel: Arc<dyn EventChannel>,
    durable: Arc<dyn DurableStore>,
}

impl WriteCoordinator {
    pub fn new(
        cache: Arc<dyn CacheStore>,
        channel: Arc<dyn EventChannel>,
        durable: Arc<dyn DurableStore>,
    ) -> Self {
        Self {
            cache,
            channel,
            durable,
        }
    }

    /// Validate `raw` and dispatch it.
    ///
    /// A validation failure contacts no collaborator. Otherwise the cache
    /// entry is written before returning, so a following read of the cache
    /// projection sees it; cache and publish failures are logged and dropped.
    /// The durable insert runs on its own task and is never awaited here.
    pub async fn submit(&self, raw: &Value) -> Result<Accepted, ValidationError> {
        let index = match Index::from_json(raw) {
            Ok(index) => index,
            Err(e) => {
                info!(index = %e.raw(), reason = %e, "rejecting submission");
                return Err(e);
            }
        };

        info!(%index, "storing index");
        let key = index.cache_key();

        if let Err(e) = self.cache.set_entry(&key, PLACEHOLDER).await {
            warn!(error = %e, %index, "cache write failed");
        }

        match self.channel.publish(INSERT_TOPIC, &key).await {
            Ok(delivered) => debug!(%index, delivered, "published insert event"),
            Err(e) => warn!(error = %e, %index, "publish failed"),
        }

        let durable = Arc::clone(&self.durable);
        let number = i64::from(index.get());
        let persisted = tokio::spawn(async move {
            if let Err(e) = durable.insert(number).await {
                warn!(error = %e, index = number, "durable insert failed, dropping row");
            }
        });

        Ok(Accepted { index, persisted })
    }
}
