//! Read path: durable-first listing with cache fallback, and the raw cache view.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::StoreResult;
use crate::model::DurableRow;
use crate::store::{CacheStore, DurableStore};

/// Which store answered a [`ReadReconciler::read_all`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadSource {
    Durable,
    Cache,
    /// Durable path unusable and the cache failed too.
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    pub source: ReadSource,
    pub rows: Vec<DurableRow>,
}

/// Answers reads from the two stores without ever merging them.
#[derive(Clone)]
pub struct ReadReconciler {
    cache: Arc<dyn CacheStore>,
    durable: Arc<dyn DurableStore>,
}

impl ReadReconciler {
    pub fn new(cache: Arc<dyn CacheStore>, durable: Arc<dyn DurableStore>) -> Self {
        Self { cache, durable }
    }

    /// Every known index.
    ///
    /// Non-empty durable rows always win. A failed or empty scan falls back to
    /// one entry per cache key. Errors are logged and never returned.
    pub async fn read_all(&self) -> Reconciled {
        match self.durable.select_all().await {
            Ok(rows) if !rows.is_empty() => {
                debug!(rows = rows.len(), "read_all answered from durable store");
                return Reconciled {
                    source: ReadSource::Durable,
                    rows,
                };
            }
            Ok(_) => debug!("durable store empty, falling back to cache"),
            Err(e) => warn!(error = %e, "durable scan failed, falling back to cache"),
        }

        match self.cache.keys().await {
            Ok(keys) => Reconciled {
                source: ReadSource::Cache,
                rows: rows_from_keys(keys),
            },
            Err(e) => {
                warn!(error = %e, "cache key scan failed, answering empty");
                Reconciled {
                    source: ReadSource::Empty,
                    rows: Vec::new(),
                }
            }
        }
    }

    /// The live cache projection. No durable fallback; a cache failure is
    /// logged and handed back for the caller to pass through.
    pub async fn read_current(&self) -> StoreResult<HashMap<String, String>> {
        self.cache.entries().await.inspect_err(|e| {
            warn!(error = %e, "cache read failed");
        })
    }
}

fn rows_from_keys(keys: Vec<String>) -> Vec<DurableRow> {
    keys.into_iter()
        .filter_map(|key| match key.trim().parse::<i64>() {
            Ok(number) => Some(DurableRow { number }),
            Err(_) => {
                warn!(key = %key, "skipping non-numeric cache key");
                None
            }
        })
        .collect()
}
