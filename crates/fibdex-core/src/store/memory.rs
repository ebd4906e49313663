use std::collections::HashMap;

use async_trait::async_trait;
use moka::sync::Cache;

use super::CacheStore;
use crate::error::StoreResult;

/// In-process cache projection.
///
/// Unbounded, so entries are only ever replaced, never evicted.
#[derive(Clone)]
pub struct MemoryCache {
    values: Cache<String, String>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self {
            values: Cache::builder().build(),
        }
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn set_entry(&self, key: &str, value: &str) -> StoreResult<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn keys(&self) -> StoreResult<Vec<String>> {
        Ok(self.values.iter().map(|(k, _)| (*k).clone()).collect())
    }

    async fn entries(&self) -> StoreResult<HashMap<String, String>> {
        Ok(self
            .values
            .iter()
            .map(|(k, v)| ((*k).clone(), v))
            .collect())
    }
}
