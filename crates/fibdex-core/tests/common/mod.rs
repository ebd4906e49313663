#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use fibdex_core::{CacheStore, DurableRow, DurableStore, EventChannel, StoreError, StoreResult};
use tokio::sync::Notify;

/// Durable store whose every operation fails.
pub struct DownDurable;

#[async_trait]
impl DurableStore for DownDurable {
    async fn create_table_if_absent(&self) -> StoreResult<()> {
        Err(StoreError::SchemaInit {
            message: "connection refused".into(),
        })
    }

    async fn insert(&self, _number: i64) -> StoreResult<()> {
        Err(StoreError::DurableUnavailable {
            message: "connection refused".into(),
        })
    }

    async fn select_all(&self) -> StoreResult<Vec<DurableRow>> {
        Err(StoreError::DurableUnavailable {
            message: "connection refused".into(),
        })
    }
}

/// Cache whose every operation fails.
pub struct DownCache;

#[async_trait]
impl CacheStore for DownCache {
    async fn set_entry(&self, _key: &str, _value: &str) -> StoreResult<()> {
        Err(StoreError::CacheUnavailable {
            message: "connection reset".into(),
        })
    }

    async fn keys(&self) -> StoreResult<Vec<String>> {
        Err(StoreError::CacheUnavailable {
            message: "connection reset".into(),
        })
    }

    async fn entries(&self) -> StoreResult<HashMap<String, String>> {
        Err(StoreError::CacheUnavailable {
            message: "connection reset".into(),
        })
    }
}

/// Event channel whose publish always fails.
pub struct DownChannel;

#[async_trait]
impl EventChannel for DownChannel {
    async fn publish(&self, _topic: &str, _payload: &str) -> StoreResult<usize> {
        Err(StoreError::ChannelUnavailable {
            message: "broken pipe".into(),
        })
    }
}

/// In-memory table that only accepts inserts once created, and refuses the
/// first `failing_creates` create attempts.
pub struct FlakyTable {
    rows: Mutex<Option<Vec<i64>>>,
    failing_creates: AtomicU32,
    pub create_calls: AtomicU32,
}

impl FlakyTable {
    pub fn new(failing_creates: u32) -> Self {
        Self {
            rows: Mutex::new(None),
            failing_creates: AtomicU32::new(failing_creates),
            create_calls: AtomicU32::new(0),
        }
    }
}

#[async_trait]
impl DurableStore for FlakyTable {
    async fn create_table_if_absent(&self) -> StoreResult<()> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        let remaining = self.failing_creates.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failing_creates.store(remaining - 1, Ordering::SeqCst);
            return Err(StoreError::SchemaInit {
                message: "database is starting up".into(),
            });
        }
        let mut rows = self.rows.lock().unwrap();
        if rows.is_none() {
            *rows = Some(Vec::new());
        }
        Ok(())
    }

    async fn insert(&self, number: i64) -> StoreResult<()> {
        match self.rows.lock().unwrap().as_mut() {
            Some(rows) => {
                rows.push(number);
                Ok(())
            }
            None => Err(StoreError::DurableUnavailable {
                message: "relation \"values\" does not exist".into(),
            }),
        }
    }

    async fn select_all(&self) -> StoreResult<Vec<DurableRow>> {
        match self.rows.lock().unwrap().as_ref() {
            Some(rows) => Ok(rows.iter().map(|&number| DurableRow { number }).collect()),
            None => Err(StoreError::DurableUnavailable {
                message: "relation \"values\" does not exist".into(),
            }),
        }
    }
}

/// Durable store whose inserts hold until `release` is notified.
pub struct GatedDurable {
    pub release: Notify,
    pub inserts_started: AtomicU32,
    rows: Mutex<Vec<i64>>,
}

impl GatedDurable {
    pub fn new() -> Self {
        Self {
            release: Notify::new(),
            inserts_started: AtomicU32::new(0),
            rows: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl DurableStore for GatedDurable {
    async fn create_table_if_absent(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn insert(&self, number: i64) -> StoreResult<()> {
        self.inserts_started.fetch_add(1, Ordering::SeqCst);
        self.release.notified().await;
        self.rows.lock().unwrap().push(number);
        Ok(())
    }

    async fn select_all(&self) -> StoreResult<Vec<DurableRow>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .map(|&number| DurableRow { number })
            .collect())
    }
}
