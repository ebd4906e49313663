//! SQLite-backed durable log.
//!
//! The connection is opened on first use rather than at construction, so an
//! unreachable database surfaces as a failed operation (and is retried on the
//! next one) instead of preventing startup.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use rusqlite::{params, Connection};
use tracing::info;

use super::DurableStore;
use crate::config::DatabaseTarget;
use crate::error::{StoreError, StoreResult};
use crate::model::{DurableRow, VALUES_TABLE};

/// SQLite-backed durable store.
#[derive(Clone)]
pub struct SqliteDurableStore {
    target: DatabaseTarget,
    conn: Arc<Mutex<Option<Connection>>>,
}

impl SqliteDurableStore {
    pub fn new(target: DatabaseTarget) -> Self {
        Self {
            target,
            conn: Arc::new(Mutex::new(None)),
        }
    }

    /// File-backed store.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::new(DatabaseTarget::File(path.into()))
    }

    /// In-memory store (for testing).
    pub fn in_memory() -> Self {
        Self::new(DatabaseTarget::Memory)
    }

    /// Whether a connection has been established.
    pub fn is_connected(&self) -> bool {
        self.conn.lock().map(|c| c.is_some()).unwrap_or(false)
    }

    async fn with_conn<T, F>(&self, f: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> StoreResult<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        let target = self.target.clone();

        tokio::task::spawn_blocking(move || {
            let mut guard = conn.lock().map_err(|_| StoreError::DurableUnavailable {
                message: "connection lock poisoned".to_string(),
            })?;

            if guard.is_none() {
                *guard = Some(open_connection(&target)?);
                info!(db = ?target, "durable store connected");
            }

            match guard.as_ref() {
                Some(c) => f(c),
                None => Err(StoreError::DurableUnavailable {
                    message: "no connection".to_string(),
                }),
            }
        })
        .await
        .map_err(|e| StoreError::DurableUnavailable {
            message: format!("blocking task failed: {}", e),
        })?
    }
}

fn open_connection(target: &DatabaseTarget) -> StoreResult<Connection> {
    let conn = match target {
        DatabaseTarget::File(path) => Connection::open(path),
        DatabaseTarget::Memory => Connection::open_in_memory(),
    }
    .map_err(|e| StoreError::DurableUnavailable {
        message: format!("failed to open sqlite db: {}", e),
    })?;
    conn.busy_timeout(Duration::from_secs(5))?;
    Ok(conn)
}

#[async_trait]
impl DurableStore for SqliteDurableStore {
    async fn create_table_if_absent(&self) -> StoreResult<()> {
        self.with_conn(|conn| {
            conn.execute_batch(&format!(
                r#"CREATE TABLE IF NOT EXISTS "{}" (number INTEGER)"#,
                VALUES_TABLE
            ))
            .map_err(|e| StoreError::SchemaInit {
                message: e.to_string(),
            })
        })
        .await
    }

    async fn insert(&self, number: i64) -> StoreResult<()> {
        self.with_conn(move |conn| {
            conn.execute(
                &format!(r#"INSERT INTO "{}" (number) VALUES (?1)"#, VALUES_TABLE),
                params![number],
            )?;
            Ok(())
        })
        .await
    }

    async fn select_all(&self) -> StoreResult<Vec<DurableRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(r#"SELECT number FROM "{}""#, VALUES_TABLE))?;
            let rows = stmt.query_map([], |row| {
                Ok(DurableRow {
                    number: row.get(0)?,
                })
            })?;
            let mut out = Vec::new();
            for r in rows {
                out.push(r?);
            }
            Ok(out)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn insert_before_schema_fails() {
        let store = SqliteDurableStore::in_memory();
        let err = store.insert(5).await.unwrap_err();
        assert!(matches!(err, StoreError::DurableUnavailable { .. }));
        assert!(store.select_all().await.is_err());
    }

    #[tokio::test]
    async fn duplicates_are_appended() {
        let store = SqliteDurableStore::in_memory();
        store.create_table_if_absent().await.unwrap();
        store.create_table_if_absent().await.unwrap();

        store.insert(5).await.unwrap();
        store.insert(5).await.unwrap();
        store.insert(7).await.unwrap();

        let rows = store.select_all().await.unwrap();
        let numbers: Vec<i64> = rows.iter().map(|r| r.number).collect();
        assert_eq!(numbers, vec![5, 5, 7]);
    }

    #[tokio::test]
    async fn open_is_retried_on_next_operation() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("not-yet");
        let store = SqliteDurableStore::open(nested.join("values.db"));

        let err = store.create_table_if_absent().await.unwrap_err();
        assert!(matches!(err, StoreError::DurableUnavailable { .. }));
        assert!(!store.is_connected());

        std::fs::create_dir_all(&nested).unwrap();
        store.create_table_if_absent().await.unwrap();
        assert!(store.is_connected());
        assert!(store.select_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn file_rows_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("values.db");

        let first = SqliteDurableStore::open(&path);
        first.create_table_if_absent().await.unwrap();
        first.insert(3).await.unwrap();
        drop(first);

        let second = SqliteDurableStore::open(&path);
        let rows = second.select_all().await.unwrap();
        assert_eq!(rows, vec![DurableRow { number: 3 }]);
    }
}
