//! Service configuration shared by the server binary and tests.

use std::path::PathBuf;

use crate::schema::RetryPolicy;

/// Where the durable store keeps its table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseTarget {
    File(PathBuf),
    Memory,
}

impl DatabaseTarget {
    /// `:memory:` selects an in-memory database, anything else is a file path.
    pub fn parse(value: &str) -> Self {
        if value == ":memory:" {
            Self::Memory
        } else {
            Self::File(PathBuf::from(value))
        }
    }
}

impl Default for DatabaseTarget {
    fn default() -> Self {
        Self::File(PathBuf::from("fibdex.db"))
    }
}

/// Settings for the collaborators and the schema retry loop.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub database: DatabaseTarget,
    pub schema_retry: RetryPolicy,
    /// Buffered events per subscriber on the event channel.
    pub channel_capacity: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            database: DatabaseTarget::default(),
            schema_retry: RetryPolicy::default(),
            channel_capacity: 1024,
        }
    }
}

impl ServiceConfig {
    pub fn with_database(mut self, database: DatabaseTarget) -> Self {
        self.database = database;
        self
    }

    pub fn with_schema_retry(mut self, policy: RetryPolicy) -> Self {
        self.schema_retry = policy;
        self
    }

    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.max(1);
        self
    }
}
