use std::net::SocketAddr;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use fibdex_core::{DatabaseTarget, RetryPolicy, ServiceConfig};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "fibdex",
    version,
    about = "Accepts index submissions, caches them, logs them durably and notifies workers"
)]
pub struct ServerArgs {
    /// Address to listen on
    #[arg(long, env = "FIBDEX_LISTEN", default_value = "0.0.0.0:5000")]
    pub listen: SocketAddr,

    /// SQLite database path, or `:memory:`
    #[arg(long, env = "FIBDEX_DATABASE", default_value = "fibdex.db")]
    pub database: String,

    /// Delay between schema initialization attempts (base delay for exponential backoff)
    #[arg(long, env = "FIBDEX_SCHEMA_RETRY_MS", default_value_t = 1000)]
    pub schema_retry_ms: u64,

    #[arg(long, env = "FIBDEX_SCHEMA_BACKOFF", value_enum, default_value_t = Backoff::Fixed)]
    pub schema_backoff: Backoff,

    /// Upper bound for exponential backoff
    #[arg(long, env = "FIBDEX_SCHEMA_RETRY_MAX_MS", default_value_t = 30_000)]
    pub schema_retry_max_ms: u64,

    /// Buffered insert events per subscriber
    #[arg(long, env = "FIBDEX_CHANNEL_CAPACITY", default_value_t = 1024)]
    pub channel_capacity: usize,

    #[arg(long, env = "FIBDEX_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    Fixed,
    Exponential,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl ServerArgs {
    pub fn retry_policy(&self) -> RetryPolicy {
        let base = Duration::from_millis(self.schema_retry_ms);
        match self.schema_backoff {
            Backoff::Fixed => RetryPolicy::Fixed { delay: base },
            Backoff::Exponential => RetryPolicy::Exponential {
                base,
                max: Duration::from_millis(self.schema_retry_max_ms).max(base),
            },
        }
    }

    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig::default()
            .with_database(DatabaseTarget::parse(&self.database))
            .with_schema_retry(self.retry_policy())
            .with_channel_capacity(self.channel_capacity)
    }
}
