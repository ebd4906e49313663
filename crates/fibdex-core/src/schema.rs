//! Schema initialization for the durable store.
//!
//! `ensure_schema` keeps issuing the create-if-absent statement until it
//! succeeds. It never returns an error and never holds anything that request
//! handling waits on: inserts issued before the table exists simply fail and
//! are logged by the write path.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::store::DurableStore;

/// Delay between failed schema attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryPolicy {
    /// Same delay after every failure.
    Fixed { delay: Duration },
    /// `base * 2^(attempt-1)`, capped at `max`.
    Exponential { base: Duration, max: Duration },
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::Fixed {
            delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Delay to wait after failed attempt number `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        match *self {
            Self::Fixed { delay } => delay,
            Self::Exponential { base, max } => {
                let shift = attempt.saturating_sub(1).min(16);
                base.saturating_mul(1 << shift).min(max)
            }
        }
    }
}

/// Lifecycle of the durable table as seen by this process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaState {
    Uninitialized,
    Attempting { attempt: u32 },
    /// Terminal for the process lifetime.
    Ready,
}

/// Ensures the values table exists, retrying forever.
pub struct SchemaInitializer {
    store: Arc<dyn DurableStore>,
    policy: RetryPolicy,
    state: watch::Sender<SchemaState>,
}

impl SchemaInitializer {
    pub fn new(store: Arc<dyn DurableStore>) -> Self {
        Self::with_policy(store, RetryPolicy::default())
    }

    pub fn with_policy(store: Arc<dyn DurableStore>, policy: RetryPolicy) -> Self {
        let (state, _) = watch::channel(SchemaState::Uninitialized);
        Self {
            store,
            policy,
            state,
        }
    }

    pub fn state(&self) -> SchemaState {
        *self.state.borrow()
    }

    /// Watch state transitions, e.g. to wait for `Ready`.
    pub fn subscribe(&self) -> watch::Receiver<SchemaState> {
        self.state.subscribe()
    }

    /// Run until the table exists. Returns the number of attempts it took.
    ///
    /// Safe to call concurrently: each call races independently and the
    /// statement is a no-op once the table exists.
    pub async fn ensure_schema(&self) -> u32 {
        let mut attempt: u32 = 0;

        loop {
            attempt = attempt.saturating_add(1);
            self.transition(SchemaState::Attempting { attempt });
            info!(attempt, "ensuring durable values table");

            match self.store.create_table_if_absent().await {
                Ok(()) => {
                    self.transition(SchemaState::Ready);
                    info!(attempt, "durable values table ready");
                    return attempt;
                }
                Err(e) => {
                    let delay = self.policy.delay_for(attempt);
                    warn!(
                        error = %e,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "schema initialization failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    /// Run [`Self::ensure_schema`] on a detached task.
    pub fn spawn(self: Arc<Self>) -> JoinHandle<u32> {
        tokio::spawn(async move { self.ensure_schema().await })
    }

    fn transition(&self, next: SchemaState) {
        self.state.send_if_modified(|current| {
            if *current == SchemaState::Ready || *current == next {
                return false;
            }
            *current = next;
            true
        });
    }
}
