//! Schema initialization runs beside request handling and never blocks it.

mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use common::FlakyTable;
use fibdex_core::{
    BroadcastChannel, DurableRow, DurableStore, MemoryCache, RetryPolicy, SchemaInitializer,
    SchemaState, WriteCoordinator,
};
use serde_json::json;

#[tokio::test(start_paused = true)]
async fn writes_are_accepted_while_schema_is_retrying() -> anyhow::Result<()> {
    let table = Arc::new(FlakyTable::new(3));
    let init = Arc::new(SchemaInitializer::new(table.clone()));
    let mut state = init.subscribe();

    let writer = WriteCoordinator::new(
        Arc::new(MemoryCache::new()),
        Arc::new(BroadcastChannel::new(4)),
        table.clone(),
    );

    let handle = init.clone().spawn();

    // first attempt has failed, table still missing
    state
        .wait_for(|s| matches!(s, SchemaState::Attempting { attempt } if *attempt >= 2))
        .await?;
    writer.submit(&json!(6)).await?.persisted.await?;

    let attempts = handle.await?;
    assert_eq!(attempts, 4);
    assert_eq!(init.state(), SchemaState::Ready);

    // the early insert was dropped, later ones land
    assert!(table.select_all().await?.is_empty());
    writer.submit(&json!(7)).await?.persisted.await?;
    assert_eq!(table.select_all().await?, vec![DurableRow { number: 7 }]);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn fixed_delay_spaces_attempts() {
    let table = Arc::new(FlakyTable::new(2));
    let init = SchemaInitializer::with_policy(
        table.clone(),
        RetryPolicy::Fixed {
            delay: Duration::from_millis(250),
        },
    );

    let started = tokio::time::Instant::now();
    assert_eq!(init.ensure_schema().await, 3);
    assert!(started.elapsed() >= Duration::from_millis(500));
    assert_eq!(table.create_calls.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn concurrent_initializers_are_harmless() -> anyhow::Result<()> {
    let table = Arc::new(FlakyTable::new(1));
    let init = Arc::new(SchemaInitializer::new(table.clone()));

    let (a, b) = tokio::join!(init.clone().spawn(), init.clone().spawn());
    assert!(a? >= 1);
    assert!(b? >= 1);
    assert_eq!(init.state(), SchemaState::Ready);

    table.insert(1).await?;
    assert_eq!(table.select_all().await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn sqlite_schema_is_ready_on_first_attempt() {
    let store = Arc::new(fibdex_core::SqliteDurableStore::in_memory());
    let init = SchemaInitializer::new(store);
    assert_eq!(init.ensure_schema().await, 1);
    assert_eq!(init.state(), SchemaState::Ready);
}
