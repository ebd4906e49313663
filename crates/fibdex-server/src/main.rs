use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, warn};

use fibdex_server::telemetry::init_tracing;
use fibdex_server::{router, ServerArgs, Services};

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    let args = ServerArgs::parse();
    init_tracing(args.log_format);

    let config = args.service_config();
    info!(db = ?config.database, retry = ?config.schema_retry, "starting fibdex");

    let services = Services::build(&config);
    // runs beside request handling; never awaited
    let _schema_task = services.schema.clone().spawn();

    let app = router(services.state.clone());
    let listener = TcpListener::bind(args.listen)
        .await
        .with_context(|| format!("failed to bind {}", args.listen))?;
    info!(addr = %args.listen, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
