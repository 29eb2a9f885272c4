//! Binary entry point: configuration, pool, migrations, then the poll driver
//! and the HTTP control surface side by side. Whichever long-lived future
//! exits first (a fatal poll-loop error or a server failure) takes the
//! instance down with it.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use batchproc::config::AppConfig;
use batchproc::database::DatabaseConnection;
use batchproc::orchestration::{run_poll_loop, BatchCoordinator};
use batchproc::web::{self, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    batchproc::logging::init_logging();

    let config = AppConfig::load().context("loading configuration")?;

    let db = DatabaseConnection::connect(&config)
        .await
        .context("connecting to database")?;
    db.migrate().await.context("running migrations")?;

    let coordinator = BatchCoordinator::new(db.pool().clone());
    let state = AppState::new(Arc::new(coordinator.clone()));
    let app = web::router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding control surface to {addr}"))?;
    info!(%addr, "control surface listening");

    let poll_loop = run_poll_loop(coordinator, config.batch_size, config.poll_interval());

    tokio::select! {
        result = poll_loop => {
            result.context("poll loop terminated")?;
        }
        result = async { axum::serve(listener, app).await } => {
            result.context("http server terminated")?;
        }
    }

    Ok(())
}
