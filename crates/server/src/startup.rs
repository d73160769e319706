use std::future::Future;
use std::time::Duration;

use configs::AppConfig;
use tokio::net::TcpListener;
use tracing::info;

use crate::dispatch::AppState;
use crate::errors::StartupError;
use crate::routes;

/// Connect the pool, bind the listener and serve until `shutdown` resolves.
pub async fn run_until<F>(cfg: AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if cfg.database.url.trim().is_empty() {
        return Err(StartupError::InvalidConfig("database.url is empty".into()).into());
    }
    let db = models::db::connect_with_config(&cfg.database)
        .await
        .map_err(|e| StartupError::Database(e.to_string()))?;
    let state = AppState::new(db, Duration::from_secs(cfg.server.request_timeout_secs));
    let app = routes::build_router(state);

    let addr = format!("{}:{}", cfg.server.host, cfg.server.port);
    let listener = TcpListener::bind((cfg.server.host.as_str(), cfg.server.port))
        .await
        .map_err(|source| StartupError::Bind { addr, source })?;
    info!(addr = %listener.local_addr()?, timeout_secs = cfg.server.request_timeout_secs, "fiscal tracker api listening");

    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    info!("http server drained");
    Ok(())
}

/// Serve until Ctrl+C.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    run_until(cfg, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
}
