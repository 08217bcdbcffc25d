use order_server::error::BoxError;
use order_server::utils::logger;
use order_server::{AppState, Config, Database, MemoryDatabase, PgDatabase, StorageKind, api};

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;
    let _log_guard = logger::init_logger(
        &config.log_level,
        config.log_json,
        config.log_dir.as_deref(),
    )?;

    tracing::info!(
        env = %config.environment,
        storage = ?config.storage,
        "Starting order-server"
    );

    match config.storage {
        StorageKind::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .ok_or("DATABASE_URL must be set")?;
            let db = PgDatabase::connect(url, config.db_max_connections).await?;
            serve(db, config.http_port).await
        }
        StorageKind::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on exit");
            serve(MemoryDatabase::new(), config.http_port).await
        }
    }
}

async fn serve<D: Database>(db: D, port: u16) -> Result<(), BoxError> {
    let app = api::create_router(AppState::new(db));

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("order-server HTTP listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("order-server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
    }
}
