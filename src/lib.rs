pub mod commands;
pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod logging;
pub mod server;
pub mod validation;

use std::sync::Arc;

use tokio::sync::watch;

use config::Config;
use db::DbPool;
use engine::provider::{resolve_provider, TextGenerator};
use error::AppError;

/// Shared application state accessible from all HTTP handlers.
pub struct AppState {
    pub db: DbPool,
    /// Text-generation backend. Gemini in production, a fake in tests.
    pub generator: Arc<dyn TextGenerator>,
}

pub fn run(config: Config) -> Result<(), AppError> {
    logging::init(config.log_format);

    tracing::info!("Starting Closet AI v{}", env!("CARGO_PKG_VERSION"));

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(start(config))
}

async fn start(config: Config) -> Result<(), AppError> {
    let pool = db::init_db(&config.data_dir, config.db_pool_size)?;
    tracing::info!("Database pool ready (max_size={})", config.db_pool_size);

    let generator = resolve_provider(&config.gemini)?;
    tracing::info!(backend = generator.name(), "Text generator ready");

    let state = Arc::new(AppState {
        db: pool,
        generator,
    });

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(server::wait_for_shutdown(shutdown_tx));

    server::start_server(&config, state, shutdown_rx).await?;

    tracing::info!("Closet AI stopped");
    Ok(())
}
