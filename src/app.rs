use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::application::{BrowseUseCase, SeedReport, SeedUseCase};
use crate::domain::entity::Entity;
use crate::domain::error::{AppError, Result};
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::db::SqliteStore;
use crate::infrastructure::storage::{ensure_parent_dir, remove_database_files};
use crate::interfaces::http::start_server;

/// `RUST_LOG` wins over the configured level
pub fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Serve the browser until the process receives Ctrl-C
pub async fn run_server() -> Result<()> {
    let config = AppConfig::load()?;
    init_tracing(&config.log_level);

    let store = Arc::new(SqliteStore::open(&config.database.path).await.map_err(|err| {
        tracing::error!(error = %err, db = %config.database.path.display(), "Failed to open database");
        err
    })?);

    let browse = BrowseUseCase::new(store.clone(), config.server.page_size);
    let (host, port) = config.bind_address();
    let server = start_server(browse, &host, port).map_err(|err| {
        AppError::IoError(format!("Failed to bind {}:{}: {}", host, port, err))
    })?;
    tracing::info!(
        db = %config.database.path.display(),
        page_size = config.server.page_size,
        "Listening on http://{}:{}",
        host,
        port
    );

    let outcome = server.await;
    tracing::info!("Server stopped, closing database");
    store.close().await;

    outcome.map_err(|err| AppError::IoError(format!("Server error: {}", err)))
}

/// Delete any previous database, then load every CSV into a fresh one
pub async fn run_seed() -> Result<SeedReport> {
    let config = AppConfig::load()?;
    init_tracing(&config.log_level);

    let outcome = seed_into(&config).await;
    match &outcome {
        Ok(report) => {
            for entity in Entity::ALL {
                if let Some(count) = report.count(entity) {
                    tracing::info!(table = entity.table(), rows = count, "Table ready");
                }
            }
            tracing::info!(db = %config.database.path.display(), "Database seeding complete");
        }
        Err(err) => tracing::error!(error = %err, "Database seeding failed"),
    }
    outcome
}

/// Full replace of the configured database from the configured CSV directory
pub async fn seed_into(config: &AppConfig) -> Result<SeedReport> {
    let db_path = &config.database.path;
    remove_database_files(db_path)?;
    ensure_parent_dir(db_path)?;
    tracing::info!(db = %db_path.display(), "Creating database");

    let store = Arc::new(SqliteStore::create(db_path).await?);
    let seed = SeedUseCase::new(
        store.clone(),
        config.seed.data_dir.clone(),
        config.seed.batch_size,
    )
    .with_delimiter(config.csv_delimiter());
    let outcome = seed.execute().await;
    store.close().await;
    outcome
}
