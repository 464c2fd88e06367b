use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use charty_core::store::StoreBackend;

use crate::config::Config;
use crate::file_store::FileStore;
use crate::migrate;
use crate::sqlite_store::SqliteStore;

pub fn db_path(config: &Config) -> PathBuf {
    config.store.data_dir.join("charty.db")
}

pub async fn connect(config: &Config) -> Result<SqlitePool> {
    let db_path = db_path(config);

    // Ensure the data directory exists
    std::fs::create_dir_all(&config.store.data_dir)?;

    let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", db_path.display()))?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Build the configured store backend.
///
/// The sqlite backend migrates its schema first, so a fresh database
/// becomes servable without a separate init step.
pub async fn build_store(config: &Config) -> Result<Arc<dyn StoreBackend>> {
    match config.store.backend.as_str() {
        "sqlite" => {
            migrate::run_migrations(config).await?;
            let pool = connect(config).await?;
            Ok(Arc::new(SqliteStore::new(pool)))
        }
        _ => Ok(Arc::new(FileStore::new(&config.store.data_dir)?)),
    }
}
