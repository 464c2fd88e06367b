//! JSON-file-backed [`StoreBackend`] implementation.
//!
//! Persists the dashboard record in `charty.json` and the ledger in
//! `details.json` under the configured data directory. Loads tolerate a
//! missing, truncated, or hand-edited file: whatever is found goes
//! through the normalizer, and when a repair was needed the repaired
//! record is written back, so the files self-heal on the next read.
//!
//! Saves go through a temp file in the same directory, synced and then
//! renamed over the target, so a crash mid-write leaves the previous
//! record intact.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::warn;

use charty_core::models::{now_stamp, DetailEntry, StoreData};
use charty_core::normalize::{normalize, normalize_details};
use charty_core::store::StoreBackend;

/// Dashboard record filename under the data directory.
pub const STORE_FILE: &str = "charty.json";

/// Ledger filename under the data directory.
pub const DETAILS_FILE: &str = "details.json";

/// File-backed implementation of the [`StoreBackend`] trait.
pub struct FileStore {
    store_path: PathBuf,
    details_path: PathBuf,
}

impl FileStore {
    pub fn new(data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;

        Ok(Self {
            store_path: data_dir.join(STORE_FILE),
            details_path: data_dir.join(DETAILS_FILE),
        })
    }
}

/// Read and parse a JSON document, treating any failure as an absent record.
fn read_json(path: &Path) -> Option<serde_json::Value> {
    let content = std::fs::read_to_string(path).ok()?;
    serde_json::from_str(&content).ok()
}

fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("Invalid store path: {}", path.display()))?;

    let nanos = SystemTime::now().duration_since(UNIX_EPOCH)?.as_nanos();
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("Invalid store filename: {}", path.display()))?;
    let temp_path = parent.join(format!("{}.{}.tmp", filename, nanos));

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&temp_path)
        .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;
    file.write_all(data)
        .with_context(|| format!("Failed to write temp file: {}", temp_path.display()))?;
    file.sync_all()
        .with_context(|| format!("Failed to sync temp file: {}", temp_path.display()))?;

    std::fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to replace {}", path.display()))?;

    Ok(())
}

#[async_trait]
impl StoreBackend for FileStore {
    async fn load_store(&self) -> Result<StoreData> {
        let now = now_stamp();
        let raw = read_json(&self.store_path);
        let (data, corrected) = normalize(raw.as_ref(), &now);

        if corrected {
            if let Err(err) = self.save_store(&data).await {
                warn!("Failed to persist repaired record: {:#}", err);
            }
        }

        Ok(data)
    }

    async fn save_store(&self, data: &StoreData) -> Result<()> {
        let json = serde_json::to_vec_pretty(data)?;
        write_atomic(&self.store_path, &json)
    }

    async fn load_details(&self) -> Result<Vec<DetailEntry>> {
        let now = now_stamp();
        let raw = read_json(&self.details_path);
        let (details, corrected) = normalize_details(raw.as_ref(), &now);

        if corrected {
            if let Err(err) = self.save_details(&details).await {
                warn!("Failed to persist repaired ledger: {:#}", err);
            }
        }

        Ok(details)
    }

    async fn save_details(&self, details: &[DetailEntry]) -> Result<()> {
        let json = serde_json::to_vec_pretty(&details)?;
        write_atomic(&self.details_path, &json)
    }
}
