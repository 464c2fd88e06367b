//! In-memory [`StoreBackend`] implementation for tests.
//!
//! Holds the record and the ledger behind `std::sync::RwLock` for thread
//! safety. Starts out seeded with the default record, so a fresh instance
//! behaves like a backend whose medium was just initialized.

use std::sync::RwLock;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{default_store, now_stamp, DetailEntry, StoreData};

use super::StoreBackend;

/// In-memory store for tests.
pub struct MemoryStore {
    store: RwLock<StoreData>,
    details: RwLock<Vec<DetailEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(default_store(&now_stamp())),
            details: RwLock::new(Vec::new()),
        }
    }

    /// Build a store holding exactly the given data, for fixture setups.
    pub fn with_data(store: StoreData, details: Vec<DetailEntry>) -> Self {
        Self {
            store: RwLock::new(store),
            details: RwLock::new(details),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StoreBackend for MemoryStore {
    async fn load_store(&self) -> Result<StoreData> {
        Ok(self.store.read().unwrap().clone())
    }

    async fn save_store(&self, data: &StoreData) -> Result<()> {
        *self.store.write().unwrap() = data.clone();
        Ok(())
    }

    async fn load_details(&self) -> Result<Vec<DetailEntry>> {
        Ok(self.details.read().unwrap().clone())
    }

    async fn save_details(&self, details: &[DetailEntry]) -> Result<()> {
        *self.details.write().unwrap() = details.to_vec();
        Ok(())
    }
}
