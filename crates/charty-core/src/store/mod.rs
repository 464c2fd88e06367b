//! Storage abstraction for the dashboard.
//!
//! The [`StoreBackend`] trait defines the persistence operations the page
//! handlers and admin mutations need, enabling pluggable backends (JSON
//! files, SQLite, in-memory for tests).
//!
//! Backends deal in whole records: a mutation is load, transform in
//! memory, save. There is no per-field update path, so concurrent admin
//! saves resolve as last write wins. Every `load_*` call returns a record
//! already repaired to the [`crate::normalize`] rules.
//!
//! Implementations must be `Send + Sync` to work with async runtimes.

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{DetailEntry, StoreData};

/// Abstract storage backend for the dashboard record and the ledger.
///
/// All operations are async (via `async-trait`); the in-memory
/// implementation returns immediately-ready futures.
///
/// # Operations
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`load_store`](StoreBackend::load_store) | Load the repaired settings + stories record |
/// | [`save_store`](StoreBackend::save_store) | Persist the whole record |
/// | [`load_details`](StoreBackend::load_details) | Load the repaired ledger entries |
/// | [`save_details`](StoreBackend::save_details) | Persist the whole ledger |
#[async_trait]
pub trait StoreBackend: Send + Sync {
    /// Load the dashboard record, repaired and with dense story positions.
    async fn load_store(&self) -> Result<StoreData>;

    /// Persist the whole dashboard record, replacing what was there.
    async fn save_store(&self, data: &StoreData) -> Result<()>;

    /// Load the ledger entries, repaired.
    async fn load_details(&self) -> Result<Vec<DetailEntry>>;

    /// Persist the whole ledger, replacing what was there.
    async fn save_details(&self, details: &[DetailEntry]) -> Result<()>;
}
