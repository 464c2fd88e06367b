//! # Charty
//!
//! A transparency dashboard for a donation-backed initiative.
//!
//! Charty serves a public page of live donation counters, success stories,
//! and project progress, backed by a password-gated admin panel and an
//! income/expense ledger. Records live in JSON files or SQLite and self-heal
//! on every load.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌──────────────┐   ┌─────────────┐
//! │  Public  │──▶│ HTTP server  │──▶│ charty-core │
//! │  /admin  │   │ (axum pages) │   │ normalize + │
//! │ /details │   │              │   │  mutations  │
//! └──────────┘   └──────┬───────┘   └──────┬──────┘
//!                       │                  │
//!                       ▼                  ▼
//!                 ┌──────────┐       ┌──────────┐
//!                 │   JSON   │  or   │  SQLite  │
//!                 │  files   │       │          │
//!                 └──────────┘       └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! charty init                   # seed the store
//! charty serve                  # serve the dashboard
//! charty stats                  # inspect counters and ledger
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`file_store`] | JSON-file store backend |
//! | [`sqlite_store`] | SQLite store backend |
//! | [`db`] | Database connection and backend selection |
//! | [`migrate`] | SQLite schema migrations |
//! | [`server`] | HTTP server and page handlers |
//! | [`actions`] | Form-driven admin mutations |
//! | [`pages`] | Server-rendered HTML |
//! | [`session`] | Admin session cookies |
//! | [`stats`] | Store summary command |

pub mod actions;
pub mod config;
pub mod db;
pub mod file_store;
pub mod migrate;
pub mod pages;
pub mod server;
pub mod session;
pub mod sqlite_store;
pub mod stats;
