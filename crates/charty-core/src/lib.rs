//! # Charty Core
//!
//! Shared logic for Charty: data models, the record normalizer, admin
//! mutations, the dashboard query, and the store abstraction.
//!
//! This crate contains no HTTP, SQL, or filesystem I/O. Backends and the
//! web layer live in the `charty` binary crate and plug in through
//! [`store::StoreBackend`].

pub mod admin;
pub mod dashboard;
pub mod form;
pub mod models;
pub mod normalize;
pub mod store;
