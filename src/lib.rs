//! # Dossier
//!
//! A checklist tracker for French residence-permit renewal paperwork, usable
//! both as a standalone binary and as a library.
//!
//! ## Library Usage
//!
//! ```toml
//! [dependencies]
//! dossier = { version = "0.0.1", default-features = false }
//! ```
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use dossier::catalog::load_catalog;
//! use dossier::server::{AppState, create_router};
//! use dossier::store::{SqliteStore, Store};
//!
//! let catalog = load_catalog("./config");
//! let store = SqliteStore::new("./data/dossier.db").unwrap();
//! store.initialize().unwrap();
//! store.seed(&catalog).unwrap();
//!
//! let state = Arc::new(AppState::new(Arc::new(store), Arc::new(catalog)));
//! let router = create_router(state);
//! // Serve with axum...
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` (default): Builds the `dossier` binary. Disable with `default-features = false`.

pub mod catalog;
pub mod config;
pub mod error;
pub mod progress;
pub mod server;
pub mod store;
pub mod types;
