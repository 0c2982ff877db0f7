use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use dossier::catalog::{Catalog, load_catalog};
use dossier::server::{AppState, create_router};
use dossier::store::{SqliteStore, Store};

/// The catalog shipped with the repository.
pub fn bundled_config_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("config")
}

/// A router over a fresh database seeded from the bundled catalog.
pub struct TestApp {
    pub temp_dir: TempDir,
    pub router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_catalog(load_catalog(bundled_config_dir()))
    }

    /// Seeds the bundled catalog, then serves `catalog` after re-seeding it,
    /// as happens when the YAML files change between two starts.
    pub fn with_catalog(catalog: Catalog) -> Self {
        let temp_dir = TempDir::new().expect("create temp dir");

        let store = SqliteStore::new(temp_dir.path().join("dossier.db")).expect("open store");
        store.initialize().expect("initialize store");
        store
            .seed(&load_catalog(bundled_config_dir()))
            .expect("seed store");
        store.seed(&catalog).expect("re-seed store");

        let state = Arc::new(AppState::new(Arc::new(store), Arc::new(catalog)));

        Self {
            temp_dir,
            router: create_router(state),
        }
    }

    pub async fn request(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if body.is_some() {
            builder = builder.header("content-type", "application/json");
        }
        let body = match body {
            Some(v) => Body::from(serde_json::to_string(&v).expect("serialize body")),
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).expect("build request"))
            .await
            .expect("send request");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("read body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request("GET", uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request("POST", uri, Some(body)).await
    }

    pub async fn post_empty(&self, uri: &str) -> (StatusCode, Value) {
        self.request("POST", uri, None).await
    }
}
