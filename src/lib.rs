// S3 File Service - upload, list and fetch files in a single S3 bucket

pub mod config;
pub mod models;
pub mod types;
pub mod storage;
pub mod routes;
pub mod middleware;
pub mod utils;

use std::sync::Arc;

use tracing::info;

use crate::config::StorageProvider;
use crate::storage::{MemoryStore, ObjectStore, S3Store};

// Re-exports for convenience
pub use config::Config;
pub use models::AppState;
pub use types::{AppError, AppResult};

/// Construct the storage backend selected by `STORAGE_PROVIDER`.
pub fn build_store(config: &Config) -> anyhow::Result<Arc<dyn ObjectStore>> {
    let storage = &config.storage;
    match storage.provider {
        StorageProvider::S3 => {
            info!(bucket = %storage.s3_bucket, region = %storage.s3_region, "Using S3 storage");
            Ok(Arc::new(S3Store::new(storage)?))
        }
        StorageProvider::Memory => {
            info!(bucket = %storage.s3_bucket, "Using in-memory storage");
            Ok(Arc::new(MemoryStore::new(
                storage.s3_bucket.clone(),
                storage.public_base_url(),
            )))
        }
    }
}

/// Full application: routes plus the CORS layer from the server config.
pub fn create_app(config: &Config, store: Arc<dyn ObjectStore>) -> axum::Router {
    let state = AppState::new(store, config.upload.clone());
    middleware::apply_cors(
        routes::create_router(state),
        &config.server.cors_allowed_origins,
    )
}
