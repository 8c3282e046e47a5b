//! API Routes
//!
//! - `/` - Welcome message
//! - `/api/health` - Health check
//! - `/upload/` - File upload
//! - `/files/` - File listing and content

pub mod files;
pub mod health;

use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::models::AppState;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    Router::new()
        .merge(health::router(state.clone()))
        .merge(files::router(state))
        .layer(TraceLayer::new_for_http())
}
