use axum::{extract::State, routing::get, Json, Router};

use crate::models::{AppState, HealthResponse, MessageResponse};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/api/health", get(health_check))
        .with_state(state)
}

async fn root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Welcome to the S3 file service".to_string(),
    })
}

// Reports configuration only; the bucket is not contacted.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        bucket: state.store.bucket().to_string(),
    })
}
