use crate::app::AppState;
use crate::handler::health::health_handler;
use crate::handler::ingest::ingest_handler;
use axum::Router;
use axum::routing::{get, post};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Build the HTTP router (Logpush ingest + health).
pub fn main_router(state: Arc<AppState>) -> Router {
    let v1_health_router = Router::new().route("/v1/health", get(health_handler));

    // Logpush posts to whatever path the job was configured with
    let ingest_router = Router::new()
        .route("/", post(ingest_handler))
        .route("/v1/logpush", post(ingest_handler))
        .with_state(state);

    Router::new()
        .merge(v1_health_router)
        .merge(ingest_router)
        .layer(TraceLayer::new_for_http())
}
