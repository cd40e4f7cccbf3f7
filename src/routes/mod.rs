use std::sync::Arc;

use axum::{
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::services::recommendations::RecommendationService;

pub mod recommendations;

/// Creates the application router with all routes
pub fn create_router(service: Arc<RecommendationService>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes(service))
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(crate::middleware::request_id::make_span_with_request_id),
        )
        .layer(axum::middleware::from_fn(
            crate::middleware::request_id::request_id_middleware,
        ))
}

/// API routes under /api/v1
fn api_routes(service: Arc<RecommendationService>) -> Router {
    Router::new()
        .route("/recommendations", post(recommendations::recommend))
        .with_state(service)
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
