use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use campus_core::health::{healthz, readyz};
use campus_core::middleware::request_id_layer;

/// Health-only surface; all real work happens on the consumer.
pub fn build_router() -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .layer(request_id_layer())
        .layer(TraceLayer::new_for_http())
}
