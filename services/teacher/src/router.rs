use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use campus_core::health::{healthz, readyz};
use campus_core::middleware::request_id_layer;

use crate::handlers::teacher;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route(
            "/teachers",
            get(teacher::list_teachers).post(teacher::create_teacher),
        )
        .route("/teachers/{id}", get(teacher::get_teacher))
        .layer(request_id_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
