use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use campus_core::health::{healthz, readyz};
use campus_core::middleware::request_id_layer;

use crate::handlers::{auth, verify};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/token/refresh", post(auth::refresh))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        .route("/auth/verify/send", post(verify::send_verification))
        .route("/auth/verify/confirm", get(verify::confirm_verification))
        .layer(request_id_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
