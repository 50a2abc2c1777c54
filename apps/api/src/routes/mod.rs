pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::resolver::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/auth/resolve-redirect",
            post(handlers::handle_resolve_redirect),
        )
        .route(
            "/api/v1/auth/classification",
            get(handlers::handle_classification),
        )
        .with_state(state)
}
