pub mod health;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::interview::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Interview API
        .route("/api/v1/interviews", post(handlers::handle_start))
        .route("/api/v1/interviews/:id", delete(handlers::handle_delete))
        .route(
            "/api/v1/interviews/:id/responses",
            post(handlers::handle_respond),
        )
        .route(
            "/api/v1/interviews/:id/complete",
            post(handlers::handle_complete),
        )
        .route(
            "/api/v1/interviews/:id/progress",
            get(handlers::handle_progress),
        )
        .route(
            "/api/v1/interviews/:id/results",
            get(handlers::handle_results),
        )
        .route(
            "/api/v1/interviews/:id/dataset",
            get(handlers::handle_dataset),
        )
        .with_state(state)
}
