pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::board::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/board", get(handlers::handle_get_board))
        .route("/api/v1/layout", post(handlers::handle_layout))
        .route("/api/v1/viewport", put(handlers::handle_viewport))
        .route("/api/v1/refresh", post(handlers::handle_refresh))
        .with_state(state)
}
