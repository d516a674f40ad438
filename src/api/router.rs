use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use super::chat;
use super::health;
use super::middleware::logging_middleware;
use super::state::AppState;

/// Build the service router. The router is an explicit value owned by the
/// caller; nothing is registered globally.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/chat", post(chat::chat))
        .route("/health", get(health::health_check))
        .with_state(state)
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
}
