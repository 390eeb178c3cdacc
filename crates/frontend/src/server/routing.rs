//! Axum router configuration for all endpoints

use axum::{
  extract::DefaultBodyLimit,
  middleware,
  routing::{get, post},
  Router,
};

use crate::server::{
  handlers::{analyze, config, ingredients, status},
  middleware::request_context_middleware,
  state::AppState,
};

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
  let body_limit = state.config.max_file_size;

  Router::new()
    // Recipe endpoints
    .route("/get_ingredients", get(ingredients::get_ingredients))
    .route("/analyze", post(analyze::analyze))
    .route("/analyze_manual", post(analyze::analyze_manual))
    // Settings
    .route("/config", get(config::get_config).post(config::update_config))
    .route("/health", get(status::health))
    .fallback(status::not_found)
    .layer(middleware::from_fn(request_context_middleware))
    .layer(DefaultBodyLimit::max(body_limit))
    .with_state(state)
}
