//! Health and fallback handlers

use axum::{extract::State, Json};

use crate::server::{
  state::AppState,
  types::{ApiError, HealthResponse},
};
use crate::threshold::percent;

/// GET /health - Service status and current settings
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
  let threshold = state.threshold.get();

  Json(HealthResponse {
    status: "healthy".to_string(),
    confidence_threshold: threshold,
    confidence_threshold_percent: percent(threshold),
    custom_vision_configured: state.config.custom_vision_configured(),
    recipe_system: "local".to_string(),
    max_file_size_mb: state.config.max_file_size_mb(),
    allowed_extensions: state.config.extensions(),
  })
}

pub async fn not_found() -> ApiError {
  ApiError::not_found("Endpoint not found")
}
