//! API error and response types

use axum::{
  body::Bytes,
  extract::{FromRequest, Request},
  http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
  response::{IntoResponse, Response},
  Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::ingredients::DetectedIngredient;
use crate::recipes::RecipeScore;
use crate::validation::ValidationError;

pub const MALFORMED_REQUEST: &str = "Malformed request";

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
  pub error: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
  #[error("{0}")]
  BadRequest(String),

  #[error("{0}")]
  NotFound(String),

  #[error("File too large. Maximum size: {0}MB")]
  PayloadTooLarge(usize),

  #[error("Internal server error")]
  Internal(anyhow::Error),
}

impl ApiError {
  pub fn bad_request(message: impl Into<String>) -> Self {
    ApiError::BadRequest(message.into())
  }

  pub fn not_found(message: impl Into<String>) -> Self {
    ApiError::NotFound(message.into())
  }

  /// Map an extractor rejection: oversized bodies get 413, anything else is malformed
  pub fn rejected(status: StatusCode, max_file_size_mb: usize) -> Self {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
      ApiError::PayloadTooLarge(max_file_size_mb)
    } else {
      ApiError::bad_request(MALFORMED_REQUEST)
    }
  }
}

impl From<ValidationError> for ApiError {
  fn from(error: ValidationError) -> Self {
    ApiError::BadRequest(error.to_string())
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = match &self {
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
      ApiError::Internal(e) => {
        tracing::error!("Internal error: {e:#}");
        StatusCode::INTERNAL_SERVER_ERROR
      }
    };

    (status, Json(ErrorBody { error: self.to_string() })).into_response()
  }
}

pub fn is_json(headers: &HeaderMap) -> bool {
  headers
    .get(CONTENT_TYPE)
    .and_then(|value| value.to_str().ok())
    .is_some_and(|value| value.starts_with("application/json"))
}

pub fn is_multipart(headers: &HeaderMap) -> bool {
  headers
    .get(CONTENT_TYPE)
    .and_then(|value| value.to_str().ok())
    .is_some_and(|value| value.starts_with("multipart/form-data"))
}

/// Read a request body that must be JSON
pub async fn read_json_body(request: Request, max_file_size_mb: usize) -> Result<Value, ApiError> {
  if !is_json(request.headers()) {
    return Err(ApiError::bad_request("Content-Type must be application/json"));
  }

  let body = Bytes::from_request(request, &())
    .await
    .map_err(|rejection| ApiError::rejected(rejection.status(), max_file_size_mb))?;

  serde_json::from_slice(&body).map_err(|_| ApiError::bad_request(MALFORMED_REQUEST))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IngredientsResponse {
  pub ingredients: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeResponse {
  pub ingredients: Vec<DetectedIngredient>,
  pub recipes: Vec<RecipeScore>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ManualAnalysisResponse {
  pub selected_ingredients: Vec<String>,
  pub recipe_predictions: Vec<RecipeScore>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ConfigResponse {
  pub confidence_threshold: f64,
  pub confidence_threshold_percent: String,
  pub description: String,
  pub max_file_size_mb: usize,
  pub allowed_extensions: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ConfigUpdateResponse {
  pub message: String,
  pub old_threshold: f64,
  pub new_threshold: f64,
  pub new_threshold_percent: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
  pub status: String,
  pub confidence_threshold: f64,
  pub confidence_threshold_percent: String,
  pub custom_vision_configured: bool,
  pub recipe_system: String,
  pub max_file_size_mb: usize,
  pub allowed_extensions: Vec<String>,
}
