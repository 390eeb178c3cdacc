//! Error and request types for the prediction routes

use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::payload::PayloadError;
use crate::predictor::PredictionError;

/// JSON error body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
  pub error: String,
}

#[derive(Debug, Error)]
pub enum ProxyError {
  #[error("{0}")]
  BadRequest(String),

  #[error("Request body too large")]
  PayloadTooLarge,

  #[error("Error processing image: {0}")]
  Processing(String),
}

impl From<PayloadError> for ProxyError {
  fn from(error: PayloadError) -> Self {
    match error {
      PayloadError::TooLarge => ProxyError::PayloadTooLarge,
      other => ProxyError::Processing(other.to_string()),
    }
  }
}

impl From<PredictionError> for ProxyError {
  fn from(error: PredictionError) -> Self {
    match error {
      PredictionError::Payload(payload) => payload.into(),
      other => ProxyError::Processing(other.to_string()),
    }
  }
}

impl IntoResponse for ProxyError {
  fn into_response(self) -> Response {
    let status = match self {
      ProxyError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ProxyError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
      ProxyError::Processing(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (status, Json(ErrorBody { error: self.to_string() })).into_response()
  }
}

/// Read the image URL from a `/url` request body
///
/// Both `url` and `Url` are accepted; an empty `url` falls through to `Url`.
pub fn image_url(body: &Value) -> Option<&str> {
  ["url", "Url"]
    .iter()
    .filter_map(|key| body.get(*key).and_then(Value::as_str))
    .find(|url| !url.is_empty())
}
