//! Runtime configuration handlers

use axum::{
  extract::{Extension, Request, State},
  Json,
};
use serde_json::Value;

use crate::server::{
  middleware::RequestContext,
  state::AppState,
  types::{read_json_body, ApiError, ConfigResponse, ConfigUpdateResponse},
};
use crate::threshold::percent;

const THRESHOLD_DESCRIPTION: &str = "Minimum confidence threshold for ingredient detection";

/// GET /config - Current detection settings
pub async fn get_config(State(state): State<AppState>) -> Json<ConfigResponse> {
  let threshold = state.threshold.get();

  Json(ConfigResponse {
    confidence_threshold: threshold,
    confidence_threshold_percent: percent(threshold),
    description: THRESHOLD_DESCRIPTION.to_string(),
    max_file_size_mb: state.config.max_file_size_mb(),
    allowed_extensions: state.config.extensions(),
  })
}

/// POST /config - Change the confidence threshold
pub async fn update_config(
  State(state): State<AppState>,
  Extension(context): Extension<RequestContext>,
  request: Request,
) -> Result<Json<ConfigUpdateResponse>, ApiError> {
  let body = read_json_body(request, state.config.max_file_size_mb()).await?;

  let threshold = match body.get("threshold") {
    None | Some(Value::Null) => return Err(ApiError::bad_request("Missing 'threshold' parameter")),
    Some(value) => parse_threshold(value).ok_or_else(|| ApiError::bad_request("Threshold must be a number"))?,
  };

  let old_threshold = state.threshold.set(threshold).map_err(|e| {
    context.log_warn(&format!("Rejected threshold {threshold}: {e}"));
    ApiError::bad_request(e.to_string())
  })?;

  context.log_info(&format!(
    "Confidence threshold changed from {} to {}",
    percent(old_threshold),
    percent(threshold)
  ));

  Ok(Json(ConfigUpdateResponse {
    message: "Confidence threshold updated".to_string(),
    old_threshold,
    new_threshold: threshold,
    new_threshold_percent: percent(threshold),
  }))
}

/// Numbers and numeric strings are accepted; booleans are not numbers here
fn parse_threshold(value: &Value) -> Option<f64> {
  match value {
    Value::Number(number) => number.as_f64(),
    Value::String(text) => text.trim().parse().ok(),
    _ => None,
  }
}
