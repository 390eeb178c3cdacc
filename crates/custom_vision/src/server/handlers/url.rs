//! URL prediction handler

use axum::{
  body::Bytes,
  extract::{Extension, State},
  Json,
};
use serde_json::Value;

use crate::predictor::PredictionResult;
use crate::server::{
  middleware::RequestContext,
  state::ProxyState,
  types::{image_url, ProxyError},
};

/// POST /url (and project/iteration variants) - Score the image behind a URL
pub async fn predict_url(
  State(state): State<ProxyState>,
  Extension(context): Extension<RequestContext>,
  body: Bytes,
) -> Result<Json<PredictionResult>, ProxyError> {
  context.log_debug(&format!("Incoming URL request data: {}", String::from_utf8_lossy(&body)));

  let data: Value = serde_json::from_slice(&body).map_err(|e| {
    context.log_warn(&format!("JSON decode error: {e}"));
    ProxyError::BadRequest("Invalid JSON format".to_string())
  })?;

  let Some(url) = image_url(&data) else {
    return Err(ProxyError::BadRequest("Missing url or Url field in request".to_string()));
  };
  context.log_info(&format!("Extracted image URL: {url}"));

  match state.predictor.predict_url(url).await {
    Ok(result) => {
      context.log_info(&format!("Prediction results: {} predictions", result.predictions.len()));
      Ok(Json(result))
    }
    Err(e) => {
      context.log_error(&format!("Prediction failed: {e}"));
      Err(e.into())
    }
  }
}
