//! Image prediction handler

use axum::{
  extract::{Extension, Request, State},
  Json,
};

use crate::payload::{extract_image_data, ImagePayload};
use crate::predictor::PredictionResult;
use crate::server::{middleware::RequestContext, state::ProxyState, types::ProxyError};

/// POST /image (and project/iteration variants) - Score an uploaded image
///
/// Project and published iteration path segments are accepted for routing
/// compatibility and otherwise ignored.
pub async fn predict_image(
  State(state): State<ProxyState>,
  Extension(context): Extension<RequestContext>,
  request: Request,
) -> Result<Json<PredictionResult>, ProxyError> {
  let image = extract_image_data(request)
    .await
    .and_then(ImagePayload::decode)
    .map_err(|e| {
      context.log_error(&format!("Image processing failed: {e}"));
      ProxyError::from(e)
    })?;

  let (width, height) = image.dimensions();
  context.log_info(&format!("Predicting on {width}x{height} {} image", image.mime_type()));

  match state.predictor.predict_image(&image).await {
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
