//! Ingredient detection through a Custom Vision prediction endpoint
//!
//! Detectors expose fallible `try_detect_*` calls. Handlers go through
//! [`detect_from_url`] and [`detect_from_bytes`], which log any failure and
//! report it as "nothing detected", so a broken provider surfaces to users as an
//! empty result rather than an error.

use async_trait::async_trait;
use axum::body::Bytes;
use reqwest::{header::CONTENT_TYPE, Client};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::ingredients::DetectedIngredient;

/// Header carrying the Custom Vision key
pub const PREDICTION_KEY_HEADER: &str = "Prediction-Key";

/// Outbound timeout for prediction calls
pub const DETECTION_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum DetectionError {
  #[error("uploaded file is not a valid image: {0}")]
  InvalidImage(#[from] image::ImageError),

  #[error("error calling Custom Vision: {0}")]
  Request(#[from] reqwest::Error),

  #[error("Custom Vision returned {status}: {body}")]
  Status { status: u16, body: String },
}

#[derive(Debug, Deserialize)]
struct ProviderResponse {
  #[serde(default)]
  predictions: Vec<ProviderPrediction>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProviderPrediction {
  tag_name: String,
  probability: f64,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IngredientDetector: Send + Sync {
  /// Detect ingredients in the image behind `url`
  async fn try_detect_from_url(
    &self,
    url: &str,
    threshold: f64,
  ) -> Result<Vec<DetectedIngredient>, DetectionError>;

  /// Detect ingredients in uploaded image bytes
  async fn try_detect_from_bytes(
    &self,
    bytes: Bytes,
    threshold: f64,
  ) -> Result<Vec<DetectedIngredient>, DetectionError>;
}

/// Detect from a URL, reporting any failure as an empty list
pub async fn detect_from_url(
  detector: &dyn IngredientDetector,
  url: &str,
  threshold: f64,
) -> Vec<DetectedIngredient> {
  detector.try_detect_from_url(url, threshold).await.unwrap_or_else(|e| {
    error!("Ingredient detection from URL failed: {e}");
    Vec::new()
  })
}

/// Detect from uploaded bytes, reporting any failure as an empty list
pub async fn detect_from_bytes(
  detector: &dyn IngredientDetector,
  bytes: Bytes,
  threshold: f64,
) -> Vec<DetectedIngredient> {
  detector.try_detect_from_bytes(bytes, threshold).await.unwrap_or_else(|e| {
    match &e {
      DetectionError::InvalidImage(_) => warn!("Uploaded file is not a valid image: {e}"),
      _ => error!("Ingredient detection from upload failed: {e}"),
    }
    Vec::new()
  })
}

/// Image route for a configured prediction endpoint
///
/// `.../url` endpoints map to their `.../image` sibling; anything else gets
/// `/image` appended.
pub fn image_endpoint_for(endpoint: &str) -> String {
  if endpoint.contains("/url") {
    endpoint.replace("/url", "/image")
  } else {
    format!("{}/image", endpoint.trim_end_matches('/'))
  }
}

/// Detector backed by a Custom Vision prediction endpoint
pub struct CustomVisionDetector {
  client: Client,
  url_endpoint: String,
  image_endpoint: String,
  key: String,
}

impl CustomVisionDetector {
  pub fn new(endpoint: &str, key: &str, timeout: Duration) -> anyhow::Result<Self> {
    let client = Client::builder().timeout(timeout).build()?;

    Ok(Self {
      client,
      url_endpoint: endpoint.to_string(),
      image_endpoint: image_endpoint_for(endpoint),
      key: key.to_string(),
    })
  }

  pub fn image_endpoint(&self) -> &str {
    &self.image_endpoint
  }

  async fn read_predictions(
    &self,
    response: reqwest::Response,
    threshold: f64,
  ) -> Result<Vec<DetectedIngredient>, DetectionError> {
    let status = response.status();
    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      return Err(DetectionError::Status { status: status.as_u16(), body });
    }

    let parsed: ProviderResponse = response.json().await?;
    let detected = above_threshold(parsed.predictions, threshold);
    info!("Ingredients detected: {}", detected.len());
    Ok(detected)
  }
}

#[async_trait]
impl IngredientDetector for CustomVisionDetector {
  async fn try_detect_from_url(
    &self,
    url: &str,
    threshold: f64,
  ) -> Result<Vec<DetectedIngredient>, DetectionError> {
    info!("Analyzing image from URL: {}...", url.chars().take(50).collect::<String>());

    let response = self
      .client
      .post(&self.url_endpoint)
      .header(PREDICTION_KEY_HEADER, &self.key)
      .json(&json!({ "Url": url }))
      .send()
      .await?;

    self.read_predictions(response, threshold).await
  }

  async fn try_detect_from_bytes(
    &self,
    bytes: Bytes,
    threshold: f64,
  ) -> Result<Vec<DetectedIngredient>, DetectionError> {
    info!("Analyzing uploaded image ({} bytes)", bytes.len());
    image::load_from_memory(&bytes)?;

    let response = self
      .client
      .post(&self.image_endpoint)
      .header(PREDICTION_KEY_HEADER, &self.key)
      .header(CONTENT_TYPE, "application/octet-stream")
      .body(bytes)
      .send()
      .await?;

    self.read_predictions(response, threshold).await
  }
}

fn above_threshold(predictions: Vec<ProviderPrediction>, threshold: f64) -> Vec<DetectedIngredient> {
  predictions
    .into_iter()
    .filter(|prediction| prediction.probability >= threshold)
    .map(|prediction| DetectedIngredient { name: prediction.tag_name, probability: prediction.probability })
    .collect()
}
