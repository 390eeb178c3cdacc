//! Prediction backends
//!
//! The host does not run a model itself. A [`Predictor`] scores a decoded image,
//! or an image behind a URL, and answers in the Custom Vision response shape.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{header::CONTENT_TYPE, Client};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;
use uuid::Uuid;

use crate::payload::{ImagePayload, PayloadError};

/// Header carrying the backend key
pub const PREDICTION_KEY_HEADER: &str = "Prediction-Key";

// Response Shape
// ==============

/// Region of the image a detection applies to, as fractions of width and height
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
  pub left: f64,
  pub top: f64,
  pub width: f64,
  pub height: f64,
}

/// A single tag prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
  pub probability: f64,

  /// Tag identifier as reported by the backend (index or GUID)
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub tag_id: Option<serde_json::Value>,

  pub tag_name: String,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub bounding_box: Option<BoundingBox>,
}

/// Full prediction response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
  #[serde(default)]
  pub id: String,

  #[serde(default)]
  pub project: String,

  #[serde(default)]
  pub iteration: String,

  #[serde(default = "Utc::now")]
  pub created: DateTime<Utc>,

  #[serde(default)]
  pub predictions: Vec<Prediction>,
}

impl PredictionResult {
  pub fn new(predictions: Vec<Prediction>) -> Self {
    Self {
      id: Uuid::new_v4().to_string(),
      project: String::new(),
      iteration: String::new(),
      created: Utc::now(),
      predictions,
    }
  }

  /// Fill in an id when the backend did not send one
  pub fn normalized(mut self) -> Self {
    if self.id.is_empty() {
      self.id = Uuid::new_v4().to_string();
    }
    self
  }
}

// Errors
// ======

#[derive(Debug, Error)]
pub enum PredictionError {
  #[error("invalid image url {url}: {reason}")]
  InvalidUrl { url: String, reason: String },

  #[error("request failed: {0}")]
  Transport(#[from] reqwest::Error),

  #[error("backend returned {status}: {body}")]
  Backend { status: u16, body: String },

  #[error(transparent)]
  Payload(#[from] PayloadError),
}

// Predictor Seam
// ==============

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Predictor: Send + Sync {
  /// Score an already decoded image
  async fn predict_image(&self, image: &ImagePayload) -> Result<PredictionResult, PredictionError>;

  /// Fetch the image at `url` and score it
  async fn predict_url(&self, url: &str) -> Result<PredictionResult, PredictionError>;
}

/// Forwards image bytes to a model-serving backend over HTTP
pub struct RemotePredictor {
  client: Client,
  endpoint: String,
  key: Option<String>,
}

impl RemotePredictor {
  pub fn new(endpoint: impl Into<String>, key: Option<String>, timeout: Duration) -> anyhow::Result<Self> {
    let client = Client::builder().timeout(timeout).build()?;
    Ok(Self { client, endpoint: endpoint.into(), key })
  }

  /// Backend route that receives image bytes
  pub fn image_endpoint(&self) -> String {
    format!("{}/image", self.endpoint.trim_end_matches('/'))
  }

  async fn download(&self, url: &str) -> Result<ImagePayload, PredictionError> {
    let parsed = Url::parse(url)
      .map_err(|e| PredictionError::InvalidUrl { url: url.to_string(), reason: e.to_string() })?;

    if !matches!(parsed.scheme(), "http" | "https") {
      return Err(PredictionError::InvalidUrl {
        url: url.to_string(),
        reason: format!("unsupported scheme '{}'", parsed.scheme()),
      });
    }

    let response = self.client.get(parsed).send().await?.error_for_status()?;
    let bytes = response.bytes().await?;
    debug!("Downloaded {} bytes from {url}", bytes.len());

    Ok(ImagePayload::decode(bytes)?)
  }
}

#[async_trait]
impl Predictor for RemotePredictor {
  async fn predict_image(&self, image: &ImagePayload) -> Result<PredictionResult, PredictionError> {
    let (width, height) = image.dimensions();
    debug!("Scoring {width}x{height} {} image", image.mime_type());

    let mut request = self
      .client
      .post(self.image_endpoint())
      .header(CONTENT_TYPE, "application/octet-stream")
      .body(image.bytes().clone());

    if let Some(key) = &self.key {
      request = request.header(PREDICTION_KEY_HEADER, key);
    }

    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      return Err(PredictionError::Backend { status: status.as_u16(), body });
    }

    let result: PredictionResult = response.json().await?;
    info!("Backend returned {} predictions", result.predictions.len());
    Ok(result.normalized())
  }

  async fn predict_url(&self, url: &str) -> Result<PredictionResult, PredictionError> {
    let image = self.download(url).await?;
    self.predict_image(&image).await
  }
}
