//! Image payload extraction and decoding
//!
//! Prediction requests carry the image in one of three places: a multipart part
//! named `imageData`, an urlencoded form field `imageData` holding base64 text, or
//! the raw request body. Whatever arrives must decode as an image before it is
//! handed to a predictor.

use axum::{
  body::Bytes,
  extract::{FromRequest, Multipart, Request},
  http::{header::CONTENT_TYPE, StatusCode},
  Form,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use image::ImageFormat;
use std::collections::HashMap;
use thiserror::Error;

/// Form and multipart field carrying the image
pub const IMAGE_FIELD: &str = "imageData";

#[derive(Debug, Error)]
pub enum PayloadError {
  #[error("empty image payload")]
  Empty,

  #[error("request body too large")]
  TooLarge,

  #[error("malformed request body: {0}")]
  Malformed(String),

  #[error("invalid base64 image data: {0}")]
  Base64(#[from] base64::DecodeError),

  #[error("cannot identify image file: {0}")]
  Decode(#[from] image::ImageError),
}

/// Image bytes that are known to decode
#[derive(Debug, Clone)]
pub struct ImagePayload {
  bytes: Bytes,
  format: ImageFormat,
  width: u32,
  height: u32,
}

impl ImagePayload {
  /// Decode `bytes`, keeping the original encoding for forwarding
  pub fn decode(bytes: impl Into<Bytes>) -> Result<Self, PayloadError> {
    let bytes = bytes.into();
    if bytes.is_empty() {
      return Err(PayloadError::Empty);
    }

    let format = image::guess_format(&bytes)?;
    let decoded = image::load_from_memory_with_format(&bytes, format)?;

    Ok(Self { bytes, format, width: decoded.width(), height: decoded.height() })
  }

  pub fn bytes(&self) -> &Bytes {
    &self.bytes
  }

  pub fn format(&self) -> ImageFormat {
    self.format
  }

  pub fn mime_type(&self) -> &'static str {
    self.format.to_mime_type()
  }

  pub fn dimensions(&self) -> (u32, u32) {
    (self.width, self.height)
  }
}

/// Pull the raw image bytes out of a prediction request
pub async fn extract_image_data(request: Request) -> Result<Bytes, PayloadError> {
  let content_type = request
    .headers()
    .get(CONTENT_TYPE)
    .and_then(|value| value.to_str().ok())
    .unwrap_or_default()
    .to_ascii_lowercase();

  if content_type.starts_with("multipart/form-data") {
    from_multipart(request).await
  } else if content_type.starts_with("application/x-www-form-urlencoded") {
    from_form(request).await
  } else {
    Bytes::from_request(request, &())
      .await
      .map_err(|rejection| rejected(rejection.status(), rejection.body_text()))
  }
}

async fn from_multipart(request: Request) -> Result<Bytes, PayloadError> {
  let mut multipart = Multipart::from_request(request, &())
    .await
    .map_err(|rejection| rejected(rejection.status(), rejection.body_text()))?;

  while let Some(field) =
    multipart.next_field().await.map_err(|e| rejected(e.status(), e.body_text()))?
  {
    if field.name() == Some(IMAGE_FIELD) {
      return field.bytes().await.map_err(|e| rejected(e.status(), e.body_text()));
    }
  }

  Err(PayloadError::Empty)
}

async fn from_form(request: Request) -> Result<Bytes, PayloadError> {
  let Form(fields) = Form::<HashMap<String, String>>::from_request(request, &())
    .await
    .map_err(|rejection| rejected(rejection.status(), rejection.body_text()))?;

  match fields.get(IMAGE_FIELD) {
    Some(encoded) => Ok(Bytes::from(STANDARD.decode(encoded.trim())?)),
    None => Err(PayloadError::Empty),
  }
}

fn rejected(status: StatusCode, text: String) -> PayloadError {
  if status == StatusCode::PAYLOAD_TOO_LARGE {
    PayloadError::TooLarge
  } else {
    PayloadError::Malformed(text)
  }
}
