use async_trait::async_trait;
use axum::{
  body::Body,
  http::{header::CONTENT_TYPE, Request, StatusCode},
  Router,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use custom_vision::{
  payload::ImagePayload,
  predictor::{Prediction, PredictionError, PredictionResult, Predictor},
  server::{routing::create_router, state::ProxyState},
};
use http_body_util::BodyExt;
use image::{ImageBuffer, ImageFormat, Rgb};
use serde_json::Value;
use std::{io::Cursor, sync::Arc};
use tower::ServiceExt;

/// Predictor that reports the image size back as a single prediction
struct SizeEchoPredictor;

#[async_trait]
impl Predictor for SizeEchoPredictor {
  async fn predict_image(&self, image: &ImagePayload) -> Result<PredictionResult, PredictionError> {
    let (width, height) = image.dimensions();
    Ok(PredictionResult::new(vec![Prediction {
      probability: 0.75,
      tag_id: None,
      tag_name: format!("{width}x{height}"),
      bounding_box: None,
    }]))
  }

  async fn predict_url(&self, url: &str) -> Result<PredictionResult, PredictionError> {
    Err(PredictionError::Backend { status: 502, body: format!("cannot reach {url}") })
  }
}

fn app() -> Router {
  create_router(ProxyState::new(Arc::new(SizeEchoPredictor)))
}

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
  let img = ImageBuffer::from_pixel(width, height, Rgb([10u8, 200, 30]));
  let mut out = Cursor::new(Vec::new());
  img.write_to(&mut out, ImageFormat::Png).unwrap();
  out.into_inner()
}

async fn json_body(response: axum::response::Response) -> Value {
  let bytes = response.into_body().collect().await.unwrap().to_bytes();
  serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_index() {
  let response = app().oneshot(Request::get("/").body(Body::empty()).unwrap()).await.unwrap();
  assert_eq!(response.status(), StatusCode::OK);

  let bytes = response.into_body().collect().await.unwrap().to_bytes();
  assert_eq!(&bytes[..], b"CustomVision.ai model host harness");
}

#[tokio::test]
async fn test_raw_body_image() {
  let request = Request::post("/image")
    .header(CONTENT_TYPE, "application/octet-stream")
    .body(Body::from(png_bytes(4, 3)))
    .unwrap();

  let response = app().oneshot(request).await.unwrap();
  assert_eq!(response.status(), StatusCode::OK);

  let body = json_body(response).await;
  assert_eq!(body["predictions"][0]["tagName"], "4x3");
  assert_eq!(body["predictions"][0]["probability"], 0.75);
  assert!(body["id"].as_str().is_some_and(|id| !id.is_empty()));
}

#[tokio::test]
async fn test_multipart_image_on_iteration_route() {
  let boundary = "chefboundary";
  let mut body = Vec::new();
  body.extend_from_slice(
    format!(
      "--{boundary}\r\nContent-Disposition: form-data; name=\"imageData\"; filename=\"dish.png\"\r\nContent-Type: image/png\r\n\r\n"
    )
    .as_bytes(),
  );
  body.extend_from_slice(&png_bytes(2, 5));
  body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

  let request = Request::post("/kitchen/detect/iterations/Iteration3/image/nostore")
    .header(CONTENT_TYPE, format!("multipart/form-data; boundary={boundary}"))
    .body(Body::from(body))
    .unwrap();

  let response = app().oneshot(request).await.unwrap();
  assert_eq!(response.status(), StatusCode::OK);
  assert_eq!(json_body(response).await["predictions"][0]["tagName"], "2x5");
}

#[tokio::test]
async fn test_base64_form_field_image() {
  let encoded = STANDARD.encode(png_bytes(1, 1));
  let form = format!(
    "imageData={}",
    encoded.replace('+', "%2B").replace('/', "%2F").replace('=', "%3D")
  );
  let request = Request::post("/kitchen/image")
    .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
    .body(Body::from(form))
    .unwrap();

  let response = app().oneshot(request).await.unwrap();
  assert_eq!(response.status(), StatusCode::OK);
  assert_eq!(json_body(response).await["predictions"][0]["tagName"], "1x1");
}

#[tokio::test]
async fn test_undecodable_image_is_server_error() {
  let request = Request::post("/image").body(Body::from("plain text, not pixels")).unwrap();

  let response = app().oneshot(request).await.unwrap();
  assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

  let body = json_body(response).await;
  assert!(body["error"].as_str().unwrap().starts_with("Error processing image:"));
}

#[tokio::test]
async fn test_url_invalid_json() {
  let request = Request::post("/url").body(Body::from("{not json")).unwrap();

  let response = app().oneshot(request).await.unwrap();
  assert_eq!(response.status(), StatusCode::BAD_REQUEST);
  assert_eq!(json_body(response).await["error"], "Invalid JSON format");
}

#[tokio::test]
async fn test_url_missing_field() {
  let request = Request::post("/kitchen/url").body(Body::from(r#"{"url": ""}"#)).unwrap();

  let response = app().oneshot(request).await.unwrap();
  assert_eq!(response.status(), StatusCode::BAD_REQUEST);
  assert_eq!(json_body(response).await["error"], "Missing url or Url field in request");
}

#[tokio::test]
async fn test_url_prediction_failure_is_server_error() {
  let request = Request::post("/url").body(Body::from(r#"{"url": "http://nowhere.test/a.png"}"#)).unwrap();

  let response = app().oneshot(request).await.unwrap();
  assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

  let error = json_body(response).await["error"].as_str().unwrap().to_string();
  assert!(error.contains("cannot reach http://nowhere.test/a.png"));
}

#[tokio::test]
async fn test_oversized_body_rejected() {
  let request = Request::post("/image")
    .header(CONTENT_TYPE, "application/octet-stream")
    .body(Body::from(vec![0u8; 4 * 1024 * 1024 + 1]))
    .unwrap();

  let response = app().oneshot(request).await.unwrap();
  assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}
