use axum::{
  body::Bytes,
  http::{HeaderMap, StatusCode},
  routing::post,
  Json, Router,
};
use frontend::detection::{
  detect_from_bytes, detect_from_url, CustomVisionDetector, DetectionError, IngredientDetector,
};
use image::{ImageBuffer, ImageFormat, Rgb};
use serde_json::{json, Value};
use std::{
  io::Cursor,
  net::SocketAddr,
  time::{Duration, Instant},
};
use tokio::net::TcpListener;

const KEY: &str = "secret";

fn png_bytes() -> Vec<u8> {
  let img = ImageBuffer::from_pixel(3, 3, Rgb([250u8, 240, 10]));
  let mut out = Cursor::new(Vec::new());
  img.write_to(&mut out, ImageFormat::Png).unwrap();
  out.into_inner()
}

fn authorized(headers: &HeaderMap) -> bool {
  headers.get("Prediction-Key").and_then(|v| v.to_str().ok()) == Some(KEY)
}

async fn classify_url(headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
  if !authorized(&headers) {
    return (StatusCode::UNAUTHORIZED, Json(json!({"error": "bad key"})));
  }
  if body.get("Url").and_then(Value::as_str).is_none() {
    return (StatusCode::BAD_REQUEST, Json(json!({"error": "no Url"})));
  }
  (
    StatusCode::OK,
    Json(json!({
      "id": "p-1",
      "predictions": [
        {"probability": 0.91, "tagId": "a", "tagName": "tomato"},
        {"probability": 0.05, "tagId": "b", "tagName": "onion"},
        {"probability": 0.5, "tagId": "c", "tagName": "Egg"}
      ]
    })),
  )
}

async fn classify_image(headers: HeaderMap, body: Bytes) -> (StatusCode, Json<Value>) {
  if !authorized(&headers) || image::guess_format(&body).is_err() {
    return (StatusCode::BAD_REQUEST, Json(json!({"error": "rejected"})));
  }
  (StatusCode::OK, Json(json!({"predictions": [{"probability": 0.8, "tagName": "rice"}]})))
}

async fn slow_classify() -> Json<Value> {
  tokio::time::sleep(Duration::from_secs(5)).await;
  Json(json!({"predictions": [{"probability": 0.9, "tagName": "tomato"}]}))
}

async fn spawn_custom_vision() -> SocketAddr {
  let app = Router::new()
    .route("/proj/classify/iterations/It1/url", post(classify_url))
    .route("/proj/classify/iterations/It1/image", post(classify_image))
    .route("/broken/url", post(|| async { "<html>maintenance</html>" }))
    .route("/slow/url", post(slow_classify));

  let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();
  tokio::spawn(async move {
    axum::serve(listener, app).await.unwrap();
  });
  addr
}

fn detector(addr: SocketAddr, path: &str, key: &str) -> CustomVisionDetector {
  CustomVisionDetector::new(&format!("http://{addr}{path}"), key, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_url_detection_filters_by_threshold() {
  let addr = spawn_custom_vision().await;
  let detector = detector(addr, "/proj/classify/iterations/It1/url", KEY);

  let detected = detector.try_detect_from_url("https://images.test/plate.jpg", 0.5).await.unwrap();

  let names: Vec<&str> = detected.iter().map(|d| d.name.as_str()).collect();
  assert_eq!(names, vec!["tomato", "Egg"]);
  assert_eq!(detected[0].probability, 0.91);
}

#[tokio::test]
async fn test_upload_goes_to_image_route() {
  let addr = spawn_custom_vision().await;
  let detector = detector(addr, "/proj/classify/iterations/It1/url", KEY);
  assert!(detector.image_endpoint().ends_with("/proj/classify/iterations/It1/image"));

  let detected = detector.try_detect_from_bytes(Bytes::from(png_bytes()), 0.1).await.unwrap();

  assert_eq!(detected.len(), 1);
  assert_eq!(detected[0].name, "rice");
}

#[tokio::test]
async fn test_rejected_key_is_a_status_error() {
  let addr = spawn_custom_vision().await;
  let detector = detector(addr, "/proj/classify/iterations/It1/url", "wrong");

  let result = detector.try_detect_from_url("https://images.test/plate.jpg", 0.1).await;
  match result {
    Err(DetectionError::Status { status, body }) => {
      assert_eq!(status, 401);
      assert!(body.contains("bad key"));
    }
    other => panic!("expected status error, got {other:?}"),
  }

  assert!(detect_from_url(&detector, "https://images.test/plate.jpg", 0.1).await.is_empty());
}

#[tokio::test]
async fn test_malformed_response_degrades_to_nothing() {
  let addr = spawn_custom_vision().await;
  let detector = detector(addr, "/broken/url", KEY);

  let result = detector.try_detect_from_url("https://images.test/plate.jpg", 0.1).await;
  assert!(matches!(result, Err(DetectionError::Request(_))));

  assert!(detect_from_url(&detector, "https://images.test/plate.jpg", 0.1).await.is_empty());
}

#[tokio::test]
async fn test_unreachable_service_degrades_to_nothing() {
  let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();
  drop(listener);

  let detector = detector(addr, "/proj/url", KEY);
  assert!(detect_from_bytes(&detector, Bytes::from(png_bytes()), 0.1).await.is_empty());
}

#[tokio::test]
async fn test_timeout_degrades_to_nothing() {
  let addr = spawn_custom_vision().await;
  let detector =
    CustomVisionDetector::new(&format!("http://{addr}/slow/url"), KEY, Duration::from_millis(200)).unwrap();

  let started = Instant::now();
  let result = detector.try_detect_from_url("https://images.test/plate.jpg", 0.1).await;
  assert!(matches!(result, Err(DetectionError::Request(ref e)) if e.is_timeout()));

  assert!(detect_from_url(&detector, "https://images.test/plate.jpg", 0.1).await.is_empty());
  assert!(started.elapsed() < Duration::from_secs(3));
}
