//! Request context middleware
//!
//! Every request gets an id that prefixes all log lines written on its behalf.

use axum::{
  extract::Request,
  http::{Method, Uri},
  middleware::Next,
  response::Response,
};
use std::time::Instant;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Request metadata injected into handlers as an extension
#[derive(Clone, Debug)]
pub struct RequestContext {
  pub request_id: Uuid,
  pub method: Method,
  pub uri: Uri,
}

impl RequestContext {
  pub fn new(method: Method, uri: Uri) -> Self {
    Self { request_id: Uuid::new_v4(), method, uri }
  }

  fn prefix(&self) -> String {
    format!("[{}] {} {}", self.request_id, self.method, self.uri.path())
  }

  pub fn log_debug(&self, message: &str) {
    debug!("{} - {message}", self.prefix());
  }

  pub fn log_info(&self, message: &str) {
    info!("{} - {message}", self.prefix());
  }

  pub fn log_warn(&self, message: &str) {
    warn!("{} - {message}", self.prefix());
  }

  pub fn log_error(&self, message: &str) {
    error!("{} - {message}", self.prefix());
  }
}

/// Inject a [`RequestContext`] and log request start and completion
pub async fn request_context_middleware(mut request: Request, next: Next) -> Response {
  let context = RequestContext::new(request.method().clone(), request.uri().clone());

  let start_time = Instant::now();
  context.log_debug("Request started");
  request.extensions_mut().insert(context.clone());

  let response = next.run(request).await;

  let duration_ms = start_time.elapsed().as_secs_f64() * 1000.0;
  context.log_info(&format!(
    "Request completed (Status: {}, Duration: {duration_ms:.2}ms)",
    response.status().as_u16()
  ));

  response
}
