//! Request context middleware

use axum::{
  extract::Request,
  http::{Method, Uri},
  middleware::Next,
  response::Response,
};
use std::time::Instant;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Per-request metadata, available to handlers as an extension
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

  pub fn log_debug(&self, message: &str) {
    debug!("[{}] {} {} - {message}", self.request_id, self.method, self.uri.path());
  }

  pub fn log_info(&self, message: &str) {
    info!("[{}] {} {} - {message}", self.request_id, self.method, self.uri.path());
  }

  pub fn log_warn(&self, message: &str) {
    warn!("[{}] {} {} - {message}", self.request_id, self.method, self.uri.path());
  }

  pub fn log_error(&self, message: &str) {
    error!("[{}] {} {} - {message}", self.request_id, self.method, self.uri.path());
  }
}

pub async fn request_context_middleware(mut request: Request, next: Next) -> Response {
  let context = RequestContext::new(request.method().clone(), request.uri().clone());
  request.extensions_mut().insert(context.clone());

  let start_time = Instant::now();
  context.log_debug("Request started");
  let response = next.run(request).await;
  let status = response.status();
  let duration_ms = start_time.elapsed().as_secs_f64() * 1000.0;

  let message = format!("Request completed (Status: {}, Duration: {duration_ms:.2}ms)", status.as_u16());
  if status.is_server_error() {
    context.log_error(&message);
  } else if status.is_client_error() {
    context.log_warn(&message);
  } else {
    context.log_info(&message);
  }

  response
}
