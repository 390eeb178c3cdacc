//! Index endpoint handler

/// GET / - Identify the host
pub async fn index() -> &'static str {
  "CustomVision.ai model host harness"
}
