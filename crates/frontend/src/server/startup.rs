//! REST server startup and configuration

use anyhow::{Context, Result};
use axum::serve;
use std::sync::Arc;
use tokio::{net::TcpListener, signal};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::config::FrontendConfig;
use crate::detection::{CustomVisionDetector, DETECTION_TIMEOUT};
use crate::server::{routing::create_router, state::AppState};
use crate::threshold::percent;

/// Validate configuration and run the server until shutdown
pub async fn start_server(config: FrontendConfig) -> Result<()> {
  config.validate()?;

  let endpoint = config.custom_vision_url.as_deref().context("CUSTOM_VISION_URL is not set")?;
  let key = config.custom_vision_key.as_deref().context("CUSTOM_VISION_KEY is not set")?;
  let detector = CustomVisionDetector::new(endpoint, key, DETECTION_TIMEOUT)?;
  info!("Custom Vision image endpoint: {}", detector.image_endpoint());
  info!("Confidence threshold: {}", percent(config.confidence_threshold));

  let bind_addr = config.bind_addr();
  let state = AppState::new(config, Arc::new(detector))?;

  let app = create_router(state)
    .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(CorsLayer::permissive()));

  let listener = TcpListener::bind(bind_addr).await?;
  info!("Server listening on {bind_addr}");

  serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(|e| anyhow::anyhow!("Server error: {e}"))?;

  info!("Server shutdown gracefully");
  Ok(())
}

async fn shutdown_signal() {
  let ctrl_c = async {
    if let Err(e) = signal::ctrl_c().await {
      tracing::error!("Failed to install Ctrl+C handler: {e}");
      std::future::pending::<()>().await;
    }
  };

  #[cfg(unix)]
  let terminate = async {
    match signal::unix::signal(signal::unix::SignalKind::terminate()) {
      Ok(mut stream) => {
        stream.recv().await;
      }
      Err(e) => {
        tracing::error!("Failed to install terminate handler: {e}");
        std::future::pending::<()>().await;
      }
    }
  };

  #[cfg(not(unix))]
  let terminate = std::future::pending::<()>();

  tokio::select! {
    _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
    _ = terminate => info!("Received terminate signal, shutting down"),
  }
}
