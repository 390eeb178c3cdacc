//! REST server startup and configuration

use anyhow::Result;
use axum::serve;
use std::sync::Arc;
use tokio::{net::TcpListener, signal};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::config::ProxyConfig;
use crate::predictor::RemotePredictor;
use crate::server::{routing::create_router, state::ProxyState};

/// Start the REST server
pub async fn start_server(config: ProxyConfig) -> Result<()> {
  let predictor =
    RemotePredictor::new(&config.prediction_endpoint, config.prediction_key.clone(), config.timeout())?;
  info!("Forwarding predictions to {}", predictor.image_endpoint());

  let state = ProxyState::new(Arc::new(predictor));

  let app = create_router(state)
    .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(CorsLayer::permissive()));

  let listener = TcpListener::bind(config.bind).await?;
  info!("Server listening on {}", config.bind);

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
    info!("Received Ctrl+C, shutting down");
  };

  #[cfg(unix)]
  let terminate = async {
    match signal::unix::signal(signal::unix::SignalKind::terminate()) {
      Ok(mut stream) => {
        stream.recv().await;
        info!("Received terminate signal, shutting down");
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
    _ = ctrl_c => {},
    _ = terminate => {},
  }
}
