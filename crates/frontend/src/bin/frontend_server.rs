//! Chef Recipe Server
//!
//! Serves ingredient detection and recipe suggestions over HTTP.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use frontend::{config::FrontendConfig, server::startup::start_server};

#[tokio::main]
async fn main() -> Result<()> {
  let config = FrontendConfig::parse();

  let filter = if config.verbose {
    EnvFilter::new("debug,hyper=info,reqwest=info")
  } else {
    EnvFilter::new("frontend=info,tower_http=warn,warn")
  };

  tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

  tracing::info!("Starting Chef recipe server v{}", env!("CARGO_PKG_VERSION"));

  if let Err(e) = start_server(config).await {
    tracing::error!("Server failed: {e:#}");
    return Err(e);
  }

  Ok(())
}
