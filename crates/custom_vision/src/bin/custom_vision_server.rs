//! Custom Vision Model Host Server
//!
//! Accepts Custom Vision prediction requests and forwards them to the configured
//! model-serving backend.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use custom_vision::{config::ProxyConfig, server::startup::start_server};

#[tokio::main]
async fn main() -> Result<()> {
  let config = ProxyConfig::parse();

  let filter = if config.verbose {
    EnvFilter::new("debug,hyper=info,reqwest=info")
  } else {
    EnvFilter::new("custom_vision=info,tower_http=warn,warn")
  };

  tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

  tracing::info!("Starting Custom Vision model host v{}", env!("CARGO_PKG_VERSION"));
  tracing::info!("Binding to address: {}", config.bind);

  start_server(config).await
}
