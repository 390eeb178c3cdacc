//! Command line and environment configuration for the model host

use clap::Parser;
use std::{net::SocketAddr, time::Duration};

/// Largest request body the prediction routes accept
pub const MAX_CONTENT_LENGTH: usize = 4 * 1024 * 1024;

#[derive(Debug, Clone, Parser)]
#[command(name = "custom_vision_server")]
#[command(about = "Custom Vision compatible model host")]
#[command(version)]
pub struct ProxyConfig {
  /// Server bind address
  #[arg(long, env = "CUSTOM_VISION_BIND", default_value = "0.0.0.0:80")]
  pub bind: SocketAddr,

  /// Base URL of the model-serving backend that scores image bytes
  #[arg(long, env = "PREDICTION_ENDPOINT")]
  pub prediction_endpoint: String,

  /// Key sent to the backend as the `Prediction-Key` header
  #[arg(long, env = "PREDICTION_KEY")]
  pub prediction_key: Option<String>,

  /// Timeout for backend calls and image downloads, in seconds
  #[arg(long, env = "PREDICTION_TIMEOUT_SECS", default_value_t = 30)]
  pub timeout_secs: u64,

  /// Enable verbose logging
  #[arg(short, long)]
  pub verbose: bool,
}

impl ProxyConfig {
  pub fn timeout(&self) -> Duration {
    Duration::from_secs(self.timeout_secs)
  }
}
