//! Command line and environment configuration for the recipe service

use anyhow::{bail, Result};
use clap::Parser;
use std::net::{IpAddr, SocketAddr};

const BYTES_PER_MB: usize = 1024 * 1024;

#[derive(Debug, Clone, Parser)]
#[command(name = "frontend_server")]
#[command(about = "Chef - recipe suggestions from food photos")]
#[command(version)]
pub struct FrontendConfig {
  /// Interface to listen on
  #[arg(long, env = "FRONTEND_HOST", default_value = "0.0.0.0")]
  pub host: IpAddr,

  /// Port to listen on
  #[arg(long, env = "FRONTEND_PORT", default_value_t = 5000)]
  pub port: u16,

  /// Custom Vision prediction endpoint (URL route)
  #[arg(long, env = "CUSTOM_VISION_URL")]
  pub custom_vision_url: Option<String>,

  /// Custom Vision prediction key
  #[arg(long, env = "CUSTOM_VISION_KEY", hide_env_values = true)]
  pub custom_vision_key: Option<String>,

  /// Minimum probability for a prediction to count as a detected ingredient
  #[arg(long, env = "CONFIDENCE_THRESHOLD", default_value_t = 0.1)]
  pub confidence_threshold: f64,

  /// Largest accepted upload, in bytes
  #[arg(long, env = "MAX_FILE_SIZE", default_value_t = 5 * BYTES_PER_MB)]
  pub max_file_size: usize,

  /// Accepted upload extensions
  #[arg(long, env = "ALLOWED_EXTENSIONS", value_delimiter = ',', default_value = "jpg,jpeg,png,webp")]
  pub allowed_extensions: Vec<String>,

  /// Enable verbose logging
  #[arg(short, long)]
  pub verbose: bool,
}

impl FrontendConfig {
  /// Fail fast on settings the service cannot run without
  pub fn validate(&self) -> Result<()> {
    let missing: Vec<&str> = [
      ("CUSTOM_VISION_URL", &self.custom_vision_url),
      ("CUSTOM_VISION_KEY", &self.custom_vision_key),
    ]
    .into_iter()
    .filter(|(_, value)| value.as_deref().map_or(true, |v| v.trim().is_empty()))
    .map(|(name, _)| name)
    .collect();

    if !missing.is_empty() {
      bail!("Missing environment variables: {}", missing.join(", "));
    }

    if !(0.0..=1.0).contains(&self.confidence_threshold) {
      bail!("CONFIDENCE_THRESHOLD must be between 0.0 and 1.0, got {}", self.confidence_threshold);
    }

    Ok(())
  }

  pub fn bind_addr(&self) -> SocketAddr {
    SocketAddr::new(self.host, self.port)
  }

  pub fn custom_vision_configured(&self) -> bool {
    let present = |value: &Option<String>| value.as_deref().is_some_and(|v| !v.trim().is_empty());
    present(&self.custom_vision_url) && present(&self.custom_vision_key)
  }

  /// Upload ceiling in whole megabytes, as shown to users
  pub fn max_file_size_mb(&self) -> usize {
    self.max_file_size / BYTES_PER_MB
  }

  /// Normalized allow-list: trimmed, lowercase, no blanks or repeats
  pub fn extensions(&self) -> Vec<String> {
    let mut extensions: Vec<String> = Vec::new();
    for extension in &self.allowed_extensions {
      let extension = extension.trim().trim_start_matches('.').to_lowercase();
      if !extension.is_empty() && !extensions.contains(&extension) {
        extensions.push(extension);
      }
    }
    extensions
  }

  pub fn extension_allowed(&self, extension: &str) -> bool {
    let extension = extension.to_lowercase();
    self.extensions().iter().any(|allowed| *allowed == extension)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use clap::CommandFactory;

  fn parse(args: &[&str]) -> FrontendConfig {
    let mut argv = vec!["frontend_server"];
    argv.extend_from_slice(args);
    FrontendConfig::try_parse_from(argv).unwrap()
  }

  fn declared_default(id: &str) -> String {
    let command = FrontendConfig::command();
    let arg = command.get_arguments().find(|arg| arg.get_id() == id).unwrap();
    arg.get_default_values().iter().map(|v| v.to_string_lossy().into_owned()).collect::<Vec<_>>().join(",")
  }

  #[test]
  fn test_declared_defaults() {
    assert_eq!(declared_default("host"), "0.0.0.0");
    assert_eq!(declared_default("port"), "5000");
    assert_eq!(declared_default("confidence_threshold"), "0.1");
    assert_eq!(declared_default("max_file_size"), "5242880");
    assert_eq!(declared_default("allowed_extensions"), "jpg,jpeg,png,webp");
  }

  #[test]
  fn test_derived_settings() {
    let config = parse(&[
      "--custom-vision-url",
      "http://cv/url",
      "--custom-vision-key",
      "k",
      "--port",
      "5000",
      "--confidence-threshold",
      "0.1",
      "--max-file-size",
      "5242880",
      "--allowed-extensions",
      "jpg,jpeg,png,webp",
    ]);

    assert_eq!(config.bind_addr().port(), 5000);
    assert_eq!(config.max_file_size_mb(), 5);
    assert_eq!(config.extensions(), vec!["jpg", "jpeg", "png", "webp"]);
    assert!(config.custom_vision_configured());
    assert!(config.validate().is_ok());
  }

  #[test]
  fn test_validate_reports_missing_credentials() {
    let config = parse(&["--custom-vision-url", "  ", "--custom-vision-key", "", "--confidence-threshold", "0.1"]);

    let error = config.validate().unwrap_err().to_string();
    assert_eq!(error, "Missing environment variables: CUSTOM_VISION_URL, CUSTOM_VISION_KEY");
    assert!(!config.custom_vision_configured());
  }

  #[test]
  fn test_validate_rejects_threshold_out_of_range() {
    let config = parse(&[
      "--custom-vision-url",
      "http://cv/url",
      "--custom-vision-key",
      "k",
      "--confidence-threshold",
      "1.5",
    ]);
    assert!(config.validate().is_err());
  }

  #[test]
  fn test_extensions_are_normalized() {
    let config = parse(&["--allowed-extensions", " PNG,.jpg,,png,Gif "]);

    assert_eq!(config.extensions(), vec!["png", "jpg", "gif"]);
    assert!(config.extension_allowed("GIF"));
    assert!(!config.extension_allowed("webp"));
  }
}
