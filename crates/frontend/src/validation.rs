//! Upload and URL validation
//!
//! Each check returns the first rule the input breaks; the error text is shown
//! to the user as-is.

use thiserror::Error;

use crate::config::FrontendConfig;

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
  #[error("No file selected")]
  NoFile,

  #[error("Unsupported format. Accepted formats: {accepted}")]
  UnsupportedFormat { accepted: String },

  #[error("File too large. Maximum size: {max_mb}MB")]
  FileTooLarge { max_mb: usize },

  #[error("Missing URL")]
  MissingUrl,

  #[error("Invalid URL (must start with http:// or https://)")]
  InvalidUrl,
}

/// Check an uploaded file's name and size against the configured limits
pub fn validate_image_file(
  filename: Option<&str>,
  size: usize,
  config: &FrontendConfig,
) -> Result<(), ValidationError> {
  let filename = filename.filter(|name| !name.is_empty()).ok_or(ValidationError::NoFile)?;

  let extension = filename.rsplit_once('.').map(|(_, ext)| ext).unwrap_or_default();
  if !config.extension_allowed(extension) {
    return Err(ValidationError::UnsupportedFormat { accepted: config.extensions().join(", ") });
  }

  if size > config.max_file_size {
    return Err(ValidationError::FileTooLarge { max_mb: config.max_file_size_mb() });
  }

  Ok(())
}

/// Check that an image URL is present and uses http or https
pub fn validate_image_url(url: &str) -> Result<(), ValidationError> {
  if url.trim().is_empty() {
    return Err(ValidationError::MissingUrl);
  }

  if !(url.starts_with("http://") || url.starts_with("https://")) {
    return Err(ValidationError::InvalidUrl);
  }

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use clap::Parser;

  fn config() -> FrontendConfig {
    FrontendConfig::try_parse_from([
      "frontend_server",
      "--max-file-size",
      "1048576",
      "--allowed-extensions",
      "jpg,jpeg,png,webp",
    ])
    .unwrap()
  }

  #[test]
  fn test_accepts_allowed_extension_any_case() {
    assert_eq!(validate_image_file(Some("dinner.JPG"), 10, &config()), Ok(()));
    assert_eq!(validate_image_file(Some("my.lunch.webp"), 10, &config()), Ok(()));
  }

  #[test]
  fn test_rejects_missing_file_name() {
    assert_eq!(validate_image_file(None, 10, &config()), Err(ValidationError::NoFile));
    assert_eq!(validate_image_file(Some(""), 10, &config()), Err(ValidationError::NoFile));
  }

  #[test]
  fn test_rejects_disallowed_extension() {
    let error = validate_image_file(Some("cat.gif"), 10, &config()).unwrap_err();
    assert_eq!(error.to_string(), "Unsupported format. Accepted formats: jpg, jpeg, png, webp");

    assert!(matches!(
      validate_image_file(Some("no_extension"), 10, &config()),
      Err(ValidationError::UnsupportedFormat { .. })
    ));
  }

  #[test]
  fn test_rejects_oversized_file() {
    let error = validate_image_file(Some("big.png"), 1_048_577, &config()).unwrap_err();
    assert_eq!(error.to_string(), "File too large. Maximum size: 1MB");
    assert_eq!(validate_image_file(Some("exact.png"), 1_048_576, &config()), Ok(()));
  }

  #[test]
  fn test_url_rules() {
    assert_eq!(validate_image_url("https://example.com/pic.png"), Ok(()));
    assert_eq!(validate_image_url("http://example.com/pic.png"), Ok(()));
    assert_eq!(validate_image_url("   "), Err(ValidationError::MissingUrl));
    assert_eq!(validate_image_url("ftp://example.com/pic.png"), Err(ValidationError::InvalidUrl));
    assert_eq!(validate_image_url("example.com/pic.png"), Err(ValidationError::InvalidUrl));
  }
}
