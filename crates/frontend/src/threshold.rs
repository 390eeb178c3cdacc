//! Confidence threshold store
//!
//! The threshold is read on every detection and may be changed at runtime
//! through `/config`. It lives in an atomic cell holding the `f64` bit pattern,
//! so a reader always sees a whole value. Concurrent updates race; the last
//! write wins.

use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

pub const DEFAULT_THRESHOLD: f64 = 0.1;

#[derive(Debug, Error, PartialEq)]
pub enum ThresholdError {
  #[error("Threshold must be between 0.0 and 1.0")]
  OutOfRange(f64),
}

#[derive(Debug)]
pub struct ThresholdStore {
  bits: AtomicU64,
}

impl Default for ThresholdStore {
  fn default() -> Self {
    Self { bits: AtomicU64::new(DEFAULT_THRESHOLD.to_bits()) }
  }
}

impl ThresholdStore {
  pub fn new(initial: f64) -> Result<Self, ThresholdError> {
    check(initial)?;
    Ok(Self { bits: AtomicU64::new(initial.to_bits()) })
  }

  pub fn get(&self) -> f64 {
    f64::from_bits(self.bits.load(Ordering::Acquire))
  }

  /// Store `value` and return the previous threshold
  ///
  /// Out-of-range and non-finite values are rejected and leave the store unchanged.
  pub fn set(&self, value: f64) -> Result<f64, ThresholdError> {
    check(value)?;
    Ok(f64::from_bits(self.bits.swap(value.to_bits(), Ordering::AcqRel)))
  }
}

fn check(value: f64) -> Result<(), ThresholdError> {
  // NaN fails the range check
  if (0.0..=1.0).contains(&value) {
    Ok(())
  } else {
    Err(ThresholdError::OutOfRange(value))
  }
}

/// Render a threshold the way users see it, e.g. `0.25` -> `"25%"`
pub fn percent(value: f64) -> String {
  format!("{:.0}%", value * 100.0)
}
