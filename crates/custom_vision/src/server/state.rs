use std::sync::Arc;

use crate::predictor::Predictor;

/// Shared handler state
#[derive(Clone)]
pub struct ProxyState {
  pub predictor: Arc<dyn Predictor>,
}

impl ProxyState {
  pub fn new(predictor: Arc<dyn Predictor>) -> Self {
    Self { predictor }
  }
}
