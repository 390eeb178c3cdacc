use std::sync::Arc;

use crate::config::FrontendConfig;
use crate::detection::IngredientDetector;
use crate::ingredients::Vocabulary;
use crate::recipes::RecipeBook;
use crate::threshold::{ThresholdError, ThresholdStore};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
  pub config: Arc<FrontendConfig>,
  pub threshold: Arc<ThresholdStore>,
  pub vocabulary: Arc<Vocabulary>,
  pub recipes: Arc<RecipeBook>,
  pub detector: Arc<dyn IngredientDetector>,
}

impl AppState {
  /// State with the built-in vocabulary and recipe table
  pub fn new(config: FrontendConfig, detector: Arc<dyn IngredientDetector>) -> Result<Self, ThresholdError> {
    let threshold = ThresholdStore::new(config.confidence_threshold)?;

    Ok(Self {
      config: Arc::new(config),
      threshold: Arc::new(threshold),
      vocabulary: Arc::new(Vocabulary::standard()),
      recipes: Arc::new(RecipeBook::standard()),
      detector,
    })
  }

  pub fn with_recipes(mut self, recipes: RecipeBook) -> Self {
    self.recipes = Arc::new(recipes);
    self
  }
}
