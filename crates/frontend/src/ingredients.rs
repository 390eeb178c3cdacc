//! Ingredient vocabulary and per-request presence flags

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Ingredients the classifier is trained to recognize
pub const KNOWN_INGREDIENTS: [&str; 47] = [
  "apple", "asparagus", "avocado", "banana", "beef",
  "beetroot", "blueberry", "bokchoy", "broccoli", "brown sugar",
  "cabbage", "cantaloupe", "capsicum", "carrot", "cauliflower",
  "cherry", "chicken", "chickpeas", "chili pepper", "coconut",
  "corn", "cucumber", "egg", "eggplant", "fish",
  "garlic", "lemon", "mango", "oil", "olive",
  "olive oil", "onion", "orange", "pasta", "peach",
  "peas", "pineapple", "potato", "rice", "salt",
  "scallop", "shrimp", "spinach", "sweet potato", "tomato",
  "watermelon", "zucchini",
];

/// An ingredient reported by the classifier above the confidence threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedIngredient {
  pub name: String,
  pub probability: f64,
}

/// The fixed set of ingredient names recipes are matched on
#[derive(Debug, Clone)]
pub struct Vocabulary {
  names: BTreeSet<String>,
}

impl Default for Vocabulary {
  fn default() -> Self {
    Self::standard()
  }
}

impl Vocabulary {
  pub fn standard() -> Self {
    Self::new(KNOWN_INGREDIENTS)
  }

  pub fn new<I, S>(names: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self { names: names.into_iter().map(Into::into).collect() }
  }

  pub fn contains(&self, name: &str) -> bool {
    self.names.contains(name)
  }

  pub fn len(&self) -> usize {
    self.names.len()
  }

  pub fn is_empty(&self) -> bool {
    self.names.is_empty()
  }

  /// All names in alphabetical order
  pub fn sorted(&self) -> Vec<String> {
    self.names.iter().cloned().collect()
  }

  /// Fresh flags with every ingredient absent
  pub fn flags(&self) -> IngredientFlags {
    IngredientFlags { flags: self.names.iter().map(|name| (name.clone(), false)).collect() }
  }

  /// Flags for classifier detections; tag names match case-insensitively
  pub fn flags_for_detections<'a, I>(&self, detections: I) -> IngredientFlags
  where
    I: IntoIterator<Item = &'a DetectedIngredient>,
  {
    let mut flags = self.flags();
    for detection in detections {
      flags.mark(&detection.name.to_lowercase());
    }
    tracing::info!("Ingredient flags created with {} active ingredients", flags.active_count());
    flags
  }

  /// Flags for a user's manual selection
  ///
  /// Names must match exactly. Returns the flags plus the accepted names in
  /// request order without repeats.
  pub fn flags_for_selection<'a, I>(&self, selection: I) -> (IngredientFlags, Vec<String>)
  where
    I: IntoIterator<Item = &'a str>,
  {
    let mut flags = self.flags();
    let mut accepted = Vec::new();
    for name in selection {
      if flags.mark(name) && !accepted.iter().any(|seen: &String| seen == name) {
        accepted.push(name.to_string());
      }
    }
    (flags, accepted)
  }
}

/// Presence flag per vocabulary ingredient
#[derive(Debug, Clone, PartialEq)]
pub struct IngredientFlags {
  flags: BTreeMap<String, bool>,
}

impl IngredientFlags {
  /// Mark `name` present; names outside the vocabulary are ignored
  pub fn mark(&mut self, name: &str) -> bool {
    match self.flags.get_mut(name) {
      Some(flag) => {
        *flag = true;
        true
      }
      None => false,
    }
  }

  pub fn is_present(&self, name: &str) -> bool {
    self.flags.get(name).copied().unwrap_or(false)
  }

  pub fn active(&self) -> BTreeSet<String> {
    self.flags.iter().filter(|(_, present)| **present).map(|(name, _)| name.clone()).collect()
  }

  pub fn active_count(&self) -> usize {
    self.flags.values().filter(|&&present| present).count()
  }
}
