//! Recipe table and overlap scoring
//!
//! A recipe scores `matching / total`, the fraction of its ingredients that are
//! available. Small recipes that are almost fully covered therefore outrank large
//! ones with many missing ingredients. Results are sorted by score, then by the
//! raw match count, both descending. The sort is stable, so equal entries keep
//! table order.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Most suggestions returned for one request
pub const MAX_SUGGESTIONS: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct Recipe {
  pub name: String,
  ingredients: Vec<String>,
  pub description: String,
}

impl Recipe {
  /// Build a recipe; repeated ingredients are kept once, in first-seen order
  pub fn new<I, S>(name: impl Into<String>, ingredients: I, description: impl Into<String>) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    let mut unique: Vec<String> = Vec::new();
    for ingredient in ingredients {
      let ingredient = ingredient.into();
      if !unique.contains(&ingredient) {
        unique.push(ingredient);
      }
    }

    Self { name: name.into(), ingredients: unique, description: description.into() }
  }

  pub fn ingredients(&self) -> &[String] {
    &self.ingredients
  }

  /// Number of this recipe's ingredients present in `available`
  pub fn matching(&self, available: &BTreeSet<String>) -> usize {
    self.ingredients.iter().filter(|ingredient| available.contains(*ingredient)).count()
  }
}

/// A ranked suggestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeScore {
  /// 1-based rank
  pub position: usize,
  pub name: String,
  pub score: f64,
  pub matching_ingredients: usize,
  pub description: String,
}

/// Immutable recipe table
#[derive(Debug, Clone)]
pub struct RecipeBook {
  recipes: Vec<Recipe>,
}

impl Default for RecipeBook {
  fn default() -> Self {
    Self::standard()
  }
}

impl RecipeBook {
  pub fn new(recipes: Vec<Recipe>) -> Self {
    Self { recipes }
  }

  /// The built-in table
  pub fn standard() -> Self {
    Self::new(vec![
      Recipe::new("Tomato Salad", ["tomato", "olive oil", "salt", "onion"], "Fresh tomato salad"),
      Recipe::new(
        "Vegetable Omelet",
        ["egg", "tomato", "onion", "salt", "oil"],
        "Nutritious omelet with fresh vegetables",
      ),
      Recipe::new(
        "Stir-fried Vegetables",
        ["carrot", "broccoli", "onion", "garlic", "oil"],
        "Asian-style sautéed vegetables",
      ),
      Recipe::new("Fruit Salad", ["apple", "banana", "orange", "mango"], "Fresh fruit medley"),
      Recipe::new(
        "Vegetable Curry",
        ["potato", "carrot", "onion", "garlic", "coconut"],
        "Spicy vegetarian curry",
      ),
      Recipe::new(
        "Guacamole",
        ["avocado", "tomato", "onion", "garlic", "lemon"],
        "Mexican avocado sauce",
      ),
      Recipe::new(
        "Green Salad",
        ["spinach", "cucumber", "tomato", "olive oil"],
        "Light and refreshing salad",
      ),
      Recipe::new(
        "Vegetable Soup",
        ["carrot", "potato", "onion", "garlic", "salt"],
        "Comforting vegetable soup",
      ),
      Recipe::new(
        "Tropical Smoothie",
        ["mango", "pineapple", "banana", "coconut"],
        "Exotic fruit beverage",
      ),
      Recipe::new(
        "Ratatouille",
        ["eggplant", "zucchini", "tomato", "onion", "garlic"],
        "Traditional French vegetable dish",
      ),
      Recipe::new(
        "Fried Rice",
        ["rice", "egg", "carrot", "peas", "onion"],
        "Stir-fried rice with vegetables",
      ),
      Recipe::new(
        "Chicken Salad",
        ["chicken", "tomato", "cucumber", "olive oil"],
        "Protein-rich chicken salad",
      ),
    ])
  }

  pub fn recipes(&self) -> &[Recipe] {
    &self.recipes
  }

  /// Rank recipes against the available ingredients
  ///
  /// Recipes with no overlap are left out. An empty result means nothing matched.
  pub fn suggest(&self, available: &BTreeSet<String>) -> Vec<RecipeScore> {
    let mut scored: Vec<(&Recipe, f64, usize)> = self
      .recipes
      .iter()
      .filter_map(|recipe| {
        let matching = recipe.matching(available);
        // An empty recipe never matches, so the division is safe
        (matching > 0).then(|| (recipe, matching as f64 / recipe.ingredients.len() as f64, matching))
      })
      .collect();

    scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(b.2.cmp(&a.2)));

    let suggestions: Vec<RecipeScore> = scored
      .into_iter()
      .take(MAX_SUGGESTIONS)
      .enumerate()
      .map(|(index, (recipe, score, matching))| RecipeScore {
        position: index + 1,
        name: recipe.name.clone(),
        score,
        matching_ingredients: matching,
        description: recipe.description.clone(),
      })
      .collect();

    tracing::info!("Suggested recipes: {}", suggestions.len());
    suggestions
  }
}
