//! Vocabulary endpoint handler

use axum::{extract::State, Json};

use crate::server::{state::AppState, types::IngredientsResponse};

/// GET /get_ingredients - Every ingredient a selection may name, alphabetically
pub async fn get_ingredients(State(state): State<AppState>) -> Json<IngredientsResponse> {
  Json(IngredientsResponse { ingredients: state.vocabulary.sorted() })
}
