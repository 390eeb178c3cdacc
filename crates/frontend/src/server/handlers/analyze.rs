//! Image and manual analysis handlers

use axum::{
  body::Bytes,
  extract::{Extension, FromRequest, Multipart, Request, State},
  Json,
};
use serde_json::Value;
use std::collections::BTreeSet;

use crate::detection::{detect_from_bytes, detect_from_url};
use crate::recipes::RecipeScore;
use crate::server::{
  middleware::RequestContext,
  state::AppState,
  types::{is_json, is_multipart, read_json_body, AnalyzeResponse, ApiError, ManualAnalysisResponse},
};
use crate::validation::{validate_image_file, validate_image_url};

/// Multipart field carrying the uploaded photo
pub const FILE_FIELD: &str = "file";

const NO_IMAGE: &str = "No image provided (file or URL)";
const NO_DETECTIONS: &str = "No ingredients detected with current confidence threshold";
const NO_RECIPES: &str = "No recipes found for these ingredients";

struct Upload {
  filename: Option<String>,
  bytes: Bytes,
}

/// POST /analyze - Detect ingredients in a photo and suggest recipes
///
/// Accepts a multipart upload in the `file` field or a JSON body `{"url": ...}`.
pub async fn analyze(
  State(state): State<AppState>,
  Extension(context): Extension<RequestContext>,
  request: Request,
) -> Result<Json<AnalyzeResponse>, ApiError> {
  let threshold = state.threshold.get();
  let max_mb = state.config.max_file_size_mb();

  let detected = if is_multipart(request.headers()) {
    let upload = read_upload(request, max_mb).await?.ok_or_else(|| ApiError::bad_request(NO_IMAGE))?;
    validate_image_file(upload.filename.as_deref(), upload.bytes.len(), &state.config).map_err(|e| {
      context.log_warn(&format!("Upload rejected: {e}"));
      ApiError::from(e)
    })?;

    context.log_info(&format!(
      "Analyzing upload {} with threshold {threshold}",
      upload.filename.as_deref().unwrap_or_default()
    ));
    detect_from_bytes(state.detector.as_ref(), upload.bytes, threshold).await
  } else if is_json(request.headers()) {
    let body = read_json_body(request, max_mb).await?;
    let url = body
      .get("url")
      .and_then(Value::as_str)
      .filter(|url| !url.trim().is_empty())
      .ok_or_else(|| ApiError::bad_request("Missing image URL"))?;
    validate_image_url(url)?;

    context.log_info(&format!("Analyzing image URL with threshold {threshold}"));
    detect_from_url(state.detector.as_ref(), url, threshold).await
  } else {
    return Err(ApiError::bad_request(NO_IMAGE));
  };

  if detected.is_empty() {
    context.log_info("No ingredients above threshold");
    return Err(ApiError::not_found(NO_DETECTIONS));
  }

  let flags = state.vocabulary.flags_for_detections(&detected);
  let recipes = suggest(&state, &flags.active())?;

  Ok(Json(AnalyzeResponse { ingredients: detected, recipes }))
}

/// POST /analyze_manual - Suggest recipes for a hand-picked ingredient list
pub async fn analyze_manual(
  State(state): State<AppState>,
  Extension(context): Extension<RequestContext>,
  request: Request,
) -> Result<Json<ManualAnalysisResponse>, ApiError> {
  let body = read_json_body(request, state.config.max_file_size_mb()).await?;

  let selection = match body.get("ingredients") {
    None => return Err(ApiError::bad_request("No ingredients selected")),
    Some(value) if is_blank(value) => return Err(ApiError::bad_request("No ingredients selected")),
    Some(Value::Array(items)) => items,
    Some(_) => return Err(ApiError::bad_request("Invalid ingredients format")),
  };

  let (flags, selected_ingredients) =
    state.vocabulary.flags_for_selection(selection.iter().filter_map(Value::as_str));
  if selected_ingredients.is_empty() {
    context.log_warn("Selection matched no known ingredients");
    return Err(ApiError::bad_request("No valid ingredients selected"));
  }
  context.log_info(&format!("Manual selection: {}", selected_ingredients.join(", ")));

  let recipe_predictions = suggest(&state, &flags.active())?;

  Ok(Json(ManualAnalysisResponse { selected_ingredients, recipe_predictions }))
}

fn suggest(state: &AppState, available: &BTreeSet<String>) -> Result<Vec<RecipeScore>, ApiError> {
  let suggestions = state.recipes.suggest(available);
  if suggestions.is_empty() {
    return Err(ApiError::not_found(NO_RECIPES));
  }
  Ok(suggestions)
}

/// First `file` upload of a multipart body, if any
async fn read_upload(request: Request, max_mb: usize) -> Result<Option<Upload>, ApiError> {
  let mut multipart = Multipart::from_request(request, &())
    .await
    .map_err(|rejection| ApiError::rejected(rejection.status(), max_mb))?;

  while let Some(field) = multipart.next_field().await.map_err(|e| ApiError::rejected(e.status(), max_mb))? {
    // A part without a filename is a plain form value, not an upload
    if field.name() != Some(FILE_FIELD) || field.file_name().is_none() {
      continue;
    }

    let filename = field.file_name().map(str::to_string);
    let bytes = field.bytes().await.map_err(|e| ApiError::rejected(e.status(), max_mb))?;
    return Ok(Some(Upload { filename, bytes }));
  }

  Ok(None)
}

/// Empty, zero, false or null
fn is_blank(value: &Value) -> bool {
  match value {
    Value::Null => true,
    Value::Bool(flag) => !flag,
    Value::Number(number) => number.as_f64() == Some(0.0),
    Value::String(text) => text.is_empty(),
    Value::Array(items) => items.is_empty(),
    Value::Object(fields) => fields.is_empty(),
  }
}
