//! Axum router configuration for all endpoints

use axum::{
  extract::DefaultBodyLimit,
  middleware,
  routing::{get, post},
  Router,
};

use crate::config::MAX_CONTENT_LENGTH;
use crate::server::{
  handlers::{image, status, url},
  middleware::request_context_middleware,
  state::ProxyState,
};

/// Path prefixes under which the Custom Vision prediction API exposes an action
const ROUTE_PREFIXES: [&str; 4] = [
  "",
  "/{project}",
  "/{project}/classify/iterations/{publishedName}",
  "/{project}/detect/iterations/{publishedName}",
];

/// Every path serving `action`, e.g. `/image` and `/{project}/image/nostore`
pub fn action_paths(action: &str) -> Vec<String> {
  ROUTE_PREFIXES
    .iter()
    .flat_map(|prefix| {
      let path = format!("{prefix}/{action}");
      // The bare route has no nostore variant
      let nostore = (!prefix.is_empty()).then(|| format!("{path}/nostore"));
      std::iter::once(path).chain(nostore)
    })
    .collect()
}

/// Create the main application router
pub fn create_router(state: ProxyState) -> Router {
  let router = Router::new().route("/", get(status::index));

  let router = action_paths("image")
    .iter()
    .fold(router, |router, path| router.route(path, post(image::predict_image)));

  action_paths("url")
    .iter()
    .fold(router, |router, path| router.route(path, post(url::predict_url)))
    .layer(middleware::from_fn(request_context_middleware))
    .layer(DefaultBodyLimit::max(MAX_CONTENT_LENGTH))
    .with_state(state)
}
