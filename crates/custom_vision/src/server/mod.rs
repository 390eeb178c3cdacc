//! REST server for the model host
//!
//! Serves the Custom Vision prediction routes with axum.

pub mod handlers;
pub mod middleware;
pub mod routing;
pub mod startup;
pub mod state;
pub mod types;
