pub mod analyze;
pub mod config;
pub mod ingredients;
pub mod status;
