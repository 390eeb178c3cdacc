//! Custom Vision - Model Host Harness
//!
//! Accepts images and image URLs on the Custom Vision prediction routes and hands
//! them to a [`predictor::Predictor`], returning predictions in the Custom Vision
//! response shape.

pub mod config;
pub mod payload;
pub mod predictor;
pub mod server;
