//! Chef - Recipe Suggestions from Food Photos
//!
//! Detects ingredients in an uploaded photo (or a photo URL) through a Custom
//! Vision prediction endpoint, keeps the detections above a configurable
//! confidence threshold, and ranks a fixed recipe table by how much of each
//! recipe the detected ingredients cover.

pub mod config;
pub mod detection;
pub mod ingredients;
pub mod recipes;
pub mod server;
pub mod threshold;
pub mod validation;
