//! Fixed perspective camera looking at the origin.
//!
//! The showcase never orbits; only the aspect ratio and the eye distance
//! change, both in response to viewport resizes.

/// Resize-driven camera placement.
pub mod controller;
/// Core camera struct and GPU uniform type.
pub mod core;

pub use controller::CameraController;
pub use self::core::{Camera, CameraUniform};
