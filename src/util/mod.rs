//! Shared utilities: easing curves and frame timing.

pub mod easing;
/// Frame delta clamping and smoothed FPS.
pub mod frame_timing;
