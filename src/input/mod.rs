//! Input handling: platform-agnostic events and the pointer orientation
//! controller they drive.

/// Platform-agnostic input events.
pub mod event;
/// Pointer samples to smoothed yaw/pitch.
pub mod orientation;

pub use event::InputEvent;
pub use orientation::{
    InvalidSampleError, OrientationPhase, PointerOrientationController,
    PointerSample,
};
