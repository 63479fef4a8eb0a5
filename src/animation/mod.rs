//! Time-based value animation.
//!
//! [`tween::Tween`] is the only primitive: a bounded ease toward a target
//! that can be retargeted at any moment. Easing curves live in
//! [`crate::util::easing`].

pub mod tween;

pub use tween::{Lerp, Tween};
