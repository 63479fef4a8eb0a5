//! Pointer-driven orientation.
//!
//! Each pointer sample is normalized against the viewport and becomes a
//! yaw/pitch target in `[-0.5, 0.5]` radians. The live orientation eases
//! toward the latest target over a short fixed duration; a new sample
//! retargets from wherever the orientation currently is.

use std::fmt;
use std::time::Duration;

use glam::Vec2;

use crate::animation::Tween;
use crate::options::PointerOptions;
use crate::scene::transform::{Orientation, Renderable};
use crate::util::easing::EasingFunction;

/// Pointer position as a fraction of the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    /// `raw_x / viewport_width`, 0 at the left edge.
    pub normalized_x: f32,
    /// `raw_y / viewport_height`, 0 at the top edge.
    pub normalized_y: f32,
}

/// A pointer sample that cannot be normalized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InvalidSampleError {
    /// Viewport width or height is zero, negative, or not finite.
    EmptyViewport {
        /// Reported viewport width.
        width: f32,
        /// Reported viewport height.
        height: f32,
    },
    /// Pointer coordinates are not finite.
    NonFiniteCoordinates,
}

impl fmt::Display for InvalidSampleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyViewport { width, height } => {
                write!(f, "viewport {width}x{height} has no area")
            }
            Self::NonFiniteCoordinates => {
                write!(f, "pointer coordinates are not finite")
            }
        }
    }
}

impl std::error::Error for InvalidSampleError {}

impl PointerSample {
    /// Normalize raw pointer coordinates by the viewport size.
    ///
    /// # Errors
    ///
    /// Fails when the viewport has no area or any input is not finite.
    pub fn from_raw(
        raw_x: f32,
        raw_y: f32,
        viewport_width: f32,
        viewport_height: f32,
    ) -> Result<Self, InvalidSampleError> {
        let viewport_ok = viewport_width.is_finite()
            && viewport_height.is_finite()
            && viewport_width > 0.0
            && viewport_height > 0.0;
        if !viewport_ok {
            return Err(InvalidSampleError::EmptyViewport {
                width: viewport_width,
                height: viewport_height,
            });
        }
        if !raw_x.is_finite() || !raw_y.is_finite() {
            return Err(InvalidSampleError::NonFiniteCoordinates);
        }
        Ok(Self {
            normalized_x: raw_x / viewport_width,
            normalized_y: raw_y / viewport_height,
        })
    }

    /// Target orientation for this sample: `(x - 0.5, y - 0.5)` as
    /// (yaw, pitch).
    #[must_use]
    pub fn target(&self) -> Orientation {
        Orientation::new(self.normalized_x - 0.5, self.normalized_y - 0.5)
    }
}

/// Whether the controller has received a usable sample yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrientationPhase {
    /// No sample yet; orientation is zero.
    Idle,
    /// Easing toward (or resting at) the latest sample's target.
    Tracking,
}

/// Maps pointer samples to a smoothed yaw/pitch.
///
/// Sample ingestion ([`on_pointer_move`](Self::on_pointer_move)) and time
/// advancement ([`tick`](Self::tick)) are separate so the easing can be
/// driven by any clock.
#[derive(Debug, Clone)]
pub struct PointerOrientationController {
    phase: OrientationPhase,
    /// x = yaw, y = pitch.
    tween: Tween<Vec2>,
}

impl PointerOrientationController {
    /// Default time from a sample to full arrival at its target.
    pub const DEFAULT_DURATION: Duration = Duration::from_millis(500);

    /// Controller at rest with zero orientation.
    #[must_use]
    pub fn new(duration: Duration, easing: EasingFunction) -> Self {
        Self {
            phase: OrientationPhase::Idle,
            tween: Tween::at_rest(Vec2::ZERO, duration, easing),
        }
    }

    /// Controller using the configured duration and easing.
    #[must_use]
    pub fn from_options(options: &PointerOptions) -> Self {
        Self::new(options.ease_duration(), options.easing)
    }

    /// Ingest a pointer position.
    ///
    /// Returns `false` (and leaves all state untouched) when the sample is
    /// invalid, e.g. for a zero-area viewport.
    pub fn on_pointer_move(
        &mut self,
        raw_x: f32,
        raw_y: f32,
        viewport_width: f32,
        viewport_height: f32,
    ) -> bool {
        match PointerSample::from_raw(
            raw_x,
            raw_y,
            viewport_width,
            viewport_height,
        ) {
            Ok(sample) => {
                let target = sample.target();
                self.tween.retarget(Vec2::new(target.yaw, target.pitch));
                self.phase = OrientationPhase::Tracking;
                true
            }
            Err(e) => {
                log::trace!("pointer sample discarded: {e}");
                false
            }
        }
    }

    /// Change ease duration and curve without disturbing the current
    /// orientation.
    pub fn set_timing(&mut self, duration: Duration, easing: EasingFunction) {
        self.tween.set_timing(duration, easing);
    }

    /// Advance the easing by `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        self.tween.advance(dt);
    }

    /// Live orientation.
    #[must_use]
    pub fn current(&self) -> Orientation {
        let v = self.tween.value();
        Orientation::new(v.x, v.y)
    }

    /// Orientation the controller is heading toward.
    #[must_use]
    pub fn target(&self) -> Orientation {
        let v = self.tween.target();
        Orientation::new(v.x, v.y)
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> OrientationPhase {
        self.phase
    }

    /// `true` when the live orientation equals the target.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.tween.is_finished()
    }

    /// Write the live orientation to `target`.
    pub fn apply_to(&self, target: &mut impl Renderable) {
        let Orientation { yaw, pitch } = self.current();
        target.set_rotation(yaw, pitch);
    }
}

impl Default for PointerOrientationController {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DURATION, EasingFunction::DEFAULT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f32 = 1e-3;

    fn close(a: Orientation, yaw: f32, pitch: f32) -> bool {
        (a.yaw - yaw).abs() < TOL && (a.pitch - pitch).abs() < TOL
    }

    #[test]
    fn starts_idle_at_zero() {
        let c = PointerOrientationController::default();
        assert_eq!(c.phase(), OrientationPhase::Idle);
        assert_eq!(c.current(), Orientation::ZERO);
    }

    #[test]
    fn corner_samples_map_to_half_radian() {
        let mut c = PointerOrientationController::default();
        assert!(c.on_pointer_move(1000.0, 1000.0, 1000.0, 1000.0));
        assert_eq!(c.target(), Orientation::new(0.5, 0.5));
        assert!(c.on_pointer_move(0.0, 0.0, 1000.0, 1000.0));
        assert_eq!(c.target(), Orientation::new(-0.5, -0.5));
        assert_eq!(c.phase(), OrientationPhase::Tracking);
    }

    #[test]
    fn converges_within_duration() {
        let mut c = PointerOrientationController::default();
        // (0.8, 0.3) on a unit viewport -> target (0.3, -0.2)
        assert!(c.on_pointer_move(0.8, 0.3, 1.0, 1.0));
        let mut elapsed = 0.0;
        while elapsed < 0.5 {
            c.tick(0.05);
            elapsed += 0.05;
        }
        assert!(close(c.current(), 0.3, -0.2), "{:?}", c.current());
        assert!(c.is_settled());

        // Holds without further samples.
        c.tick(3.0);
        assert!(close(c.current(), 0.3, -0.2));
    }

    #[test]
    fn ease_out_front_loads_motion() {
        let mut c = PointerOrientationController::default();
        assert!(c.on_pointer_move(1.0, 0.5, 1.0, 1.0));
        c.tick(0.125);
        let quarter = c.current().yaw;
        // Linear would be 0.125 of 0.5; ease-out is well ahead of it.
        assert!(quarter > 0.125 * 0.5 * 2.0, "got {quarter}");

        let mut previous = quarter;
        for _ in 0..3 {
            c.tick(0.125);
            let now = c.current().yaw;
            assert!(now >= previous);
            previous = now;
        }
    }

    #[test]
    fn retarget_keeps_intermediate_value() {
        let mut c = PointerOrientationController::default();
        assert!(c.on_pointer_move(1.0, 1.0, 1.0, 1.0));
        c.tick(0.1);
        let mid = c.current();
        assert!(mid.yaw > 0.0 && mid.yaw < 0.5);

        assert!(c.on_pointer_move(0.0, 0.0, 1.0, 1.0));
        assert_eq!(c.current(), mid);
        assert_eq!(c.target(), Orientation::new(-0.5, -0.5));

        c.tick(0.5);
        assert!(close(c.current(), -0.5, -0.5));
    }

    #[test]
    fn zero_area_viewport_is_discarded() {
        let mut c = PointerOrientationController::default();
        assert!(!c.on_pointer_move(10.0, 10.0, 0.0, 600.0));
        assert!(!c.on_pointer_move(10.0, 10.0, 800.0, 0.0));
        assert_eq!(c.phase(), OrientationPhase::Idle);
        assert_eq!(c.current(), Orientation::ZERO);

        assert!(c.on_pointer_move(800.0, 600.0, 800.0, 600.0));
        c.tick(0.2);
        let before = c.current();
        let target_before = c.target();
        assert!(!c.on_pointer_move(1.0, 1.0, 0.0, 0.0));
        assert_eq!(c.current(), before);
        assert_eq!(c.target(), target_before);
    }

    #[test]
    fn non_finite_coordinates_rejected() {
        assert_eq!(
            PointerSample::from_raw(f32::NAN, 0.0, 10.0, 10.0),
            Err(InvalidSampleError::NonFiniteCoordinates)
        );
    }

    #[derive(Default)]
    struct Spin {
        yaw: f32,
        pitch: f32,
    }

    impl Renderable for Spin {
        fn bounding_box(&self) -> crate::scene::BoundingBox {
            crate::scene::BoundingBox::EMPTY
        }
        fn set_scale(&mut self, _scale: f32) {}
        fn set_position(&mut self, _position: glam::Vec3) {}
        fn set_rotation(&mut self, yaw: f32, pitch: f32) {
            self.yaw = yaw;
            self.pitch = pitch;
        }
    }

    #[test]
    fn horizontal_motion_drives_yaw() {
        let mut c = PointerOrientationController::default();
        assert!(c.on_pointer_move(1.0, 0.5, 1.0, 1.0));
        c.tick(1.0);
        let mut spin = Spin::default();
        c.apply_to(&mut spin);
        assert!((spin.yaw - 0.5).abs() < TOL);
        assert!(spin.pitch.abs() < TOL);
    }
}
