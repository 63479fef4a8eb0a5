//! Bounded, retargetable tweens.
//!
//! A [`Tween`] moves a value from a start point to a target over a fixed
//! duration along an [`EasingFunction`]. Retargeting mid-flight restarts the
//! clock from the value currently shown, so motion never jumps back to an
//! older start point and never queues behind a previous transition.

use std::ops::{Add, Mul, Sub};
use std::time::Duration;

use crate::util::easing::EasingFunction;

/// Values a [`Tween`] can interpolate.
pub trait Lerp: Copy + PartialEq {
    /// `self + (to - self) * t`.
    #[must_use]
    fn lerp_to(self, to: Self, t: f32) -> Self;
}

impl<T> Lerp for T
where
    T: Copy
        + PartialEq
        + Add<Output = T>
        + Sub<Output = T>
        + Mul<f32, Output = T>,
{
    fn lerp_to(self, to: Self, t: f32) -> Self {
        self + (to - self) * t
    }
}

/// A single in-flight transition of a value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween<T> {
    from: T,
    to: T,
    /// Seconds since the last retarget.
    elapsed: f32,
    /// Seconds from retarget to arrival.
    duration: f32,
    easing: EasingFunction,
}

impl<T: Lerp> Tween<T> {
    /// A settled tween resting at `value`.
    #[must_use]
    pub fn at_rest(value: T, duration: Duration, easing: EasingFunction) -> Self {
        let duration = duration.as_secs_f32();
        Self {
            from: value,
            to: value,
            elapsed: duration,
            duration,
            easing,
        }
    }

    /// Current interpolated value.
    #[must_use]
    pub fn value(&self) -> T {
        if self.is_finished() {
            return self.to;
        }
        let t = self.elapsed / self.duration;
        self.from.lerp_to(self.to, self.easing.evaluate(t))
    }

    /// Start a new transition toward `to` from the current value.
    pub fn retarget(&mut self, to: T) {
        self.from = self.value();
        self.to = to;
        self.elapsed = 0.0;
    }

    /// Advance the clock by `dt` seconds. Non-finite or negative steps are
    /// ignored.
    pub fn advance(&mut self, dt: f32) {
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }
        self.elapsed = (self.elapsed + dt).min(self.duration);
    }

    /// Change duration and curve, keeping the current transition's
    /// endpoints and elapsed time.
    pub fn set_timing(&mut self, duration: Duration, easing: EasingFunction) {
        self.duration = duration.as_secs_f32();
        self.elapsed = self.elapsed.min(self.duration);
        self.easing = easing;
    }

    /// `true` once the value has reached its target.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.duration <= 0.0 || self.elapsed >= self.duration
    }

    /// Final value of the current transition.
    #[must_use]
    pub fn target(&self) -> T {
        self.to
    }

    /// Normalized progress in `[0, 1]`.
    #[must_use]
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }
}
