//! Easing functions for animation interpolation.
//!
//! The `*Out` variants follow the "powerN.out" family: fast initial change
//! that decelerates into the target. Every curve maps 0 to 0 and 1 to
//! exactly 1, so a finished transition lands on its endpoint without drift.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Easing function variants for animation curves.
#[derive(
    Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum EasingFunction {
    /// Linear interpolation (no easing).
    Linear,
    /// Quadratic ease-out, `1 - (1-t)²` ("power1.out").
    QuadraticOut,
    /// Cubic ease-out, `1 - (1-t)³` ("power2.out").
    CubicOut,
    /// Quartic ease-out, `1 - (1-t)⁴` ("power3.out").
    QuarticOut,
    /// Cubic Hermite interpolation with configurable control points.
    /// Formula: c1·3t(1-t)² + c2·3(1-t)t² + t³
    CubicHermite {
        /// First control value.
        c1: f32,
        /// Second control value.
        c2: f32,
    },
}

impl EasingFunction {
    /// Default easing: cubic ease-out.
    pub const DEFAULT: EasingFunction = EasingFunction::CubicOut;

    /// Evaluate the easing function at time t.
    ///
    /// Input t is clamped to [0.0, 1.0].
    /// Returns the eased value, also in [0.0, 1.0] for the built-in curves.
    #[inline]
    #[must_use]
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match self {
            EasingFunction::Linear => t,
            EasingFunction::QuadraticOut => {
                let omt = 1.0 - t;
                1.0 - omt * omt
            }
            EasingFunction::CubicOut => {
                let omt = 1.0 - t;
                1.0 - omt * omt * omt
            }
            EasingFunction::QuarticOut => {
                let omt = 1.0 - t;
                let omt2 = omt * omt;
                1.0 - omt2 * omt2
            }
            EasingFunction::CubicHermite { c1, c2 } => {
                let omt = 1.0 - t;
                c1 * 3.0 * t * omt * omt + c2 * 3.0 * omt * t * t + t * t * t
            }
        }
    }
}

impl Default for EasingFunction {
    #[inline]
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OUT_CURVES: [EasingFunction; 4] = [
        EasingFunction::QuadraticOut,
        EasingFunction::CubicOut,
        EasingFunction::QuarticOut,
        EasingFunction::CubicHermite { c1: 0.33, c2: 1.0 },
    ];

    #[test]
    fn test_linear_endpoints() {
        let linear = EasingFunction::Linear;
        assert_eq!(linear.evaluate(0.0), 0.0);
        assert_eq!(linear.evaluate(0.5), 0.5);
        assert_eq!(linear.evaluate(1.0), 1.0);
    }

    #[test]
    fn test_out_curves_hit_endpoints_exactly() {
        for curve in OUT_CURVES {
            assert_eq!(curve.evaluate(0.0), 0.0, "{curve:?}");
            assert_eq!(curve.evaluate(1.0), 1.0, "{curve:?}");
        }
    }

    #[test]
    fn test_ease_out_shape() {
        // Early progress runs ahead of linear time.
        for curve in OUT_CURVES {
            let at_quarter = curve.evaluate(0.25);
            assert!(
                at_quarter > 0.25,
                "{curve:?} should be > 0.25 at t=0.25, got {at_quarter}"
            );
        }
    }

    #[test]
    fn test_out_curves_are_monotonic() {
        for curve in OUT_CURVES {
            let mut previous = 0.0;
            for step in 1..=100 {
                let value = curve.evaluate(step as f32 / 100.0);
                assert!(value >= previous, "{curve:?} dipped at {step}");
                previous = value;
            }
        }
    }

    #[test]
    fn test_input_clamping() {
        let linear = EasingFunction::Linear;
        assert_eq!(linear.evaluate(-0.5), 0.0);
        assert_eq!(linear.evaluate(1.5), 1.0);

        let cubic = EasingFunction::CubicOut;
        assert_eq!(cubic.evaluate(-0.5), 0.0);
        assert_eq!(cubic.evaluate(1.5), 1.0);
    }

    #[test]
    fn test_power_values() {
        assert_eq!(EasingFunction::QuadraticOut.evaluate(0.5), 0.75);
        assert_eq!(EasingFunction::CubicOut.evaluate(0.5), 0.875);
        assert_eq!(EasingFunction::QuarticOut.evaluate(0.5), 0.9375);
    }

    #[test]
    fn test_default_is_cubic_out() {
        assert_eq!(EasingFunction::default(), EasingFunction::CubicOut);
    }

    #[test]
    fn test_serde_names() {
        #[derive(Deserialize)]
        struct Wrapper {
            easing: EasingFunction,
        }
        let w: Wrapper = toml::from_str("easing = \"quartic_out\"").unwrap();
        assert_eq!(w.easing, EasingFunction::QuarticOut);
    }
}
