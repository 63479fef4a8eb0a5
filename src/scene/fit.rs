//! Normalize-and-fit: scale an object so its largest dimension matches a
//! target size and move its bounding-box center to the origin.

use std::fmt;

use glam::Vec3;

use super::bounds::BoundingBox;
use super::transform::Renderable;

/// Uniform scale and translation produced by [`compute_fit`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitResult {
    /// Uniform scale factor (always `> 0`).
    pub scale: f32,
    /// Translation applied after scaling: `-(center * scale)`.
    pub translation: Vec3,
}

impl FitResult {
    /// Scale 1, no translation. Used when no fit can be computed.
    pub const IDENTITY: Self = Self {
        scale: 1.0,
        translation: Vec3::ZERO,
    };

    /// Apply the scale uniformly, then the translation, to `target`.
    pub fn apply(&self, target: &mut impl Renderable) {
        target.set_scale(self.scale);
        target.set_position(self.translation);
    }

    /// Map a point of the original object through this fit.
    #[must_use]
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        point * self.scale + self.translation
    }
}

/// Why a fit could not be computed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FitError {
    /// Every dimension of the bounding box is zero.
    DegenerateGeometry,
    /// The target size is not a finite positive number.
    InvalidTargetSize(f32),
    /// The bounding box is empty, inverted, or contains NaN/infinity.
    NonFiniteBounds,
}

impl fmt::Display for FitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DegenerateGeometry => {
                write!(f, "bounding box has zero extent")
            }
            Self::InvalidTargetSize(size) => {
                write!(f, "target size must be finite and > 0, got {size}")
            }
            Self::NonFiniteBounds => {
                write!(f, "bounding box is empty or not finite")
            }
        }
    }
}

impl std::error::Error for FitError {}

/// Compute the uniform scale and translation that make `bbox`'s largest
/// dimension equal `target_size` and put its center at the origin.
///
/// Pure: identical inputs give bit-identical outputs.
///
/// # Errors
///
/// [`FitError::InvalidTargetSize`] for a non-positive or non-finite target,
/// [`FitError::NonFiniteBounds`] for an empty or non-finite box, and
/// [`FitError::DegenerateGeometry`] when every dimension is zero.
pub fn compute_fit(
    bbox: &BoundingBox,
    target_size: f32,
) -> Result<FitResult, FitError> {
    if !target_size.is_finite() || target_size <= 0.0 {
        return Err(FitError::InvalidTargetSize(target_size));
    }

    let size = bbox.size();
    let center = bbox.center();
    if !bbox.is_finite()
        || !size.is_finite()
        || !center.is_finite()
        || size.min_element() < 0.0
    {
        return Err(FitError::NonFiniteBounds);
    }

    let max_dim = size.max_element();
    if max_dim == 0.0 {
        return Err(FitError::DegenerateGeometry);
    }

    let scale = target_size / max_dim;
    Ok(FitResult {
        scale,
        translation: -(center * scale),
    })
}

/// [`compute_fit`], falling back to [`FitResult::IDENTITY`] on any error.
///
/// The error is logged at `warn`; the object is then shown at its authored
/// size and position.
#[must_use]
pub fn fit_or_identity(bbox: &BoundingBox, target_size: f32) -> FitResult {
    match compute_fit(bbox, target_size) {
        Ok(fit) => fit,
        Err(e) => {
            log::warn!("cannot fit model ({e}); using scale 1");
            FitResult::IDENTITY
        }
    }
}
