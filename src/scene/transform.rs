//! Object transforms and the [`Renderable`] seam.

use glam::{EulerRot, Mat3, Mat4, Quat, Vec3};

use super::bounds::BoundingBox;

/// Two-axis rotation in radians.
///
/// `yaw` turns about the vertical (Y) axis and `pitch` about the horizontal
/// (X) axis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Orientation {
    /// Rotation about Y.
    pub yaw: f32,
    /// Rotation about X.
    pub pitch: f32,
}

impl Orientation {
    /// No rotation.
    pub const ZERO: Self = Self {
        yaw: 0.0,
        pitch: 0.0,
    };

    /// Build from a yaw/pitch pair.
    #[must_use]
    pub const fn new(yaw: f32, pitch: f32) -> Self {
        Self { yaw, pitch }
    }

    /// Rotation quaternion, Euler order XYZ (pitch, then yaw).
    #[must_use]
    pub fn to_quat(self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.pitch, self.yaw, 0.0)
    }
}

/// Uniform-scale TRS transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Uniform scale on all three axes.
    pub scale: f32,
    /// World-space translation.
    pub position: Vec3,
    /// Rotation about the object's local origin.
    pub rotation: Orientation,
}

impl Transform {
    /// Unit scale, no translation, no rotation.
    pub const IDENTITY: Self = Self {
        scale: 1.0,
        position: Vec3::ZERO,
        rotation: Orientation::ZERO,
    };

    /// Model matrix `T * R * S`.
    #[must_use]
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale),
            self.rotation.to_quat(),
            self.position,
        )
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Inverse-transpose of the upper 3x3 of `world`, for transforming normals.
///
/// Only an exactly singular or non-finite transform falls back to identity;
/// tiny uniform scales keep their rotation.
#[must_use]
pub fn normal_matrix(world: Mat4) -> Mat3 {
    let linear = Mat3::from_mat4(world);
    let det = linear.determinant();
    if det == 0.0 || !det.is_finite() {
        return Mat3::IDENTITY;
    }
    let normal = linear.inverse().transpose();
    if normal.is_finite() {
        normal
    } else {
        Mat3::IDENTITY
    }
}

/// A host-owned object the fit and orientation logic can drive.
///
/// Only a bounding-box query and transform setters are needed, so tests can
/// supply a plain struct instead of GPU-backed geometry.
pub trait Renderable {
    /// World-space bounding box under the current transform.
    fn bounding_box(&self) -> BoundingBox;
    /// Set the uniform scale.
    fn set_scale(&mut self, scale: f32);
    /// Set the world-space position.
    fn set_position(&mut self, position: Vec3);
    /// Set the rotation from a yaw/pitch pair.
    fn set_rotation(&mut self, yaw: f32, pitch: f32);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_matrix() {
        assert_eq!(Transform::IDENTITY.matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn matrix_scales_before_translating() {
        let t = Transform {
            scale: 2.0,
            position: Vec3::new(1.0, 0.0, 0.0),
            rotation: Orientation::ZERO,
        };
        let p = t.matrix().transform_point3(Vec3::new(1.0, 1.0, 1.0));
        assert!((p - Vec3::new(3.0, 2.0, 2.0)).length() < 1e-6);
    }

    #[test]
    fn yaw_turns_about_vertical_axis() {
        let q = Orientation::new(std::f32::consts::FRAC_PI_2, 0.0).to_quat();
        let v = q * Vec3::Z;
        assert!((v - Vec3::X).length() < 1e-6);
    }

    #[test]
    fn pitch_turns_about_horizontal_axis() {
        let q = Orientation::new(0.0, std::f32::consts::FRAC_PI_2).to_quat();
        let v = q * Vec3::Y;
        assert!((v - Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn millimetre_scale_normals_keep_rotation() {
        let t = Transform {
            scale: 0.004,
            position: Vec3::ZERO,
            rotation: Orientation::new(0.5, 0.0),
        };
        let n = (normal_matrix(t.matrix()) * Vec3::Z).normalize();
        let expected = Vec3::new(0.5_f32.sin(), 0.0, 0.5_f32.cos());
        assert!((n - expected).length() < 1e-4, "{n:?}");
    }

    #[test]
    fn singular_transform_normals_are_identity() {
        assert_eq!(normal_matrix(Mat4::from_scale(Vec3::ZERO)), Mat3::IDENTITY);
        let broken = Mat4::from_scale(Vec3::splat(f32::NAN));
        assert_eq!(normal_matrix(broken), Mat3::IDENTITY);
    }
}
