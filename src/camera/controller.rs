use glam::Vec3;

use crate::camera::core::Camera;
use crate::options::CameraOptions;

/// Owns the showcase camera and re-places it when the viewport changes.
///
/// The eye sits on +Z looking at the origin; portrait viewports push it
/// back to `portrait_distance` so the fitted model keeps its apparent width.
#[derive(Debug, Clone)]
pub struct CameraController {
    /// The camera as it should be rendered this frame.
    pub camera: Camera,
    distance: f32,
    portrait_distance: f32,
}

impl CameraController {
    /// Camera for an initial viewport size.
    #[must_use]
    pub fn new(options: &CameraOptions, width: u32, height: u32) -> Self {
        let mut controller = Self {
            camera: Camera {
                eye: Vec3::new(0.0, 0.0, options.distance),
                target: Vec3::ZERO,
                up: Vec3::Y,
                aspect: 1.0,
                fovy: options.fovy,
                znear: options.znear,
                zfar: options.zfar,
            },
            distance: options.distance,
            portrait_distance: options.portrait_distance,
        };
        controller.resize(width, height);
        controller
    }

    /// Update projection and eye distance for a new viewport size.
    /// Zero-sized dimensions (minimized window) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.camera.aspect = width as f32 / height as f32;
        self.place_eye();
    }

    /// Re-read projection and distance settings, keeping the current aspect.
    pub fn apply_options(&mut self, options: &CameraOptions) {
        self.camera.fovy = options.fovy;
        self.camera.znear = options.znear;
        self.camera.zfar = options.zfar;
        self.distance = options.distance;
        self.portrait_distance = options.portrait_distance;
        self.place_eye();
    }

    /// Narrower-than-tall viewports use the portrait distance.
    fn place_eye(&mut self) {
        let distance = if self.camera.aspect < 1.0 {
            self.portrait_distance
        } else {
            self.distance
        };
        self.camera.eye = self.camera.target + Vec3::Z * distance;
    }

    /// Current eye distance from the look-at target.
    #[must_use]
    pub fn eye_distance(&self) -> f32 {
        self.camera.eye.distance(self.camera.target)
    }
}
