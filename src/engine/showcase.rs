//! Device-independent showcase state.
//!
//! [`Showcase`] is everything about the running showcase except the GPU:
//! the scene, the camera, the pointer-driven orientation, and the options.
//! It consumes input and asset events and advances by explicit time steps,
//! so the whole interaction model is testable without a window.

use crate::camera::controller::CameraController;
use crate::camera::Camera;
use crate::input::orientation::PointerOrientationController;
use crate::input::InputEvent;
use crate::loader::AssetEvent;
use crate::options::Options;
use crate::scene::{FitResult, Scene};
use crate::util::frame_timing::clamp_frame_delta;

/// Scene, camera, and pointer orientation for one showcase view.
#[derive(Debug)]
pub struct Showcase {
    scene: Scene,
    camera: CameraController,
    orientation: PointerOrientationController,
    options: Options,
    viewport: (u32, u32),
}

impl Showcase {
    /// Empty showcase for a viewport of `width` x `height` pixels.
    #[must_use]
    pub fn new(options: Options, width: u32, height: u32) -> Self {
        let camera = CameraController::new(&options.camera, width, height);
        let orientation =
            PointerOrientationController::from_options(&options.pointer);
        Self {
            scene: Scene::new(),
            camera,
            orientation,
            options,
            viewport: (width, height),
        }
    }

    /// Feed one input event. Returns `true` if it changed any state.
    ///
    /// Pointer motion is ignored until a model has been installed.
    pub fn handle_input(&mut self, event: InputEvent) -> bool {
        match event {
            InputEvent::CursorMoved { x, y } => {
                if self.scene.model().is_none() {
                    log::trace!("pointer ignored: no model yet");
                    return false;
                }
                let (width, height) = self.viewport;
                self.orientation.on_pointer_move(
                    x,
                    y,
                    width as f32,
                    height as f32,
                )
            }
            InputEvent::Resized { width, height } => {
                self.resize(width, height)
            }
        }
    }

    /// Apply a loader notification. Failures are logged and otherwise
    /// ignored; the showcase keeps rendering whatever it has.
    ///
    /// Returns the fit applied when the event installed a model.
    pub fn apply_asset_event(&mut self, event: AssetEvent) -> Option<FitResult> {
        match event {
            AssetEvent::Progress { kind, fraction } => {
                log::info!("{kind}: {:.0}% loaded", fraction * 100.0);
                None
            }
            AssetEvent::EnvironmentLoaded(map) => {
                self.scene.install_environment(map);
                None
            }
            AssetEvent::ModelLoaded(mesh) => {
                let fit = self
                    .scene
                    .install_model(mesh, self.options.assets.target_size);
                if let Some(model) = self.scene.model_mut() {
                    self.orientation.apply_to(model);
                }
                Some(fit)
            }
            AssetEvent::Failed { kind, error } => {
                log::error!("An error happened: {kind}: {error}");
                None
            }
        }
    }

    /// Advance the orientation easing by `dt` seconds and write it to the
    /// model, if there is one.
    pub fn update(&mut self, dt: f32) {
        self.orientation.tick(clamp_frame_delta(dt));
        if let Some(model) = self.scene.model_mut() {
            self.orientation.apply_to(model);
        }
    }

    /// Track a new viewport size. Zero dimensions are ignored and return
    /// `false`.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        self.viewport = (width, height);
        self.camera.resize(width, height);
        true
    }

    /// Replace the options, re-applying camera and easing settings.
    ///
    /// Asset locations and the model size take effect on the next load.
    pub fn set_options(&mut self, options: Options) {
        self.camera.apply_options(&options.camera);
        self.orientation.set_timing(
            options.pointer.ease_duration(),
            options.pointer.easing,
        );
        self.options = options;
    }

    /// The scene.
    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// The camera to render with.
    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera.camera
    }

    /// The camera controller.
    #[must_use]
    pub fn camera_controller(&self) -> &CameraController {
        &self.camera
    }

    /// The pointer orientation controller.
    #[must_use]
    pub fn orientation(&self) -> &PointerOrientationController {
        &self.orientation
    }

    /// Current options.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Viewport size in physical pixels.
    #[must_use]
    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }
}
