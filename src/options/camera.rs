use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Camera", inline)]
#[serde(default)]
/// Camera projection and placement parameters.
pub struct CameraOptions {
    /// Vertical field of view in degrees.
    #[schemars(title = "Field of View", range(min = 20.0, max = 90.0), extend("step" = 1.0))]
    pub fovy: f32,
    /// Near clipping plane distance.
    #[schemars(skip)]
    pub znear: f32,
    /// Far clipping plane distance.
    #[schemars(skip)]
    pub zfar: f32,
    /// Eye distance from the origin for landscape viewports.
    #[schemars(title = "Distance", range(min = 1.0, max = 20.0), extend("step" = 0.1))]
    pub distance: f32,
    /// Eye distance for portrait viewports (narrower than tall), pulled
    /// back so the model keeps its apparent size.
    #[schemars(title = "Portrait Distance", range(min = 1.0, max = 20.0), extend("step" = 0.1))]
    pub portrait_distance: f32,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            fovy: 40.0,
            znear: 0.1,
            zfar: 1000.0,
            distance: 4.0,
            portrait_distance: 5.0,
        }
    }
}
