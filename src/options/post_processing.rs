use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Screen-space effect parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Effects", inline)]
#[serde(default)]
pub struct PostProcessingOptions {
    /// Channel separation of the RGB shift, in UV units.
    #[schemars(title = "RGB Shift", range(min = 0.0, max = 0.02), extend("step" = 0.0005))]
    pub rgb_shift_amount: f32,
    /// Direction of the RGB shift in radians (0 = horizontal).
    #[schemars(title = "RGB Shift Angle", range(min = 0.0, max = 6.283), extend("step" = 0.01))]
    pub rgb_shift_angle: f32,
    /// Tone-mapping exposure multiplier.
    #[schemars(title = "Exposure", range(min = 0.1, max = 4.0), extend("step" = 0.05))]
    pub exposure: f32,
}

impl Default for PostProcessingOptions {
    fn default() -> Self {
        Self {
            rgb_shift_amount: 0.0025,
            rgb_shift_angle: 0.0,
            exposure: 1.0,
        }
    }
}
