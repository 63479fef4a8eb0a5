use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Window and surface presentation settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Display", inline)]
#[serde(default)]
pub struct DisplayOptions {
    /// Upper bound on the render scale taken from the device pixel ratio.
    #[schemars(title = "Max Pixel Ratio", range(min = 1.0, max = 4.0), extend("step" = 1.0))]
    pub max_pixel_ratio: f32,
    /// Frame-rate cap (0 = uncapped).
    #[schemars(skip)]
    pub target_fps: u32,
    /// Linear RGBA clear color behind the model. Alpha 0 keeps the
    /// background transparent where the compositor supports it.
    #[schemars(skip)]
    pub clear_color: [f32; 4],
    /// Radiance of the stand-in environment used until the HDRI loads.
    #[schemars(skip)]
    pub fallback_environment: [f32; 3],
    /// Multiplier on all image-based lighting.
    #[schemars(title = "Environment Intensity", range(min = 0.0, max = 4.0), extend("step" = 0.05))]
    pub environment_intensity: f32,
}

impl DisplayOptions {
    /// Render scale for a device pixel ratio: `min(ratio, max_pixel_ratio)`.
    ///
    /// Fractional ratios are kept. Unusable inputs render at 1.
    #[must_use]
    pub fn render_scale(&self, device_pixel_ratio: f64) -> f32 {
        let ratio = (device_pixel_ratio as f32).min(self.max_pixel_ratio);
        if ratio.is_finite() && ratio > 0.0 {
            ratio
        } else {
            1.0
        }
    }
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            max_pixel_ratio: 2.0,
            target_fps: 0,
            clear_color: [0.0, 0.0, 0.0, 0.0],
            fallback_environment: [0.6, 0.6, 0.6],
            environment_intensity: 1.0,
        }
    }
}
