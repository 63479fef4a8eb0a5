use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::util::easing::EasingFunction;

/// How the model follows the pointer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Pointer", inline)]
#[serde(default)]
pub struct PointerOptions {
    /// Seconds from a pointer sample until the model fully faces it.
    #[schemars(title = "Ease Duration", range(min = 0.0, max = 3.0), extend("step" = 0.05))]
    pub ease_seconds: f32,
    /// Easing curve toward each new target.
    #[schemars(skip)]
    pub easing: EasingFunction,
}

impl PointerOptions {
    /// `ease_seconds` as a [`Duration`]; negative or non-finite values snap
    /// immediately.
    #[must_use]
    pub fn ease_duration(&self) -> Duration {
        Duration::try_from_secs_f32(self.ease_seconds.max(0.0))
            .unwrap_or(Duration::ZERO)
    }
}

impl Default for PointerOptions {
    fn default() -> Self {
        Self {
            ease_seconds: 0.5,
            easing: EasingFunction::CubicOut,
        }
    }
}
