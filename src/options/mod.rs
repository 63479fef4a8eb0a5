//! Centralized showcase options with TOML preset support.
//!
//! All tweakable settings (asset locations, camera, pointer easing,
//! post-processing, display) are consolidated here. Options serialize
//! to/from TOML; presets live in `assets/presets/`.

mod assets;
mod camera;
mod display;
mod pointer;
mod post_processing;

use std::path::Path;

pub use assets::AssetOptions;
pub use camera::CameraOptions;
pub use display::DisplayOptions;
pub use pointer::PointerOptions;
pub use post_processing::PostProcessingOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::VitrineError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[camera]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Model and environment sources, model size.
    pub assets: AssetOptions,
    /// Camera projection and placement.
    pub camera: CameraOptions,
    /// Pointer-follow easing.
    pub pointer: PointerOptions,
    /// Post-processing effect parameters.
    pub post_processing: PostProcessingOptions,
    /// Surface and presentation settings.
    pub display: DisplayOptions,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`VitrineError::Io`] if the file cannot be read and
    /// [`VitrineError::OptionsParse`] if it is not valid options TOML.
    pub fn load(path: &Path) -> Result<Self, VitrineError> {
        let content = std::fs::read_to_string(path).map_err(VitrineError::Io)?;
        Self::from_toml(&content)
    }

    /// Parse options from TOML text. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`VitrineError::OptionsParse`] on malformed TOML or
    /// mistyped fields.
    pub fn from_toml(content: &str) -> Result<Self, VitrineError> {
        toml::from_str(content)
            .map_err(|e| VitrineError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`VitrineError::OptionsParse`] if serialization fails and
    /// [`VitrineError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), VitrineError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| VitrineError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(VitrineError::Io)?;
        }
        std::fs::write(path, content).map_err(VitrineError::Io)
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::easing::EasingFunction;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn defaults_match_showcase() {
        let opts = Options::default();
        assert_eq!(opts.assets.target_size, 2.0);
        assert_eq!(opts.camera.fovy, 40.0);
        assert_eq!(opts.camera.distance, 4.0);
        assert_eq!(opts.camera.portrait_distance, 5.0);
        assert_eq!(opts.post_processing.rgb_shift_amount, 0.0025);
        assert_eq!(opts.pointer.ease_seconds, 0.5);
        assert_eq!(opts.pointer.easing, EasingFunction::CubicOut);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r#"
[pointer]
ease_seconds = 0.25
easing = "quadratic_out"

[assets]
model = "helmet.glb"
"#;
        let opts = Options::from_toml(toml_str).unwrap();
        assert_eq!(opts.pointer.ease_seconds, 0.25);
        assert_eq!(opts.pointer.easing, EasingFunction::QuadraticOut);
        assert_eq!(opts.assets.model, "helmet.glb");
        // Everything else should be default
        assert_eq!(opts.assets.target_size, 2.0);
        assert_eq!(opts.camera, CameraOptions::default());
    }

    #[test]
    fn shipped_default_preset_matches_defaults() {
        let preset = include_str!("../../assets/presets/default.toml");
        assert_eq!(Options::from_toml(preset).unwrap(), Options::default());
    }

    #[test]
    fn malformed_toml_is_options_parse_error() {
        let err = Options::from_toml("[camera]\nfovy = \"wide\"").unwrap_err();
        assert!(matches!(err, VitrineError::OptionsParse(_)));
    }

    #[test]
    fn save_then_load_and_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("presets").join("dusk.toml");
        let mut opts = Options::default();
        opts.post_processing.exposure = 1.5;
        opts.save(&path).unwrap();

        let loaded = Options::load(&path).unwrap();
        assert_eq!(loaded, opts);
        assert_eq!(
            Options::list_presets(&dir.path().join("presets")),
            vec!["dusk".to_owned()]
        );
    }

    #[test]
    fn pointer_duration_is_sanitized() {
        let mut pointer = PointerOptions::default();
        assert_eq!(pointer.ease_duration().as_millis(), 500);
        pointer.ease_seconds = -2.0;
        assert!(pointer.ease_duration().is_zero());
        pointer.ease_seconds = f32::INFINITY;
        assert!(pointer.ease_duration().is_zero());
    }

    #[test]
    fn render_scale_is_capped() {
        let display = DisplayOptions::default();
        assert_eq!(display.render_scale(1.0), 1.0);
        assert_eq!(display.render_scale(1.25), 1.25);
        assert_eq!(display.render_scale(1.5), 1.5);
        assert_eq!(display.render_scale(2.0), 2.0);
        assert_eq!(display.render_scale(3.0), 2.0);
        assert_eq!(display.render_scale(0.5), 0.5);
        assert_eq!(display.render_scale(f64::NAN), 1.0);
        assert_eq!(display.render_scale(0.0), 1.0);
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(Options::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();

        assert!(props.contains_key("assets"));
        assert!(props.contains_key("camera"));
        assert!(props.contains_key("pointer"));
        assert!(props.contains_key("post_processing"));
        assert!(props.contains_key("display"));

        // Exposed fields present, skipped ones absent
        let effects = &props["post_processing"]["properties"];
        assert!(effects.get("rgb_shift_amount").is_some());
        let assets = &props["assets"]["properties"];
        assert!(assets.get("target_size").is_some());
        assert!(assets.get("model").is_none());
    }
}
