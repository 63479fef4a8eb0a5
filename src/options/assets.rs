use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Where the showcase assets come from and how the model is sized.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Assets", inline)]
#[serde(default)]
pub struct AssetOptions {
    /// glTF model: a local path or an `http(s)://` URL.
    #[schemars(skip)]
    pub model: String,
    /// Radiance `.hdr` environment map: a local path or an `http(s)://` URL.
    #[schemars(skip)]
    pub environment: String,
    /// World-space size of the model's largest dimension after fitting.
    #[schemars(title = "Model Size", range(min = 0.1, max = 10.0), extend("step" = 0.1))]
    pub target_size: f32,
}

impl Default for AssetOptions {
    fn default() -> Self {
        Self {
            model: "assets/models/DamagedHelmet.gltf".to_owned(),
            environment: "https://dl.polyhaven.org/file/ph-assets/HDRIs/hdr/1k/qwantani_dusk_1_1k.hdr"
                .to_owned(),
            target_size: 2.0,
        }
    }
}
