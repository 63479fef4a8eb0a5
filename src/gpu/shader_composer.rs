//! WGSL shader composition.

use std::borrow::Cow;
use std::fmt;

use naga_oil::compose::{
    ComposableModuleDescriptor, Composer, ComposerError, NagaModuleDescriptor,
    ShaderLanguage, ShaderType,
};

/// A shader or shared module failed to compose.
#[derive(Debug)]
pub struct ShaderError {
    /// Path of the offending WGSL file, relative to `assets/shaders/`.
    pub file_path: String,
    /// Underlying composer diagnostic.
    pub source: Box<ComposerError>,
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}': {}", self.file_path, self.source)
    }
}

impl std::error::Error for ShaderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.source.as_ref())
    }
}

/// Wraps `naga_oil::compose::Composer` to provide shader composition with
/// `#import` support.
///
/// Shared WGSL modules are registered at construction time. Consuming
/// shaders use `#import vitrine::module_name` to pull in shared code. The
/// composer produces `naga::Module` IR directly, skipping WGSL re-parse at
/// runtime.
pub struct ShaderComposer {
    composer: Composer,
}

/// Shared module definition.
struct ModuleDef {
    source: &'static str,
    file_path: &'static str,
}

/// Shared modules in dependency order.
const SHARED_MODULES: &[ModuleDef] = &[ModuleDef {
    source: include_str!("../../assets/shaders/modules/fullscreen.wgsl"),
    file_path: "modules/fullscreen.wgsl",
}];

/// A top-level shader embedded in the binary.
#[derive(Debug, Clone, Copy)]
pub struct ShaderSource {
    /// WGSL text, possibly with `#import` directives.
    pub source: &'static str,
    /// Path relative to `assets/shaders/`, used in diagnostics.
    pub file_path: &'static str,
}

/// Lit model pass.
pub const MODEL_SHADER: ShaderSource = ShaderSource {
    source: include_str!("../../assets/shaders/model.wgsl"),
    file_path: "model.wgsl",
};

/// ACES tone mapping.
pub const TONE_MAP_SHADER: ShaderSource = ShaderSource {
    source: include_str!("../../assets/shaders/screen/tone_map.wgsl"),
    file_path: "screen/tone_map.wgsl",
};

/// RGB channel shift.
pub const RGB_SHIFT_SHADER: ShaderSource = ShaderSource {
    source: include_str!("../../assets/shaders/screen/rgb_shift.wgsl"),
    file_path: "screen/rgb_shift.wgsl",
};

impl ShaderComposer {
    /// Create a composer with every shared module registered.
    ///
    /// # Errors
    ///
    /// Returns [`ShaderError`] if a shared module fails to parse.
    pub fn new() -> Result<Self, ShaderError> {
        let mut composer = Composer::default();
        for m in SHARED_MODULES {
            let _ = composer
                .add_composable_module(ComposableModuleDescriptor {
                    source: m.source,
                    file_path: m.file_path,
                    language: ShaderLanguage::Wgsl,
                    ..Default::default()
                })
                .map_err(|e| ShaderError {
                    file_path: m.file_path.to_owned(),
                    source: Box::new(e),
                })?;
        }
        Ok(Self { composer })
    }

    /// Compose `shader` into a `wgpu::ShaderModule` ready for pipeline
    /// creation.
    ///
    /// # Errors
    ///
    /// Returns [`ShaderError`] if composition fails.
    pub fn compose(
        &mut self,
        device: &wgpu::Device,
        label: &str,
        shader: ShaderSource,
    ) -> Result<wgpu::ShaderModule, ShaderError> {
        let naga_module = self.compose_naga(shader)?;
        Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Naga(Cow::Owned(naga_module)),
        }))
    }

    /// Compose into a `naga::Module` without a device.
    ///
    /// # Errors
    ///
    /// Returns [`ShaderError`] if composition fails.
    pub fn compose_naga(
        &mut self,
        shader: ShaderSource,
    ) -> Result<naga::Module, ShaderError> {
        self.composer
            .make_naga_module(NagaModuleDescriptor {
                source: shader.source,
                file_path: shader.file_path,
                shader_type: ShaderType::Wgsl,
                ..Default::default()
            })
            .map_err(|e| ShaderError {
                file_path: shader.file_path.to_owned(),
                source: Box::new(e),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validate(module: &naga::Module) {
        let _ = naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        )
        .validate(module)
        .unwrap();
    }

    #[test]
    fn all_shaders_compose_and_validate() {
        let mut composer = ShaderComposer::new().unwrap();
        for shader in [MODEL_SHADER, TONE_MAP_SHADER, RGB_SHIFT_SHADER] {
            let module = composer
                .compose_naga(shader)
                .map_err(|e| e.to_string())
                .unwrap();
            validate(&module);
        }
    }

    #[test]
    fn entry_points_present() {
        let mut composer = ShaderComposer::new().unwrap();
        for shader in [MODEL_SHADER, TONE_MAP_SHADER, RGB_SHIFT_SHADER] {
            let module = composer.compose_naga(shader).unwrap();
            let names: Vec<&str> =
                module.entry_points.iter().map(|e| e.name.as_str()).collect();
            assert!(names.contains(&"vs_main"), "{}", shader.file_path);
            assert!(names.contains(&"fs_main"), "{}", shader.file_path);
        }
    }

    #[test]
    fn unresolved_import_reports_file() {
        let mut composer = ShaderComposer::new().unwrap();
        let err = composer
            .compose_naga(ShaderSource {
                source: "#import vitrine::missing\n\
                         @fragment fn fs_main() -> @location(0) vec4<f32> {\n\
                             return missing::shade();\n\
                         }",
                file_path: "broken.wgsl",
            })
            .unwrap_err();
        assert_eq!(err.file_path, "broken.wgsl");
    }
}
