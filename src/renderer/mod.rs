//! Rendering: the lit model pass followed by tone mapping and RGB shift.
//!
//! [`Renderer`] mirrors the CPU [`Scene`] on the GPU. It re-uploads the
//! model or environment only when the scene's generation counter for that
//! asset has moved, so per-frame work is just two uniform writes and three
//! passes.

pub mod model_pass;
pub(crate) mod pipeline_util;
pub mod postprocess;

use glam::Mat4;

pub use model_pass::{MeshUniform, ModelPass};
pub use postprocess::PostProcessStack;

use crate::camera::Camera;
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::{ShaderComposer, ShaderError};
use crate::options::Options;
use crate::scene::Scene;

/// Last scene generation uploaded to the GPU.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct SyncedGeneration(u64);

impl SyncedGeneration {
    /// Record `current`; `true` if it differs from what was uploaded.
    fn advance_to(&mut self, current: u64) -> bool {
        if self.0 == current {
            return false;
        }
        self.0 = current;
        true
    }
}

/// GPU side of the showcase.
pub struct Renderer {
    model_pass: ModelPass,
    post_process: PostProcessStack,
    model_generation: SyncedGeneration,
    environment_generation: SyncedGeneration,
}

impl Renderer {
    /// Build every pass and apply `options`.
    ///
    /// # Errors
    ///
    /// Returns [`ShaderError`] if any shader fails to compose.
    pub fn new(
        context: &RenderContext,
        shader_composer: &mut ShaderComposer,
        options: &Options,
    ) -> Result<Self, ShaderError> {
        let model_pass = ModelPass::new(
            context,
            shader_composer,
            options.display.fallback_environment,
        )?;
        let post_process = PostProcessStack::new(context, shader_composer)?;
        let mut renderer = Self {
            model_pass,
            post_process,
            model_generation: SyncedGeneration::default(),
            environment_generation: SyncedGeneration::default(),
        };
        renderer.apply_options(context, options);
        Ok(renderer)
    }

    /// Upload whichever scene assets changed since the last call.
    pub fn sync_scene(&mut self, context: &RenderContext, scene: &Scene) {
        if self.model_generation.advance_to(scene.model_generation()) {
            if let Some(model) = scene.model() {
                self.model_pass.set_model(context, model.mesh());
                log::debug!(
                    "uploaded model generation {}",
                    scene.model_generation()
                );
            }
        }
        if self
            .environment_generation
            .advance_to(scene.environment_generation())
        {
            if let Some(environment) = scene.environment() {
                self.model_pass.set_environment(context, environment);
                log::debug!(
                    "uploaded environment generation {}",
                    scene.environment_generation()
                );
            }
        }
    }

    /// Push option values to the GPU.
    pub fn apply_options(&mut self, context: &RenderContext, options: &Options) {
        self.post_process
            .apply_options(&options.post_processing, &context.queue);
    }

    /// Recreate resolution-dependent targets.
    pub fn resize(&mut self, context: &RenderContext) {
        self.post_process.resize(context);
    }

    /// Record the full frame into `encoder`, ending in `final_view`.
    pub fn encode(
        &self,
        context: &RenderContext,
        encoder: &mut wgpu::CommandEncoder,
        scene: &Scene,
        camera: &Camera,
        options: &Options,
        final_view: &wgpu::TextureView,
    ) {
        let model_matrix = scene
            .model()
            .map_or(Mat4::IDENTITY, |model| model.transform.matrix());
        self.model_pass.update(
            &context.queue,
            camera,
            model_matrix,
            options.display.environment_intensity,
        );
        self.model_pass.render(
            encoder,
            self.post_process.color_view(),
            self.post_process.depth_view(),
            options.display.clear_color,
        );
        self.post_process.render(encoder, final_view);
    }

    /// `true` once a drawable model is on the GPU.
    #[must_use]
    pub fn has_model(&self) -> bool {
        self.model_pass.has_model()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_sync_fires_once_per_change() {
        let mut synced = SyncedGeneration::default();
        assert!(!synced.advance_to(0));
        assert!(synced.advance_to(1));
        assert!(!synced.advance_to(1));
        assert!(synced.advance_to(3));
    }
}
