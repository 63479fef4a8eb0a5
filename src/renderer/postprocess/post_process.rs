use super::rgb_shift::RgbShiftPass;
use super::screen_pass::ScreenPass;
use super::tone_map::{ToneMapParams, ToneMapPass};
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::{ShaderComposer, ShaderError};
use crate::gpu::texture::{RenderTarget, HDR_FORMAT};
use crate::options::PostProcessingOptions;

/// Owns the HDR color and depth targets and the tone-map → RGB-shift
/// sequence.
pub struct PostProcessStack {
    color: RenderTarget,
    depth: RenderTarget,
    tone_map: ToneMapPass,
    rgb_shift: RgbShiftPass,
}

impl PostProcessStack {
    /// Build the targets and both passes at the context's render size.
    ///
    /// # Errors
    ///
    /// Returns [`ShaderError`] if a screen shader fails to compose.
    pub fn new(
        context: &RenderContext,
        shader_composer: &mut ShaderComposer,
    ) -> Result<Self, ShaderError> {
        let (color, depth) = Self::create_targets(context);
        let rgb_shift = RgbShiftPass::new(context, shader_composer)?;
        let tone_map = ToneMapPass::new(
            context,
            shader_composer,
            &color.view,
            rgb_shift.input_format(),
        )?;
        Ok(Self {
            color,
            depth,
            tone_map,
            rgb_shift,
        })
    }

    fn create_targets(context: &RenderContext) -> (RenderTarget, RenderTarget) {
        let width = context.render_width();
        let height = context.render_height();
        let color = RenderTarget::new(
            &context.device,
            "HDR Color Target",
            width,
            height,
            HDR_FORMAT,
        );
        let depth = RenderTarget::depth(&context.device, width, height);
        (color, depth)
    }

    /// Recreate all resolution-dependent resources.
    pub fn resize(&mut self, context: &RenderContext) {
        let (color, depth) = Self::create_targets(context);
        self.color = color;
        self.depth = depth;
        self.tone_map.set_input(context, &self.color.view);
        self.tone_map.resize(context);
        self.rgb_shift.resize(context);
    }

    /// Run tone map → RGB shift, ending in `final_view`.
    pub fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        final_view: &wgpu::TextureView,
    ) {
        self.tone_map.render(encoder, self.rgb_shift.input_view());
        self.rgb_shift.render(encoder, final_view);
    }

    /// Push effect option values to the GPU.
    pub fn apply_options(
        &mut self,
        options: &PostProcessingOptions,
        queue: &wgpu::Queue,
    ) {
        self.tone_map.params = ToneMapParams::new(options.exposure);
        self.tone_map.flush_params(queue);
        self.rgb_shift
            .set_shift(options.rgb_shift_amount, options.rgb_shift_angle);
        self.rgb_shift.flush_params(queue);
    }

    /// HDR color target for the model pass.
    #[must_use]
    pub fn color_view(&self) -> &wgpu::TextureView {
        &self.color.view
    }

    /// Depth target for the model pass.
    #[must_use]
    pub fn depth_view(&self) -> &wgpu::TextureView {
        &self.depth.view
    }
}
