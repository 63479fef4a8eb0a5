//! ACES filmic tone mapping: HDR color target to display range.
//!
//! Reads the model pass's `Rgba16Float` target and writes clamped linear
//! color into the RGB-shift input texture.

use wgpu::util::DeviceExt;

use super::screen_pass::{draw_fullscreen, ScreenPass};
use crate::gpu::pipeline_helpers::{
    create_screen_space_pipeline, filtering_sampler, linear_sampler,
    texture_2d, uniform_buffer,
};
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::{
    ShaderComposer, ShaderError, TONE_MAP_SHADER,
};

/// GPU layout of the tone-map parameters.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ToneMapParams {
    /// Linear multiplier applied before the curve.
    pub exposure: f32,
    _pad: [f32; 3],
}

impl ToneMapParams {
    /// Parameters for `exposure`; non-finite or negative values become 0.
    #[must_use]
    pub fn new(exposure: f32) -> Self {
        let exposure = if exposure.is_finite() {
            exposure.max(0.0)
        } else {
            0.0
        };
        Self {
            exposure,
            _pad: [0.0; 3],
        }
    }
}

impl Default for ToneMapParams {
    fn default() -> Self {
        Self::new(1.0)
    }
}

/// Fullscreen ACES tone-map pass.
pub struct ToneMapPass {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
    sampler: wgpu::Sampler,
    params_buffer: wgpu::Buffer,
    /// CPU copy of the uniform; push with [`flush_params`](Self::flush_params).
    pub params: ToneMapParams,
}

impl ToneMapPass {
    /// Build the pass reading `input` and writing `output_format`.
    ///
    /// # Errors
    ///
    /// Returns [`ShaderError`] if the tone-map shader fails to compose.
    pub fn new(
        context: &RenderContext,
        shader_composer: &mut ShaderComposer,
        input: &wgpu::TextureView,
        output_format: wgpu::TextureFormat,
    ) -> Result<Self, ShaderError> {
        let params = ToneMapParams::default();
        let params_buffer = context.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Tone Map Params Buffer"),
                contents: bytemuck::bytes_of(&params),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            },
        );
        let sampler = linear_sampler(&context.device, "Tone Map Sampler");
        let bind_group_layout = context.device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("Tone Map Bind Group Layout"),
                entries: &[
                    texture_2d(0),
                    filtering_sampler(1),
                    uniform_buffer(2, wgpu::ShaderStages::FRAGMENT),
                ],
            },
        );
        let bind_group = Self::create_bind_group(
            context,
            &bind_group_layout,
            input,
            &sampler,
            &params_buffer,
        );
        let shader = shader_composer.compose(
            &context.device,
            "Tone Map Shader",
            TONE_MAP_SHADER,
        )?;
        let pipeline = create_screen_space_pipeline(
            &context.device,
            "Tone Map",
            &shader,
            output_format,
            None,
            &[&bind_group_layout],
        );
        Ok(Self {
            pipeline,
            bind_group_layout,
            bind_group,
            sampler,
            params_buffer,
            params,
        })
    }

    fn create_bind_group(
        context: &RenderContext,
        layout: &wgpu::BindGroupLayout,
        input: &wgpu::TextureView,
        sampler: &wgpu::Sampler,
        params_buffer: &wgpu::Buffer,
    ) -> wgpu::BindGroup {
        context
            .device
            .create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Tone Map Bind Group"),
                layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(input),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(sampler),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: params_buffer.as_entire_binding(),
                    },
                ],
            })
    }

    /// Point the pass at a new HDR color view (after a resize).
    pub fn set_input(
        &mut self,
        context: &RenderContext,
        input: &wgpu::TextureView,
    ) {
        self.bind_group = Self::create_bind_group(
            context,
            &self.bind_group_layout,
            input,
            &self.sampler,
            &self.params_buffer,
        );
    }

    /// Upload [`params`](Self::params).
    pub fn flush_params(&self, queue: &wgpu::Queue) {
        queue.write_buffer(
            &self.params_buffer,
            0,
            bytemuck::bytes_of(&self.params),
        );
    }
}

impl ScreenPass for ToneMapPass {
    fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        output: &wgpu::TextureView,
    ) {
        draw_fullscreen(
            encoder,
            "Tone Map Pass",
            output,
            &self.pipeline,
            &self.bind_group,
        );
    }

    /// Nothing is sized by the viewport; the input arrives via
    /// [`set_input`](ToneMapPass::set_input).
    fn resize(&mut self, _context: &RenderContext) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_are_one_vec4() {
        assert_eq!(size_of::<ToneMapParams>(), 16);
    }

    #[test]
    fn exposure_is_sanitized() {
        assert_eq!(ToneMapParams::default().exposure, 1.0);
        assert_eq!(ToneMapParams::new(-3.0).exposure, 0.0);
        assert_eq!(ToneMapParams::new(f32::NAN).exposure, 0.0);
        assert_eq!(ToneMapParams::new(1.5).exposure, 1.5);
    }
}
