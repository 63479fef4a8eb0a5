//! RGB-shift pass: chromatic channel offset, written to the swapchain.
//!
//! Owns the intermediate texture the tone-map pass renders into. The red
//! channel is read at `uv + offset`, blue at `uv - offset`, and green and
//! alpha at `uv`, where `offset = amount * (cos angle, sin angle)`.

use wgpu::util::DeviceExt;

use super::screen_pass::{draw_fullscreen, ScreenPass};
use crate::gpu::pipeline_helpers::{
    create_screen_space_pipeline, filtering_sampler, linear_sampler,
    texture_2d, uniform_buffer,
};
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::{
    ShaderComposer, ShaderError, RGB_SHIFT_SHADER,
};
use crate::gpu::texture::RenderTarget;

/// Default channel separation in uv units.
pub const DEFAULT_AMOUNT: f32 = 0.0025;
/// Default shift direction in radians.
pub const DEFAULT_ANGLE: f32 = 0.0;

/// GPU layout of the RGB-shift parameters.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct RgbShiftParams {
    /// `amount * (cos angle, sin angle)`.
    pub offset: [f32; 2],
    /// 1 when the output format needs manual sRGB encoding.
    pub encode_srgb: u32,
    _pad: u32,
}

impl RgbShiftParams {
    /// Parameters for a shift of `amount` uv units along `angle` radians.
    /// Non-finite inputs disable the shift.
    #[must_use]
    pub fn new(amount: f32, angle: f32, encode_srgb: bool) -> Self {
        let offset = if amount.is_finite() && angle.is_finite() {
            let (sin, cos) = angle.sin_cos();
            [amount * cos, amount * sin]
        } else {
            [0.0, 0.0]
        };
        Self {
            offset,
            encode_srgb: u32::from(encode_srgb),
            _pad: 0,
        }
    }
}

/// Fullscreen RGB-shift pass.
pub struct RgbShiftPass {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
    sampler: wgpu::Sampler,
    params_buffer: wgpu::Buffer,
    input: RenderTarget,
    input_format: wgpu::TextureFormat,
    width: u32,
    height: u32,
    /// CPU copy of the uniform; push with [`flush_params`](Self::flush_params).
    pub params: RgbShiftParams,
}

impl RgbShiftPass {
    /// Build the pass writing to the surface format.
    ///
    /// # Errors
    ///
    /// Returns [`ShaderError`] if the RGB-shift shader fails to compose.
    pub fn new(
        context: &RenderContext,
        shader_composer: &mut ShaderComposer,
    ) -> Result<Self, ShaderError> {
        let width = context.render_width();
        let height = context.render_height();
        let output_format = context.format();
        // Store 8-bit intermediates sRGB-encoded; sampling decodes them.
        let input_format = output_format.add_srgb_suffix();
        let input = RenderTarget::new(
            &context.device,
            "RGB Shift Input",
            width,
            height,
            input_format,
        );

        let params = RgbShiftParams::new(
            DEFAULT_AMOUNT,
            DEFAULT_ANGLE,
            !output_format.is_srgb(),
        );
        let params_buffer = context.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("RGB Shift Params Buffer"),
                contents: bytemuck::bytes_of(&params),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            },
        );
        let sampler = linear_sampler(&context.device, "RGB Shift Sampler");
        let bind_group_layout = context.device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("RGB Shift Bind Group Layout"),
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
            &input.view,
            &sampler,
            &params_buffer,
        );
        let shader = shader_composer.compose(
            &context.device,
            "RGB Shift Shader",
            RGB_SHIFT_SHADER,
        )?;
        let pipeline = create_screen_space_pipeline(
            &context.device,
            "RGB Shift",
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
            input,
            input_format,
            width,
            height,
            params,
        })
    }

    fn create_bind_group(
        context: &RenderContext,
        layout: &wgpu::BindGroupLayout,
        input_view: &wgpu::TextureView,
        sampler: &wgpu::Sampler,
        params_buffer: &wgpu::Buffer,
    ) -> wgpu::BindGroup {
        context
            .device
            .create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("RGB Shift Bind Group"),
                layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(
                            input_view,
                        ),
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

    /// Texture view earlier passes render into.
    #[must_use]
    pub fn input_view(&self) -> &wgpu::TextureView {
        &self.input.view
    }

    /// Format of [`input_view`](Self::input_view).
    #[must_use]
    pub fn input_format(&self) -> wgpu::TextureFormat {
        self.input_format
    }

    /// Set amount and angle, keeping the sRGB encoding flag.
    pub fn set_shift(&mut self, amount: f32, angle: f32) {
        self.params =
            RgbShiftParams::new(amount, angle, self.params.encode_srgb != 0);
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

impl ScreenPass for RgbShiftPass {
    fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        output: &wgpu::TextureView,
    ) {
        draw_fullscreen(
            encoder,
            "RGB Shift Pass",
            output,
            &self.pipeline,
            &self.bind_group,
        );
    }

    fn resize(&mut self, context: &RenderContext) {
        let width = context.render_width();
        let height = context.render_height();
        if width == self.width && height == self.height {
            return;
        }
        self.width = width;
        self.height = height;
        self.input = RenderTarget::new(
            &context.device,
            "RGB Shift Input",
            width,
            height,
            self.input_format,
        );
        self.bind_group = Self::create_bind_group(
            context,
            &self.bind_group_layout,
            &self.input.view,
            &self.sampler,
            &self.params_buffer,
        );
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;

    #[test]
    fn params_are_one_vec4() {
        assert_eq!(size_of::<RgbShiftParams>(), 16);
    }

    #[test]
    fn default_shift_is_horizontal() {
        let p = RgbShiftParams::new(DEFAULT_AMOUNT, DEFAULT_ANGLE, false);
        assert_eq!(p.offset, [0.0025, 0.0]);
        assert_eq!(p.encode_srgb, 0);
    }

    #[test]
    fn angle_rotates_offset() {
        let p = RgbShiftParams::new(0.01, FRAC_PI_2, true);
        assert!(p.offset[0].abs() < 1e-9);
        assert!((p.offset[1] - 0.01).abs() < 1e-9);
        assert_eq!(p.encode_srgb, 1);
    }

    #[test]
    fn zero_amount_is_identity() {
        let p = RgbShiftParams::new(0.0, 1.3, false);
        assert_eq!(p.offset, [0.0, 0.0]);
    }

    #[test]
    fn non_finite_disables_shift() {
        assert_eq!(RgbShiftParams::new(f32::NAN, 0.0, false).offset, [0.0; 2]);
        assert_eq!(
            RgbShiftParams::new(0.01, f32::INFINITY, false).offset,
            [0.0; 2]
        );
    }
}
