use crate::gpu::texture::{DEPTH_FORMAT, HDR_FORMAT};

/// HDR color target for lit geometry. Opaque: the model pass writes
/// alpha 1 where geometry is and keeps the cleared alpha elsewhere.
pub fn hdr_fragment_target() -> Option<wgpu::ColorTargetState> {
    Some(wgpu::ColorTargetState {
        format: HDR_FORMAT,
        blend: None,
        write_mask: wgpu::ColorWrites::ALL,
    })
}

/// Standard depth-stencil state for geometry pipelines.
pub fn depth_stencil_state() -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format: DEPTH_FORMAT,
        depth_write_enabled: true,
        depth_compare: wgpu::CompareFunction::Less,
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    }
}
