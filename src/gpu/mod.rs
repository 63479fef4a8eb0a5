//! GPU resource management utilities.
//!
//! Provides wgpu device/surface initialization, texture uploads, shared
//! pipeline boilerplate, and shader composition.

/// Shared wgpu boilerplate helpers for bind group layouts and screen-space
/// pipelines.
pub mod pipeline_helpers;
/// wgpu device, surface, and queue initialization.
pub mod render_context;
/// WGSL shader composition with `#import` support via naga-oil.
pub mod shader_composer;
/// Render targets and texture uploads.
pub mod texture;
