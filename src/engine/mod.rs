//! The showcase engine: GPU context, renderer, asset loading, and the
//! device-independent [`Showcase`] state.

pub mod showcase;

pub use showcase::Showcase;

use crate::error::VitrineError;
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::ShaderComposer;
use crate::input::InputEvent;
use crate::loader::{AssetLoader, AssetSource};
use crate::options::Options;
use crate::renderer::Renderer;
use crate::util::frame_timing::FrameTiming;

/// Renders a [`Showcase`] to a window surface.
///
/// # Construction
///
/// [`ShowcaseEngine::new`] initializes the GPU, composes every shader, and
/// starts loading the environment and the model in the background. It
/// returns before either asset arrives; frames render with stand-ins until
/// they do.
///
/// # Frame loop
///
/// Each frame, call [`update`](Self::update) with the elapsed time and then
/// [`render`](Self::render). Neither blocks on loading. Forward window
/// input through [`handle_input`](Self::handle_input).
pub struct ShowcaseEngine {
    /// Core wgpu device, queue, and surface.
    pub context: RenderContext,
    renderer: Renderer,
    loader: AssetLoader,
    frame_timing: FrameTiming,
    showcase: Showcase,
}

impl ShowcaseEngine {
    /// Create the engine for a window surface and begin loading assets.
    ///
    /// # Errors
    ///
    /// Returns [`VitrineError`] if GPU initialization or shader composition
    /// fails, or a loader thread cannot be spawned.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        size: (u32, u32),
        scale_factor: f64,
        options: Options,
    ) -> Result<Self, VitrineError> {
        let mut context = RenderContext::new(window, size).await?;
        context.set_surface_scale(scale_factor);
        context.render_scale = options.display.render_scale(scale_factor);

        let mut shader_composer = ShaderComposer::new()?;
        let renderer = Renderer::new(&context, &mut shader_composer, &options)?;

        let mut loader = AssetLoader::new();
        loader.spawn_environment(AssetSource::parse(
            &options.assets.environment,
        ))?;
        loader.spawn_model(AssetSource::parse(&options.assets.model))?;

        log::info!(
            "engine ready: {}x{} surface, render scale {}, loading {} and {}",
            context.config.width,
            context.config.height,
            context.render_scale,
            options.assets.model,
            options.assets.environment,
        );

        let frame_timing = FrameTiming::new(options.display.target_fps);
        let showcase = Showcase::new(options, size.0, size.1);
        Ok(Self {
            context,
            renderer,
            loader,
            frame_timing,
            showcase,
        })
    }

    /// Take delivered assets, advance the showcase by `dt` seconds, and
    /// upload anything new to the GPU.
    pub fn update(&mut self, dt: f32) {
        for event in self.loader.poll() {
            let _ = self.showcase.apply_asset_event(event);
        }
        self.showcase.update(dt);
        self.renderer.sync_scene(&self.context, self.showcase.scene());
    }

    /// Draw and present one frame: model pass, tone map, RGB shift.
    ///
    /// # Errors
    ///
    /// Returns [`wgpu::SurfaceError`] if the swapchain frame cannot be
    /// acquired.
    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        if !self.frame_timing.should_render() {
            return Ok(());
        }

        let frame = self.context.get_next_frame()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self.context.create_encoder();
        self.renderer.encode(
            &self.context,
            &mut encoder,
            self.showcase.scene(),
            self.showcase.camera(),
            self.showcase.options(),
            &view,
        );
        self.context.submit(encoder);
        frame.present();

        self.frame_timing.end_frame();
        Ok(())
    }

    /// Resize the surface, camera, and render targets. Ignores zero-sized
    /// dimensions.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.context.resize(width, height);
            let _ = self.showcase.resize(width, height);
            self.renderer.resize(&self.context);
        }
    }

    /// Track a new window scale factor (moved to another monitor).
    pub fn set_scale_factor(&mut self, scale_factor: f64) {
        self.context.set_surface_scale(scale_factor);
        self.context.render_scale =
            self.showcase.options().display.render_scale(scale_factor);
        self.renderer.resize(&self.context);
    }

    /// Forward a platform-agnostic input event.
    pub fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::Resized { width, height } => self.resize(width, height),
            InputEvent::CursorMoved { .. } => {
                let _ = self.showcase.handle_input(event);
            }
        }
    }

    /// Current options.
    #[must_use]
    pub fn options(&self) -> &Options {
        self.showcase.options()
    }

    /// Replace the options and push them to the GPU.
    ///
    /// Asset locations only take effect for the next engine.
    pub fn set_options(&mut self, options: Options) {
        self.frame_timing = FrameTiming::new(options.display.target_fps);
        self.context.render_scale =
            options.display.render_scale(self.context.scale_factor);
        self.renderer.apply_options(&self.context, &options);
        self.showcase.set_options(options);
        self.renderer.resize(&self.context);
    }

    /// The device-independent showcase state.
    #[must_use]
    pub fn showcase(&self) -> &Showcase {
        &self.showcase
    }

    /// Smoothed frames per second.
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.frame_timing.fps()
    }

    /// Number of asset loads still in flight.
    #[must_use]
    pub fn pending_assets(&self) -> usize {
        self.loader.pending()
    }
}
