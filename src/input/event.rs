/// Platform-agnostic input events.
///
/// The viewer translates window events into these and hands them to
/// [`Showcase::handle_input`](crate::engine::Showcase::handle_input).
///
/// # Example
///
/// ```
/// # use vitrine::{InputEvent, Options, Showcase};
/// let mut showcase = Showcase::new(Options::default(), 800, 600);
/// showcase.handle_input(InputEvent::CursorMoved { x: 400.0, y: 300.0 });
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Cursor moved to absolute viewport position.
    CursorMoved {
        /// Horizontal position in physical pixels from the left edge.
        x: f32,
        /// Vertical position in physical pixels from the top edge.
        y: f32,
    },
    /// Viewport changed size.
    Resized {
        /// New width in physical pixels.
        width: u32,
        /// New height in physical pixels.
        height: u32,
    },
}

#[cfg(feature = "viewer")]
impl InputEvent {
    /// Translate a winit window event, if it is one the showcase consumes.
    #[must_use]
    pub fn from_window_event(event: &winit::event::WindowEvent) -> Option<Self> {
        match event {
            winit::event::WindowEvent::CursorMoved { position, .. } => {
                Some(Self::CursorMoved {
                    x: position.x as f32,
                    y: position.y as f32,
                })
            }
            winit::event::WindowEvent::Resized(size) => Some(Self::Resized {
                width: size.width,
                height: size.height,
            }),
            _ => None,
        }
    }
}
