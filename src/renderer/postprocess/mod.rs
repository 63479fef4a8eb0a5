//! Post-processing effect passes.
//!
//! The model pass draws into an HDR target owned here. ACES tone mapping
//! resolves it to display range, and the RGB shift writes the final image
//! to the swapchain.

/// HDR target ownership and pass sequencing.
pub mod post_process;
pub mod rgb_shift;
/// Fullscreen-triangle pass scaffolding shared by the effects.
pub mod screen_pass;
pub mod tone_map;

pub use post_process::PostProcessStack;
pub use screen_pass::ScreenPass;
