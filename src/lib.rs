// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (thresholds in clippy.toml)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Real-time 3D model showcase built on wgpu.
//!
//! Vitrine loads an HDRI environment map and a textured glTF model, lights
//! the model with the environment, runs an RGB-shift post effect, and turns
//! the model to follow the mouse pointer.
//!
//! # Key entry points
//!
//! - [`scene::fit::compute_fit`] - normalize a model to a target size and
//!   recenter it at the origin
//! - [`input::orientation::PointerOrientationController`] - pointer samples
//!   to a smoothed yaw/pitch
//! - [`engine::Showcase`] - GPU-free orchestration of scene, camera, input,
//!   and asset events
//! - [`engine::ShowcaseEngine`] - the GPU engine driving the frame loop
//! - [`options::Options`] - runtime configuration (assets, camera, pointer,
//!   post-processing)
//!
//! # Architecture
//!
//! Assets are fetched and decoded on background threads by
//! [`loader::AssetLoader`] and handed to the main thread as events. The main
//! thread installs them into the [`scene::Scene`], ticks the orientation
//! controller, and renders a three-pass pipeline: model → tone map →
//! RGB shift.

pub mod animation;
pub mod camera;
pub mod engine;
pub mod error;
pub mod gpu;
pub mod input;
pub mod loader;
pub mod options;
pub mod renderer;
pub mod scene;
pub mod util;
#[cfg(feature = "viewer")]
pub mod viewer;

pub use engine::{Showcase, ShowcaseEngine};
pub use error::VitrineError;
pub use input::InputEvent;
pub use options::Options;
#[cfg(feature = "viewer")]
pub use viewer::Viewer;
