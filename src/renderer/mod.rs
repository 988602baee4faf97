//! Rendering module
//!
//! Scene drawing against an abstract 2D drawing surface.

pub mod scene;
pub mod surface;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;
pub use scene::{Style, beam_alpha, render, render_commands, trail_alpha};
pub use surface::{CommandList, DrawCommand, DrawSurface, Rgba};
