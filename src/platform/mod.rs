//! Platform abstraction layer
//!
//! Surface sizing is shared; browser mounting, frame scheduling and
//! resize/unload handling live in `web` (wasm32 only).

#[cfg(target_arch = "wasm32")]
pub mod web;

use crate::Viewport;

/// Backing-store size for a viewport on a given display
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSize {
    /// CSS pixels the scene is laid out in
    pub viewport: Viewport,
    /// Backing-store width in device pixels
    pub pixel_width: u32,
    /// Backing-store height in device pixels
    pub pixel_height: u32,
    /// Uniform scale from CSS to device pixels
    pub scale: f32,
}

impl SurfaceSize {
    /// Size the backing store for `viewport` at `device_pixel_ratio`,
    /// capped at `max_ratio`. Never smaller than 1x1.
    pub fn for_viewport(viewport: Viewport, device_pixel_ratio: f32, max_ratio: f32) -> Self {
        let dpr = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio
        } else {
            1.0
        };
        let scale = dpr.min(max_ratio.max(1.0));
        let pixels = |css: f32| ((css * scale).floor() as u32).max(1);
        Self {
            viewport,
            pixel_width: pixels(viewport.width),
            pixel_height: pixels(viewport.height),
            scale,
        }
    }
}
