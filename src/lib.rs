//! Network Backdrop - an animated satellite/UAV network for a page hero
//!
//! Core modules:
//! - `sim`: Seeded simulation (world building, kinematics, topology, packets)
//! - `renderer`: Drawing-surface capability and scene drawing
//! - `driver`: Frame driver lifecycle (start, frame, resize, teardown)
//! - `platform`: Browser glue and surface sizing
//! - `settings`: Host configuration and simulation tuning

pub mod driver;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use driver::{DriverPhase, FrameDriver};
pub use settings::{Settings, Tuning};

use glam::Vec2;
use rand::Rng;

/// Structural constants (not tuning)
pub mod consts {
    /// Number of concentric orbits
    pub const ORBIT_COUNT: usize = 4;
    /// Satellites on even-indexed orbits
    pub const SATS_PER_EVEN_ORBIT: usize = 4;
    /// Satellites on odd-indexed orbits
    pub const SATS_PER_ODD_ORBIT: usize = 3;
    /// Ground base stations along the lower band
    pub const BASE_STATION_COUNT: usize = 5;
    /// Patrolling UAVs
    pub const UAV_COUNT: usize = 4;

    /// Maximum trail samples kept per packet
    pub const TRAIL_LENGTH: usize = 10;

    /// Background grid spacing (CSS pixels)
    pub const GRID_STEP: f32 = 44.0;
}

/// Viewport size in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Smaller of the two dimensions (link ranges scale with this)
    #[inline]
    pub fn min_dimension(&self) -> f32 {
        self.width.min(self.height)
    }
}

/// Uniform draw from `[min, max)`; an empty range yields `min`
#[inline]
pub fn uniform<R: Rng>(rng: &mut R, (min, max): (f32, f32)) -> f32 {
    if min < max {
        rng.random_range(min..max)
    } else {
        min
    }
}

/// Rotate a vector by `angle` radians
#[inline]
pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(angle).rotate(v)
}
