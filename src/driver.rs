//! Frame driver
//!
//! Owns the world and walks it through its lifecycle:
//! uninitialized -> running -> torn down. Scheduling itself is the host's
//! job; the driver only answers whether another frame is wanted.

use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::Viewport;
use crate::renderer::{DrawSurface, Style, render};
use crate::settings::Settings;
use crate::sim::{WorldState, build, clamp_dt, tick};

/// Lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverPhase {
    Uninitialized,
    Running,
    TornDown,
}

pub struct FrameDriver {
    settings: Settings,
    style: Style,
    phase: DriverPhase,
    world: Option<WorldState>,
    /// Timestamp of the previous frame; `None` until the first frame
    last_time: Option<f64>,
    /// Source of per-build world seeds
    seeds: Pcg32,
}

impl FrameDriver {
    /// Create a driver; `fallback_seed` is used when settings carry no seed
    pub fn new(settings: Settings, fallback_seed: u64) -> Self {
        let seed = settings.seed.unwrap_or(fallback_seed);
        Self {
            style: Style::from_settings(&settings),
            settings,
            phase: DriverPhase::Uninitialized,
            world: None,
            last_time: None,
            seeds: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn phase(&self) -> DriverPhase {
        self.phase
    }

    pub fn world(&self) -> Option<&WorldState> {
        self.world.as_ref()
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    /// Build the world and enter the running phase.
    /// Returns false if the driver was already started or torn down.
    pub fn start(&mut self, viewport: Viewport) -> bool {
        if self.phase != DriverPhase::Uninitialized {
            return false;
        }
        self.rebuild(viewport);
        self.phase = DriverPhase::Running;
        info!("Network backdrop running at {}x{}", viewport.width, viewport.height);
        true
    }

    /// Run one frame at `timestamp` (ms) and draw it.
    /// Returns whether another frame should be scheduled.
    pub fn frame(&mut self, timestamp: f64, surface: &mut impl DrawSurface) -> bool {
        if self.phase != DriverPhase::Running {
            return false;
        }
        let Some(world) = self.world.as_mut() else {
            return false;
        };

        // No motion before a time baseline exists
        let dt = match self.last_time {
            Some(last) => clamp_dt(timestamp - last, world.tuning.max_frame_dt),
            None => 0.0,
        };
        self.last_time = Some(timestamp);

        tick(world, dt);
        render(world, &self.style, surface);
        true
    }

    /// Discard the world and rebuild it for a new viewport
    pub fn resize(&mut self, viewport: Viewport) {
        if self.phase != DriverPhase::Running {
            return;
        }
        debug!("Resize to {}x{}, rebuilding world", viewport.width, viewport.height);
        self.rebuild(viewport);
    }

    /// Stop for good; later frames and resizes are ignored
    pub fn teardown(&mut self) {
        if self.phase == DriverPhase::TornDown {
            return;
        }
        self.phase = DriverPhase::TornDown;
        self.world = None;
        info!("Network backdrop torn down");
    }

    fn rebuild(&mut self, viewport: Viewport) {
        let seed = self.seeds.random::<u64>();
        self.world = Some(build(viewport, self.settings.tuning.clone(), seed));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::CommandList;
    use std::f32::consts::{PI, TAU};

    fn driver() -> FrameDriver {
        FrameDriver::new(Settings::default(), 17)
    }

    /// Phase advance between two samples, across the 2π wrap
    fn advanced(after: f32, before: f32) -> f32 {
        (after - before + PI).rem_euclid(TAU) - PI
    }

    #[test]
    fn test_lifecycle() {
        let mut d = driver();
        let mut surface = CommandList::new();
        assert_eq!(d.phase(), DriverPhase::Uninitialized);
        assert!(!d.frame(0.0, &mut surface));
        assert!(surface.is_empty());

        assert!(d.start(Viewport::new(1000.0, 600.0)));
        assert_eq!(d.phase(), DriverPhase::Running);
        assert!(!d.start(Viewport::new(1000.0, 600.0)));

        assert!(d.frame(1000.0, &mut surface));
        assert!(!surface.is_empty());

        d.teardown();
        assert_eq!(d.phase(), DriverPhase::TornDown);
        assert!(d.world().is_none());
        assert!(!d.start(Viewport::new(1000.0, 600.0)));
    }

    #[test]
    fn test_first_frame_has_no_motion() {
        let mut d = driver();
        d.start(Viewport::new(1000.0, 600.0));
        let before: Vec<f32> = d.world().unwrap().satellites.iter().map(|s| s.phase).collect();

        d.frame(123_456.0, &mut CommandList::new());
        let after: Vec<f32> = d.world().unwrap().satellites.iter().map(|s| s.phase).collect();
        assert_eq!(before, after);

        d.frame(123_472.0, &mut CommandList::new());
        let world = d.world().unwrap();
        for (sat, phase) in world.satellites.iter().zip(&before) {
            assert!((advanced(sat.phase, *phase) - sat.speed * 16.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_gap_is_capped() {
        let mut d = driver();
        d.start(Viewport::new(1000.0, 600.0));
        d.frame(0.0, &mut CommandList::new());
        let before: Vec<f32> = d.world().unwrap().satellites.iter().map(|s| s.phase).collect();

        // Tab resumed after a minute
        d.frame(60_000.0, &mut CommandList::new());
        let world = d.world().unwrap();
        for (sat, phase) in world.satellites.iter().zip(&before) {
            assert!((advanced(sat.phase, *phase) - sat.speed * 32.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_resize_rebuilds_from_scratch() {
        let mut d = driver();
        d.start(Viewport::new(1000.0, 600.0));
        let mut t = 0.0;
        for _ in 0..40 {
            d.frame(t, &mut CommandList::new());
            t += 16.0;
        }
        assert!(!d.world().unwrap().links.is_empty());

        d.resize(Viewport::new(640.0, 480.0));
        let world = d.world().unwrap();
        assert_eq!(world.viewport, Viewport::new(640.0, 480.0));
        assert!(world.links.is_empty());
        assert!(world.packets.is_empty());
        assert_eq!(world.time_ticks, 0);
        assert_eq!(world.satellites.len(), 14);
        assert!((world.orbits[0].rx - 640.0 * 0.27).abs() < 1e-3);
    }

    #[test]
    fn test_no_ticks_after_teardown() {
        let mut d = driver();
        d.start(Viewport::new(1000.0, 600.0));
        d.frame(0.0, &mut CommandList::new());
        d.teardown();

        let mut surface = CommandList::new();
        for i in 1..10 {
            assert!(!d.frame(i as f64 * 16.0, &mut surface));
        }
        d.resize(Viewport::new(800.0, 600.0));
        assert!(surface.is_empty());
        assert!(d.world().is_none());
    }

    #[test]
    fn test_fixed_seed_reproducible() {
        let settings = Settings {
            seed: Some(5),
            ..Default::default()
        };
        let mut a = FrameDriver::new(settings.clone(), 1);
        let mut b = FrameDriver::new(settings, 2);
        a.start(Viewport::new(900.0, 500.0));
        b.start(Viewport::new(900.0, 500.0));
        assert_eq!(a.world().unwrap().seed, b.world().unwrap().seed);
    }
}
