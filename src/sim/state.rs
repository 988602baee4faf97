//! World state and core simulation types
//!
//! Everything the per-tick stages read or write lives in `WorldState`.

use std::collections::VecDeque;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::settings::Tuning;
use crate::{Viewport, rotate};

/// A fixed elliptical path
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Orbit {
    pub center: Vec2,
    pub rx: f32,
    pub ry: f32,
    /// Rotation of the ellipse about its center (radians)
    pub tilt: f32,
}

impl Orbit {
    /// Point on the tilted ellipse at angular `phase`
    pub fn point_at(&self, phase: f32) -> Vec2 {
        let local = Vec2::new(self.rx * phase.cos(), self.ry * phase.sin());
        self.center + rotate(local, self.tilt)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Satellite {
    pub id: u32,
    /// Index into `WorldState::orbits`, fixed for the satellite's lifetime
    pub orbit: usize,
    pub phase: f32,
    /// Signed angular speed (radians/ms); sign sets direction
    pub speed: f32,
    pub pos: Vec2,
}

#[derive(Debug, Clone, Serialize)]
pub struct Uav {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub target: Vec2,
}

impl Uav {
    /// Heading angle of the current velocity
    pub fn heading(&self) -> f32 {
        self.vel.y.atan2(self.vel.x)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BaseStation {
    pub id: u32,
    pub pos: Vec2,
    /// Coverage ring radius
    pub radius: f32,
}

/// One side of a link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Endpoint {
    Satellite(usize),
    Uav(usize),
    BaseStation(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LinkKind {
    SatSat,
    UavSat,
    UavBs,
}

impl LinkKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkKind::SatSat => "sat-sat",
            LinkKind::UavSat => "uav-sat",
            LinkKind::UavBs => "uav-bs",
        }
    }
}

/// A proximity connection, rebuilt every tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Link {
    pub a: Endpoint,
    pub b: Endpoint,
    pub kind: LinkKind,
    pub active: bool,
}

impl Link {
    pub fn new(a: Endpoint, b: Endpoint, kind: LinkKind) -> Self {
        Self {
            a,
            b,
            kind,
            active: true,
        }
    }
}

/// A sampled packet position with decaying life
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrailSample {
    pub pos: Vec2,
    /// 1.0 when sampled, decays multiplicatively every tick
    pub life: f32,
}

/// A marker travelling along one link
#[derive(Debug, Clone, Serialize)]
pub struct Packet {
    pub id: u32,
    /// Link captured at spawn; endpoints are followed live as they move
    pub link: Link,
    /// Progress along the link; may overshoot 1.0 on the retiring tick
    pub t: f32,
    pub speed: f32,
    /// Oldest sample first
    pub trail: VecDeque<TrailSample>,
    pub done: bool,
}

impl Packet {
    /// Most recent sample (the packet head)
    pub fn head(&self) -> Option<&TrailSample> {
        self.trail.back()
    }
}

/// Complete simulation state for one viewport
#[derive(Debug, Clone, Serialize)]
pub struct WorldState {
    pub seed: u64,
    pub viewport: Viewport,
    pub tuning: Tuning,
    pub orbits: Vec<Orbit>,
    pub satellites: Vec<Satellite>,
    pub uavs: Vec<Uav>,
    pub base_stations: Vec<BaseStation>,
    /// Rebuilt from scratch every tick
    pub links: Vec<Link>,
    /// Live packets
    pub packets: Vec<Packet>,
    /// Packets that finished this tick; drawn once, cleared next tick
    pub retired: Vec<Packet>,
    /// Elapsed ms since the last spawn attempt
    pub packet_timer: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    #[serde(skip)]
    pub rng: Pcg32,
    next_id: u32,
}

impl WorldState {
    /// Empty world with a seeded RNG; see `sim::world::build` for population
    pub fn empty(viewport: Viewport, tuning: Tuning, seed: u64) -> Self {
        Self {
            seed,
            viewport,
            tuning: tuning.sanitized(),
            orbits: Vec::new(),
            satellites: Vec::new(),
            uavs: Vec::new(),
            base_stations: Vec::new(),
            links: Vec::new(),
            packets: Vec::new(),
            retired: Vec::new(),
            packet_timer: 0.0,
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID. Wraps after `u32::MAX`; ids only need to
    /// be distinct among the few packets alive at once.
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    /// Current position of a link endpoint
    pub fn position_of(&self, endpoint: Endpoint) -> Vec2 {
        match endpoint {
            Endpoint::Satellite(i) => self.satellites[i].pos,
            Endpoint::Uav(i) => self.uavs[i].pos,
            Endpoint::BaseStation(i) => self.base_stations[i].pos,
        }
    }

    /// Current endpoint positions of a link
    pub fn link_endpoints(&self, link: &Link) -> (Vec2, Vec2) {
        (self.position_of(link.a), self.position_of(link.b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_orbit_point_untilted() {
        let orbit = Orbit {
            center: Vec2::new(100.0, 50.0),
            rx: 40.0,
            ry: 10.0,
            tilt: 0.0,
        };
        assert!((orbit.point_at(0.0) - Vec2::new(140.0, 50.0)).length() < 1e-4);
        assert!((orbit.point_at(FRAC_PI_2) - Vec2::new(100.0, 60.0)).length() < 1e-4);
    }

    #[test]
    fn test_orbit_point_tilted_quarter_turn() {
        let orbit = Orbit {
            center: Vec2::ZERO,
            rx: 40.0,
            ry: 10.0,
            tilt: FRAC_PI_2,
        };
        // The major axis now points along +y
        assert!((orbit.point_at(0.0) - Vec2::new(0.0, 40.0)).length() < 1e-4);
    }

    #[test]
    fn test_endpoint_positions() {
        let mut world = WorldState::empty(Viewport::new(100.0, 100.0), Tuning::default(), 1);
        world.uavs.push(Uav {
            id: 1,
            pos: Vec2::new(3.0, 4.0),
            vel: Vec2::ZERO,
            target: Vec2::ZERO,
        });
        world.base_stations.push(BaseStation {
            id: 2,
            pos: Vec2::new(9.0, 9.0),
            radius: 60.0,
        });
        let link = Link::new(Endpoint::Uav(0), Endpoint::BaseStation(0), LinkKind::UavBs);
        let (a, b) = world.link_endpoints(&link);
        assert_eq!(a, Vec2::new(3.0, 4.0));
        assert_eq!(b, Vec2::new(9.0, 9.0));
        assert!(link.active);
        assert_eq!(link.kind.as_str(), "uav-bs");
    }

    #[test]
    fn test_entity_ids_wrap() {
        let mut world = WorldState::empty(Viewport::new(100.0, 100.0), Tuning::default(), 1);
        world.next_id = u32::MAX;
        assert_eq!(world.next_entity_id(), u32::MAX);
        assert_eq!(world.next_entity_id(), 0);
        assert_eq!(world.next_entity_id(), 1);
    }

    #[test]
    fn test_empty_world_sanitizes_tuning() {
        let tuning = Tuning {
            max_frame_dt: -1.0,
            uav_max_vx: f32::NAN,
            ..Default::default()
        };
        let world = WorldState::empty(Viewport::new(100.0, 100.0), tuning, 1);
        assert_eq!(world.tuning, Tuning::default());
    }
}
