//! World construction
//!
//! Fixed structure (orbit, satellite, station and UAV counts), randomized
//! parameters. All proportions are fractions of the viewport.

use std::f32::consts::TAU;

use glam::Vec2;
use log::debug;

use super::state::{BaseStation, Orbit, Satellite, Uav, WorldState};
use crate::consts::*;
use crate::settings::Tuning;
use crate::{Viewport, uniform};

/// Orbit center as fractions of (width, height)
const ORBIT_CENTER: (f32, f32) = (0.5, 0.33);
/// Innermost orbit radii as fractions of (width, height)
const ORBIT_BASE_RADII: (f32, f32) = (0.27, 0.11);
/// Radius growth per orbit as fractions of (width, height)
const ORBIT_STEP: (f32, f32) = (0.075, 0.04);

/// Base station band height fraction
const STATION_BAND_Y: f32 = 0.74;
/// Horizontal margin on each side of the station row
const STATION_MARGIN_X: f32 = 0.12;

/// UAV spawn band as fractions of (width, height)
const UAV_SPAWN_X: (f32, f32) = (0.18, 0.82);
const UAV_SPAWN_Y: (f32, f32) = (0.47, 0.67);

/// Build a populated world for `viewport`
pub fn build(viewport: Viewport, tuning: Tuning, seed: u64) -> WorldState {
    let mut state = WorldState::empty(viewport, tuning, seed);
    build_orbits(&mut state);
    build_base_stations(&mut state);
    build_uavs(&mut state);
    debug!(
        "World built for {}x{} (seed {}): {} orbits, {} satellites, {} stations, {} uavs",
        viewport.width,
        viewport.height,
        seed,
        state.orbits.len(),
        state.satellites.len(),
        state.base_stations.len(),
        state.uavs.len()
    );
    state
}

/// Satellites carried by orbit `index`
#[inline]
pub fn satellites_on_orbit(index: usize) -> usize {
    if index % 2 == 0 {
        SATS_PER_EVEN_ORBIT
    } else {
        SATS_PER_ODD_ORBIT
    }
}

fn build_orbits(state: &mut WorldState) {
    let Viewport { width, height } = state.viewport;
    let center = Vec2::new(width * ORBIT_CENTER.0, height * ORBIT_CENTER.1);

    for i in 0..ORBIT_COUNT {
        let step = i as f32;
        let orbit = Orbit {
            center,
            rx: width * ORBIT_BASE_RADII.0 + step * width * ORBIT_STEP.0,
            ry: height * ORBIT_BASE_RADII.1 + step * height * ORBIT_STEP.1,
            tilt: uniform(&mut state.rng, state.tuning.orbit_tilt),
        };
        state.orbits.push(orbit);

        let count = satellites_on_orbit(i);
        // Even orbits run one way, odd orbits the other
        let direction = if i % 2 == 0 { 1.0 } else { -1.0 };
        for j in 0..count {
            let phase = (TAU * j as f32 / count as f32 + uniform(&mut state.rng, state.tuning.phase_jitter))
                .rem_euclid(TAU);
            let speed = uniform(&mut state.rng, state.tuning.satellite_speed) * direction;
            let id = state.next_entity_id();
            state.satellites.push(Satellite {
                id,
                orbit: i,
                phase,
                speed,
                pos: orbit.point_at(phase),
            });
        }
    }
}

fn build_base_stations(state: &mut WorldState) {
    let Viewport { width, height } = state.viewport;
    let Tuning {
        station_jitter_x,
        station_jitter_y,
        station_radius,
        ..
    } = state.tuning;
    let margin = width * STATION_MARGIN_X;
    let gap = (width - margin * 2.0) / (BASE_STATION_COUNT - 1) as f32;
    let y = height * STATION_BAND_Y;

    for i in 0..BASE_STATION_COUNT {
        let pos = Vec2::new(
            margin + gap * i as f32 + uniform(&mut state.rng, station_jitter_x),
            y + uniform(&mut state.rng, station_jitter_y),
        );
        let radius = uniform(&mut state.rng, station_radius);
        let id = state.next_entity_id();
        state.base_stations.push(BaseStation { id, pos, radius });
    }
}

fn build_uavs(state: &mut WorldState) {
    let Viewport { width, height } = state.viewport;
    let Tuning {
        uav_initial_vx,
        uav_initial_vy,
        uav_target_offset_x,
        uav_target_offset_y,
        ..
    } = state.tuning;

    for _ in 0..UAV_COUNT {
        let rng = &mut state.rng;
        let pos = Vec2::new(
            uniform(rng, (width * UAV_SPAWN_X.0, width * UAV_SPAWN_X.1)),
            uniform(rng, (height * UAV_SPAWN_Y.0, height * UAV_SPAWN_Y.1)),
        );
        let vel = Vec2::new(uniform(rng, uav_initial_vx), uniform(rng, uav_initial_vy));
        let target = pos + Vec2::new(uniform(rng, uav_target_offset_x), uniform(rng, uav_target_offset_y));
        let id = state.next_entity_id();
        state.uavs.push(Uav { id, pos, vel, target });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-3;

    fn world(width: f32, height: f32, seed: u64) -> WorldState {
        build(Viewport::new(width, height), Tuning::default(), seed)
    }

    #[test]
    fn test_entity_counts() {
        let state = world(1000.0, 600.0, 42);
        assert_eq!(state.orbits.len(), 4);
        assert_eq!(state.satellites.len(), 14);
        assert_eq!(state.base_stations.len(), 5);
        assert_eq!(state.uavs.len(), 4);
        assert!(state.links.is_empty());
        assert!(state.packets.is_empty());
    }

    #[test]
    fn test_orbit_radii_for_1000x600() {
        let state = world(1000.0, 600.0, 7);
        let rx = [270.0, 345.0, 420.0, 495.0];
        let ry = [66.0, 90.0, 114.0, 138.0];
        for (i, orbit) in state.orbits.iter().enumerate() {
            assert!((orbit.rx - rx[i]).abs() < 1e-3, "orbit {} rx = {}", i, orbit.rx);
            assert!((orbit.ry - ry[i]).abs() < 1e-3, "orbit {} ry = {}", i, orbit.ry);
            assert!((orbit.center - Vec2::new(500.0, 198.0)).length() < 1e-3);
            assert!(orbit.tilt.abs() <= 0.25);
        }
    }

    #[test]
    fn test_satellites_alternate_count_and_direction() {
        let state = world(1000.0, 600.0, 3);
        for i in 0..ORBIT_COUNT {
            let sats: Vec<_> = state.satellites.iter().filter(|s| s.orbit == i).collect();
            assert_eq!(sats.len(), if i % 2 == 0 { 4 } else { 3 });
            for sat in sats {
                if i % 2 == 0 {
                    assert!(sat.speed > 0.0);
                } else {
                    assert!(sat.speed < 0.0);
                }
                assert!(sat.speed.abs() >= 0.00008 && sat.speed.abs() <= 0.00016);
            }
        }
    }

    #[test]
    fn test_satellites_start_on_their_orbit() {
        let state = world(800.0, 500.0, 11);
        for sat in &state.satellites {
            let expected = state.orbits[sat.orbit].point_at(sat.phase);
            assert!((sat.pos - expected).length() < 1e-3);
            assert!((0.0..TAU).contains(&sat.phase));
        }
    }

    #[test]
    fn test_base_stations_along_band() {
        let state = world(1000.0, 600.0, 5);
        let gap = (1000.0 - 240.0) / 4.0;
        for (i, bs) in state.base_stations.iter().enumerate() {
            let nominal_x = 120.0 + gap * i as f32;
            assert!((bs.pos.x - nominal_x).abs() <= 18.0 + EPS);
            assert!((bs.pos.y - 444.0).abs() <= 12.0 + EPS);
            assert!(bs.radius >= 58.0 && bs.radius <= 72.0);
        }
    }

    #[test]
    fn test_uavs_spawn_in_band() {
        let state = world(1000.0, 600.0, 9);
        for uav in &state.uavs {
            assert!(uav.pos.x >= 180.0 - EPS && uav.pos.x <= 820.0 + EPS);
            assert!(uav.pos.y >= 282.0 - EPS && uav.pos.y <= 402.0 + EPS);
            assert!(uav.vel.x.abs() <= 0.06 && uav.vel.y.abs() <= 0.045);
            assert!((uav.target.x - uav.pos.x).abs() <= 120.0);
            assert!((uav.target.y - uav.pos.y).abs() <= 80.0);
        }
    }

    #[test]
    fn test_ids_are_unique() {
        let state = world(1000.0, 600.0, 13);
        let mut ids: Vec<u32> = state
            .satellites
            .iter()
            .map(|s| s.id)
            .chain(state.uavs.iter().map(|u| u.id))
            .chain(state.base_stations.iter().map(|b| b.id))
            .collect();
        let total = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }

    #[test]
    fn test_same_seed_same_world() {
        let a = serde_json::to_string(&world(1200.0, 700.0, 99)).unwrap();
        let b = serde_json::to_string(&world(1200.0, 700.0, 99)).unwrap();
        assert_eq!(a, b);
    }
}
