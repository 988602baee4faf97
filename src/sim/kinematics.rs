//! Satellite orbital motion and UAV seek steering

use std::f32::consts::TAU;

use glam::Vec2;

use super::state::{Uav, WorldState};
use crate::{Viewport, uniform};

/// Patrol region UAVs must stay inside, as fractions of (width, height)
const PATROL_X: (f32, f32) = (0.14, 0.86);
const PATROL_Y: (f32, f32) = (0.42, 0.72);
/// Region new targets are drawn from
const RETARGET_X: (f32, f32) = (0.18, 0.82);
const RETARGET_Y: (f32, f32) = (0.45, 0.68);

/// Advance every satellite's phase and recompute its position.
/// Phase is kept in [0, 2π) so f32 increments never underflow it.
pub fn update_satellites(state: &mut WorldState, dt: f32) {
    let orbits = &state.orbits;
    for sat in &mut state.satellites {
        sat.phase = (sat.phase + sat.speed * dt).rem_euclid(TAU);
        sat.pos = orbits[sat.orbit].point_at(sat.phase);
    }
}

/// Unit vector toward `to` and the distance to it.
/// A zero-length offset yields a zero direction.
pub fn seek_direction(from: Vec2, to: Vec2) -> (Vec2, f32) {
    let offset = to - from;
    let dist = offset.length();
    let divisor = if dist > 0.0 { dist } else { 1.0 };
    (offset / divisor, dist)
}

/// Corners (min, max) of the patrol region of `viewport`
pub fn patrol_bounds(viewport: Viewport) -> (Vec2, Vec2) {
    (
        Vec2::new(viewport.width * PATROL_X.0, viewport.height * PATROL_Y.0),
        Vec2::new(viewport.width * PATROL_X.1, viewport.height * PATROL_Y.1),
    )
}

/// Whether `pos` has left the patrol region of `viewport`
pub fn outside_patrol(pos: Vec2, viewport: Viewport) -> bool {
    let (min, max) = patrol_bounds(viewport);
    pos.x < min.x || pos.x > max.x || pos.y < min.y || pos.y > max.y
}

/// Drop any velocity component carrying the UAV further out of bounds.
/// A UAV therefore overshoots the patrol edge by at most one step.
fn turn_back(uav: &mut Uav, viewport: Viewport) {
    let (min, max) = patrol_bounds(viewport);
    if uav.pos.x < min.x {
        uav.vel.x = uav.vel.x.max(0.0);
    } else if uav.pos.x > max.x {
        uav.vel.x = uav.vel.x.min(0.0);
    }
    if uav.pos.y < min.y {
        uav.vel.y = uav.vel.y.max(0.0);
    } else if uav.pos.y > max.y {
        uav.vel.y = uav.vel.y.min(0.0);
    }
}

/// Steer every UAV toward its target, integrate, and re-target when
/// arrived or out of bounds. Out-of-bounds UAVs also stop drifting outward.
pub fn update_uavs(state: &mut WorldState, dt: f32) {
    let viewport = state.viewport;
    let tuning = &state.tuning;
    let max_vel = Vec2::new(tuning.uav_max_vx, tuning.uav_max_vy);
    let accel = tuning.uav_accel * dt;
    let arrival = tuning.uav_arrival_distance;

    for uav in &mut state.uavs {
        let (dir, dist) = seek_direction(uav.pos, uav.target);
        uav.vel += dir * accel;
        uav.vel = uav.vel.clamp(-max_vel, max_vel);
        uav.pos += uav.vel * dt;

        let outside = outside_patrol(uav.pos, viewport);
        if outside {
            turn_back(uav, viewport);
        }
        if dist < arrival || outside {
            retarget(uav, viewport, &mut state.rng);
        }
    }
}

fn retarget(uav: &mut Uav, viewport: Viewport, rng: &mut impl rand::Rng) {
    uav.target = Vec2::new(
        uniform(rng, (viewport.width * RETARGET_X.0, viewport.width * RETARGET_X.1)),
        uniform(rng, (viewport.height * RETARGET_Y.0, viewport.height * RETARGET_Y.1)),
    );
}
