//! Simulation tick
//!
//! Runs the per-frame stages in fixed order: kinematics, topology, packets.

use super::kinematics::{update_satellites, update_uavs};
use super::packets::update_packets;
use super::state::WorldState;
use super::topology::rebuild_links;

/// Clamp a raw frame delta into `[0, max_dt]`. Non-finite deltas become 0,
/// and a negative or NaN cap counts as 0.
#[inline]
pub fn clamp_dt(raw: f64, max_dt: f32) -> f32 {
    if raw.is_finite() {
        (raw as f32).clamp(0.0, max_dt.max(0.0))
    } else {
        0.0
    }
}

/// Advance the world by `dt` milliseconds
pub fn tick(state: &mut WorldState, dt: f32) {
    let dt = clamp_dt(dt as f64, state.tuning.max_frame_dt);
    state.time_ticks += 1;

    update_satellites(state, dt);
    update_uavs(state, dt);
    rebuild_links(state);
    update_packets(state, dt);
}
