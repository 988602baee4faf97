//! Simulation module
//!
//! All motion and topology lives here. This module stays pure:
//! - Seeded RNG only
//! - Stable iteration order (vector order)
//! - No rendering or platform dependencies

pub mod kinematics;
pub mod packets;
pub mod state;
pub mod tick;
pub mod topology;
pub mod world;

pub use kinematics::{seek_direction, update_satellites, update_uavs};
pub use packets::{advance_packets, spawn_packet, update_packets};
pub use state::{
    BaseStation, Endpoint, Link, LinkKind, Orbit, Packet, Satellite, TrailSample, Uav, WorldState,
};
pub use tick::{clamp_dt, tick};
pub use topology::{compute_links, rebuild_links};
pub use world::build;
