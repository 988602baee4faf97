//! Link topology, rebuilt from positions every tick

use glam::Vec2;

use super::state::{Endpoint, Link, LinkKind, WorldState};

/// Replace `state.links` with the links implied by current positions
pub fn rebuild_links(state: &mut WorldState) {
    let links = compute_links(state);
    state.links = links;
}

/// Links implied by the current entity positions
pub fn compute_links(state: &WorldState) -> Vec<Link> {
    let mut links = Vec::new();

    // One ring per orbit, in satellite order
    for orbit in 0..state.orbits.len() {
        let ring: Vec<usize> = state
            .satellites
            .iter()
            .enumerate()
            .filter(|(_, s)| s.orbit == orbit)
            .map(|(i, _)| i)
            .collect();
        if ring.len() < 2 {
            continue;
        }
        for (k, &a) in ring.iter().enumerate() {
            let b = ring[(k + 1) % ring.len()];
            links.push(Link::new(Endpoint::Satellite(a), Endpoint::Satellite(b), LinkKind::SatSat));
        }
    }

    let min_dim = state.viewport.min_dimension();
    let sat_range = min_dim * state.tuning.uav_sat_range;
    let bs_range = min_dim * state.tuning.uav_bs_range;

    for (u, uav) in state.uavs.iter().enumerate() {
        let nearest_sat = nearest(uav.pos, state.satellites.iter().map(|s| s.pos));
        if let Some((s, d)) = nearest_sat {
            if d < sat_range {
                links.push(Link::new(Endpoint::Uav(u), Endpoint::Satellite(s), LinkKind::UavSat));
            }
        }

        let nearest_bs = nearest(uav.pos, state.base_stations.iter().map(|b| b.pos));
        if let Some((b, d)) = nearest_bs {
            if d < bs_range {
                links.push(Link::new(Endpoint::Uav(u), Endpoint::BaseStation(b), LinkKind::UavBs));
            }
        }
    }

    links
}

/// Index and distance of the candidate closest to `from`.
/// Ties keep the first candidate encountered.
pub fn nearest(from: Vec2, candidates: impl Iterator<Item = Vec2>) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;
    for (i, pos) in candidates.enumerate() {
        let d = from.distance(pos);
        match best {
            Some((_, best_d)) if d >= best_d => {}
            _ => best = Some((i, d)),
        }
    }
    best
}
