//! Packet spawning, advancement and retirement

use std::collections::VecDeque;

use log::trace;
use rand::Rng;

use super::state::{Packet, TrailSample, WorldState};
use crate::consts::TRAIL_LENGTH;
use crate::uniform;

/// Spawn a packet on a uniformly chosen active link.
/// Returns the new packet's id, or `None` when no link is active.
pub fn spawn_packet(state: &mut WorldState) -> Option<u32> {
    let active = state.links.iter().filter(|l| l.active).count();
    if active == 0 {
        return None;
    }
    let pick = state.rng.random_range(0..active);
    let link = *state.links.iter().filter(|l| l.active).nth(pick)?;
    let speed = uniform(&mut state.rng, state.tuning.packet_speed);
    let id = state.next_entity_id();
    state.packets.push(Packet {
        id,
        link,
        t: 0.0,
        speed,
        trail: VecDeque::with_capacity(TRAIL_LENGTH + 1),
        done: false,
    });
    trace!("Spawned packet {} on {} link", id, link.kind.as_str());
    Some(id)
}

/// Accumulate `dt` and fire zero, one or two spawns when the interval elapses
pub fn spawn_on_timer(state: &mut WorldState, dt: f32) {
    state.packet_timer += dt;
    if state.packet_timer > state.tuning.packet_interval {
        spawn_packet(state);
        if state.rng.random::<f32>() > state.tuning.second_packet_threshold {
            spawn_packet(state);
        }
        state.packet_timer = 0.0;
    }
}

/// Advance every live packet by `dt`, sample its trail, and retire the
/// packets that reached the end of their link
pub fn advance_packets(state: &mut WorldState, dt: f32) {
    state.retired.clear();
    let decay = state.tuning.trail_decay;

    let mut packets = std::mem::take(&mut state.packets);
    for packet in &mut packets {
        packet.t += packet.speed * dt;
        if packet.t >= 1.0 {
            packet.done = true;
        }

        let (a, b) = state.link_endpoints(&packet.link);
        let pos = a.lerp(b, packet.t.clamp(0.0, 1.0));
        packet.trail.push_back(TrailSample { pos, life: 1.0 });
        if packet.trail.len() > TRAIL_LENGTH {
            packet.trail.pop_front();
        }
        for sample in &mut packet.trail {
            sample.life *= decay;
        }
    }

    let (done, live): (Vec<Packet>, Vec<Packet>) = packets.into_iter().partition(|p| p.done);
    state.packets = live;
    state.retired = done;
}

/// Packet Animator stage: timed spawns, then advancement
pub fn update_packets(state: &mut WorldState, dt: f32) {
    spawn_on_timer(state, dt);
    advance_packets(state, dt);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Viewport;
    use crate::settings::Tuning;
    use crate::sim::state::{Endpoint, Link, LinkKind};
    use crate::sim::{topology, world};
    use glam::Vec2;

    fn linked_world() -> WorldState {
        let mut state = world::build(Viewport::new(1000.0, 600.0), Tuning::default(), 2024);
        topology::rebuild_links(&mut state);
        state
    }

    fn push_packet(state: &mut WorldState, speed: f32) -> u32 {
        let id = state.next_entity_id();
        state.packets.push(Packet {
            id,
            link: Link::new(Endpoint::Satellite(0), Endpoint::Satellite(1), LinkKind::SatSat),
            t: 0.0,
            speed,
            trail: VecDeque::new(),
            done: false,
        });
        id
    }

    #[test]
    fn test_spawn_without_links_is_noop() {
        let mut state = world::build(Viewport::new(1000.0, 600.0), Tuning::default(), 1);
        assert!(state.links.is_empty());
        assert_eq!(spawn_packet(&mut state), None);
        assert!(state.packets.is_empty());

        // Timer-driven spawns are no-ops too
        update_packets(&mut state, 400.0);
        assert!(state.packets.is_empty());
        assert_eq!(state.packet_timer, 0.0);
    }

    #[test]
    fn test_spawn_picks_active_link() {
        let mut state = linked_world();
        let id = spawn_packet(&mut state).unwrap();
        let packet = state.packets.iter().find(|p| p.id == id).unwrap();
        assert!(state.links.contains(&packet.link));
        assert_eq!(packet.t, 0.0);
        assert!(packet.trail.is_empty());
        assert!(packet.speed >= 0.006 && packet.speed <= 0.011);
    }

    #[test]
    fn test_spawn_skips_inactive_links() {
        let mut state = linked_world();
        for link in state.links.iter_mut() {
            link.active = false;
        }
        assert_eq!(spawn_packet(&mut state), None);
    }

    #[test]
    fn test_timer_fires_one_or_two() {
        let mut state = linked_world();
        spawn_on_timer(&mut state, 300.0);
        assert!(state.packets.is_empty());
        assert_eq!(state.packet_timer, 300.0);

        spawn_on_timer(&mut state, 30.0);
        assert!((1..=2).contains(&state.packets.len()));
        assert_eq!(state.packet_timer, 0.0);
    }

    #[test]
    fn test_packet_retires_after_four_ticks() {
        let mut state = linked_world();
        let id = push_packet(&mut state, 0.01);

        let mut last_t = 0.0;
        for tick in 1..=3 {
            advance_packets(&mut state, 32.0);
            let packet = state.packets.iter().find(|p| p.id == id).unwrap();
            assert!((packet.t - 0.32 * tick as f32).abs() < 1e-5);
            assert!(packet.t >= last_t);
            last_t = packet.t;
        }

        advance_packets(&mut state, 32.0);
        assert!(state.packets.iter().all(|p| p.id != id));
        let retired = state.retired.iter().find(|p| p.id == id).unwrap();
        assert!(retired.t >= 1.0);
        assert!(retired.done);

        // Final head sits on the far endpoint
        let (_, b) = state.link_endpoints(&retired.link);
        assert!((retired.head().unwrap().pos - b).length() < 1e-3);

        // Drawn once, then gone
        advance_packets(&mut state, 32.0);
        assert!(state.retired.is_empty());
    }

    #[test]
    fn test_trail_capped_and_decaying() {
        let mut state = linked_world();
        let id = push_packet(&mut state, 0.0001);
        for _ in 0..25 {
            advance_packets(&mut state, 16.0);
            let packet = state.packets.iter().find(|p| p.id == id).unwrap();
            assert!(packet.trail.len() <= TRAIL_LENGTH);
        }
        let packet = state.packets.iter().find(|p| p.id == id).unwrap();
        assert_eq!(packet.trail.len(), TRAIL_LENGTH);
        // Newest sample decayed once, older ones more
        assert!((packet.trail.back().unwrap().life - 0.89).abs() < 1e-6);
        let lives: Vec<f32> = packet.trail.iter().map(|s| s.life).collect();
        assert!(lives.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_packet_follows_moving_endpoints() {
        let mut state = linked_world();
        let id = push_packet(&mut state, 0.0);
        state.packets[0].t = 0.5;
        state.satellites[1].pos = state.satellites[0].pos + Vec2::new(100.0, 0.0);
        advance_packets(&mut state, 16.0);

        let packet = state.packets.iter().find(|p| p.id == id).unwrap();
        let expected = state.satellites[0].pos + Vec2::new(50.0, 0.0);
        assert!((packet.head().unwrap().pos - expected).length() < 1e-3);
    }
}
