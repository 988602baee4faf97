//! Scene drawing
//!
//! Back to front: grid, orbits, links, base stations, satellites, UAVs,
//! packets. Reads the world only.

use std::f32::consts::FRAC_PI_2;

use glam::Vec2;

use super::surface::{CommandList, DrawCommand, DrawSurface, Rgba};
use crate::consts::GRID_STEP;
use crate::settings::Settings;
use crate::sim::{BaseStation, LinkKind, Packet, Satellite, Uav, WorldState};

/// Presentation parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    pub accent: [u8; 3],
}

impl Default for Style {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl Style {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            accent: settings.accent,
        }
    }

    #[inline]
    fn color(&self, alpha: f32) -> Rgba {
        Rgba::new(self.accent, alpha)
    }
}

/// Beam opacity for a packet at progress `t`; fades as the packet nears
/// its destination
#[inline]
pub fn beam_alpha(t: f32) -> f32 {
    0.25 + (1.0 - t.clamp(0.0, 1.0)) * 0.5
}

/// Opacity of trail segment `index` (1-based, ending at sample `index`)
/// out of `len` samples, scaled by that sample's remaining life
#[inline]
pub fn trail_alpha(index: usize, len: usize, life: f32) -> f32 {
    if len == 0 {
        return 0.0;
    }
    0.75 * (index as f32 / len as f32) * life
}

/// Draw the full scene
pub fn render(state: &WorldState, style: &Style, surface: &mut impl DrawSurface) {
    let vp = state.viewport;
    surface.clear_rect(0.0, 0.0, vp.width, vp.height);
    draw_grid(state, style, surface);
    draw_orbits(state, style, surface);
    draw_links(state, style, surface);
    for bs in &state.base_stations {
        draw_base_station(bs, style, surface);
    }
    for sat in &state.satellites {
        draw_satellite(sat, style, surface);
    }
    for uav in &state.uavs {
        draw_uav(uav, style, surface);
    }
    for packet in state.packets.iter().chain(&state.retired) {
        draw_packet(state, packet, style, surface);
    }
}

/// The scene as a list of drawing commands
pub fn render_commands(state: &WorldState, style: &Style) -> Vec<DrawCommand> {
    let mut list = CommandList::new();
    render(state, style, &mut list);
    list.commands
}

fn draw_grid(state: &WorldState, style: &Style, s: &mut impl DrawSurface) {
    let vp = state.viewport;
    s.set_stroke_style(style.color(0.06));
    s.set_line_width(1.0);

    let mut x = 0.0;
    while x <= vp.width {
        s.begin_path();
        s.move_to(x, 0.0);
        s.line_to(x, vp.height);
        s.stroke();
        x += GRID_STEP;
    }
    let mut y = 0.0;
    while y <= vp.height {
        s.begin_path();
        s.move_to(0.0, y);
        s.line_to(vp.width, y);
        s.stroke();
        y += GRID_STEP;
    }
}

fn draw_orbits(state: &WorldState, style: &Style, s: &mut impl DrawSurface) {
    for orbit in &state.orbits {
        s.save();
        s.translate(orbit.center.x, orbit.center.y);
        s.rotate(orbit.tilt);
        s.set_stroke_style(style.color(0.18));
        s.set_line_width(1.1);
        s.begin_path();
        s.ellipse(0.0, 0.0, orbit.rx, orbit.ry);
        s.stroke();
        s.restore();
    }
}

fn draw_links(state: &WorldState, style: &Style, s: &mut impl DrawSurface) {
    for link in &state.links {
        let (alpha, width) = match link.kind {
            LinkKind::SatSat => (0.16, 0.9),
            LinkKind::UavSat | LinkKind::UavBs => (0.2, 1.1),
        };
        let (a, b) = state.link_endpoints(link);
        s.set_stroke_style(style.color(alpha));
        s.set_line_width(width);
        s.begin_path();
        s.move_to(a.x, a.y);
        s.line_to(b.x, b.y);
        s.stroke();
    }
}

fn draw_base_station(bs: &BaseStation, style: &Style, s: &mut impl DrawSurface) {
    let Vec2 { x, y } = bs.pos;

    // Coverage
    s.set_stroke_style(style.color(0.13));
    s.set_line_width(1.0);
    s.begin_path();
    s.circle(x, y, bs.radius);
    s.stroke();

    // Tower: mast plus splayed legs
    s.set_stroke_style(style.color(0.9));
    s.set_line_width(1.6);
    s.begin_path();
    s.move_to(x, y + 8.0);
    s.line_to(x, y - 11.0);
    s.move_to(x - 6.0, y + 8.0);
    s.line_to(x, y + 2.0);
    s.line_to(x + 6.0, y + 8.0);
    s.stroke();

    s.begin_path();
    s.circle(x, y - 11.0, 1.8);
    s.set_fill_style(style.color(0.95));
    s.fill();
}

fn draw_satellite(sat: &Satellite, style: &Style, s: &mut impl DrawSurface) {
    s.save();
    s.translate(sat.pos.x, sat.pos.y);
    s.rotate(sat.phase + FRAC_PI_2);
    s.set_fill_style(style.color(0.95));
    s.fill_rect(-3.0, -3.0, 6.0, 6.0);
    // Panels
    s.set_fill_style(style.color(0.6));
    s.fill_rect(-10.0, -2.0, 5.0, 4.0);
    s.fill_rect(5.0, -2.0, 5.0, 4.0);
    s.restore();
}

fn draw_uav(uav: &Uav, style: &Style, s: &mut impl DrawSurface) {
    s.save();
    s.translate(uav.pos.x, uav.pos.y);
    s.rotate(uav.heading());
    s.set_stroke_style(style.color(0.9));
    s.set_line_width(1.4);
    s.begin_path();
    s.move_to(-5.0, -3.0);
    s.line_to(5.0, 0.0);
    s.line_to(-5.0, 3.0);
    s.close_path();
    s.stroke();
    s.restore();
}

fn draw_packet(state: &WorldState, packet: &Packet, style: &Style, s: &mut impl DrawSurface) {
    let Some(head) = packet.head() else {
        return;
    };
    let source = state.position_of(packet.link.a);

    // Beam from source to head
    s.set_stroke_style(style.color(beam_alpha(packet.t)));
    s.set_line_width(1.15);
    s.begin_path();
    s.move_to(source.x, source.y);
    s.line_to(head.pos.x, head.pos.y);
    s.stroke();

    let len = packet.trail.len();
    for i in 1..len {
        let p0 = packet.trail[i - 1];
        let p1 = packet.trail[i];
        s.set_stroke_style(style.color(trail_alpha(i, len, p1.life)));
        s.set_line_width(1.45);
        s.begin_path();
        s.move_to(p0.pos.x, p0.pos.y);
        s.line_to(p1.pos.x, p1.pos.y);
        s.stroke();
    }

    s.set_fill_style(style.color(1.0));
    s.begin_path();
    s.circle(head.pos.x, head.pos.y, 2.1);
    s.fill();
}
