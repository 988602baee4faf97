//! Host settings and simulation tuning
//!
//! Read once at mount time; never written back.

use serde::{Deserialize, Serialize};

/// Simulation tuning surface. Units: pixels, radians, milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Orbits / satellites ===
    /// Orbit tilt range (radians)
    pub orbit_tilt: (f32, f32),
    /// Jitter added to each satellite's even phase spacing (radians)
    pub phase_jitter: (f32, f32),
    /// Satellite angular speed magnitude (radians/ms)
    pub satellite_speed: (f32, f32),

    // === Base stations ===
    pub station_jitter_x: (f32, f32),
    pub station_jitter_y: (f32, f32),
    /// Coverage ring radius
    pub station_radius: (f32, f32),

    // === UAVs ===
    pub uav_initial_vx: (f32, f32),
    pub uav_initial_vy: (f32, f32),
    /// Initial target offset from spawn position
    pub uav_target_offset_x: (f32, f32),
    pub uav_target_offset_y: (f32, f32),
    /// Seek acceleration (px/ms²)
    pub uav_accel: f32,
    pub uav_max_vx: f32,
    pub uav_max_vy: f32,
    /// Distance under which a UAV counts as arrived
    pub uav_arrival_distance: f32,

    // === Links ===
    /// UAV-satellite range as a fraction of the smaller viewport dimension
    pub uav_sat_range: f32,
    /// UAV-base-station range as a fraction of the smaller viewport dimension
    pub uav_bs_range: f32,

    // === Packets ===
    /// Accumulated ms before a spawn attempt
    pub packet_interval: f32,
    /// A second spawn fires when a uniform [0,1) draw exceeds this
    pub second_packet_threshold: f32,
    /// Progress per ms
    pub packet_speed: (f32, f32),
    /// Multiplicative per-tick trail life decay
    pub trail_decay: f32,

    // === Frame ===
    /// Upper bound on dt per tick (ms)
    pub max_frame_dt: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            orbit_tilt: (-0.25, 0.25),
            phase_jitter: (-0.25, 0.25),
            satellite_speed: (0.00008, 0.00016),

            station_jitter_x: (-18.0, 18.0),
            station_jitter_y: (-12.0, 12.0),
            station_radius: (58.0, 72.0),

            uav_initial_vx: (-0.06, 0.06),
            uav_initial_vy: (-0.045, 0.045),
            uav_target_offset_x: (-120.0, 120.0),
            uav_target_offset_y: (-80.0, 80.0),
            uav_accel: 0.00025,
            uav_max_vx: 0.085,
            uav_max_vy: 0.07,
            uav_arrival_distance: 12.0,

            uav_sat_range: 0.42,
            uav_bs_range: 0.3,

            packet_interval: 320.0,
            second_packet_threshold: 0.45,
            packet_speed: (0.006, 0.011),
            trail_decay: 0.89,

            max_frame_dt: 32.0,
        }
    }
}

/// Finite, non-negative scalar
fn non_negative(v: f32) -> bool {
    v.is_finite() && v >= 0.0
}

/// Finite range with a finite width; reversed bounds are put in order
fn ordered((a, b): (f32, f32)) -> Option<(f32, f32)> {
    let (min, max) = if a <= b { (a, b) } else { (b, a) };
    (min.is_finite() && max.is_finite() && (max - min).is_finite()).then_some((min, max))
}

fn scalar(v: &mut f32, fallback: f32, valid: impl Fn(f32) -> bool) {
    if !valid(*v) {
        *v = fallback;
    }
}

fn range(v: &mut (f32, f32), fallback: (f32, f32), non_negative_min: bool) {
    *v = match ordered(*v) {
        Some(r) if !non_negative_min || r.0 >= 0.0 => r,
        _ => fallback,
    };
}

impl Tuning {
    /// Replace values the simulation cannot run with by their defaults.
    /// Negative caps, non-finite numbers and unusable ranges are rejected.
    pub fn sanitized(mut self) -> Self {
        let d = Self::default();

        range(&mut self.orbit_tilt, d.orbit_tilt, false);
        range(&mut self.phase_jitter, d.phase_jitter, false);
        range(&mut self.satellite_speed, d.satellite_speed, true);
        range(&mut self.station_jitter_x, d.station_jitter_x, false);
        range(&mut self.station_jitter_y, d.station_jitter_y, false);
        range(&mut self.station_radius, d.station_radius, true);
        range(&mut self.uav_initial_vx, d.uav_initial_vx, false);
        range(&mut self.uav_initial_vy, d.uav_initial_vy, false);
        range(&mut self.uav_target_offset_x, d.uav_target_offset_x, false);
        range(&mut self.uav_target_offset_y, d.uav_target_offset_y, false);
        range(&mut self.packet_speed, d.packet_speed, true);

        scalar(&mut self.uav_accel, d.uav_accel, non_negative);
        scalar(&mut self.uav_max_vx, d.uav_max_vx, non_negative);
        scalar(&mut self.uav_max_vy, d.uav_max_vy, non_negative);
        scalar(&mut self.uav_arrival_distance, d.uav_arrival_distance, non_negative);
        scalar(&mut self.uav_sat_range, d.uav_sat_range, non_negative);
        scalar(&mut self.uav_bs_range, d.uav_bs_range, non_negative);
        scalar(&mut self.packet_interval, d.packet_interval, non_negative);
        scalar(&mut self.second_packet_threshold, d.second_packet_threshold, f32::is_finite);
        scalar(&mut self.trail_decay, d.trail_decay, |v| (0.0..=1.0).contains(&v));
        scalar(&mut self.max_frame_dt, d.max_frame_dt, non_negative);
        self
    }
}

/// Host configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// CSS selector of the element whose size the canvas follows
    pub container_selector: String,
    /// Element id of the canvas
    pub canvas_id: String,
    /// Upper bound on the device pixel ratio used for the backing store
    pub max_device_pixel_ratio: f32,
    /// Decline to start when the user prefers reduced motion
    pub respect_reduced_motion: bool,
    /// Fixed seed (host clock when absent)
    pub seed: Option<u64>,
    /// Accent colour (rgb) every element is drawn in
    pub accent: [u8; 3],
    pub tuning: Tuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            container_selector: ".home-hero".to_string(),
            canvas_id: "home-network-canvas".to_string(),
            max_device_pixel_ratio: 2.0,
            respect_reduced_motion: true,
            seed: None,
            accent: [139, 0, 41],
            tuning: Tuning::default(),
        }
    }
}

impl Settings {
    /// Canvas attribute holding a JSON settings override
    pub const DATA_ATTRIBUTE: &'static str = "data-settings";

    /// Parse a (possibly partial) JSON document; missing keys take defaults
    /// and out-of-range values are replaced (see [`Settings::sanitized`])
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let parsed: Self = serde_json::from_str(json)?;
        let settings = parsed.clone().sanitized();
        if settings != parsed {
            log::warn!("Settings override had out-of-range values; using defaults for those");
        }
        Ok(settings)
    }

    /// Replace unusable values with their defaults
    pub fn sanitized(mut self) -> Self {
        let d = Self::default();
        if !(self.max_device_pixel_ratio.is_finite() && self.max_device_pixel_ratio > 0.0) {
            self.max_device_pixel_ratio = d.max_device_pixel_ratio;
        }
        self.tuning = self.tuning.sanitized();
        self
    }

    /// Parse, logging and falling back to defaults on malformed input
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(settings) => {
                log::info!("Loaded settings override");
                settings
            }
            Err(e) => {
                log::warn!("Ignoring malformed settings: {}", e);
                Self::default()
            }
        }
    }

    /// Load settings from the canvas element's data attribute (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let defaults = Self::default();
        let attr = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(&defaults.canvas_id))
            .and_then(|el| el.get_attribute(Self::DATA_ATTRIBUTE));

        match attr {
            Some(json) => Self::from_json_or_default(&json),
            None => {
                log::debug!("Using default settings");
                defaults
            }
        }
    }

    /// Load settings from an optional JSON file (native)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_file(path: Option<&std::path::Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        match std::fs::read_to_string(path) {
            Ok(json) => Self::from_json_or_default(&json),
            Err(e) => {
                log::warn!("Could not read settings {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{"seed": 7, "tuning": {"uav_max_vx": 0.1}}"#).unwrap();
        assert_eq!(settings.seed, Some(7));
        assert_eq!(settings.tuning.uav_max_vx, 0.1);
        assert_eq!(settings.tuning.uav_max_vy, Tuning::default().uav_max_vy);
        assert_eq!(settings.canvas_id, "home-network-canvas");
    }

    #[test]
    fn test_malformed_json_falls_back() {
        let settings = Settings::from_json_or_default("{not json");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_range_tuples_parse_from_arrays() {
        let tuning: Tuning = serde_json::from_str(r#"{"packet_speed": [0.01, 0.02]}"#).unwrap();
        assert_eq!(tuning.packet_speed, (0.01, 0.02));
        assert_eq!(tuning.trail_decay, 0.89);
    }

    #[test]
    fn test_negative_frame_cap_falls_back() {
        let settings = Settings::from_json_or_default(r#"{"tuning": {"max_frame_dt": -1.0}}"#);
        assert_eq!(settings.tuning.max_frame_dt, 32.0);
        assert_eq!(settings.tuning, Tuning::default());
    }

    #[test]
    fn test_bad_tuning_values_take_defaults() {
        let settings = Settings::from_json(
            r#"{
                "max_device_pixel_ratio": 0.0,
                "tuning": {
                    "uav_max_vx": -0.1,
                    "uav_max_vy": 0.05,
                    "trail_decay": 1.5,
                    "packet_speed": [-0.01, 0.02],
                    "orbit_tilt": [0.3, -0.3]
                }
            }"#,
        )
        .unwrap();
        let d = Tuning::default();
        assert_eq!(settings.max_device_pixel_ratio, 2.0);
        assert_eq!(settings.tuning.uav_max_vx, d.uav_max_vx);
        assert_eq!(settings.tuning.uav_max_vy, 0.05);
        assert_eq!(settings.tuning.trail_decay, d.trail_decay);
        assert_eq!(settings.tuning.packet_speed, d.packet_speed);
        assert_eq!(settings.tuning.orbit_tilt, (-0.3, 0.3));
    }

    #[test]
    fn test_valid_tuning_is_unchanged() {
        let tuning = Tuning {
            max_frame_dt: 0.0,
            uav_accel: 0.001,
            second_packet_threshold: 2.0,
            ..Default::default()
        };
        assert_eq!(tuning.clone().sanitized(), tuning);
    }
}
