//! Body table: the built-in inner solar system and the JSON manifest format.
//!
//! Distances and sizes are screen-oriented, not astronomical: orbital radii are
//! pixels at distance scale 1.0, visual radii are fixed pixel sizes.

use serde::{Deserialize, Serialize};

use crate::registry::BodySpec;

/// Fixed simulation rate.
pub const TICK_HZ: u32 = 60;

/// Real seconds per fixed tick.
pub const TICK_DT: f64 = 1.0 / TICK_HZ as f64;

/// Simulated days per real second at normal speed.
pub const DAYS_PER_SECOND: f64 = 30.0;

// ── Colours ──────────────────────────────────────────────────────────

pub const YELLOW: [f32; 3] = [1.0, 1.0, 0.0];
pub const GRAY: [f32; 3] = [0.5, 0.5, 0.5];
pub const ORANGE: [f32; 3] = [1.0, 0.647, 0.0];
pub const BLUE: [f32; 3] = [0.0, 0.0, 1.0];
pub const RED: [f32; 3] = [1.0, 0.0, 0.0];

/// Sun, Mercury, Venus, Earth, Mars. Periods are in Earth days.
pub fn default_bodies() -> Vec<BodySpec> {
    vec![
        BodySpec::center("Sun", YELLOW, 20.0),
        BodySpec::orbiting("Mercury", GRAY, 4.0, 50.0, 88.0),
        BodySpec::orbiting("Venus", ORANGE, 8.0, 90.0, 225.0),
        BodySpec::orbiting("Earth", BLUE, 9.0, 130.0, 365.0),
        BodySpec::orbiting("Mars", RED, 6.0, 180.0, 687.0),
    ]
}

/// A replacement body table supplied by the host page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemManifest {
    /// Simulated days per real second.
    #[serde(default = "default_time_scale")]
    pub time_scale: f64,
    pub bodies: Vec<BodySpec>,
}

fn default_time_scale() -> f64 {
    DAYS_PER_SECOND
}

impl SystemManifest {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl Default for SystemManifest {
    fn default() -> Self {
        Self {
            time_scale: DAYS_PER_SECOND,
            bodies: default_bodies(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_has_one_center_first() {
        let bodies = default_bodies();
        assert_eq!(bodies.len(), 5);
        assert!(bodies[0].is_center());
        assert_eq!(bodies.iter().filter(|b| b.is_center()).count(), 1);
    }

    #[test]
    fn default_orbits_are_increasing() {
        let radii: Vec<f64> = default_bodies().iter().map(|b| b.orbital_radius).collect();
        assert_eq!(radii, vec![0.0, 50.0, 90.0, 130.0, 180.0]);
        let mars = &default_bodies()[4];
        assert_eq!(mars.name, "Mars");
        assert_eq!(mars.orbital_period, 687.0);
        assert_eq!(mars.visual_radius, 6.0);
    }

    #[test]
    fn manifest_defaults_time_scale() {
        let json = r#"{
            "bodies": [
                { "name": "Star", "color": [1, 0.8, 0.2], "visual_radius": 15 },
                { "name": "Rock", "visual_radius": 3, "orbital_radius": 70,
                  "orbital_period": 40, "start_angle_deg": 90 }
            ]
        }"#;
        let manifest = SystemManifest::from_json(json).unwrap();
        assert_eq!(manifest.time_scale, DAYS_PER_SECOND);
        assert_eq!(manifest.bodies.len(), 2);
        assert!(manifest.bodies[0].is_center());
        assert_eq!(manifest.bodies[1].start_angle_deg, 90.0);
        assert_eq!(manifest.bodies[0].color, [1.0, 0.8, 0.2]);
    }

    #[test]
    fn manifest_rejects_bad_json() {
        assert!(SystemManifest::from_json("not json").is_err());
        assert!(SystemManifest::from_json(r#"{ "time_scale": 5 }"#).is_err());
        assert!(SystemManifest::from_json(r#"{ "bodies": [{ "name": "X" }] }"#).is_err());
    }

    #[test]
    fn default_manifest_serializes_back() {
        let json = serde_json::to_string(&SystemManifest::default()).unwrap();
        assert_eq!(SystemManifest::from_json(&json).unwrap(), SystemManifest::default());
    }
}
