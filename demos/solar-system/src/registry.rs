//! Body Registry: the fixed, ordered set of bodies in the simulation.
//!
//! Pure data, no engine dependencies. Each body carries an opaque render
//! handle `H` handed out by whoever builds the registry.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::orbit::normalize_angle;

/// Static description of one body, as written in the body table or a manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodySpec {
    pub name: String,
    /// Linear RGB, 0.0 - 1.0.
    #[serde(default = "default_color")]
    pub color: [f32; 3],
    /// On-screen radius in pixels, independent of distance scale.
    pub visual_radius: f64,
    /// Distance from the centre at scale 1.0. Zero marks the centre body.
    #[serde(default)]
    pub orbital_radius: f64,
    /// Simulated days per revolution.
    #[serde(default = "default_period")]
    pub orbital_period: f64,
    #[serde(default)]
    pub start_angle_deg: f64,
}

fn default_color() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

fn default_period() -> f64 {
    1.0
}

impl BodySpec {
    /// A centre body (orbital radius 0).
    pub fn center(name: impl Into<String>, color: [f32; 3], visual_radius: f64) -> Self {
        Self {
            name: name.into(),
            color,
            visual_radius,
            orbital_radius: 0.0,
            orbital_period: default_period(),
            start_angle_deg: 0.0,
        }
    }

    /// A body on a circular orbit.
    pub fn orbiting(
        name: impl Into<String>,
        color: [f32; 3],
        visual_radius: f64,
        orbital_radius: f64,
        orbital_period: f64,
    ) -> Self {
        Self {
            orbital_radius,
            orbital_period,
            ..Self::center(name, color, visual_radius)
        }
    }

    pub fn with_start_angle(mut self, degrees: f64) -> Self {
        self.start_angle_deg = degrees;
        self
    }

    /// Bodies without a positive, finite orbital radius sit at the centre.
    pub fn is_center(&self) -> bool {
        !(self.orbital_radius.is_finite() && self.orbital_radius > 0.0)
    }
}

/// How a body moves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Motion {
    /// Pinned to the viewport centre.
    Center,
    /// Circular orbit around the centre. `angle` is in radians, always in [0, 2π).
    Orbiting { orbital_radius: f64, period: f64, angle: f64 },
}

#[derive(Debug, Clone)]
pub struct CelestialBody<H> {
    name: String,
    color: [f32; 3],
    visual_radius: f64,
    motion: Motion,
    handle: H,
}

impl<H: Copy> CelestialBody<H> {
    pub fn from_spec(spec: &BodySpec, handle: H) -> Self {
        let motion = if spec.is_center() {
            if spec.orbital_radius != 0.0 {
                log::warn!(
                    "{}: orbital radius {} is not positive, placing at centre",
                    spec.name,
                    spec.orbital_radius
                );
            }
            Motion::Center
        } else {
            let period = if spec.orbital_period.is_finite() && spec.orbital_period > 0.0 {
                spec.orbital_period
            } else {
                1.0
            };
            Motion::Orbiting {
                orbital_radius: spec.orbital_radius,
                period,
                angle: normalize_angle(spec.start_angle_deg.to_radians()),
            }
        };

        Self {
            name: spec.name.clone(),
            color: spec.color,
            visual_radius: spec.visual_radius.max(0.0),
            motion,
            handle,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self) -> [f32; 3] {
        self.color
    }

    pub fn visual_radius(&self) -> f64 {
        self.visual_radius
    }

    pub fn motion(&self) -> Motion {
        self.motion
    }

    pub fn handle(&self) -> H {
        self.handle
    }

    pub fn is_center(&self) -> bool {
        matches!(self.motion, Motion::Center)
    }

    /// Unscaled orbital radius; 0 for the centre body.
    pub fn orbital_radius(&self) -> f64 {
        match self.motion {
            Motion::Center => 0.0,
            Motion::Orbiting { orbital_radius, .. } => orbital_radius,
        }
    }

    /// Current angle in radians; 0 for the centre body.
    pub fn angle(&self) -> f64 {
        match self.motion {
            Motion::Center => 0.0,
            Motion::Orbiting { angle, .. } => angle,
        }
    }

    /// Radians per simulated day; 0 for the centre body.
    pub fn angular_velocity(&self) -> f64 {
        match self.motion {
            Motion::Center => 0.0,
            Motion::Orbiting { period, .. } => TAU / period,
        }
    }

    /// Move along the orbit by `days` simulated days. The centre body is untouched.
    pub(crate) fn advance(&mut self, days: f64) {
        if let Motion::Orbiting { period, angle, .. } = &mut self.motion {
            *angle = normalize_angle(*angle + TAU / *period * days);
        }
    }
}

/// Ordered, fixed collection of bodies. Built once; never grows or shrinks.
#[derive(Debug, Clone)]
pub struct BodyRegistry<H> {
    bodies: Vec<CelestialBody<H>>,
}

impl<H: Copy> BodyRegistry<H> {
    /// Build the registry, asking `spawn` for each body's render handle in order.
    pub fn new(specs: &[BodySpec], mut spawn: impl FnMut(usize, &BodySpec) -> H) -> Self {
        let bodies: Vec<_> = specs
            .iter()
            .enumerate()
            .map(|(i, spec)| CelestialBody::from_spec(spec, spawn(i, spec)))
            .collect();

        let centers = bodies.iter().filter(|b| b.is_center()).count();
        if centers != 1 {
            log::warn!("body table has {} centre bodies, expected 1", centers);
        }
        log::debug!("registry built with {} bodies", bodies.len());

        Self { bodies }
    }

    pub fn iter(&self) -> impl Iterator<Item = &CelestialBody<H>> {
        self.bodies.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut CelestialBody<H>> {
        self.bodies.iter_mut()
    }

    pub fn get(&self, index: usize) -> Option<&CelestialBody<H>> {
        self.bodies.get(index)
    }

    pub fn find(&self, name: &str) -> Option<&CelestialBody<H>> {
        self.bodies.iter().find(|b| b.name == name)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// The orbiting body with the largest orbital radius; first wins on ties.
    pub fn farthest(&self) -> Option<&CelestialBody<H>> {
        self.bodies
            .iter()
            .filter(|b| !b.is_center())
            .fold(None, |best: Option<&CelestialBody<H>>, body| match best {
                Some(b) if b.orbital_radius() >= body.orbital_radius() => Some(b),
                _ => Some(body),
            })
    }
}
