//! Orbital Updater: circular-orbit kinematics and viewport fitting.
//!
//! Pure math over the registry, no engine dependencies. Results are pushed
//! to a [`FrameSink`] so the caller decides how bodies and orbit rings are drawn.

use std::f64::consts::TAU;

use glam::DVec2;

use crate::registry::{BodyRegistry, CelestialBody};

/// Gap kept between the farthest body's edge and the viewport edge, in pixels.
pub const ORBIT_MARGIN: f64 = 10.0;

/// Distance scale used when the viewport is too small to fit the system.
pub const MIN_DISTANCE_SCALE: f64 = 0.01;

/// Wrap an angle into [0, 2π). Non-finite input maps to 0.
pub fn normalize_angle(angle: f64) -> f64 {
    if !angle.is_finite() {
        return 0.0;
    }
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs.
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// A circle to draw: centre point and radius in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub center: DVec2,
    pub radius: f64,
}

impl Placement {
    /// Top-left corner of the circle's bounding square.
    pub fn top_left(&self) -> DVec2 {
        self.center - DVec2::splat(self.radius)
    }
}

/// Receives the updater's output.
pub trait FrameSink<H> {
    /// Where a body's disc goes this frame.
    fn place_body(&mut self, handle: H, placement: Placement);
    /// Where a body's orbit ring goes. Only sent for orbiting bodies.
    fn place_orbit(&mut self, handle: H, path: Placement);
}

/// Holds the layout state shared by all bodies: distance scale and viewport centre.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitalUpdater {
    distance_scale: f64,
    /// None until the first valid rescale.
    center: Option<DVec2>,
}

impl Default for OrbitalUpdater {
    fn default() -> Self {
        Self {
            distance_scale: 1.0,
            center: None,
        }
    }
}

impl OrbitalUpdater {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pixels per unit of orbital radius. Always > 0.
    pub fn distance_scale(&self) -> f64 {
        self.distance_scale
    }

    pub fn viewport_center(&self) -> Option<DVec2> {
        self.center
    }

    /// Screen position of `body` at its current angle, if a viewport is known.
    pub fn body_position<H: Copy>(&self, body: &CelestialBody<H>) -> Option<DVec2> {
        let center = self.center?;
        if body.is_center() {
            return Some(center);
        }
        let r = body.orbital_radius() * self.distance_scale;
        let (sin, cos) = body.angle().sin_cos();
        Some(center + DVec2::new(r * cos, r * sin))
    }

    /// Orbit ring for `body`; None for the centre body or before the first rescale.
    pub fn orbit_path<H: Copy>(&self, body: &CelestialBody<H>) -> Option<Placement> {
        if body.is_center() {
            return None;
        }
        Some(Placement {
            center: self.center?,
            radius: body.orbital_radius() * self.distance_scale,
        })
    }

    /// Advance every orbiting body by `days` simulated days and emit body placements.
    /// Does nothing until the first valid rescale. A non-finite `days` leaves
    /// angles alone but still re-emits positions.
    pub fn advance<H: Copy>(
        &mut self,
        registry: &mut BodyRegistry<H>,
        days: f64,
        sink: &mut impl FrameSink<H>,
    ) {
        if self.center.is_none() {
            return;
        }
        if days.is_finite() {
            for body in registry.iter_mut() {
                body.advance(days);
            }
        } else {
            log::debug!("advance: ignoring non-finite delta {}", days);
        }
        self.emit_bodies(registry, sink);
    }

    /// Fit the system into a `width` × `height` viewport and re-emit everything
    /// at the current angles. Returns false (and changes nothing) when either
    /// dimension is not a positive finite number.
    pub fn rescale<H: Copy>(
        &mut self,
        registry: &BodyRegistry<H>,
        width: f64,
        height: f64,
        sink: &mut impl FrameSink<H>,
    ) -> bool {
        let valid = |d: f64| d.is_finite() && d > 0.0;
        if !valid(width) || !valid(height) {
            log::debug!("rescale: ignoring viewport {}x{}", width, height);
            return false;
        }

        self.center = Some(DVec2::new(width / 2.0, height / 2.0));
        self.distance_scale = match registry.farthest() {
            Some(farthest) => {
                let available =
                    width.min(height) / 2.0 - (farthest.visual_radius() + ORBIT_MARGIN);
                if available > 0.0 {
                    available / farthest.orbital_radius()
                } else {
                    MIN_DISTANCE_SCALE
                }
            }
            None => 1.0,
        };
        log::debug!(
            "rescale: {}x{} -> distance scale {:.4}",
            width,
            height,
            self.distance_scale
        );

        self.emit_orbits(registry, sink);
        self.emit_bodies(registry, sink);
        true
    }

    /// Emit the orbit ring of every orbiting body.
    pub fn emit_orbits<H: Copy>(&self, registry: &BodyRegistry<H>, sink: &mut impl FrameSink<H>) {
        for body in registry.iter() {
            if let Some(path) = self.orbit_path(body) {
                sink.place_orbit(body.handle(), path);
            }
        }
    }

    /// Emit the disc placement of every body.
    pub fn emit_bodies<H: Copy>(&self, registry: &BodyRegistry<H>, sink: &mut impl FrameSink<H>) {
        for body in registry.iter() {
            if let Some(center) = self.body_position(body) {
                sink.place_body(
                    body.handle(),
                    Placement {
                        center,
                        radius: body.visual_radius(),
                    },
                );
            }
        }
    }
}
