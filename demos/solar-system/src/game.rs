//! Solar System: inner planets on circular orbits, fitted to the viewport.
//!
//! Bodies are SDF spheres; orbit rings are stroked vector circles redrawn
//! every tick.

use glam::DVec2;
use orrery_engine::*;

use crate::bodies::{SystemManifest, TICK_DT};
use crate::clock::SimClock;
use crate::orbit::{FrameSink, OrbitalUpdater, Placement};
use crate::registry::{BodyRegistry, BodySpec};

// ── World layout ─────────────────────────────────────────────────────

const WORLD_W: f32 = 800.0;
const WORLD_H: f32 = 600.0;

const ORBIT_LINE_WIDTH: f32 = 1.0;
const ORBIT_COLOR: VectorColor = VectorColor::DARK_GRAY;

const BODY_SHININESS: f32 = 16.0;
const CENTER_EMISSIVE: f32 = 2.5;

// ── Custom event kinds from the host ─────────────────────────────────

const CUSTOM_SET_SPEED: u32 = 2;
const CUSTOM_TOGGLE_PAUSE: u32 = 3;
/// Viewport resize sent through the input queue (a = width, b = height).
const CUSTOM_RESIZE: u32 = 99;

// ── Key codes ────────────────────────────────────────────────────────

const KEY_SPACE: u32 = 32;
const KEY_COMMA: u32 = 188;
const KEY_PERIOD: u32 = 190;

// ── Game event kinds to the host ─────────────────────────────────────

/// a = elapsed days, b = days per second, c = paused (0/1).
pub const EVENT_TIME_INFO: f32 = 1.0;
/// a = distance scale, b = viewport width, c = viewport height.
pub const EVENT_SCALE_INFO: f32 = 2.0;

/// Routes updater output into the scene and the vector layer.
struct SceneSink<'a> {
    scene: &'a mut Scene,
    vectors: &'a mut VectorState,
}

impl<'a> SceneSink<'a> {
    fn new(ctx: &'a mut EngineContext) -> Self {
        Self {
            scene: &mut ctx.scene,
            vectors: &mut ctx.vectors,
        }
    }
}

impl FrameSink<EntityId> for SceneSink<'_> {
    fn place_body(&mut self, handle: EntityId, placement: Placement) {
        if let Some(entity) = self.scene.get_mut(handle) {
            entity.place(placement.center.as_vec2(), placement.radius as f32);
        }
    }

    fn place_orbit(&mut self, _handle: EntityId, path: Placement) {
        self.vectors.stroke_circle(
            path.center.as_vec2(),
            path.radius as f32,
            ORBIT_LINE_WIDTH,
            ORBIT_COLOR,
        );
    }
}

pub struct SolarSystem {
    specs: Vec<BodySpec>,
    clock: SimClock,
    updater: OrbitalUpdater,
    /// Built in `init`; None before that.
    registry: Option<BodyRegistry<EntityId>>,
    /// Last valid viewport size.
    viewport: Option<DVec2>,
}

impl SolarSystem {
    pub fn new() -> Self {
        Self::with_manifest(SystemManifest::default())
    }

    pub fn with_manifest(manifest: SystemManifest) -> Self {
        Self {
            specs: manifest.bodies,
            clock: SimClock::new(manifest.time_scale),
            updater: OrbitalUpdater::new(),
            registry: None,
            viewport: None,
        }
    }

    pub fn registry(&self) -> Option<&BodyRegistry<EntityId>> {
        self.registry.as_ref()
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub fn updater(&self) -> &OrbitalUpdater {
        &self.updater
    }

    fn viewport_or_world(&self) -> DVec2 {
        self.viewport
            .unwrap_or(DVec2::new(WORLD_W as f64, WORLD_H as f64))
    }

    /// Spawn one entity per body spec and build the registry around their ids.
    fn spawn_bodies(&mut self, ctx: &mut EngineContext) {
        let registry = BodyRegistry::new(&self.specs, |_, spec| {
            let color = SDFColor::from_array(spec.color);
            let mut mesh = MeshComponent::sphere(spec.visual_radius.max(0.0) as f32, color)
                .with_shininess(BODY_SHININESS);
            if spec.is_center() {
                mesh = mesh.with_emissive(CENTER_EMISSIVE);
            }
            ctx.spawn_with(|id| Entity::new(id).with_tag(spec.name.as_str()).with_mesh(mesh))
        });
        log::info!("spawned {} bodies", registry.len());
        self.registry = Some(registry);
    }

    fn despawn_bodies(&mut self, ctx: &mut EngineContext) {
        if let Some(old) = self.registry.take() {
            for body in old.iter() {
                ctx.scene.despawn(body.handle());
            }
        }
    }

    /// Fit the system to `size`. Returns false if the size was rejected.
    fn rescale(&mut self, ctx: &mut EngineContext, size: DVec2) -> bool {
        let Some(registry) = self.registry.as_ref() else {
            return false;
        };
        let mut sink = SceneSink::new(ctx);
        let applied = self.updater.rescale(registry, size.x, size.y, &mut sink);
        if applied {
            self.viewport = Some(size);
        }
        applied
    }

    fn handle_input(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
        for event in input.iter() {
            match *event {
                InputEvent::Custom { kind, a, b, .. } => match kind {
                    CUSTOM_SET_SPEED => self.clock.set_speed(a as f64),
                    CUSTOM_TOGGLE_PAUSE => self.clock.toggle_pause(),
                    CUSTOM_RESIZE => {
                        self.rescale(ctx, DVec2::new(a as f64, b as f64));
                    }
                    _ => {}
                },
                InputEvent::KeyDown { key_code } => match key_code {
                    KEY_SPACE => self.clock.toggle_pause(),
                    KEY_PERIOD => self.clock.speed_up(),
                    KEY_COMMA => self.clock.slow_down(),
                    _ => {}
                },
                InputEvent::KeyUp { .. } => {}
            }
        }
    }

    fn emit_telemetry(&self, ctx: &mut EngineContext) {
        ctx.emit_event(GameEvent::new(
            EVENT_TIME_INFO,
            self.clock.elapsed_days() as f32,
            self.clock.days_per_second() as f32,
            if self.clock.is_paused() { 1.0 } else { 0.0 },
        ));

        let size = self.viewport_or_world();
        ctx.emit_event(GameEvent::new(
            EVENT_SCALE_INFO,
            self.updater.distance_scale() as f32,
            size.x as f32,
            size.y as f32,
        ));
    }
}

impl Default for SolarSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for SolarSystem {
    fn config(&self) -> GameConfig {
        GameConfig {
            fixed_dt: TICK_DT as f32,
            world_width: WORLD_W,
            world_height: WORLD_H,
            max_sdf_instances: 64,
            max_vector_vertices: 32768,
            max_events: 8,
            ..GameConfig::default()
        }
    }

    fn init(&mut self, ctx: &mut EngineContext) {
        self.spawn_bodies(ctx);
        let size = self.viewport_or_world();
        self.rescale(ctx, size);
    }

    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
        self.handle_input(ctx, input);

        let days = self.clock.tick(TICK_DT);

        if let Some(registry) = self.registry.as_mut() {
            // A resize above may already have drawn rings.
            ctx.vectors.clear();
            let mut sink = SceneSink::new(ctx);
            self.updater.advance(registry, days, &mut sink);
            self.updater.emit_orbits(registry, &mut sink);
        }

        self.emit_telemetry(ctx);
    }

    fn resize(&mut self, ctx: &mut EngineContext, width: f32, height: f32) {
        let size = DVec2::new(width as f64, height as f64);
        if self.registry.is_none() {
            if size.is_finite() && size.x > 0.0 && size.y > 0.0 {
                self.viewport = Some(size);
            }
            return;
        }
        if !self.rescale(ctx, size) {
            // Frame data was cleared for the resize; put the rings back.
            if let Some(registry) = self.registry.as_ref() {
                let mut sink = SceneSink::new(ctx);
                self.updater.emit_orbits(registry, &mut sink);
            }
        }
        self.emit_telemetry(ctx);
    }

    fn load_manifest(&mut self, ctx: &mut EngineContext, json: &str) {
        let manifest = match SystemManifest::from_json(json) {
            Ok(manifest) => manifest,
            Err(err) => {
                log::warn!("ignoring body manifest: {}", err);
                return;
            }
        };
        log::info!(
            "loading manifest: {} bodies at {} days/s",
            manifest.bodies.len(),
            manifest.time_scale
        );

        let started = self.registry.is_some();
        self.specs = manifest.bodies;
        self.clock.set_speed(manifest.time_scale);
        self.clock.reset();
        if !started {
            return;
        }

        self.despawn_bodies(ctx);
        ctx.vectors.clear();
        self.updater = OrbitalUpdater::new();
        self.spawn_bodies(ctx);
        let size = self.viewport_or_world();
        self.rescale(ctx, size);
    }
}
