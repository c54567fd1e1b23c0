use crate::core::scene::Scene;
use crate::api::types::{EntityId, GameEvent};
use crate::components::entity::Entity;
use crate::input::queue::InputQueue;
#[cfg(feature = "vectors")]
use crate::systems::vector::VectorState;

/// Configuration for the engine, provided by the game.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Fixed timestep in seconds (default: 1/60).
    pub fixed_dt: f32,
    /// Upper bound on fixed steps run for a single frame (default: 10).
    pub max_steps_per_frame: u32,
    /// World width in game units.
    pub world_width: f32,
    /// World height in game units.
    pub world_height: f32,
    /// Maximum number of SDF circle instances (default: 128).
    pub max_sdf_instances: usize,
    /// Maximum number of tessellated vector vertices (default: 16384).
    pub max_vector_vertices: usize,
    /// Maximum number of game events per frame (default: 32).
    pub max_events: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            max_steps_per_frame: 10,
            world_width: 800.0,
            world_height: 600.0,
            max_sdf_instances: 128,
            max_vector_vertices: 16384,
            max_events: 32,
        }
    }
}

/// The core contract every simulation must fulfill.
pub trait Game {
    /// Return engine configuration. Called once before init.
    fn config(&self) -> GameConfig {
        GameConfig::default()
    }

    /// Setup initial state, spawn entities, configure the scene.
    fn init(&mut self, ctx: &mut EngineContext);

    /// One fixed-rate tick. Advance simulation state and update entities.
    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue);

    /// The viewport changed size. Runs immediately, outside the tick loop,
    /// so the next rendered frame reflects the new layout without advancing time.
    fn resize(&mut self, _ctx: &mut EngineContext, _width: f32, _height: f32) {}

    /// A JSON manifest was supplied by the host page.
    fn load_manifest(&mut self, _ctx: &mut EngineContext, _json: &str) {}
}

/// Mutable access to engine state, passed to the `Game` hooks.
pub struct EngineContext {
    pub scene: Scene,
    #[cfg(feature = "vectors")]
    pub vectors: VectorState,
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl EngineContext {
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            #[cfg(feature = "vectors")]
            vectors: VectorState::new(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Generate the next unique entity ID.
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Allocate an ID for `build`'s entity and add it to the scene.
    pub fn spawn_with(&mut self, build: impl FnOnce(EntityId) -> Entity) -> EntityId {
        let id = self.next_id();
        self.scene.spawn(build(id));
        id
    }

    /// Emit a telemetry event to be forwarded to the host page.
    pub fn emit_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Clear per-frame transient data (events, vector geometry).
    pub fn clear_frame_data(&mut self) {
        self.events.clear();
        #[cfg(feature = "vectors")]
        self.vectors.clear();
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_increasing() {
        let mut ctx = EngineContext::new();
        let a = ctx.next_id();
        let b = ctx.next_id();
        assert_eq!(a, EntityId(1));
        assert_eq!(b, EntityId(2));
    }

    #[test]
    fn spawn_with_uses_allocated_id() {
        let mut ctx = EngineContext::new();
        let id = ctx.spawn_with(|id| Entity::new(id).with_tag("sun"));
        assert_eq!(ctx.scene.len(), 1);
        assert_eq!(ctx.scene.get(id).map(|e| e.tag.as_str()), Some("sun"));
    }

    #[test]
    fn clear_frame_data_drops_events() {
        let mut ctx = EngineContext::new();
        ctx.emit_event(GameEvent::new(1.0, 0.0, 0.0, 0.0));
        ctx.clear_frame_data();
        assert!(ctx.events.is_empty());
    }

    #[cfg(feature = "vectors")]
    #[test]
    fn clear_frame_data_drops_vectors() {
        let mut ctx = EngineContext::new();
        ctx.vectors.stroke_circle(glam::Vec2::new(10.0, 10.0), 5.0, 1.0, crate::VectorColor::WHITE);
        assert!(ctx.vectors.vertex_count() > 0);
        ctx.clear_frame_data();
        assert_eq!(ctx.vectors.vertex_count(), 0);
    }
}
