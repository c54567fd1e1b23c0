use orrery_engine::bridge::protocol::HEADER_FLOATS;
use orrery_engine::{
    build_sdf_buffer, EngineContext, FixedTimestep, Game, GameConfig, GameEvent, InputEvent,
    InputQueue, ProtocolLayout, SDFBuffer, SDFInstance,
};
#[cfg(feature = "vectors")]
use orrery_engine::VectorState;

/// Generic runner that wires a `Game` to the host's frame loop.
///
/// Each concrete simulation stores one `GameRunner` in a `thread_local!`
/// and exports free functions via `#[wasm_bindgen]` (see `export_game!`),
/// because wasm-bindgen cannot export generic structs directly.
pub struct GameRunner<G: Game> {
    game: G,
    ctx: EngineContext,
    input: InputQueue,
    sdf_buffer: SDFBuffer,
    timestep: FixedTimestep,
    config: GameConfig,
    layout: ProtocolLayout,
    header: [f32; HEADER_FLOATS],
    frame: u64,
    initialized: bool,
    /// Viewport size received before `init`, applied right after it.
    pending_resize: Option<(f32, f32)>,
}

impl<G: Game> GameRunner<G> {
    pub fn new(game: G) -> Self {
        let config = game.config();
        let timestep = FixedTimestep::with_max_steps(config.fixed_dt, config.max_steps_per_frame);
        let layout = ProtocolLayout::from_config(&config);

        Self {
            game,
            ctx: EngineContext::new(),
            input: InputQueue::new(),
            sdf_buffer: SDFBuffer::with_capacity(config.max_sdf_instances),
            timestep,
            layout,
            config,
            header: [0.0; HEADER_FLOATS],
            frame: 0,
            initialized: false,
            pending_resize: None,
        }
    }

    /// Initialize the game. Call once after construction.
    pub fn init(&mut self) {
        self.config = self.game.config();
        self.layout = ProtocolLayout::from_config(&self.config);
        self.timestep =
            FixedTimestep::with_max_steps(self.config.fixed_dt, self.config.max_steps_per_frame);
        self.sdf_buffer = SDFBuffer::with_capacity(self.config.max_sdf_instances);
        #[cfg(feature = "vectors")]
        {
            self.ctx.vectors = VectorState::with_capacity(self.config.max_vector_vertices);
        }

        self.game.init(&mut self.ctx);
        self.initialized = true;

        match self.pending_resize.take() {
            Some((width, height)) => self.resize(width, height),
            None => self.rebuild_frame(),
        }
    }

    /// Push an input event into the queue.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Run one host frame: zero or more fixed ticks, then rebuild output buffers.
    pub fn tick(&mut self, dt: f32) {
        if !self.initialized {
            return;
        }

        let steps = self.timestep.accumulate(dt);
        for _ in 0..steps {
            // Each tick redraws the whole frame, so only the last one survives.
            self.ctx.clear_frame_data();
            self.game.update(&mut self.ctx, &self.input);
        }

        // Input stays queued until a tick has seen it.
        if steps > 0 {
            self.input.drain();
        }

        self.rebuild_frame();
    }

    /// Apply a viewport resize immediately, without advancing time.
    pub fn resize(&mut self, width: f32, height: f32) {
        if !self.initialized {
            self.pending_resize = Some((width, height));
            return;
        }
        log::debug!("resize to {}x{}", width, height);
        self.ctx.clear_frame_data();
        self.game.resize(&mut self.ctx, width, height);
        self.rebuild_frame();
    }

    /// Hand a JSON manifest to the game.
    pub fn load_manifest(&mut self, json: &str) {
        self.game.load_manifest(&mut self.ctx, json);
        if self.initialized {
            self.rebuild_frame();
        }
    }

    fn rebuild_frame(&mut self) {
        build_sdf_buffer(self.ctx.scene.iter(), &mut self.sdf_buffer);
        self.frame += 1;
        self.header = self.layout.header(
            &self.config,
            self.frame,
            self.sdf_buffer.instance_count(),
            self.vector_vertex_count() as usize,
            self.ctx.events.len(),
        );
    }

    // ---- Read access for tests and native hosts ----

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }

    pub fn sdf_instances(&self) -> &[SDFInstance] {
        self.sdf_buffer.instances()
    }

    pub fn game_events(&self) -> &[GameEvent] {
        let len = self.ctx.events.len().min(self.layout.max_events);
        &self.ctx.events[..len]
    }

    pub fn header(&self) -> &[f32; HEADER_FLOATS] {
        &self.header
    }

    // ---- Pointer accessors for shared-buffer reads ----

    pub fn header_ptr(&self) -> *const f32 {
        self.header.as_ptr()
    }

    pub fn sdf_instances_ptr(&self) -> *const f32 {
        self.sdf_buffer.instances_ptr()
    }

    pub fn sdf_instance_count(&self) -> u32 {
        self.sdf_buffer.instance_count() as u32
    }

    #[cfg(feature = "vectors")]
    pub fn vector_vertices_ptr(&self) -> *const f32 {
        self.ctx.vectors.buffer_ptr()
    }

    #[cfg(feature = "vectors")]
    pub fn vector_vertex_count(&self) -> u32 {
        self.ctx.vectors.vertex_count() as u32
    }

    #[cfg(not(feature = "vectors"))]
    pub fn vector_vertex_count(&self) -> u32 {
        0
    }

    pub fn game_events_ptr(&self) -> *const f32 {
        self.ctx.events.as_ptr() as *const f32
    }

    pub fn game_events_len(&self) -> u32 {
        self.game_events().len() as u32
    }

    pub fn world_width(&self) -> f32 {
        self.config.world_width
    }

    pub fn world_height(&self) -> f32 {
        self.config.world_height
    }

    // ---- Capacity accessors ----

    pub fn max_sdf_instances(&self) -> u32 {
        self.layout.max_sdf_instances as u32
    }

    pub fn max_vector_vertices(&self) -> u32 {
        self.layout.max_vector_vertices as u32
    }

    pub fn max_events(&self) -> u32 {
        self.layout.max_events as u32
    }

    pub fn buffer_total_floats(&self) -> u32 {
        self.layout.buffer_total_floats as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use probe::Probe;

    /// Minimal game recording which hooks ran.
    mod probe {
        use orrery_engine::{
            EngineContext, Entity, Game, GameConfig, GameEvent, InputEvent, InputQueue,
            MeshComponent, SDFColor,
        };

        #[derive(Default)]
        pub struct Probe {
            pub updates: u32,
            pub keys_seen: u32,
            pub resizes: Vec<(f32, f32)>,
            pub manifests: Vec<String>,
        }

        impl Game for Probe {
            fn config(&self) -> GameConfig {
                GameConfig {
                    max_events: 2,
                    ..GameConfig::default()
                }
            }

            fn init(&mut self, ctx: &mut EngineContext) {
                ctx.spawn_with(|id| {
                    Entity::new(id).with_mesh(MeshComponent::sphere(5.0, SDFColor::default()))
                });
            }

            fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
                self.updates += 1;
                self.keys_seen += input
                    .iter()
                    .filter(|e| matches!(e, InputEvent::KeyDown { .. }))
                    .count() as u32;
                for _ in 0..3 {
                    ctx.emit_event(GameEvent::new(1.0, self.updates as f32, 0.0, 0.0));
                }
            }

            fn resize(&mut self, _ctx: &mut EngineContext, width: f32, height: f32) {
                self.resizes.push((width, height));
            }

            fn load_manifest(&mut self, _ctx: &mut EngineContext, json: &str) {
                self.manifests.push(json.to_owned());
            }
        }
    }

    #[test]
    fn tick_before_init_does_nothing() {
        let mut runner = GameRunner::new(Probe::default());
        runner.tick(1.0 / 60.0);
        assert_eq!(runner.game().updates, 0);
    }

    #[test]
    fn tick_runs_fixed_steps_and_builds_sdf() {
        let mut runner = GameRunner::new(Probe::default());
        runner.init();
        runner.tick(1.0 / 60.0);
        assert_eq!(runner.game().updates, 1);
        assert_eq!(runner.sdf_instance_count(), 1);
        assert_eq!(runner.sdf_instances()[0].radius, 5.0);
    }

    #[test]
    fn events_are_capped_and_reset_per_tick() {
        let mut runner = GameRunner::new(Probe::default());
        runner.init();
        runner.tick(1.0 / 60.0);
        assert_eq!(runner.game_events_len(), 2);
        runner.tick(1.0 / 60.0);
        assert_eq!(runner.game_events()[0].a, 2.0);
    }

    #[test]
    fn input_survives_frames_without_ticks() {
        let mut runner = GameRunner::new(Probe::default());
        runner.init();
        runner.push_input(InputEvent::KeyDown { key_code: 32 });
        runner.tick(0.001);
        assert_eq!(runner.game().updates, 0);
        runner.tick(1.0 / 60.0);
        assert_eq!(runner.game().keys_seen, 1);
        runner.tick(1.0 / 60.0);
        assert_eq!(runner.game().keys_seen, 1);
    }

    #[test]
    fn resize_before_init_is_applied_after_init() {
        let mut runner = GameRunner::new(Probe::default());
        runner.resize(1024.0, 768.0);
        assert!(runner.game().resizes.is_empty());
        runner.init();
        assert_eq!(runner.game().resizes, vec![(1024.0, 768.0)]);
    }

    #[test]
    fn resize_does_not_advance_time() {
        let mut runner = GameRunner::new(Probe::default());
        runner.init();
        runner.resize(640.0, 480.0);
        assert_eq!(runner.game().updates, 0);
        assert_eq!(runner.sdf_instance_count(), 1);
    }

    #[test]
    fn manifest_is_forwarded() {
        let mut runner = GameRunner::new(Probe::default());
        runner.load_manifest("{}");
        assert_eq!(runner.game().manifests, vec!["{}".to_owned()]);
    }

    #[test]
    fn header_tracks_counts() {
        use orrery_engine::bridge::protocol::{HEADER_EVENT_COUNT, HEADER_SDF_INSTANCE_COUNT};
        let mut runner = GameRunner::new(Probe::default());
        runner.init();
        runner.tick(1.0 / 60.0);
        assert_eq!(runner.header()[HEADER_SDF_INSTANCE_COUNT], 1.0);
        assert_eq!(runner.header()[HEADER_EVENT_COUNT], 2.0);
    }
}
