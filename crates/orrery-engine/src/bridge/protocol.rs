//! Shared-buffer layout.
//! Must stay in sync with the host's `protocol.ts`.
//!
//! Layout (all values in f32 / 4 bytes):
//! ```text
//! [Header: 16 floats]
//! [SDF instances: max_sdf_instances × 12 floats]
//! [Vector vertices: max_vector_vertices × 6 floats]
//! [Events: max_events × 4 floats]
//! ```
//!
//! Capacities are written once into the header at init.
//! The host reads them back to compute offsets.

use crate::api::game::GameConfig;
use crate::api::types::GameEvent;
use crate::renderer::sdf_instance::SDFInstance;

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 16;

/// Header field indices.
pub const HEADER_LOCK: usize = 0;
pub const HEADER_FRAME_COUNTER: usize = 1;
pub const HEADER_PROTOCOL_VERSION: usize = 2;
pub const HEADER_WORLD_WIDTH: usize = 3;
pub const HEADER_WORLD_HEIGHT: usize = 4;
pub const HEADER_MAX_SDF_INSTANCES: usize = 5;
pub const HEADER_SDF_INSTANCE_COUNT: usize = 6;
pub const HEADER_MAX_VECTOR_VERTICES: usize = 7;
pub const HEADER_VECTOR_VERTEX_COUNT: usize = 8;
pub const HEADER_MAX_EVENTS: usize = 9;
pub const HEADER_EVENT_COUNT: usize = 10;

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// Floats per SDF instance: x, y, radius, r, g, b, shininess, emissive, pad×4.
pub const SDF_INSTANCE_FLOATS: usize = SDFInstance::FLOATS;

/// Floats per vector vertex: x, y, r, g, b, a.
pub const VECTOR_VERTEX_FLOATS: usize = 6;

/// Floats per game event: kind, a, b, c.
pub const EVENT_FLOATS: usize = GameEvent::FLOATS;

/// Runtime-computed buffer layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolLayout {
    pub max_sdf_instances: usize,
    pub max_vector_vertices: usize,
    pub max_events: usize,

    /// Size of each section in floats.
    pub sdf_data_floats: usize,
    pub vector_data_floats: usize,
    pub event_data_floats: usize,

    /// Offset (in floats) where each section begins.
    pub sdf_data_offset: usize,
    pub vector_data_offset: usize,
    pub event_data_offset: usize,

    /// Total buffer size in floats.
    pub buffer_total_floats: usize,
    /// Total buffer size in bytes.
    pub buffer_total_bytes: usize,
}

impl ProtocolLayout {
    /// Compute layout from raw capacity values.
    pub fn new(max_sdf_instances: usize, max_vector_vertices: usize, max_events: usize) -> Self {
        let sdf_data_floats = max_sdf_instances * SDF_INSTANCE_FLOATS;
        let vector_data_floats = max_vector_vertices * VECTOR_VERTEX_FLOATS;
        let event_data_floats = max_events * EVENT_FLOATS;

        let sdf_data_offset = HEADER_FLOATS;
        let vector_data_offset = sdf_data_offset + sdf_data_floats;
        let event_data_offset = vector_data_offset + vector_data_floats;

        let buffer_total_floats = event_data_offset + event_data_floats;

        Self {
            max_sdf_instances,
            max_vector_vertices,
            max_events,
            sdf_data_floats,
            vector_data_floats,
            event_data_floats,
            sdf_data_offset,
            vector_data_offset,
            event_data_offset,
            buffer_total_floats,
            buffer_total_bytes: buffer_total_floats * 4,
        }
    }

    /// Compute layout from a GameConfig.
    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(
            config.max_sdf_instances,
            config.max_vector_vertices,
            config.max_events,
        )
    }

    /// Header values for this layout with the given per-frame counts.
    /// The lock slot is left at zero; the host owns it.
    pub fn header(
        &self,
        config: &GameConfig,
        frame: u64,
        sdf_count: usize,
        vector_count: usize,
        event_count: usize,
    ) -> [f32; HEADER_FLOATS] {
        let mut h = [0.0; HEADER_FLOATS];
        h[HEADER_FRAME_COUNTER] = frame as f32;
        h[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
        h[HEADER_WORLD_WIDTH] = config.world_width;
        h[HEADER_WORLD_HEIGHT] = config.world_height;
        h[HEADER_MAX_SDF_INSTANCES] = self.max_sdf_instances as f32;
        h[HEADER_SDF_INSTANCE_COUNT] = sdf_count.min(self.max_sdf_instances) as f32;
        h[HEADER_MAX_VECTOR_VERTICES] = self.max_vector_vertices as f32;
        h[HEADER_VECTOR_VERTEX_COUNT] = vector_count.min(self.max_vector_vertices) as f32;
        h[HEADER_MAX_EVENTS] = self.max_events as f32;
        h[HEADER_EVENT_COUNT] = event_count.min(self.max_events) as f32;
        h
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_default_config_matches_expected_sizes() {
        let layout = ProtocolLayout::from_config(&GameConfig::default());

        assert_eq!(layout.max_sdf_instances, 128);
        assert_eq!(layout.max_vector_vertices, 16384);
        assert_eq!(layout.max_events, 32);

        assert_eq!(layout.sdf_data_floats, 128 * 12);
        assert_eq!(layout.vector_data_floats, 16384 * 6);
        assert_eq!(layout.event_data_floats, 32 * 4);

        let expected_total = HEADER_FLOATS + 128 * 12 + 16384 * 6 + 32 * 4;
        assert_eq!(layout.buffer_total_floats, expected_total);
        assert_eq!(layout.buffer_total_bytes, expected_total * 4);
    }

    #[test]
    fn offsets_are_contiguous() {
        let layout = ProtocolLayout::new(10, 200, 20);

        assert_eq!(layout.sdf_data_offset, HEADER_FLOATS);
        assert_eq!(layout.vector_data_offset, layout.sdf_data_offset + layout.sdf_data_floats);
        assert_eq!(layout.event_data_offset, layout.vector_data_offset + layout.vector_data_floats);
        assert_eq!(layout.buffer_total_floats, layout.event_data_offset + layout.event_data_floats);
    }

    #[test]
    fn header_clamps_counts_to_capacity() {
        let config = GameConfig::default();
        let layout = ProtocolLayout::new(4, 12, 2);
        let h = layout.header(&config, 7, 9, 6, 5);

        assert_eq!(h[HEADER_LOCK], 0.0);
        assert_eq!(h[HEADER_FRAME_COUNTER], 7.0);
        assert_eq!(h[HEADER_PROTOCOL_VERSION], PROTOCOL_VERSION);
        assert_eq!(h[HEADER_WORLD_WIDTH], config.world_width);
        assert_eq!(h[HEADER_SDF_INSTANCE_COUNT], 4.0);
        assert_eq!(h[HEADER_VECTOR_VERTEX_COUNT], 6.0);
        assert_eq!(h[HEADER_EVENT_COUNT], 2.0);
    }
}
