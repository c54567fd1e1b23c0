use crate::components::entity::Entity;
use crate::renderer::sdf_instance::{SDFBuffer, SDFInstance};

/// Build the SDF instance buffer from active entities that carry a mesh.
/// Entities past the buffer's capacity are dropped with a warning.
pub fn build_sdf_buffer<'a>(
    entities: impl Iterator<Item = &'a Entity>,
    buffer: &mut SDFBuffer,
) {
    buffer.clear();
    let mut dropped = 0usize;
    for entity in entities.filter(|e| e.active) {
        let Some(mesh) = &entity.mesh else {
            continue;
        };
        let pushed = buffer.push(SDFInstance {
            x: entity.pos.x,
            y: entity.pos.y,
            radius: mesh.radius(),
            r: mesh.color.r,
            g: mesh.color.g,
            b: mesh.color.b,
            shininess: mesh.shininess,
            emissive: mesh.emissive,
            ..Default::default()
        });
        if !pushed {
            dropped += 1;
        }
    }
    if dropped > 0 {
        log::warn!("sdf buffer full: {} instance(s) dropped", dropped);
    }
}
