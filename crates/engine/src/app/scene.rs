use tracing::debug;

use super::collision::{resolve_movement, CollisionMode};
use super::entity::{Controller, Entity, EntityDef, EntityId, EntityIdAllocator, EntitySpawn};
use super::input::InputSnapshot;
use super::rendering::{camera_offset, world_to_screen, RenderSink, Viewport, FALLBACK_VIEWPORT};
use super::textures::TextureCache;
use super::Vec2;

/// Owns every entity of the running scene. Insertion order is both
/// simulation order and draw order.
#[derive(Debug, Default)]
pub struct SceneWorld {
    allocator: EntityIdAllocator,
    entities: Vec<Entity>,
    collision_mode: CollisionMode,
}

impl SceneWorld {
    pub fn new(collision_mode: CollisionMode) -> Self {
        Self {
            collision_mode,
            ..Self::default()
        }
    }

    pub fn collision_mode(&self) -> CollisionMode {
        self.collision_mode
    }

    pub fn set_collision_mode(&mut self, collision_mode: CollisionMode) {
        self.collision_mode = collision_mode;
    }

    pub fn spawn(&mut self, spawn: EntitySpawn) -> EntityId {
        let id = self.allocator.allocate();
        let entity = Entity::new(id, spawn);
        debug!(
            entity_id = id.0,
            name = entity.name(),
            kind = ?entity.kind(),
            "entity_spawned"
        );
        self.entities.push(entity);
        id
    }

    pub fn spawn_from_def(&mut self, def: &EntityDef, textures: &mut TextureCache) -> EntityId {
        self.spawn(EntitySpawn::from_def(def, textures))
    }

    /// Removes the entity, keeping the relative order of the rest.
    pub fn despawn(&mut self, id: EntityId) -> bool {
        let Some(index) = self.entities.iter().position(|entity| entity.id() == id) else {
            return false;
        };
        let entity = self.entities.remove(index);
        debug!(entity_id = id.0, name = entity.name(), "entity_despawned");
        true
    }

    pub fn clear(&mut self) {
        self.entities.clear();
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn find_entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|entity| entity.id() == id)
    }

    pub fn find_entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|entity| entity.id() == id)
    }

    /// One simulation tick: controllers set velocities, movement is resolved
    /// against hitboxes, then animations advance.
    pub fn update(&mut self, dt: f32, input: &InputSnapshot) {
        for entity in &mut self.entities {
            match entity.controller() {
                Controller::Player { speed } => entity.set_velocity(input.movement_vector(speed)),
                Controller::Npc { .. } => entity.set_velocity(Vec2::ZERO),
                Controller::Static => {}
            }
        }

        resolve_movement(self.collision_mode, &mut self.entities, dt);

        for entity in &mut self.entities {
            entity.update_animation(dt);
        }
    }

    /// First camera target in insertion order, looked up fresh each call.
    pub fn camera_target(&self) -> Option<&Entity> {
        self.entities.iter().find(|entity| entity.is_camera_target())
    }

    pub fn camera_offset(&self, viewport: Viewport) -> Vec2 {
        self.camera_target()
            .map(|target| camera_offset(target.dest_rect(), viewport))
            .unwrap_or(Vec2::ZERO)
    }

    pub fn render<S: RenderSink>(&self, sink: &mut S) -> Result<(), S::Error> {
        let viewport = sink.viewport().unwrap_or(FALLBACK_VIEWPORT);
        let offset = self.camera_offset(viewport);

        sink.clear();
        for entity in &self.entities {
            let Some(texture) = entity.current_texture() else {
                continue;
            };
            sink.draw(texture, world_to_screen(entity.dest_rect(), offset));
        }
        sink.present()
    }
}
