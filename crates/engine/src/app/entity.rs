use std::collections::HashMap;

use serde::Deserialize;
use tracing::warn;

use super::animation::{derive_facing_right, AnimState, Animator};
use super::textures::{TextureCache, TextureId};
use super::{Rect, Vec2};

pub const PLAYER_SPEED: f32 = 300.0;
pub const PLAYER_SIZE: Vec2 = Vec2 { x: 64.0, y: 64.0 };

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

#[derive(Debug, Default)]
pub struct EntityIdAllocator {
    next: u64,
}

impl EntityIdAllocator {
    pub fn allocate(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next = self.next.saturating_add(1);
        id
    }
}

/// Declarative type tag of a scene object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum EntityKind {
    Player,
    #[serde(rename = "NPC")]
    Npc,
    Prop,
}

impl EntityKind {
    pub fn default_name(self) -> &'static str {
        match self {
            EntityKind::Player => "player",
            EntityKind::Npc => "npc",
            EntityKind::Prop => "prop",
        }
    }
}

/// Per-tick behaviour selected by [`EntityKind`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Controller {
    /// Velocity comes from the movement keys.
    Player { speed: f32 },
    /// Stands still for now; speed is kept for later behaviours.
    Npc { speed: f32 },
    /// Velocity is whatever the owner last set.
    Static,
}

impl Controller {
    fn for_kind(kind: EntityKind, speed: f32) -> Self {
        match kind {
            EntityKind::Player => Controller::Player { speed },
            EntityKind::Npc => Controller::Npc { speed },
            EntityKind::Prop => Controller::Static,
        }
    }

    pub fn speed(&self) -> Option<f32> {
        match *self {
            Controller::Player { speed } | Controller::Npc { speed } => Some(speed),
            Controller::Static => None,
        }
    }
}

fn default_speed() -> f32 {
    PLAYER_SPEED
}

/// One record of a scene definition file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntityDef {
    #[serde(rename = "type")]
    pub kind: EntityKind,
    #[serde(default)]
    pub name: Option<String>,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub textures: HashMap<AnimState, String>,
    #[serde(default = "default_speed")]
    pub speed: f32,
}

/// Fully resolved construction data for [`super::SceneWorld::spawn`].
#[derive(Debug, Clone)]
pub struct EntitySpawn {
    pub name: String,
    pub kind: EntityKind,
    pub position: Vec2,
    pub size: Vec2,
    pub speed: f32,
    pub textures: HashMap<AnimState, TextureId>,
}

impl EntitySpawn {
    pub fn new(kind: EntityKind, position: Vec2, size: Vec2) -> Self {
        Self {
            name: kind.default_name().to_string(),
            kind,
            position,
            size,
            speed: PLAYER_SPEED,
            textures: HashMap::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_texture(mut self, state: AnimState, texture: TextureId) -> Self {
        self.textures.insert(state, texture);
        self
    }

    /// Loads every texture the definition names. States whose texture fails
    /// to load are left without one; drawing skips them.
    pub fn from_def(def: &EntityDef, textures: &mut TextureCache) -> Self {
        let mut spawn = Self::new(
            def.kind,
            Vec2::new(def.x, def.y),
            Vec2::new(def.width, def.height),
        )
        .with_speed(def.speed);
        if let Some(name) = &def.name {
            spawn = spawn.with_name(name.as_str());
        }

        for (state, path) in &def.textures {
            if let Some(texture) = textures.load(path) {
                spawn.textures.insert(*state, texture);
            }
        }
        if !def.textures.is_empty() && spawn.textures.is_empty() {
            warn!(
                entity = spawn.name.as_str(),
                "entity_has_no_loadable_textures"
            );
        }
        spawn
    }
}

#[derive(Debug, Clone)]
pub struct Entity {
    id: EntityId,
    name: String,
    kind: EntityKind,
    position: Vec2,
    size: Vec2,
    velocity: Vec2,
    hitbox: Rect,
    animator: Animator,
    textures: HashMap<AnimState, TextureId>,
    controller: Controller,
    camera_target: bool,
}

impl Entity {
    pub(crate) fn new(id: EntityId, spawn: EntitySpawn) -> Self {
        Self {
            id,
            hitbox: Rect::from_position_size(spawn.position, spawn.size),
            controller: Controller::for_kind(spawn.kind, spawn.speed),
            camera_target: spawn.kind == EntityKind::Player,
            name: spawn.name,
            kind: spawn.kind,
            position: spawn.position,
            size: spawn.size,
            velocity: Vec2::ZERO,
            animator: Animator::default(),
            textures: spawn.textures,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Teleports the entity; the hitbox follows.
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
        self.sync_hitbox();
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    pub fn hitbox(&self) -> Rect {
        self.hitbox
    }

    pub fn anim_state(&self) -> AnimState {
        self.animator.state()
    }

    pub fn controller(&self) -> Controller {
        self.controller
    }

    pub fn is_camera_target(&self) -> bool {
        self.camera_target
    }

    pub fn set_camera_target(&mut self, camera_target: bool) {
        self.camera_target = camera_target;
    }

    pub fn texture_for(&self, state: AnimState) -> Option<TextureId> {
        self.textures.get(&state).copied()
    }

    pub fn current_texture(&self) -> Option<TextureId> {
        self.texture_for(self.anim_state())
    }

    pub fn dest_rect(&self) -> Rect {
        Rect::from_position_size(self.position, self.size)
    }

    pub fn is_moving(&self) -> bool {
        !self.velocity.is_zero()
    }

    pub(crate) fn facing_right(&self) -> bool {
        derive_facing_right(self.velocity.x, self.anim_state())
    }

    pub(crate) fn commit_x(&mut self, x: f32) {
        self.position.x = x;
    }

    pub(crate) fn commit_y(&mut self, y: f32) {
        self.position.y = y;
    }

    pub(crate) fn sync_hitbox(&mut self) {
        self.hitbox = Rect::from_position_size(self.position, self.size);
    }

    /// Non-positional per-frame bookkeeping.
    pub(crate) fn update_animation(&mut self, dt: f32) -> AnimState {
        let moving = self.is_moving();
        let facing_right = self.facing_right();
        self.animator.update(dt, moving, facing_right)
    }
}
