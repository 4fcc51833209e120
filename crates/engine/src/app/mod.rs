mod animation;
mod collision;
mod entity;
mod geometry;
mod input;
mod loop_runner;
mod metrics;
mod rendering;
mod scene;
mod textures;

pub use animation::{derive_facing_right, AnimState, Animator, ANIM_FRAME_TIME};
pub use collision::CollisionMode;
pub use entity::{
    Controller, Entity, EntityDef, EntityId, EntityKind, EntitySpawn, PLAYER_SIZE, PLAYER_SPEED,
};
pub use geometry::{Rect, Vec2};
pub use input::{InputAction, InputSnapshot};
pub use loop_runner::{run_app, AppError, LoopConfig, COLLISION_MODE_ENV_VAR, FPS_LIMIT_ENV_VAR};
pub use metrics::LoopMetricsSnapshot;
pub use rendering::{
    camera_offset, world_to_screen, RenderSink, Renderer, Viewport, FALLBACK_VIEWPORT,
};
pub use scene::SceneWorld;
pub use textures::{Texture, TextureCache, TextureId, TextureLoadError};
