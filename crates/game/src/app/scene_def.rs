use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};

use engine::{EntityDef, EntityId, EntityKind, SceneWorld, TextureCache};
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

pub(crate) const SCENE_ENV_VAR: &str = "ARROW2D_SCENE";

/// Player and NPC sharing the player sprite sheet.
pub(crate) const DEFAULT_SCENE_JSON: &str =
    include_str!("../../../../assets/scenes/test_scene.json");

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct SceneDefinition {
    #[serde(default)]
    pub(crate) name: Option<String>,
    pub(crate) entities: Vec<EntityDef>,
}

#[derive(Debug, Error)]
pub(crate) enum SceneDefError {
    #[error("failed to read scene file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse scene json{}: {source}", at_path(.path))]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("scene validation failed at {path}: {message}")]
    Validation { path: String, message: String },
}

fn at_path(path: &str) -> String {
    if path.is_empty() || path == "." {
        String::new()
    } else {
        format!(" at {path}")
    }
}

impl SceneDefinition {
    pub(crate) fn parse(raw: &str) -> Result<Self, SceneDefError> {
        let mut deserializer = serde_json::Deserializer::from_str(raw);
        let definition = serde_path_to_error::deserialize::<_, SceneDefinition>(&mut deserializer)
            .map_err(|error| {
                let path = error.path().to_string();
                SceneDefError::Parse {
                    path,
                    source: error.into_inner(),
                }
            })?;
        definition.validate()?;
        Ok(definition)
    }

    pub(crate) fn load(path: &Path) -> Result<Self, SceneDefError> {
        let raw = fs::read_to_string(path).map_err(|source| SceneDefError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&raw)
    }

    /// The scene named by `ARROW2D_SCENE`, resolved against `root` when
    /// relative, or the built-in test scene.
    pub(crate) fn from_env_or_default(root: &Path) -> Result<Self, SceneDefError> {
        match std::env::var(SCENE_ENV_VAR) {
            Ok(value) if !value.trim().is_empty() => {
                let path = root.join(value.trim());
                info!(path = %path.display(), "scene_file_selected");
                Self::load(&path)
            }
            Ok(_) | Err(std::env::VarError::NotPresent) => Self::parse(DEFAULT_SCENE_JSON),
            Err(error) => {
                warn!(
                    env_var = SCENE_ENV_VAR,
                    error = %error,
                    "unable to read scene env var; falling back to built-in scene"
                );
                Self::parse(DEFAULT_SCENE_JSON)
            }
        }
    }

    fn validate(&self) -> Result<(), SceneDefError> {
        for (index, entity) in self.entities.iter().enumerate() {
            let field = |name: &str| format!("entities[{index}].{name}");
            require_finite(&field("x"), entity.x)?;
            require_finite(&field("y"), entity.y)?;
            require_positive(&field("width"), entity.width)?;
            require_positive(&field("height"), entity.height)?;
            if !entity.speed.is_finite() || entity.speed < 0.0 {
                return Err(expected_actual(
                    &field("speed"),
                    "finite non-negative number",
                    entity.speed,
                ));
            }
        }
        Ok(())
    }

    pub(crate) fn camera_target_count(&self) -> usize {
        self.entities
            .iter()
            .filter(|entity| entity.kind == EntityKind::Player)
            .count()
    }

    /// Spawns every entity in file order, loading textures through `textures`.
    pub(crate) fn populate(
        &self,
        world: &mut SceneWorld,
        textures: &mut TextureCache,
    ) -> Vec<EntityId> {
        if self.camera_target_count() > 1 {
            warn!(players = self.camera_target_count(), "multiple_camera_targets");
        }
        let ids = self
            .entities
            .iter()
            .map(|entity| world.spawn_from_def(entity, textures))
            .collect::<Vec<_>>();
        info!(
            scene = self.name.as_deref().unwrap_or("unnamed"),
            entity_count = ids.len(),
            texture_count = textures.len(),
            "scene_populated"
        );
        ids
    }
}

fn expected_actual(path: &str, expected: impl Display, actual: impl Display) -> SceneDefError {
    SceneDefError::Validation {
        path: path.to_string(),
        message: format!("expected {expected}, got {actual}"),
    }
}

fn require_finite(path: &str, value: f32) -> Result<(), SceneDefError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(expected_actual(path, "finite number", value))
    }
}

fn require_positive(path: &str, value: f32) -> Result<(), SceneDefError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(expected_actual(path, "finite positive number", value))
    }
}
