use engine::{resolve_app_paths, LoopConfig, SceneWorld, StartupError, TextureCache};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::scene_def::{SceneDefError, SceneDefinition};

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) world: SceneWorld,
    pub(crate) textures: TextureCache,
}

#[derive(Debug, Error)]
pub(crate) enum BootstrapError {
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error(transparent)]
    SceneDef(#[from] SceneDefError),
}

pub(crate) fn build_app() -> Result<AppWiring, BootstrapError> {
    init_tracing();
    info!("=== Arrow2D Startup ===");

    let app_paths = resolve_app_paths()?;
    info!(
        root = %app_paths.root.display(),
        asset_root = %app_paths.asset_root.display(),
        "startup"
    );

    let config = LoopConfig::default();
    let definition = SceneDefinition::from_env_or_default(&app_paths.root)?;
    let mut textures = TextureCache::new(app_paths.asset_root);
    let mut world = SceneWorld::new(config.collision_mode);
    definition.populate(&mut world, &mut textures);

    Ok(AppWiring {
        config,
        world,
        textures,
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}
