use std::collections::HashMap;
use std::path::{Path, PathBuf};

use image::ImageReader;
use thiserror::Error;
use tracing::{debug, warn};

use crate::asset_paths::{validate_asset_path, AssetPathError};

/// Opaque handle into a [`TextureCache`]. Several entities may share one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(u32);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl Texture {
    pub fn is_drawable(&self) -> bool {
        self.width > 0
            && self.height > 0
            && self.rgba.len() >= self.width as usize * self.height as usize * 4
    }
}

#[derive(Debug, Error)]
pub enum TextureLoadError {
    #[error("invalid asset path '{path}': {source}")]
    InvalidPath {
        path: String,
        #[source]
        source: AssetPathError,
    },
    #[error("failed to open '{path}': {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode '{path}': {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Path-keyed texture store. A path is read from storage at most once;
/// failures are remembered so they are neither retried nor re-reported.
#[derive(Debug)]
pub struct TextureCache {
    asset_root: PathBuf,
    textures: Vec<Texture>,
    by_path: HashMap<String, Option<TextureId>>,
}

impl TextureCache {
    pub fn new(asset_root: impl Into<PathBuf>) -> Self {
        Self {
            asset_root: asset_root.into(),
            textures: Vec::new(),
            by_path: HashMap::new(),
        }
    }

    pub fn load(&mut self, path: &str) -> Option<TextureId> {
        if let Some(cached) = self.by_path.get(path) {
            return *cached;
        }

        let loaded = match read_texture(&self.asset_root, path) {
            Ok(texture) => {
                debug!(
                    path,
                    width = texture.width,
                    height = texture.height,
                    "texture_loaded"
                );
                Some(self.push(texture))
            }
            Err(error) => {
                warn!(path, error = %error, "texture_load_failed");
                None
            }
        };
        self.by_path.insert(path.to_string(), loaded);
        loaded
    }

    /// Registers an already decoded texture under `path`, replacing any
    /// earlier cache entry for it.
    pub fn insert(&mut self, path: &str, texture: Texture) -> TextureId {
        let id = self.push(texture);
        self.by_path.insert(path.to_string(), Some(id));
        id
    }

    pub fn get(&self, id: TextureId) -> Option<&Texture> {
        self.textures.get(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    pub fn clear(&mut self) {
        self.textures.clear();
        self.by_path.clear();
    }

    fn push(&mut self, texture: Texture) -> TextureId {
        let id = TextureId(self.textures.len() as u32);
        self.textures.push(texture);
        id
    }
}

fn read_texture(asset_root: &Path, path: &str) -> Result<Texture, TextureLoadError> {
    validate_asset_path(path).map_err(|source| TextureLoadError::InvalidPath {
        path: path.to_string(),
        source,
    })?;
    let full_path = asset_root.join(path);
    let reader = ImageReader::open(&full_path).map_err(|source| TextureLoadError::Open {
        path: full_path.clone(),
        source,
    })?;
    let reader = reader
        .with_guessed_format()
        .map_err(|source| TextureLoadError::Open {
            path: full_path.clone(),
            source,
        })?;
    let decoded = reader.decode().map_err(|source| TextureLoadError::Decode {
        path: full_path.clone(),
        source,
    })?;
    let image = decoded.to_rgba8();
    Ok(Texture {
        width: image.width(),
        height: image.height(),
        rgba: image.into_raw(),
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use image::{Rgba, RgbaImage};
    use tempfile::TempDir;

    use super::*;

    fn write_image(root: &Path, relative: &str, width: u32, height: u32) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().expect("parent")).expect("create dirs");
        let image = RgbaImage::from_pixel(width, height, Rgba([200, 10, 10, 255]));
        image.save(&path).expect("write image");
    }

    #[test]
    fn loads_bmp_and_png_as_rgba() {
        let dir = TempDir::new().expect("tempdir");
        write_image(dir.path(), "assets/a.bmp", 3, 2);
        write_image(dir.path(), "assets/b.png", 4, 4);
        let mut cache = TextureCache::new(dir.path());

        let bmp = cache.load("assets/a.bmp").expect("bmp");
        let png = cache.load("assets/b.png").expect("png");

        let bmp = cache.get(bmp).expect("bmp texture");
        assert_eq!((bmp.width, bmp.height), (3, 2));
        assert_eq!(bmp.rgba.len(), 3 * 2 * 4);
        assert!(bmp.is_drawable());
        assert_eq!(cache.get(png).expect("png texture").width, 4);
    }

    #[test]
    fn repeated_load_returns_same_handle_without_reading_storage() {
        let dir = TempDir::new().expect("tempdir");
        write_image(dir.path(), "assets/player.bmp", 2, 2);
        let mut cache = TextureCache::new(dir.path());

        let first = cache.load("assets/player.bmp").expect("first load");
        fs::remove_file(dir.path().join("assets/player.bmp")).expect("remove");
        let second = cache.load("assets/player.bmp").expect("cached load");

        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn missing_file_yields_no_handle_and_is_not_retried() {
        let dir = TempDir::new().expect("tempdir");
        let mut cache = TextureCache::new(dir.path());

        assert_eq!(cache.load("assets/missing.bmp"), None);
        write_image(dir.path(), "assets/missing.bmp", 2, 2);
        assert_eq!(cache.load("assets/missing.bmp"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn undecodable_file_yields_no_handle() {
        let dir = TempDir::new().expect("tempdir");
        fs::create_dir_all(dir.path().join("assets")).expect("dirs");
        fs::write(dir.path().join("assets/garbage.bmp"), b"not an image").expect("write");
        let mut cache = TextureCache::new(dir.path());

        assert_eq!(cache.load("assets/garbage.bmp"), None);
    }

    #[test]
    fn invalid_path_is_rejected_before_touching_storage() {
        let error = read_texture(Path::new("."), "../outside.bmp").expect_err("invalid");
        assert!(matches!(
            error,
            TextureLoadError::InvalidPath {
                source: AssetPathError::ParentTraversal,
                ..
            }
        ));
    }

    #[test]
    fn inserted_textures_alias_by_path() {
        let mut cache = TextureCache::new(".");
        let texture = Texture {
            width: 1,
            height: 1,
            rgba: vec![1, 2, 3, 255],
        };
        let inserted = cache.insert("assets/shared.bmp", texture);
        assert_eq!(cache.load("assets/shared.bmp"), Some(inserted));

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.get(inserted), None);
    }
}
