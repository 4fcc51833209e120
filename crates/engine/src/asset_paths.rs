use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetPathError {
    #[error("asset path must not be empty")]
    Empty,
    #[error("asset path must be relative to the project root")]
    Absolute,
    #[error("asset path must use '/' separators, found '\\\\'")]
    Backslash,
    #[error("asset path must not contain a '..' segment")]
    ParentTraversal,
    #[error("asset path has an empty segment")]
    EmptySegment,
}

/// Texture paths in scene definitions are project-relative and use forward
/// slashes on every platform.
pub(crate) fn validate_asset_path(path: &str) -> Result<(), AssetPathError> {
    if path.is_empty() {
        return Err(AssetPathError::Empty);
    }
    if path.starts_with('/') || path.contains(':') {
        return Err(AssetPathError::Absolute);
    }
    if path.contains('\\') {
        return Err(AssetPathError::Backslash);
    }
    for segment in path.split('/') {
        match segment {
            "" => return Err(AssetPathError::EmptySegment),
            ".." => return Err(AssetPathError::ParentTraversal),
            _ => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_project_relative_paths() {
        for path in [
            "assets/sprites/Player/Left_Idle.bmp",
            "assets/npc.png",
            "a/./b.bmp",
        ] {
            assert!(validate_asset_path(path).is_ok(), "path={path}");
        }
    }

    #[test]
    fn rejects_invalid_paths() {
        assert_eq!(validate_asset_path(""), Err(AssetPathError::Empty));
        assert_eq!(validate_asset_path("/etc/x.bmp"), Err(AssetPathError::Absolute));
        assert_eq!(validate_asset_path("C:/x.bmp"), Err(AssetPathError::Absolute));
        assert_eq!(validate_asset_path(r"a\b.bmp"), Err(AssetPathError::Backslash));
        assert_eq!(
            validate_asset_path("assets/../secret.bmp"),
            Err(AssetPathError::ParentTraversal)
        );
        assert_eq!(validate_asset_path("assets//x.bmp"), Err(AssetPathError::EmptySegment));
    }
}
