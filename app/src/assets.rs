use crate::error::Result;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Probe order for route photos. The first existing file wins.
pub const EXTENSIONS: [&str; 8] = [
    ".jpg", ".jpeg", ".png", ".gif", ".JPG", ".JPEG", ".PNG", ".GIF",
];

#[derive(Debug, Clone)]
pub struct AssetResolver {
    dir: PathBuf,
}

impl AssetResolver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn ensure_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        Ok(())
    }

    /// Returns the photo for `route`, if any.
    ///
    /// A missing candidate moves on to the next extension. Any other I/O
    /// failure (permission denied and the like) is returned as an error.
    pub fn resolve(&self, route: &str) -> Result<Option<PathBuf>> {
        if !is_safe_route_id(route) {
            debug!("Refusing to probe assets for route id {:?}", route);
            return Ok(None);
        }

        for ext in EXTENSIONS {
            let path = self.dir.join(format!("{route}{ext}"));
            match std::fs::metadata(&path) {
                Ok(meta) if meta.is_file() => return Ok(Some(path)),
                Ok(_) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => {
                    warn!("Failed to probe {}: {}", path.display(), e);
                    return Err(e.into());
                }
            }
        }

        Ok(None)
    }
}

fn is_safe_route_id(route: &str) -> bool {
    !route.is_empty()
        && route
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
