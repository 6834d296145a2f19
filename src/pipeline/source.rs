//! Where raster objects come from

use log::debug;
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::errors::{ClimateError, ClimateResult};

/// Copies a stored object to a local path
pub trait ObjectSource {
    fn fetch(&self, bucket: &str, key: &str, dest: &Path) -> ClimateResult<()>;

    fn name(&self) -> &str;
}

/// Objects laid out as `<root>/<bucket>/<key>` on the local filesystem
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    pub fn new(root: &Path) -> Self {
        LocalObjectStore { root: root.to_path_buf() }
    }

    /// Resolves an object to its path, refusing keys that climb out of the bucket
    pub fn resolve(&self, bucket: &str, key: &str) -> ClimateResult<PathBuf> {
        let relative = Path::new(key.trim_start_matches('/'));
        let escapes = Path::new(bucket)
            .components()
            .chain(relative.components())
            .any(|c| !matches!(c, Component::Normal(_)));
        if escapes || bucket.is_empty() || key.is_empty() {
            return Err(ClimateError::Trigger(format!("Invalid object reference {}/{}", bucket, key)));
        }
        Ok(self.root.join(bucket).join(relative))
    }
}

impl ObjectSource for LocalObjectStore {
    fn fetch(&self, bucket: &str, key: &str, dest: &Path) -> ClimateResult<()> {
        let src = self.resolve(bucket, key)?;
        let bytes = fs::copy(&src, dest)?;
        debug!("Fetched {} ({} bytes) to {}", src.display(), bytes, dest.display());
        Ok(())
    }

    fn name(&self) -> &str {
        "local"
    }
}
