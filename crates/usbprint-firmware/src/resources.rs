//! Firmware resource storage

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::FirmwareError;

/// Resolves a firmware image name to a file on disk
pub trait ResourceResolver: Send + Sync {
    /// Get the absolute path of a firmware image
    ///
    /// Fails with [`FirmwareError::ResourceNotFound`] if the image is absent.
    fn resolve(&self, file_name: &str) -> Result<PathBuf, FirmwareError>;
}

/// Firmware images stored in a single directory
#[derive(Debug, Clone)]
pub struct FirmwareStorage {
    root: PathBuf,
}

impl FirmwareStorage {
    /// Create storage rooted at a directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Get the storage directory
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ResourceResolver for FirmwareStorage {
    fn resolve(&self, file_name: &str) -> Result<PathBuf, FirmwareError> {
        let path = self.root.join(file_name);
        if path.is_file() {
            debug!("Resolved firmware {} to {}", file_name, path.display());
            Ok(path)
        } else {
            Err(FirmwareError::ResourceNotFound {
                name: file_name.to_string(),
                root: self.root.clone(),
            })
        }
    }
}
