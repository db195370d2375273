//! Recording output device directory

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use tracing::debug;
use usbprint_manager::{DeviceKey, OutputDeviceDirectory};

/// A change made to the directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryChange {
    Added { key: DeviceKey, name: String },
    Removed { key: DeviceKey },
}

#[derive(Debug, Default)]
struct Inner {
    changes: Vec<DirectoryChange>,
    published: BTreeMap<DeviceKey, String>,
}

/// Output device directory that remembers what it was told
///
/// Clones share state, so a test can keep one handle and give the other to
/// the manager.
#[derive(Debug, Clone, Default)]
pub struct RecordingDirectory {
    inner: Arc<Mutex<Inner>>,
}

impl RecordingDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every change in the order it was made
    pub fn changes(&self) -> Vec<DirectoryChange> {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .changes
            .clone()
    }

    /// Devices currently listed, with their display names
    pub fn published(&self) -> BTreeMap<DeviceKey, String> {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .published
            .clone()
    }
}

impl OutputDeviceDirectory for RecordingDirectory {
    fn add_output_device(&mut self, key: &DeviceKey, name: &str) {
        debug!("Directory: add {} as '{}'", key, name);
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.published.insert(key.clone(), name.to_string());
        inner.changes.push(DirectoryChange::Added {
            key: key.clone(),
            name: name.to_string(),
        });
    }

    fn remove_output_device(&mut self, key: &DeviceKey) {
        debug!("Directory: remove {}", key);
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.published.remove(key);
        inner
            .changes
            .push(DirectoryChange::Removed { key: key.clone() });
    }
}
