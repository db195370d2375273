//! Application settings

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use usbprint_manager::ManagerConfig;

/// Application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Device manager configuration
    pub manager: ManagerConfig,
    /// Directory holding firmware images
    pub firmware_dir: PathBuf,
    /// Root the POSIX device patterns are resolved against
    pub device_root: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            manager: ManagerConfig::default(),
            firmware_dir: Self::config_dir()
                .map(|p| p.join("firmware"))
                .unwrap_or_else(|| PathBuf::from("firmware")),
            device_root: PathBuf::from("/"),
        }
    }
}

impl Settings {
    /// Get the XDG config directory for usbprint
    /// Uses $XDG_CONFIG_HOME/usbprint on Linux/macOS, falls back to ~/.config/usbprint
    fn config_dir() -> Option<PathBuf> {
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_config);
            if path.is_absolute() {
                return Some(path.join("usbprint"));
            }
        }

        dirs::home_dir().map(|h| h.join(".config").join("usbprint"))
    }

    /// Get the settings file path
    pub fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("settings.json"))
    }

    /// Load settings from disk, falling back to defaults
    pub fn load() -> Self {
        Self::settings_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    /// Load settings from a file, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default()
    }

    /// Save settings to disk
    pub fn save(&self) -> Result<PathBuf, String> {
        let path =
            Self::settings_path().ok_or_else(|| "Could not determine settings path".to_string())?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save settings to a file
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create settings directory: {}", e))?;
        }

        let json = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize settings: {}", e))?;

        std::fs::write(path, json).map_err(|e| format!("Failed to write settings: {}", e))?;

        Ok(())
    }
}
