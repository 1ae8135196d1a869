//! Plugin configuration using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\local-tracks\config.toml
//! - macOS: ~/Library/Application Support/local-tracks/config.toml
//! - Linux: ~/.config/local-tracks/config.toml
//!
//! The config is owned by the plugin instance and passed explicitly to the
//! operations that need it; nothing here is process-global.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Local service configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServiceConfig {
    /// Library root paths. Scans walk the first entry.
    pub paths: Vec<PathBuf>,

    /// Whether the service has been activated by the user.
    pub active: bool,
}

impl ServiceConfig {
    /// The root path a scan will walk, if one is configured.
    pub fn scan_root(&self) -> Option<&Path> {
        self.paths.first().map(PathBuf::as_path)
    }
}

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("local-tracks"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from disk.
///
/// Returns a default config if the file doesn't exist or can't be parsed.
/// Logs warnings but doesn't fail - callers always get a usable config.
pub fn load() -> ServiceConfig {
    let Some(path) = config_path() else {
        tracing::warn!("Could not determine config directory, using defaults");
        return ServiceConfig::default();
    };
    load_from(&path)
}

/// Load configuration from an explicit path. See [`load`].
pub fn load_from(path: &Path) -> ServiceConfig {
    if !path.exists() {
        tracing::info!("No config file found at {:?}, using defaults", path);
        return ServiceConfig::default();
    }

    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => {
                tracing::info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::error!("Failed to parse config file {:?}: {}", path, e);
                ServiceConfig::default()
            }
        },
        Err(e) => {
            tracing::error!("Failed to read config file {:?}: {}", path, e);
            ServiceConfig::default()
        }
    }
}

/// Save configuration to disk.
///
/// Creates the config directory if it doesn't exist.
pub fn save(config: &ServiceConfig) -> Result<(), ConfigError> {
    let dir = config_dir().ok_or(ConfigError::NoConfigDir)?;
    save_to(config, &dir.join("config.toml"))
}

/// Save configuration to an explicit path. See [`save`].
pub fn save_to(config: &ServiceConfig, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::CreateDir(dir.to_path_buf(), e))?;
    }

    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    // Write atomically (write to temp, then rename)
    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, path)
        .map_err(|e| ConfigError::Rename(temp_path, path.to_path_buf(), e))?;

    tracing::info!("Saved config to {:?}", path);
    Ok(())
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to create config directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),

    #[error("Failed to write config to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_inactive() {
        let config = ServiceConfig::default();
        assert!(config.paths.is_empty());
        assert!(!config.active);
        assert!(config.scan_root().is_none());
    }

    #[test]
    fn test_config_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let config = ServiceConfig {
            paths: vec![PathBuf::from("/music"), PathBuf::from("/more-music")],
            active: true,
        };

        save_to(&config, &path).unwrap();
        let loaded = load_from(&path);

        assert_eq!(loaded, config);
        assert_eq!(loaded.scan_root(), Some(Path::new("/music")));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_from(&dir.path().join("nope.toml"));
        assert_eq!(loaded, ServiceConfig::default());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: ServiceConfig = toml::from_str("active = true").unwrap();
        assert!(config.active);
        assert!(config.paths.is_empty());
    }
}
