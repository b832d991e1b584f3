//! Configuration service implementation.
//!
//! This module provides a ConfigService that loads the root configuration
//! from the configuration file (~/.config/walkmate/config.toml).

use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use walkmate_core::config::RootConfig;

/// Configuration service that loads and caches the root configuration.
///
/// The configuration is read from config.toml and cached to avoid repeated
/// file I/O. A missing or unreadable file yields the defaults.
#[derive(Debug, Clone)]
pub struct ConfigService {
    /// Cached configuration loaded from file.
    /// Uses RwLock for thread-safe lazy loading.
    config: Arc<RwLock<Option<RootConfig>>>,
    /// Path of the configuration file.
    path: Option<PathBuf>,
}

impl ConfigService {
    /// Creates a ConfigService reading from the default location.
    ///
    /// The configuration is loaded lazily on first access to avoid blocking
    /// during initialization.
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(None)),
            path: Self::default_config_path(),
        }
    }

    /// Creates a ConfigService reading from an explicit file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config: Arc::new(RwLock::new(None)),
            path: Some(path.into()),
        }
    }

    /// Gets the root configuration, loading from file if not cached.
    pub fn get_config(&self) -> RootConfig {
        // Check if already cached
        {
            let read_lock = self.config.read().unwrap();
            if let Some(ref cached) = *read_lock {
                return cached.clone();
            }
        }

        let loaded = self.load_config().unwrap_or_else(|e| {
            tracing::warn!(target: "config", "falling back to defaults: {}", e);
            RootConfig::default()
        });

        // Cache it
        {
            let mut write_lock = self.config.write().unwrap();
            *write_lock = Some(loaded.clone());
        }

        loaded
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut write_lock = self.config.write().unwrap();
        *write_lock = None;
    }

    /// Loads RootConfig from the configuration file.
    fn load_config(&self) -> Result<RootConfig, String> {
        let Some(ref path) = self.path else {
            return Err("no configuration directory available".to_string());
        };
        if !path.exists() {
            return Ok(RootConfig::default());
        }
        let raw = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;
        toml::from_str(&raw).map_err(|e| format!("failed to parse {}: {}", path.display(), e))
    }

    fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("walkmate").join("config.toml"))
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new()
    }
}
