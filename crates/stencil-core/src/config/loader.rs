//! Configuration file discovery and loading

use super::stencil_config::StencilConfiguration;
use crate::{Result, StencilError};
use std::path::{Path, PathBuf};

/// File names searched in each directory, highest priority first
pub const CONFIG_FILE_NAMES: &[&str] = &[
    ".stencilrc.json",
    ".stencilrc.toml",
    "stencil.yaml",
    "stencil.yml",
    "stencil.json",
];

/// Configuration loader for discovering and loading config files
pub struct ConfigLoader;

impl ConfigLoader {
    /// Auto-discover config file by traversing upward from start_path
    ///
    /// Checks [`CONFIG_FILE_NAMES`] in order in each directory, moving up
    /// the tree until a config is found or the filesystem root is reached.
    pub fn auto_discover(start_path: &Path) -> Result<Option<PathBuf>> {
        let mut current = start_path
            .canonicalize()
            .map_err(|e| StencilError::config_error(format!("Invalid path: {e}")))?;

        loop {
            for filename in CONFIG_FILE_NAMES {
                let config_path = current.join(filename);
                if config_path.is_file() {
                    tracing::debug!("Found config: {}", config_path.display());
                    return Ok(Some(config_path));
                }
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => break,
            }
        }

        Ok(None)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<StencilConfiguration> {
        StencilConfiguration::load(path).map_err(|e| {
            StencilError::config_error(format!(
                "Failed to load config from '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Load config from path or auto-discover
    ///
    /// An explicit path must exist. Without one, discovery starts at
    /// `start_dir` (or the current directory) and falls back to defaults
    /// when nothing is found.
    pub fn load(
        custom_path: Option<&Path>,
        start_dir: Option<&Path>,
    ) -> Result<StencilConfiguration> {
        if let Some(path) = custom_path {
            if !path.exists() {
                return Err(StencilError::config_error(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            return Self::load_from_file(path);
        }

        let search_dir = start_dir.unwrap_or_else(|| Path::new("."));
        match Self::auto_discover(search_dir)? {
            Some(config_path) => Self::load_from_file(&config_path),
            None => {
                tracing::debug!("No config file found, using defaults");
                Ok(StencilConfiguration::default())
            }
        }
    }
}
