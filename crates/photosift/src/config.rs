use crate::error::{PhotosiftError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use xdg::BaseDirectories;

const DEFAULT_LOG_FILE: &str = "./photosift.log";

/// Runtime settings shared by both modes.
///
/// Values come from a TOML file when one is found, then environment
/// overrides are applied. CLI flags are applied by the binary on top.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Run log, truncated at the start of every invocation
    pub log_file: PathBuf,
    /// Directory names pruned from every walk (NAS thumbnail/metadata folders)
    pub vendor_dirs: Vec<String>,
    /// Lowercase extensions considered photos or videos; empty disables filtering
    pub extensions: Vec<String>,
    /// Descend into symlinked directories; symlinks are still never yielded as files
    pub follow_symlinks: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            vendor_dirs: vec!["@eaDir".to_string()],
            extensions: [
                "jpg", "jpeg", "png", "heic", "heif", "tif", "tiff", "gif", "webp", "dng", "cr2",
                "nef", "arw", "mp4", "mov", "m4v", "avi", "3gp", "mts",
            ]
            .iter()
            .map(|e| e.to_string())
            .collect(),
            follow_symlinks: false,
        }
    }
}

impl Config {
    /// Loads configuration from `config_override`, `$PHOTOSIFT_CONFIG` or the
    /// XDG config directory, falling back to defaults when none exists.
    pub fn new(config_override: Option<PathBuf>) -> Result<Self> {
        let config_path = if let Some(path) = config_override {
            if !path.exists() {
                return Err(PhotosiftError::FileNotFound(path));
            }
            Some(path)
        } else if let Ok(env_path) = std::env::var("PHOTOSIFT_CONFIG") {
            Some(PathBuf::from(env_path))
        } else {
            BaseDirectories::with_prefix("photosift")
                .ok()
                .and_then(|xdg| xdg.find_config_file("photosift.toml"))
        };

        let mut config = match config_path {
            Some(path) => Self::load_from_file(&path)?,
            None => Self::default(),
        };

        if let Ok(log_path) = std::env::var("PHOTOSIFT_LOG") {
            config.log_file = PathBuf::from(log_path);
        }

        Ok(config)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(&path).map_err(|e| {
            PhotosiftError::Config(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        let mut config: Config = toml::from_str(&contents)?;
        config.normalize();
        Ok(config)
    }

    fn normalize(&mut self) {
        for ext in &mut self.extensions {
            *ext = ext.trim_start_matches('.').to_lowercase();
        }
    }
}
