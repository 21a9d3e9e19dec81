//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use stickerpad_render::RenderConfig;
use thiserror::Error;

/// Environment variable naming an optional JSON config file.
pub const CONFIG_ENV: &str = "STICKERPAD_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Application configuration. Every field is optional in the JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub title: String,
    /// Edge length of the square drawing surface, in surface pixels.
    pub canvas_size: u32,
    pub export_scale: f64,
    /// Edge length of the exported PNG.
    pub export_size: u32,
    pub thin_width: f64,
    pub thick_width: f64,
    pub stickers: Vec<String>,
    pub sticker_size: f64,
    /// Extra font files for sticker glyphs.
    pub font_files: Vec<PathBuf>,
    pub emoji_families: Option<Vec<String>>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Stickerpad".to_string(),
            canvas_size: 256,
            export_scale: 4.0,
            export_size: 1024,
            thin_width: 2.0,
            thick_width: 6.0,
            stickers: ["⭐", "🌮", "🎉"].iter().map(|s| s.to_string()).collect(),
            sticker_size: 32.0,
            font_files: Vec::new(),
            emoji_families: None,
        }
    }
}

impl AppConfig {
    pub fn from_json(json: &str, path: &Path) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json, path)
    }

    /// Load from the file named by `STICKERPAD_CONFIG`, or defaults.
    pub fn load() -> Self {
        let Some(path) = std::env::var_os(CONFIG_ENV) else {
            return Self::default();
        };
        match Self::from_file(Path::new(&path)) {
            Ok(config) => {
                log::info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                log::warn!("{e}; using defaults");
                Self::default()
            }
        }
    }

    pub fn render_config(&self) -> RenderConfig {
        let mut config = RenderConfig {
            extra_font_files: self.font_files.clone(),
            ..RenderConfig::default()
        };
        if let Some(families) = &self.emoji_families {
            config.preferred_families = families.clone();
        }
        config
    }
}
