// Copyright 2026 the Cae Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! User configuration.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An 8-bit sRGB color.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RgbColor(pub u8, pub u8, pub u8);

impl RgbColor {
    /// The color as normalized RGBA with full opacity, ready for a shader.
    pub fn to_rgba(self) -> [f32; 4] {
        let Self(r, g, b) = self;
        [
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            1.0,
        ]
    }
}

/// Rendering settings, read once at startup.
///
/// Missing fields take their default values, so a config file only needs to name
/// what it changes:
///
/// ```ron
/// (fonts: ["JetBrains Mono"], font_size: 18)
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Font candidates in order of preference: family names or font file paths.
    pub fonts: Vec<String>,
    /// Text color.
    pub foreground: RgbColor,
    /// Clear color.
    pub background: RgbColor,
    /// Width of a tab in spaces.
    pub tab_size: u32,
    /// Font size in pixels per em, also used as the line height.
    pub font_size: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fonts: vec![
                "Iosevka Term".to_owned(),
                "DejaVu Sans Mono".to_owned(),
                "monospace".to_owned(),
            ],
            foreground: RgbColor(255, 255, 255),
            background: RgbColor(30, 30, 30),
            tab_size: 2,
            font_size: 16,
        }
    }
}

/// Errors from loading a [`Config`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    #[error("could not read config file `{}`", .path.display())]
    Read {
        /// The config file.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The config file is not valid RON for a [`Config`].
    #[error("could not parse config file `{}`", .path.display())]
    Parse {
        /// The config file.
        path: PathBuf,
        /// The parser error, with position.
        #[source]
        source: ron::error::SpannedError,
    },
    /// The config parsed but cannot be used.
    #[error("invalid config: {0}")]
    Invalid(&'static str),
}

impl Config {
    /// The per-user config file, `<config dir>/cae/config.ron`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("cae").join("config.ron"))
    }

    /// Loads the per-user config file, or the defaults when there is none.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => {
                debug!("no config directory, using the default config");
                Ok(Self::default())
            }
        }
    }

    /// Loads `path`, or the defaults when it does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("{} not found, using the default config", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_owned(),
                    source,
                });
            }
        };
        let config: Self = ron::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })?;
        config.validate()?;
        debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Checks the values a renderer cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fonts.is_empty() {
            return Err(ConfigError::Invalid("at least one font is required"));
        }
        if self.font_size == 0 {
            return Err(ConfigError::Invalid("font_size must be positive"));
        }
        Ok(())
    }
}
