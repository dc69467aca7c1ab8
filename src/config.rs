//! Configuration loader plus strongly typed settings structures.
//!
//! Deserializes the single `config.toml` we look for in the data directory
//! and exposes helpers for resolving that directory and the files inside it.
//! Every field has a default, so running without a config file is the normal
//! case rather than an error.

use anyhow::{Context, Result};
use ratatui::{style::Color, symbols::Marker};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub ui: UiConfig,
    pub persistence: PersistenceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Hex color used for the face outline, eyes, and mouth
    pub face_color: String,
    /// Canvas marker: "braille", "dot", or "block"
    pub marker: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            face_color: "#0000ff".to_string(),
            marker: "braille".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistenceConfig {
    /// Save the widget state on exit
    pub autosave: bool,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self { autosave: true }
    }
}

impl Config {
    /// Resolve the data directory: CLI flag, then the ABOUT_FACE_DIR
    /// environment variable, then ~/.about-face.
    pub fn base_dir(override_dir: Option<&Path>) -> Result<PathBuf> {
        if let Some(dir) = override_dir {
            return Ok(dir.to_path_buf());
        }

        if let Ok(custom_dir) = std::env::var("ABOUT_FACE_DIR") {
            return Ok(PathBuf::from(custom_dir));
        }

        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join(".about-face"))
    }

    pub fn config_path(base_dir: &Path) -> PathBuf {
        base_dir.join("config.toml")
    }

    pub fn state_path(base_dir: &Path) -> PathBuf {
        base_dir.join("state.toml")
    }

    /// Load the config file, falling back to defaults when it is absent.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config file at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;

        tracing::info!("Config loaded from {:?}", path);
        Ok(config)
    }

    pub fn face_color(&self) -> Color {
        hex_to_color(&self.ui.face_color).unwrap_or(Color::Blue)
    }

    pub fn marker(&self) -> Marker {
        match self.ui.marker.as_str() {
            "dot" => Marker::Dot,
            "block" => Marker::Block,
            _ => Marker::Braille,
        }
    }
}

/// Convert hex string to ratatui Color
pub fn hex_to_color(hex: &str) -> Option<Color> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

    Some(Color::Rgb(r, g, b))
}
