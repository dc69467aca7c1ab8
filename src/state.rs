//! Saved widget state.
//!
//! One TOML record per installation: a generic host envelope (terminal size,
//! saved-at stamp) with the happiness value appended. Restoring a record of
//! the wrong shape or version is a typed error for the caller to handle, not
//! a crash.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Version written into every record and required back on restore.
pub const STATE_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("failed to read state file {}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write state file {}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("state file is not valid TOML: {0}")]
    Malformed(#[from] toml::de::Error),
    #[error("failed to encode state: {0}")]
    Encode(#[from] toml::ser::Error),
    #[error("unsupported state version {found} (expected {expected})", expected = STATE_VERSION)]
    Version { found: u32 },
}

/// Host-side snapshot saved alongside the widget value.
///
/// Informational on restore; the live terminal's own size wins.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HostEnvelope {
    pub cols: u16,
    pub rows: u16,
    pub saved_at: Option<String>,
}

/// The persisted record: envelope first, then the happiness float.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedState {
    pub version: u32,
    pub envelope: HostEnvelope,
    pub happiness: f32,
}

impl SavedState {
    /// Snapshot the current widget value together with the host envelope.
    pub fn capture(cols: u16, rows: u16, happiness: f32) -> Self {
        Self {
            version: STATE_VERSION,
            envelope: HostEnvelope {
                cols,
                rows,
                saved_at: Some(Utc::now().to_rfc3339()),
            },
            happiness,
        }
    }

    /// Save the record to disk, creating the parent directory if needed.
    pub fn save(&self, path: &Path) -> Result<(), StateError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| StateError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        }

        let toml_string = toml::to_string_pretty(self)?;
        fs::write(path, toml_string).map_err(|source| StateError::Write {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::info!("Widget state saved to {:?}", path);
        Ok(())
    }

    /// Load a record from disk.
    ///
    /// A missing file means "start fresh" and is not an error; a file that
    /// fails to parse or carries an unknown version is.
    pub fn load(path: &Path) -> Result<Option<Self>, StateError> {
        if !path.exists() {
            tracing::debug!("No widget state file at {:?}, starting fresh", path);
            return Ok(None);
        }

        let content = fs::read_to_string(path).map_err(|source| StateError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let state: SavedState = toml::from_str(&content)?;

        if state.version != STATE_VERSION {
            return Err(StateError::Version {
                found: state.version,
            });
        }

        tracing::info!("Widget state loaded from {:?}", path);
        Ok(Some(state))
    }
}
