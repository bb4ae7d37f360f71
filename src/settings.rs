//! Persistent settings and the shared handle the scheduler reads from.
//!
//! Settings are stored as a single XML document next to the host's own
//! data, mirroring the field names the host-side editor writes. A missing
//! or unreadable file never fails startup: the loader falls back to
//! defaults and logs why.

use crate::paths::RelativeMode;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// UI language of the host-side editor. Round-tripped, never consulted by
/// the export engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "EN")]
    En,
    #[default]
    #[serde(rename = "CN")]
    Cn,
}

/// Per-playlist backup configuration, keyed by the host's fully-qualified
/// playlist name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct PlaylistSetting {
    pub name: String,

    /// Gate for inclusion in a run.
    pub enabled: bool,

    /// Output directory override; blank means use the default export path.
    pub custom_export_path: String,

    /// Relative root; blank means tracks are written with absolute paths.
    pub custom_root_path: String,
}

impl Default for PlaylistSetting {
    fn default() -> Self {
        Self {
            name: String::new(),
            enabled: false,
            custom_export_path: String::new(),
            custom_root_path: String::new(),
        }
    }
}

impl PlaylistSetting {
    /// Convenience constructor for a disabled entry with no overrides.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Process-wide backup settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename = "Settings", rename_all = "PascalCase")]
pub struct Settings {
    pub language: Language,
    pub use_skin_theme: bool,
    pub backup_on_shutdown: bool,
    pub enable_interval_backup: bool,
    pub interval_minutes: u32,
    pub default_export_path: String,
    pub relative_mode: RelativeMode,
    #[serde(rename = "Playlists")]
    pub playlists: Vec<PlaylistSetting>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            language: Language::default(),
            use_skin_theme: false,
            backup_on_shutdown: false,
            enable_interval_backup: false,
            interval_minutes: 1440,
            default_export_path: "./PlaylistsBackup".to_string(),
            relative_mode: RelativeMode::default(),
            playlists: Vec::new(),
        }
    }
}

/// Why a settings file could not be loaded. Every variant is recoverable
/// by substituting defaults.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings file not found: {0:?}")]
    NotFound(PathBuf),

    #[error("failed to read settings file")]
    Io(#[from] std::io::Error),

    #[error("failed to parse settings file")]
    Parse(#[from] quick_xml::DeError),
}

impl Settings {
    /// Load settings from an XML file.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            return Err(SettingsError::NotFound(path.to_path_buf()));
        }
        let text = fs::read_to_string(path)?;
        Ok(quick_xml::de::from_str(&text)?)
    }

    /// Load settings, substituting defaults when the file is missing or
    /// unreadable. Never fails.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(SettingsError::NotFound(_)) => {
                log::info!("No settings file at {:?}, using defaults", path);
                Self::default()
            }
            Err(e) => {
                log::warn!("Could not load settings from {:?}: {e}, using defaults", path);
                Self::default()
            }
        }
    }

    /// Persist settings as XML, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        let xml = quick_xml::se::to_string(self).context("Failed to serialize settings")?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create settings directory {:?}", parent))?;
            }
        }
        fs::write(path, xml)
            .with_context(|| format!("Failed to write settings file {:?}", path))?;
        Ok(())
    }

    /// Whether the interval timer should be armed for these settings.
    pub fn interval_armed(&self) -> bool {
        self.enable_interval_backup && self.interval_minutes > 0
    }
}

/// Shared settings value with copy-then-swap publication.
///
/// Readers (scheduler, orchestrator) take an `Arc` snapshot and work from
/// that; the configuration-save path publishes a whole replacement value,
/// so a running backup never observes a half-edited Settings.
#[derive(Debug, Clone)]
pub struct SettingsHandle {
    inner: Arc<RwLock<Arc<Settings>>>,
}

impl SettingsHandle {
    pub fn new(settings: Settings) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(settings))),
        }
    }

    /// Current settings snapshot.
    pub fn current(&self) -> Arc<Settings> {
        self.inner
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Publish a fully-formed replacement value.
    pub fn replace(&self, settings: Settings) {
        *self.inner.write().unwrap_or_else(|e| e.into_inner()) = Arc::new(settings);
    }
}
