//! JSON snapshot implementation of [`PlaylistSource`].
//!
//! The CLI has no live host to talk to, so it consumes a snapshot document
//! describing the library's playlists:
//!
//! ```json
//! {
//!   "playlists": [
//!     { "name": "Favorites\\Top", "kind": "static",
//!       "tracks": ["C:\\Music\\Rock\\song.mp3"] }
//!   ]
//! }
//! ```
//!
//! The same type doubles as the deterministic source used by tests.

use super::{PlaylistInfo, PlaylistKind, PlaylistSource};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
struct SnapshotDoc {
    #[serde(default)]
    playlists: Vec<SnapshotPlaylist>,
}

#[derive(Debug, Deserialize)]
struct SnapshotPlaylist {
    name: String,
    #[serde(default)]
    kind: PlaylistKind,
    #[serde(default)]
    tracks: Vec<String>,
}

/// In-memory playlist listing backed by a JSON snapshot document.
#[derive(Debug, Default)]
pub struct SnapshotSource {
    playlists: Vec<SnapshotPlaylist>,
}

impl SnapshotSource {
    /// Empty source reporting no playlists.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a snapshot document from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read library snapshot {:?}", path))?;
        Self::from_json(&text)
    }

    /// Parse a snapshot document from a JSON string.
    pub fn from_json(text: &str) -> Result<Self> {
        let doc: SnapshotDoc =
            serde_json::from_str(text).context("Failed to parse library snapshot")?;
        Ok(Self {
            playlists: doc.playlists,
        })
    }

    /// Add a playlist, preserving insertion order. Test/builder surface.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        kind: PlaylistKind,
        tracks: Vec<String>,
    ) -> &mut Self {
        self.playlists.push(SnapshotPlaylist {
            name: name.into(),
            kind,
            tracks,
        });
        self
    }
}

impl PlaylistSource for SnapshotSource {
    fn list_playlists(&self) -> Result<Vec<PlaylistInfo>> {
        Ok(self
            .playlists
            .iter()
            .enumerate()
            .map(|(i, pl)| PlaylistInfo {
                name: pl.name.clone(),
                id: i.to_string(),
                kind: pl.kind,
            })
            .collect())
    }

    fn track_paths(&self, id: &str) -> Result<Vec<String>> {
        let index: usize = id
            .parse()
            .with_context(|| format!("Unknown playlist identifier {id:?}"))?;
        let pl = self
            .playlists
            .get(index)
            .with_context(|| format!("Unknown playlist identifier {id:?}"))?;
        Ok(pl.tracks.clone())
    }
}
