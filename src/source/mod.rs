//! Read-only view onto the host's playlists.
//!
//! The host media library is an external collaborator: the export engine
//! only ever enumerates playlists and asks for their member track paths.
//! Keeping this behind a trait lets tests substitute an in-memory double.

use anyhow::Result;
use serde::{Deserialize, Serialize};

mod snapshot;

pub use snapshot::SnapshotSource;

/// How the host computes a playlist's membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaylistKind {
    /// Fixed, host-stored membership list.
    #[default]
    Static,

    /// Membership computed by the host from rules at query time.
    Auto,
}

/// One playlist as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistInfo {
    /// Fully-qualified name, e.g. `Favorites\Top`. The matching key
    /// against configured playlists.
    pub name: String,

    /// Opaque host identifier used for membership queries.
    pub id: String,

    pub kind: PlaylistKind,
}

/// Narrow read-only query contract against the host media library.
pub trait PlaylistSource {
    /// Enumerate the playlists the host currently reports.
    fn list_playlists(&self) -> Result<Vec<PlaylistInfo>>;

    /// Absolute file paths of a playlist's members, in host-defined order.
    /// May be empty.
    fn track_paths(&self, id: &str) -> Result<Vec<String>>;
}
