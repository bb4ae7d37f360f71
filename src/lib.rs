//! Playlist Backup - media-library playlist snapshotter
//!
//! This library periodically exports named playlists from a media-library
//! host into portable `.m3u8` files, optionally rewriting each entry's
//! absolute file path relative to a configurable root so the export stays
//! valid when the collection moves to another machine.

pub mod export;
pub mod paths;
pub mod scheduler;
pub mod settings;
pub mod source;
pub mod validate;

pub use export::{BackupOrchestrator, BackupTrigger, RunReport};
pub use paths::{PathResolver, RelativeMode};
pub use scheduler::Scheduler;
pub use settings::{PlaylistSetting, Settings, SettingsHandle};
pub use source::{PlaylistInfo, PlaylistKind, PlaylistSource, SnapshotSource};
pub use validate::{ConfigValidator, ValidationPolicy};
