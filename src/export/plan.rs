//! Per-run export planning.
//!
//! A plan is built once per run per qualifying playlist and thrown away
//! when the run finishes; nothing here is persisted.

use crate::paths::{self, PathResolver};
use crate::settings::Settings;
use std::collections::HashMap;
use std::path::PathBuf;

/// Everything needed to write one playlist's `.m3u8` file.
#[derive(Debug, Clone)]
pub struct ExportPlan {
    /// Fully-qualified playlist name, kept for diagnostics.
    pub playlist_name: String,

    /// Resolved absolute output directory, created on demand at write time.
    pub export_dir: PathBuf,

    /// Resolved absolute relative-root; `None` means absolute-path mode.
    pub relative_root: Option<String>,

    /// `sanitize(leaf(name)) + ".m3u8"`.
    pub file_name: String,

    /// Track paths captured from the source at plan-build time, in
    /// host-defined order.
    pub tracks: Vec<String>,
}

/// Builds export plans from settings plus a per-run source snapshot.
pub struct ExportPlanner<'a> {
    resolver: &'a PathResolver,
}

impl<'a> ExportPlanner<'a> {
    pub fn new(resolver: &'a PathResolver) -> Self {
        Self { resolver }
    }

    /// One plan per enabled playlist present in the snapshot, in settings
    /// order. An empty snapshot or an empty playlist configuration yields
    /// no plans, making the run a no-op.
    pub fn build(
        &self,
        settings: &Settings,
        snapshot: &HashMap<String, Vec<String>>,
    ) -> Vec<ExportPlan> {
        let mut plans = Vec::new();

        for pl in &settings.playlists {
            if !pl.enabled {
                continue;
            }
            let Some(tracks) = snapshot.get(&pl.name) else {
                log::debug!("Playlist '{}' not reported by the source, skipping", pl.name);
                continue;
            };

            let export_raw = if pl.custom_export_path.trim().is_empty() {
                &settings.default_export_path
            } else {
                &pl.custom_export_path
            };
            let export_dir = PathBuf::from(self.resolver.resolve_base(export_raw));

            let relative_root = if pl.custom_root_path.trim().is_empty() {
                None
            } else {
                Some(self.resolver.resolve_base(&pl.custom_root_path))
            };

            let file_name = format!(
                "{}.m3u8",
                paths::sanitize_filename(paths::leaf_name(&pl.name))
            );

            plans.push(ExportPlan {
                playlist_name: pl.name.clone(),
                export_dir,
                relative_root,
                file_name,
                tracks: tracks.clone(),
            });
        }

        plans
    }
}
