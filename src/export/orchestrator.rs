//! Top-level backup run.
//!
//! `perform_backup` is the only entry point into the export engine; the
//! interval timer, the shutdown hook, and a manual invocation all funnel
//! through it. A run guard serializes overlapping triggers so two runs can
//! never write the same files concurrently.

use super::plan::ExportPlanner;
use super::writer;
use crate::paths::PathResolver;
use crate::settings::SettingsHandle;
use crate::source::PlaylistSource;
use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;

/// What caused a backup run. Diagnostic metadata only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackupTrigger {
    Interval,
    Shutdown,
    Manual,
}

impl fmt::Display for BackupTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BackupTrigger::Interval => "Interval",
            BackupTrigger::Shutdown => "Shutdown",
            BackupTrigger::Manual => "Manual",
        };
        f.write_str(label)
    }
}

/// Outcome of one run. A run with skipped plans is still an overall
/// success; the worst case is fewer files than expected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Playlists whose `.m3u8` file was written.
    pub written: usize,

    /// Plans abandoned because of an I/O failure.
    pub skipped: usize,
}

/// Ties settings, the playlist source, and the writers together for one
/// run across all enabled playlists.
pub struct BackupOrchestrator<S: PlaylistSource> {
    settings: SettingsHandle,
    source: S,
    resolver: PathResolver,
    run_guard: Mutex<()>,
}

impl<S: PlaylistSource> BackupOrchestrator<S> {
    pub fn new(settings: SettingsHandle, source: S, resolver: PathResolver) -> Self {
        Self {
            settings,
            source,
            resolver,
            run_guard: Mutex::new(()),
        }
    }

    /// Shared settings value, also read by the scheduler.
    pub fn settings(&self) -> &SettingsHandle {
        &self.settings
    }

    /// Export every enabled playlist the source currently reports.
    ///
    /// The source is queried once at the start so mid-run host-side
    /// changes cannot produce a partially-inconsistent export. Nothing
    /// here is fatal: per-playlist failures are logged and skipped, and a
    /// later trigger simply blocks until the current run finishes.
    pub fn perform_backup(&self, trigger: BackupTrigger) -> RunReport {
        let _guard = self.run_guard.lock().unwrap_or_else(|e| e.into_inner());

        let settings = self.settings.current();
        let mut report = RunReport::default();
        if settings.playlists.is_empty() {
            log::debug!("No playlists configured, nothing to back up");
            return report;
        }

        log::info!("Starting playlist backup (trigger: {trigger})");

        let listing = match self.source.list_playlists() {
            Ok(listing) => listing,
            Err(e) => {
                log::warn!("Could not enumerate playlists: {e:#}");
                return report;
            }
        };

        // First occurrence wins when the host reports duplicate names.
        let mut by_name: HashMap<&str, &str> = HashMap::new();
        for info in &listing {
            by_name.entry(info.name.as_str()).or_insert(info.id.as_str());
        }

        let mut snapshot: HashMap<String, Vec<String>> = HashMap::new();
        for pl in &settings.playlists {
            if !pl.enabled || snapshot.contains_key(&pl.name) {
                continue;
            }
            let Some(id) = by_name.get(pl.name.as_str()) else {
                continue;
            };
            match self.source.track_paths(id) {
                Ok(tracks) => {
                    snapshot.insert(pl.name.clone(), tracks);
                }
                Err(e) => {
                    log::warn!("Could not query tracks of '{}': {e:#}", pl.name);
                }
            }
        }

        let plans = ExportPlanner::new(&self.resolver).build(&settings, &snapshot);
        for plan in &plans {
            match writer::write_m3u8(plan, settings.relative_mode) {
                Ok(path) => {
                    log::debug!("Wrote {:?} ({} tracks)", path, plan.tracks.len());
                    report.written += 1;
                }
                Err(e) => {
                    log::warn!("Skipping playlist '{}': {e:#}", plan.playlist_name);
                    report.skipped += 1;
                }
            }
        }

        log::info!(
            "Backup finished: {} written, {} skipped",
            report.written,
            report.skipped
        );
        report
    }
}
