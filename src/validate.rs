//! Pre-save validation of configured relative roots.
//!
//! A relative root only pays off when the playlist's tracks actually live
//! under it; otherwise every line falls back to the absolute path at run
//! time. Before a configuration is saved, each enabled playlist with a
//! root is checked against the first real track the source reports for
//! it, the same sample the host-side editor uses.

use crate::paths::{self, PathResolver};
use crate::settings::Settings;
use crate::source::PlaylistSource;
use anyhow::{bail, Result};
use std::collections::HashMap;
use std::fmt;

/// What to do when a root does not match the playlist's real files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationPolicy {
    /// Refuse the configuration until the mismatch is resolved.
    Block,

    /// Surface a warning and proceed; the playlist will export absolute
    /// paths at run time.
    #[default]
    Warn,
}

/// One configured root that does not cover its playlist's files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootMismatch {
    pub playlist: String,
    pub root: String,
    pub sample_track: String,
}

impl fmt::Display for RootMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Root '{}' of playlist '{}' does not cover its files (sample: {})",
            self.root, self.playlist, self.sample_track
        )
    }
}

/// Checks configured relative roots against real track paths.
pub struct ConfigValidator<'a> {
    resolver: &'a PathResolver,
}

impl<'a> ConfigValidator<'a> {
    pub fn new(resolver: &'a PathResolver) -> Self {
        Self { resolver }
    }

    /// Collect every mismatch between an enabled playlist's root and the
    /// first track the source reports for it. Playlists the source does
    /// not know, or whose membership cannot be read, are skipped; a
    /// mismatch can only be established against a real sample.
    pub fn check<S: PlaylistSource>(&self, settings: &Settings, source: &S) -> Vec<RootMismatch> {
        let listing = match source.list_playlists() {
            Ok(listing) => listing,
            Err(e) => {
                log::warn!("Could not enumerate playlists for validation: {e:#}");
                return Vec::new();
            }
        };
        let mut by_name: HashMap<&str, &str> = HashMap::new();
        for info in &listing {
            by_name.entry(info.name.as_str()).or_insert(info.id.as_str());
        }

        let mut mismatches = Vec::new();
        for pl in &settings.playlists {
            if !pl.enabled || pl.custom_root_path.trim().is_empty() {
                continue;
            }
            let Some(id) = by_name.get(pl.name.as_str()) else {
                continue;
            };
            let sample = match source.track_paths(id) {
                Ok(tracks) => tracks.into_iter().next(),
                Err(e) => {
                    log::warn!("Could not sample tracks of '{}': {e:#}", pl.name);
                    None
                }
            };
            let Some(sample) = sample else { continue };

            let root = self.resolver.resolve_base(&pl.custom_root_path);
            if !paths::is_descendant(&root, &sample) {
                mismatches.push(RootMismatch {
                    playlist: pl.name.clone(),
                    root: pl.custom_root_path.clone(),
                    sample_track: sample,
                });
            }
        }
        mismatches
    }
}

/// Apply a policy to collected mismatches: warn-and-proceed, or refuse.
pub fn apply_policy(policy: ValidationPolicy, mismatches: &[RootMismatch]) -> Result<()> {
    if mismatches.is_empty() {
        return Ok(());
    }
    match policy {
        ValidationPolicy::Warn => {
            for m in mismatches {
                log::warn!("{m}");
            }
            Ok(())
        }
        ValidationPolicy::Block => {
            bail!("{} relative root(s) do not match their playlists", mismatches.len())
        }
    }
}
