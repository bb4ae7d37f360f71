//! `.m3u8` serialization.
//!
//! Extended M3U, UTF-8, one `#EXTM3U` header line followed by one path per
//! line. No `#EXTINF` metadata. The target file is truncated on every run.

use super::plan::ExportPlan;
use crate::paths::{self, RelativeMode};
use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// Write one plan's track list to `export_dir/file_name`, creating the
/// directory on demand. Returns the path of the written file.
pub fn write_m3u8(plan: &ExportPlan, mode: RelativeMode) -> Result<PathBuf> {
    fs::create_dir_all(&plan.export_dir)
        .with_context(|| format!("Failed to create export directory {:?}", plan.export_dir))?;

    let path = plan.export_dir.join(&plan.file_name);
    let file = File::create(&path)
        .with_context(|| format!("Failed to create playlist file {:?}", path))?;
    let mut out = BufWriter::new(file);

    writeln!(out, "#EXTM3U")?;
    for track in &plan.tracks {
        match &plan.relative_root {
            Some(root) => writeln!(out, "{}", paths::relative_to(mode, root, track))?,
            None => writeln!(out, "{track}")?,
        }
    }
    out.flush()
        .with_context(|| format!("Failed to write playlist file {:?}", path))?;

    Ok(path)
}
