use anyhow::{Context, Result};
use clap::Parser;
use playlist_backup::validate::{apply_policy, ConfigValidator, ValidationPolicy};
use playlist_backup::{
    BackupOrchestrator, BackupTrigger, PathResolver, Scheduler, Settings, SettingsHandle,
    SnapshotSource,
};
use std::path::Path;
use std::sync::{mpsc, Arc};

#[derive(Parser, Debug)]
#[command(name = "playlist-backup")]
#[command(about = "Snapshot media-library playlists into portable .m3u8 files", long_about = None)]
struct Args {
    /// Path to the settings file (XML)
    #[arg(short = 's', long, default_value = "settings.xml")]
    settings: String,

    /// Path to a library snapshot (JSON) listing playlists and tracks
    #[arg(short = 'l', long)]
    snapshot: String,

    /// Keep running and back up on the configured interval
    #[arg(long)]
    watch: bool,

    /// Validate configured relative roots against real track paths, then exit
    #[arg(long)]
    check: bool,

    /// With --check, fail on a root mismatch instead of warning
    #[arg(long)]
    strict: bool,

    /// Verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    // Expand ~ in paths
    let settings_path = shellexpand::tilde(&args.settings);
    let snapshot_path = shellexpand::tilde(&args.snapshot);

    let settings = Settings::load_or_default(Path::new(settings_path.as_ref()));
    let source = SnapshotSource::from_file(Path::new(snapshot_path.as_ref()))?;
    let resolver = PathResolver::new();

    if args.check {
        let mismatches = ConfigValidator::new(&resolver).check(&settings, &source);
        if mismatches.is_empty() {
            log::info!("All relative roots cover their playlists");
        }
        let policy = if args.strict {
            ValidationPolicy::Block
        } else {
            ValidationPolicy::Warn
        };
        apply_policy(policy, &mismatches)?;
        return Ok(());
    }

    let orchestrator = Arc::new(BackupOrchestrator::new(
        SettingsHandle::new(settings),
        source,
        resolver,
    ));

    if args.watch {
        let scheduler = Scheduler::start(orchestrator);

        let (stop_tx, stop_rx) = mpsc::channel();
        ctrlc::set_handler(move || {
            let _ = stop_tx.send(());
        })
        .context("Failed to install Ctrl-C handler")?;

        log::info!("Watching for scheduled backups, press Ctrl-C to stop");
        let _ = stop_rx.recv();

        log::info!("Shutting down");
        scheduler.shutdown();
    } else {
        let report = orchestrator.perform_backup(BackupTrigger::Manual);
        log::info!(
            "{} playlist(s) exported, {} skipped",
            report.written,
            report.skipped
        );
    }

    Ok(())
}
