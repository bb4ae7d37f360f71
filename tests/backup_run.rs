use playlist_backup::{
    BackupOrchestrator, BackupTrigger, PathResolver, PlaylistKind, PlaylistSetting, RelativeMode,
    Scheduler, Settings, SettingsHandle, SnapshotSource,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

fn resolver() -> PathResolver {
    PathResolver::with_base(PathBuf::from("/opt/player"))
}

/// Settings with one enabled playlist exporting into `dir`.
fn settings_for(dir: &Path, name: &str) -> Settings {
    let mut settings = Settings::default();
    settings.default_export_path = dir.to_string_lossy().into_owned();
    settings.playlists.push(PlaylistSetting {
        name: name.to_string(),
        enabled: true,
        ..PlaylistSetting::default()
    });
    settings
}

fn orchestrator_with(
    settings: Settings,
    source: SnapshotSource,
) -> BackupOrchestrator<SnapshotSource> {
    BackupOrchestrator::new(SettingsHandle::new(settings), source, resolver())
}

#[test]
fn exports_enabled_playlists_and_skips_the_rest() {
    let dir = TempDir::new().unwrap();

    let mut settings = settings_for(dir.path(), "Favorites\\Top");
    settings.playlists.push(PlaylistSetting {
        name: "Disabled".to_string(),
        enabled: false,
        ..PlaylistSetting::default()
    });
    settings.playlists.push(PlaylistSetting {
        name: "Vanished".to_string(),
        enabled: true,
        ..PlaylistSetting::default()
    });

    let mut source = SnapshotSource::new();
    source.add(
        "Favorites\\Top",
        PlaylistKind::Static,
        vec![
            "/srv/music/rock/a.mp3".to_string(),
            "/srv/music/jazz/b.mp3".to_string(),
        ],
    );
    source.add(
        "Disabled",
        PlaylistKind::Static,
        vec!["/srv/music/c.mp3".to_string()],
    );

    let orchestrator = orchestrator_with(settings, source);
    let report = orchestrator.perform_backup(BackupTrigger::Manual);

    assert_eq!(report.written, 1);
    assert_eq!(report.skipped, 0);

    // Leaf of the qualified name, absolute paths, host order preserved.
    let content = fs::read_to_string(dir.path().join("Top.m3u8")).unwrap();
    assert_eq!(
        content,
        "#EXTM3U\n/srv/music/rock/a.mp3\n/srv/music/jazz/b.mp3\n"
    );

    assert!(!dir.path().join("Disabled.m3u8").exists());
    assert!(!dir.path().join("Vanished.m3u8").exists());
}

#[test]
fn repeated_runs_are_byte_identical() {
    let dir = TempDir::new().unwrap();

    let mut source = SnapshotSource::new();
    source.add(
        "Rock",
        PlaylistKind::Static,
        vec!["/srv/music/a.mp3".to_string(), "/srv/music/b.mp3".to_string()],
    );

    let orchestrator = orchestrator_with(settings_for(dir.path(), "Rock"), source);
    orchestrator.perform_backup(BackupTrigger::Manual);
    let first = fs::read(dir.path().join("Rock.m3u8")).unwrap();

    orchestrator.perform_backup(BackupTrigger::Interval);
    let second = fs::read(dir.path().join("Rock.m3u8")).unwrap();

    assert_eq!(first, second);
}

#[test]
fn source_change_only_touches_the_affected_file() {
    let dir = TempDir::new().unwrap();

    let mut settings = settings_for(dir.path(), "Rock");
    settings.playlists.push(PlaylistSetting {
        name: "Jazz".to_string(),
        enabled: true,
        ..PlaylistSetting::default()
    });

    let mut before = SnapshotSource::new();
    before.add("Rock", PlaylistKind::Static, vec!["/srv/a.mp3".to_string()]);
    before.add("Jazz", PlaylistKind::Static, vec!["/srv/j.mp3".to_string()]);
    orchestrator_with(settings.clone(), before).perform_backup(BackupTrigger::Manual);

    let jazz_before = fs::read(dir.path().join("Jazz.m3u8")).unwrap();

    // Same settings, one more Rock track.
    let mut after = SnapshotSource::new();
    after.add(
        "Rock",
        PlaylistKind::Static,
        vec!["/srv/a.mp3".to_string(), "/srv/b.mp3".to_string()],
    );
    after.add("Jazz", PlaylistKind::Static, vec!["/srv/j.mp3".to_string()]);
    orchestrator_with(settings, after).perform_backup(BackupTrigger::Manual);

    let rock = fs::read_to_string(dir.path().join("Rock.m3u8")).unwrap();
    assert_eq!(rock, "#EXTM3U\n/srv/a.mp3\n/srv/b.mp3\n");
    assert_eq!(fs::read(dir.path().join("Jazz.m3u8")).unwrap(), jazz_before);
}

#[test]
fn relative_root_rewrites_descendants_only() {
    let dir = TempDir::new().unwrap();

    let mut settings = settings_for(dir.path(), "Rock");
    settings.playlists[0].custom_root_path = "C:\\Music".to_string();
    settings.relative_mode = RelativeMode::PrefixSubtraction;

    let mut source = SnapshotSource::new();
    source.add(
        "Rock",
        PlaylistKind::Auto,
        vec![
            "C:\\Music\\Rock\\song.mp3".to_string(),
            // Different drive: stays absolute.
            "D:\\Loose\\other.mp3".to_string(),
        ],
    );

    orchestrator_with(settings, source).perform_backup(BackupTrigger::Manual);

    let content = fs::read_to_string(dir.path().join("Rock.m3u8")).unwrap();
    assert_eq!(content, "#EXTM3U\n.\\Rock\\song.mp3\nD:\\Loose\\other.mp3\n");
}

#[test]
fn common_ancestor_mode_reaches_sibling_subtrees() {
    let dir = TempDir::new().unwrap();

    let mut settings = settings_for(dir.path(), "Rock");
    settings.playlists[0].custom_root_path = "C:\\Music\\A".to_string();
    settings.relative_mode = RelativeMode::CommonAncestor;

    let mut source = SnapshotSource::new();
    source.add(
        "Rock",
        PlaylistKind::Static,
        vec!["C:\\Music\\B\\song.mp3".to_string()],
    );

    orchestrator_with(settings, source).perform_backup(BackupTrigger::Manual);

    let content = fs::read_to_string(dir.path().join("Rock.m3u8")).unwrap();
    assert_eq!(content, "#EXTM3U\n..\\B\\song.mp3\n");
}

#[test]
fn failing_export_directory_does_not_abort_siblings() {
    let dir = TempDir::new().unwrap();

    // A regular file standing where one playlist wants its directory.
    let blocker = dir.path().join("blocked");
    fs::write(&blocker, b"in the way").unwrap();

    let mut settings = settings_for(dir.path(), "Good");
    settings.playlists.push(PlaylistSetting {
        name: "Bad".to_string(),
        enabled: true,
        custom_export_path: blocker.join("nested").to_string_lossy().into_owned(),
        custom_root_path: String::new(),
    });

    let mut source = SnapshotSource::new();
    source.add("Good", PlaylistKind::Static, vec!["/srv/a.mp3".to_string()]);
    source.add("Bad", PlaylistKind::Static, vec!["/srv/b.mp3".to_string()]);

    let report = orchestrator_with(settings, source).perform_backup(BackupTrigger::Manual);

    assert_eq!(report.written, 1);
    assert_eq!(report.skipped, 1);
    assert!(dir.path().join("Good.m3u8").exists());
}

#[test]
fn no_configured_playlists_is_a_no_op() {
    let mut source = SnapshotSource::new();
    source.add("Rock", PlaylistKind::Static, vec!["/srv/a.mp3".to_string()]);

    let orchestrator = orchestrator_with(Settings::default(), source);
    let report = orchestrator.perform_backup(BackupTrigger::Manual);
    assert_eq!(report.written, 0);
    assert_eq!(report.skipped, 0);
}

#[test]
fn scheduler_shutdown_runs_configured_backup() {
    let dir = TempDir::new().unwrap();

    let mut settings = settings_for(dir.path(), "Rock");
    settings.backup_on_shutdown = true;

    let mut source = SnapshotSource::new();
    source.add("Rock", PlaylistKind::Static, vec!["/srv/a.mp3".to_string()]);

    let orchestrator = Arc::new(orchestrator_with(settings, source));
    let scheduler = Scheduler::start(orchestrator.clone());
    scheduler.rearm();
    scheduler.shutdown();

    let content = fs::read_to_string(dir.path().join("Rock.m3u8")).unwrap();
    assert_eq!(content, "#EXTM3U\n/srv/a.mp3\n");
}

#[test]
fn scheduler_drop_without_shutdown_writes_nothing() {
    let dir = TempDir::new().unwrap();

    let mut settings = settings_for(dir.path(), "Rock");
    settings.backup_on_shutdown = true;

    let mut source = SnapshotSource::new();
    source.add("Rock", PlaylistKind::Static, vec!["/srv/a.mp3".to_string()]);

    let orchestrator = Arc::new(orchestrator_with(settings, source));
    drop(Scheduler::start(orchestrator));

    // Dropping only releases the timer; the shutdown backup is explicit.
    assert!(!dir.path().join("Rock.m3u8").exists());
}
