//! Interval timer driving recurring backup runs.
//!
//! One background thread owns the timer. It is armed only while interval
//! backups are enabled with a positive interval; any other settings
//! combination parks it until the next re-arm. Dropping the scheduler
//! always stops and joins the thread, so the timer resource is released
//! on every exit path.

use crate::export::{BackupOrchestrator, BackupTrigger};
use crate::settings::Settings;
use crate::source::PlaylistSource;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

enum Control {
    Rearm,
    Stop,
}

/// Recurring backup timer bound to one orchestrator.
pub struct Scheduler<S: PlaylistSource + Send + Sync + 'static> {
    orchestrator: Arc<BackupOrchestrator<S>>,
    tx: Sender<Control>,
    worker: Option<JoinHandle<()>>,
}

impl<S: PlaylistSource + Send + Sync + 'static> Scheduler<S> {
    /// Spawn the timer thread. The initial arm state comes from the
    /// orchestrator's current settings.
    pub fn start(orchestrator: Arc<BackupOrchestrator<S>>) -> Self {
        let (tx, rx) = mpsc::channel();
        let worker_orchestrator = orchestrator.clone();

        let worker = thread::spawn(move || loop {
            let interval = arm_interval(&worker_orchestrator.settings().current());
            let control = match interval {
                Some(period) => match rx.recv_timeout(period) {
                    Ok(control) => control,
                    Err(RecvTimeoutError::Timeout) => {
                        worker_orchestrator.perform_backup(BackupTrigger::Interval);
                        continue;
                    }
                    Err(RecvTimeoutError::Disconnected) => Control::Stop,
                },
                // Disarmed: park until the next settings change.
                None => rx.recv().unwrap_or(Control::Stop),
            };
            match control {
                Control::Rearm => continue,
                Control::Stop => break,
            }
        });

        Self {
            orchestrator,
            tx,
            worker: Some(worker),
        }
    }

    /// Re-evaluate the timer after a settings change. Arms, disarms, or
    /// restarts the interval as the new value dictates.
    pub fn rearm(&self) {
        let _ = self.tx.send(Control::Rearm);
    }

    /// Host shutdown: run the shutdown backup first if configured, then
    /// stop and join the timer thread.
    pub fn shutdown(mut self) {
        if self.orchestrator.settings().current().backup_on_shutdown {
            self.orchestrator.perform_backup(BackupTrigger::Shutdown);
        }
        self.stop_worker();
    }

    fn stop_worker(&mut self) {
        let _ = self.tx.send(Control::Stop);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

impl<S: PlaylistSource + Send + Sync + 'static> Drop for Scheduler<S> {
    fn drop(&mut self) {
        self.stop_worker();
    }
}

/// Timer period for the given settings, `None` when disarmed.
fn arm_interval(settings: &Settings) -> Option<Duration> {
    if settings.interval_armed() {
        Some(Duration::from_secs(u64::from(settings.interval_minutes) * 60))
    } else {
        None
    }
}
