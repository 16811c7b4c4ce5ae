//! File watcher: runs `check` on startup, then re-runs on markdown changes.

use std::collections::HashSet;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use notify::{RecursiveMode, Watcher as _};

use crate::commands::{self, Project};
use crate::error;
use crate::scanner;

/// Debounce delay between filesystem events and re-check.
const DEBOUNCE_MS: u64 = 100;

/// Directories holding scanned markdown files plus the workspace folders,
/// so that created or removed link targets also trigger a re-check.
///
/// # Errors
///
/// Returns errors from scanning.
fn collect_watch_dirs(project: &Project) -> Result<HashSet<PathBuf>, error::Error> {
    let mut dirs: HashSet<PathBuf> = project.workspaces.roots().iter().cloned().collect();
    for link in scanner::scan(&project.root, &project.config)? {
        if let Some(parent) = link.source.parent() {
            dirs.insert(parent.to_path_buf());
        }
    }
    return Ok(dirs);
}

/// Create a filesystem watcher that sends events on the given channel.
///
/// # Errors
///
/// Returns `Error::WatchFailed` if the watcher cannot be created.
fn create_watcher(tx: crossbeam_channel::Sender<()>) -> Result<notify::RecommendedWatcher, error::Error> {
    return notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
        if let Ok(event) = res
            && matches!(
                event.kind,
                notify::EventKind::Create(_) | notify::EventKind::Modify(_) | notify::EventKind::Remove(_)
            )
        {
            let _ = tx.send(());
        }
    })
    .map_err(|e| {
        return error::Error::WatchFailed {
            reason: format!("watcher setup failed: {e}"),
        };
    });
}

/// Entry point for the watch command.
///
/// Runs an initial check, then watches the markdown directories recursively
/// and re-checks on changes.
///
/// # Errors
///
/// Returns errors from config loading, scanning, or watcher setup.
pub fn run() -> Result<ExitCode, error::Error> {
    crate::log!("watch"; "initial check");
    let mut last_code = run_check();

    let project = Project::load()?;

    let watch_dirs = collect_watch_dirs(&project)?;
    let (tx, rx) = crossbeam_channel::unbounded();
    let mut watcher = create_watcher(tx)?;

    for dir in &watch_dirs {
        if dir.exists()
            && let Err(e) = watcher.watch(dir, RecursiveMode::Recursive)
        {
            crate::debug!("watch"; "cannot watch {}: {e}", dir.display());
        }
    }

    let dir_count = watch_dirs.len();
    crate::log!("watch"; "monitoring {dir_count} directories, press Ctrl+C to stop");

    while rx.recv().is_ok() {
        let debounce = Duration::from_millis(DEBOUNCE_MS);
        while rx.recv_timeout(debounce).is_ok() {}
        crate::log!("watch"; "change detected, re-checking...");
        last_code = run_check();
    }

    return Ok(last_code);
}

/// Reload the project, run check once, and print the result. Returns the
/// exit code from check.
fn run_check() -> ExitCode {
    return match Project::load().and_then(|project| return commands::check_project(&project)) {
        Ok(code) => code,
        Err(e) => {
            crate::log!("error"; "{e}");
            ExitCode::from(3_u8)
        },
    };
}
