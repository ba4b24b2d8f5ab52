//! Platform-specific directory paths.
//!
//! Uses XDG on Linux, standard locations on macOS/Windows.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use directories::ProjectDirs;

const QUALIFIER: &str = "dev";
const ORGANIZATION: &str = "formguard";
const APPLICATION: &str = "patient-intake";

const LATEST_LOG: &str = "latest.log";

/// Maximum number of old log files to keep.
const MAX_OLD_LOGS: usize = 25;

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
}

/// Get the cache directory, where logs live.
///
/// - Linux: `$XDG_CACHE_HOME/patient-intake` or `~/.cache/patient-intake`
/// - macOS: `~/Library/Caches/dev.formguard.patient-intake`
/// - Windows: `C:\Users\<User>\AppData\Local\formguard\patient-intake\cache`
pub fn cache_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Get the path to the latest log file.
pub fn log_file() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join(LATEST_LOG))
}

/// Rename `latest.log` to a timestamped name and prune old logs.
///
/// Call this at startup before creating the new log file. Only the newest
/// [`MAX_OLD_LOGS`] archived logs survive.
pub fn rotate_logs(dir: &Path) {
    let latest = dir.join(LATEST_LOG);
    if latest.exists() {
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        if let Err(e) = fs::rename(&latest, dir.join(format!("{}.log", timestamp))) {
            log::warn!("[logs] could not archive {}: {}", latest.display(), e);
        }
    }

    let mut archived = archived_logs(dir);
    // Newest first, so everything past the limit is stale.
    archived.sort_by(|a, b| b.0.cmp(&a.0));
    for (_, path) in archived.into_iter().skip(MAX_OLD_LOGS) {
        let _ = fs::remove_file(path);
    }
}

/// Archived `.log` files in `dir` with their modification times.
fn archived_logs(dir: &Path) -> Vec<(Option<SystemTime>, PathBuf)> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };

    entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension().is_some_and(|ext| ext == "log")
                && path.file_name().is_some_and(|name| name != LATEST_LOG)
        })
        .map(|path| {
            let modified = fs::metadata(&path).and_then(|m| m.modified()).ok();
            (modified, path)
        })
        .collect()
}
