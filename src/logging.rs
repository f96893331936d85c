//! Logging infrastructure.
//!
//! Structured file logging with daily rotation to platform-standard
//! directories. The level filter can be swapped at runtime.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, reload};

use crate::config::project_dirs;

const LOG_FILE_PREFIX: &str = "storyboard";
const RETENTION_DAYS: u64 = 7;

/// Handle for replacing the active level filter.
pub type ReloadHandle = reload::Handle<EnvFilter, Registry>;

/// Result of initializing the logging system.
pub struct LoggingContext {
    /// Guard that must be held for the application lifetime to ensure logs are flushed.
    pub _guard: WorkerGuard,
    /// The session ID for this invocation.
    pub session_id: String,
    /// The directory where logs are written.
    pub log_directory: PathBuf,
    pub level_handle: ReloadHandle,
}

/// Error that occurred during logging initialization.
#[derive(Debug)]
pub struct LoggingError {
    pub message: String,
}

impl std::fmt::Display for LoggingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for LoggingError {}

/// Generates a 6-character random hex session ID.
pub(crate) fn generate_session_id() -> String {
    use rand::Rng;
    let mut rng = rand::rng();
    let bytes: [u8; 3] = rng.random();
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

fn log_directory() -> Option<PathBuf> {
    // macOS: ~/Library/Logs/storyboard/
    // Linux: ~/.local/state/storyboard/
    // Windows: %LocalAppData%\storyboard\
    if cfg!(target_os = "macos") {
        dirs::home_dir().map(|home| home.join("Library").join("Logs").join(LOG_FILE_PREFIX))
    } else {
        let dirs = project_dirs()?;
        Some(
            dirs.state_dir()
                .map(PathBuf::from)
                .unwrap_or_else(|| dirs.data_local_dir().join("logs")),
        )
    }
}

/// Initializes the logging system.
///
/// `RUST_LOG` wins over `default_level` when set. The returned guard must be
/// held for the application lifetime.
pub fn init(default_level: &str) -> Result<LoggingContext, LoggingError> {
    let session_id = generate_session_id();

    let log_dir = log_directory().ok_or_else(|| LoggingError {
        message: "Failed to determine log directory".to_string(),
    })?;

    fs::create_dir_all(&log_dir).map_err(|e| LoggingError {
        message: format!("Failed to create log directory: {}", e),
    })?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let (filter_layer, level_handle) = reload::Layer::new(env_filter);

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_span_events(FmtSpan::NONE)
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| LoggingError {
            message: format!("Failed to install subscriber: {}", e),
        })?;

    info!(session_id = %session_id, "session_start");

    Ok(LoggingContext {
        _guard: guard,
        session_id,
        log_directory: log_dir,
        level_handle,
    })
}

/// Replace the active level filter, e.g. after the settings change.
pub fn update_log_level(handle: &ReloadHandle, level: &str) -> Result<(), String> {
    let filter = EnvFilter::try_new(level).map_err(|e| format!("Invalid log level: {}", e))?;
    handle
        .reload(filter)
        .map_err(|e| format!("Failed to reload log level: {}", e))?;
    info!(level = %level, "log_level_changed");
    Ok(())
}

/// Deletes `storyboard.*` log files older than seven days.
///
/// Errors are logged at WARN level but don't prevent app startup.
pub fn cleanup_old_logs(log_dir: &Path) {
    let deleted = remove_stale_logs(
        log_dir,
        SystemTime::now(),
        Duration::from_secs(RETENTION_DAYS * 24 * 60 * 60),
    );
    if deleted > 0 {
        debug!(count = deleted, "log_cleanup_completed");
    }
}

fn remove_stale_logs(log_dir: &Path, now: SystemTime, retention: Duration) -> u32 {
    let entries = match fs::read_dir(log_dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(error = %e, "log_cleanup_read_dir_failed");
            return 0;
        }
    };

    let mut deleted = 0u32;
    for entry in entries.filter_map(Result::ok) {
        let path = entry.path();

        let file_name = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) if name.starts_with("storyboard.") => name.to_string(),
            _ => continue,
        };

        let modified = match fs::metadata(&path).and_then(|m| m.modified()) {
            Ok(t) => t,
            Err(e) => {
                warn!(file = %file_name, error = %e, "log_cleanup_metadata_failed");
                continue;
            }
        };

        // Files from the future are left alone.
        let Ok(age) = now.duration_since(modified) else {
            continue;
        };

        if age > retention {
            match fs::remove_file(&path) {
                Ok(()) => {
                    debug!(file = %file_name, age_days = age.as_secs() / 86400, "log_file_deleted");
                    deleted += 1;
                }
                Err(e) => warn!(file = %file_name, error = %e, "log_file_delete_failed"),
            }
        }
    }
    deleted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path, modified: SystemTime) {
        let file = fs::File::create(path).unwrap();
        file.set_modified(modified).unwrap();
    }

    #[test]
    fn test_session_id_is_six_hex_chars() {
        let id = generate_session_id();
        assert_eq!(id.len(), 6);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_remove_stale_logs() {
        let dir = tempfile::tempdir().unwrap();
        let now = SystemTime::now();
        let old = now - Duration::from_secs(10 * 24 * 60 * 60);

        touch(&dir.path().join("storyboard.2020-01-01"), old);
        touch(&dir.path().join("storyboard.today"), now);
        touch(&dir.path().join("other.2020-01-01"), old);

        let deleted = remove_stale_logs(dir.path(), now, Duration::from_secs(7 * 24 * 60 * 60));
        assert_eq!(deleted, 1);
        assert!(!dir.path().join("storyboard.2020-01-01").exists());
        assert!(dir.path().join("storyboard.today").exists());
        assert!(dir.path().join("other.2020-01-01").exists());
    }

    #[test]
    fn test_remove_stale_logs_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert_eq!(
            remove_stale_logs(&missing, SystemTime::now(), Duration::ZERO),
            0
        );
    }

    #[test]
    fn test_update_log_level_rejects_garbage() {
        let (_layer, handle) = reload::Layer::<EnvFilter, Registry>::new(EnvFilter::new("info"));
        assert!(update_log_level(&handle, "debug").is_ok());
        assert!(update_log_level(&handle, "storyboard=loud").is_err());
    }
}
