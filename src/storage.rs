//! Storage adapter for the storyboard collection.
//!
//! The whole collection lives under a single key, serialized as one JSON
//! array. Reads never fail: a missing or unreadable value is treated as "no
//! history". Writes replace the previous value wholesale.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::model::Storyboard;

/// Key the collection is stored under.
pub const STORAGE_KEY: &str = "storyboard-history-app";

/// Reads and writes the serialized storyboard collection.
#[derive(Debug, Clone)]
pub struct StorageAdapter {
    path: PathBuf,
}

impl StorageAdapter {
    /// Adapter backed by the given file.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Adapter backed by `<dir>/<STORAGE_KEY>.json`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(format!("{}.json", STORAGE_KEY)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the collection, newest `updatedAt` first.
    ///
    /// Absence and corruption both yield an empty list; failures are logged.
    pub fn load(&self) -> Vec<Storyboard> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = ?self.path, "storage_empty");
                return Vec::new();
            }
            Err(e) => {
                warn!(path = ?self.path, error = %e, "storage_read_failed");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<Storyboard>>(&contents) {
            Ok(mut storyboards) => {
                storyboards.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
                debug!(count = storyboards.len(), "storage_loaded");
                storyboards
            }
            Err(e) => {
                warn!(path = ?self.path, error = %e, "storage_parse_failed");
                Vec::new()
            }
        }
    }

    /// Replace the persisted collection.
    ///
    /// Writes go to a sibling temp file that is renamed over the target, so
    /// a failure leaves the previous value untouched. Failures are logged and
    /// swallowed.
    pub fn save(&self, storyboards: &[Storyboard]) {
        if let Err(e) = self.try_save(storyboards) {
            warn!(path = ?self.path, error = %e, "storage_save_failed");
        }
    }

    fn try_save(&self, storyboards: &[Storyboard]) -> Result<(), String> {
        let json = serde_json::to_string(storyboards)
            .map_err(|e| format!("Failed to serialize storyboards: {}", e))?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {}", parent.display(), e))?;
        }

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json)
            .map_err(|e| format!("Failed to write {}: {}", tmp_path.display(), e))?;
        fs::rename(&tmp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            format!("Failed to replace {}: {}", self.path.display(), e)
        })?;

        info!(count = storyboards.len(), "storage_saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ProjectType, Scene, StoryboardId};
    use chrono::{Duration, Utc};

    fn board(id: &str, age_minutes: i64) -> Storyboard {
        let at = Utc::now() - Duration::minutes(age_minutes);
        Storyboard {
            id: StoryboardId::from(id),
            title: id.to_string(),
            scenes: vec![Scene::empty()],
            created_at: at,
            updated_at: at,
            generated_spec: None,
            generated_at: None,
            project_type: ProjectType::Fullstack,
        }
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageAdapter::in_dir(dir.path());
        assert!(storage.load().is_empty());
    }

    #[test]
    fn test_load_corrupt_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageAdapter::in_dir(dir.path());
        fs::write(storage.path(), "{not json").unwrap();
        assert!(storage.load().is_empty());
    }

    #[test]
    fn test_load_wrong_shape_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageAdapter::in_dir(dir.path());
        fs::write(storage.path(), r#"{"id": "not-an-array"}"#).unwrap();
        assert!(storage.load().is_empty());
    }

    #[test]
    fn test_save_then_load_sorted_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageAdapter::in_dir(dir.path());
        storage.save(&[board("old", 60), board("new", 1), board("mid", 30)]);

        let loaded = storage.load();
        let ids: Vec<&str> = loaded.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);
    }

    #[test]
    fn test_save_replaces_previous_value() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageAdapter::in_dir(dir.path());
        storage.save(&[board("a", 0), board("b", 0)]);
        storage.save(&[board("c", 0)]);

        let loaded = storage.load();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id.as_str(), "c");
        assert!(!storage.path().with_extension("json.tmp").exists());
    }

    #[test]
    fn test_save_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageAdapter::new(dir.path().join("nested").join("history.json"));
        storage.save(&[board("a", 0)]);
        assert_eq!(storage.load().len(), 1);
    }

    #[test]
    fn test_failed_save_keeps_previous_value() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageAdapter::in_dir(dir.path());
        storage.save(&[board("keep", 0)]);

        // A directory squatting on the temp path makes the write fail.
        fs::create_dir(storage.path().with_extension("json.tmp")).unwrap();
        storage.save(&[board("lost", 0)]);

        let loaded = storage.load();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id.as_str(), "keep");
    }
}
