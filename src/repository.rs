//! Storyboard repository: the in-memory collection plus the active id,
//! mirrored to storage after every mutation.

use std::path::Path;

use chrono::Utc;
use tracing::{debug, info};

use crate::model::{ProjectType, Scene, Storyboard, StoryboardId, derive_title};
use crate::storage::StorageAdapter;

/// Editor contents restored by [`StoryboardRepository::select`].
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub scenes: Vec<Scene>,
    pub project_type: ProjectType,
    pub generated_spec: Option<String>,
}

pub struct StoryboardRepository {
    storage: StorageAdapter,
    storyboards: Vec<Storyboard>,
    active_id: Option<StoryboardId>,
}

impl StoryboardRepository {
    /// Open the repository, loading whatever the storage currently holds.
    pub fn open(storage: StorageAdapter) -> Self {
        let storyboards = storage.load();
        info!(count = storyboards.len(), "repository_opened");
        Self {
            storage,
            storyboards,
            active_id: None,
        }
    }

    /// Storyboards sorted by `updatedAt`, newest first.
    pub fn storyboards(&self) -> Vec<&Storyboard> {
        let mut sorted: Vec<&Storyboard> = self.storyboards.iter().collect();
        sorted.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        sorted
    }

    /// Where the collection is persisted.
    pub fn storage_path(&self) -> &Path {
        self.storage.path()
    }

    pub fn len(&self) -> usize {
        self.storyboards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storyboards.is_empty()
    }

    pub fn get(&self, id: &StoryboardId) -> Option<&Storyboard> {
        self.storyboards.iter().find(|sb| &sb.id == id)
    }

    pub fn active_id(&self) -> Option<&StoryboardId> {
        self.active_id.as_ref()
    }

    pub fn active(&self) -> Option<&Storyboard> {
        self.active_id.as_ref().and_then(|id| self.get(id))
    }

    /// Save the editor contents into the active storyboard, creating one if
    /// none is active. Returns the id of the saved storyboard.
    ///
    /// The stored prompt pack and `generatedAt` are only replaced when a
    /// different text is supplied, so `generatedAt` stays the time the pack
    /// was produced rather than the time it was last re-saved.
    pub fn save_active(
        &mut self,
        scenes: Vec<Scene>,
        project_type: ProjectType,
        generated_spec: Option<String>,
    ) -> StoryboardId {
        let now = Utc::now();
        let title = derive_title(&scenes);

        let existing = self
            .active_id
            .as_ref()
            .and_then(|id| self.storyboards.iter_mut().find(|sb| &sb.id == id));

        let id = match existing {
            Some(sb) => {
                sb.title = title;
                sb.scenes = scenes;
                sb.project_type = project_type;
                sb.updated_at = now;
                if let Some(spec) = generated_spec
                    && sb.generated_spec.as_deref() != Some(spec.as_str())
                {
                    sb.generated_spec = Some(spec);
                    sb.generated_at = Some(now);
                }
                debug!(id = %sb.id, "storyboard_updated");
                sb.id.clone()
            }
            None => {
                let generated_at = generated_spec.as_ref().map(|_| now);
                let sb = Storyboard {
                    id: StoryboardId::new(),
                    title,
                    scenes,
                    created_at: now,
                    updated_at: now,
                    generated_spec,
                    generated_at,
                    project_type,
                };
                let id = sb.id.clone();
                debug!(id = %id, "storyboard_created");
                self.storyboards.insert(0, sb);
                self.active_id = Some(id.clone());
                id
            }
        };

        self.persist();
        id
    }

    /// Make `id` active and return its contents. Unknown ids are a no-op.
    pub fn select(&mut self, id: &StoryboardId) -> Option<Selection> {
        let sb = self.get(id)?;
        let selection = Selection {
            scenes: sb.scenes.clone(),
            project_type: sb.project_type,
            generated_spec: sb.generated_spec.clone(),
        };
        self.active_id = Some(id.clone());
        debug!(id = %id, "storyboard_selected");
        Some(selection)
    }

    /// Remove a storyboard. Returns true if it was the active one, in which
    /// case the active id is cleared.
    pub fn delete(&mut self, id: &StoryboardId) -> bool {
        let before = self.storyboards.len();
        self.storyboards.retain(|sb| &sb.id != id);
        if self.storyboards.len() == before {
            return false;
        }
        info!(id = %id, "storyboard_deleted");
        self.persist();

        if self.active_id.as_ref() == Some(id) {
            self.active_id = None;
            true
        } else {
            false
        }
    }

    /// Forget the active storyboard so the next save creates a new one.
    pub fn clear_active(&mut self) {
        self.active_id = None;
    }

    /// Attach a freshly generated prompt pack to the active storyboard.
    /// Returns false when nothing is active.
    pub fn attach_generated(&mut self, spec: &str) -> bool {
        let now = Utc::now();
        let Some(sb) = self
            .active_id
            .as_ref()
            .and_then(|id| self.storyboards.iter_mut().find(|sb| &sb.id == id))
        else {
            return false;
        };
        sb.generated_spec = Some(spec.to_string());
        sb.generated_at = Some(now);
        sb.updated_at = now;
        debug!(id = %sb.id, "generated_spec_attached");
        self.persist();
        true
    }

    fn persist(&self) {
        self.storage.save(&self.storyboards);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{SceneField, ScenePatch};

    fn repo(dir: &tempfile::TempDir) -> StoryboardRepository {
        StoryboardRepository::open(StorageAdapter::in_dir(dir.path()))
    }

    fn scene(title: &str, objective: &str) -> Scene {
        let mut s = Scene::empty();
        s.apply(ScenePatch::field(SceneField::Title, title.to_string()));
        s.apply(ScenePatch::field(SceneField::Objective, objective.to_string()));
        s
    }

    #[test]
    fn test_save_active_creates_and_adopts() {
        let dir = tempfile::tempdir().unwrap();
        let mut repo = repo(&dir);
        assert!(repo.active_id().is_none());

        let id = repo.save_active(vec![scene("首頁", "介紹")], ProjectType::Fullstack, None);
        assert_eq!(repo.active_id(), Some(&id));
        assert_eq!(repo.len(), 1);
        let sb = repo.get(&id).unwrap();
        assert_eq!(sb.title, "首頁");
        assert_eq!(sb.created_at, sb.updated_at);
        assert!(sb.generated_at.is_none());
    }

    #[test]
    fn test_save_active_new_storyboard_is_prepended() {
        let dir = tempfile::tempdir().unwrap();
        let mut repo = repo(&dir);
        let first = repo.save_active(vec![scene("A", "")], ProjectType::Fullstack, None);
        repo.clear_active();
        let second = repo.save_active(vec![scene("B", "")], ProjectType::Fullstack, None);

        assert_ne!(first, second);
        assert_eq!(repo.storyboards[0].id, second);
        assert_eq!(repo.storyboards()[0].id, second);
    }

    #[test]
    fn test_save_active_updates_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let mut repo = repo(&dir);
        let id = repo.save_active(vec![scene("舊", "")], ProjectType::Fullstack, None);
        let created_at = repo.get(&id).unwrap().created_at;

        let again = repo.save_active(
            vec![scene("新", "x"), scene("第二", "y")],
            ProjectType::BackendOnly,
            None,
        );
        assert_eq!(again, id);
        assert_eq!(repo.len(), 1);

        let sb = repo.get(&id).unwrap();
        assert_eq!(sb.created_at, created_at);
        assert!(sb.updated_at >= created_at);
        assert_eq!(sb.title, "新");
        assert_eq!(sb.scenes.len(), 2);
        assert_eq!(sb.project_type, ProjectType::BackendOnly);
    }

    #[test]
    fn test_save_active_keeps_spec_when_none_supplied() {
        let dir = tempfile::tempdir().unwrap();
        let mut repo = repo(&dir);
        let id = repo.save_active(
            vec![scene("A", "")],
            ProjectType::Fullstack,
            Some("P0...".to_string()),
        );
        let generated_at = repo.get(&id).unwrap().generated_at;
        assert!(generated_at.is_some());

        repo.save_active(vec![scene("A", "b")], ProjectType::Fullstack, None);
        let sb = repo.get(&id).unwrap();
        assert_eq!(sb.generated_spec.as_deref(), Some("P0..."));
        assert_eq!(sb.generated_at, generated_at);
    }

    #[test]
    fn test_save_active_replaces_spec_when_new_supplied() {
        let dir = tempfile::tempdir().unwrap();
        let mut repo = repo(&dir);
        let id = repo.save_active(
            vec![scene("A", "")],
            ProjectType::Fullstack,
            Some("v1".to_string()),
        );
        repo.save_active(
            vec![scene("A", "")],
            ProjectType::Fullstack,
            Some("v2".to_string()),
        );
        assert_eq!(repo.get(&id).unwrap().generated_spec.as_deref(), Some("v2"));
    }

    #[test]
    fn test_save_active_same_spec_keeps_generated_at() {
        let dir = tempfile::tempdir().unwrap();
        let mut repo = repo(&dir);
        let id = repo.save_active(
            vec![scene("A", "")],
            ProjectType::Fullstack,
            Some("pack".to_string()),
        );
        let generated_at = repo.get(&id).unwrap().generated_at;

        std::thread::sleep(std::time::Duration::from_millis(5));
        repo.save_active(
            vec![scene("A", "edited")],
            ProjectType::Fullstack,
            Some("pack".to_string()),
        );
        let sb = repo.get(&id).unwrap();
        assert_eq!(sb.generated_at, generated_at);
        assert!(sb.updated_at > generated_at.unwrap());
    }

    #[test]
    fn test_save_then_fresh_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut repo = repo(&dir);
        let mut s = scene("健康檢查 API", "回傳服務狀態");
        s.apply(ScenePatch::field(SceneField::Layout, "無畫面".to_string()));
        s.apply(ScenePatch::field(
            SceneField::Interactions,
            "GET /health".to_string(),
        ));
        let id = repo.save_active(vec![s.clone()], ProjectType::BackendOnly, None);

        let loaded = StorageAdapter::in_dir(dir.path()).load();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, id);
        assert_eq!(loaded[0].scenes, vec![s]);
        assert_eq!(loaded[0].project_type, ProjectType::BackendOnly);
    }

    #[test]
    fn test_select_unknown_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let mut repo = repo(&dir);
        let id = repo.save_active(vec![scene("A", "")], ProjectType::Fullstack, None);
        assert!(repo.select(&StoryboardId::from("missing")).is_none());
        assert_eq!(repo.active_id(), Some(&id));
    }

    #[test]
    fn test_select_twice_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let mut repo = repo(&dir);
        let id = repo.save_active(
            vec![scene("A", "a"), scene("B", "b")],
            ProjectType::FrontendOnly,
            Some("pack".to_string()),
        );
        repo.clear_active();

        let first = repo.select(&id).unwrap();
        let second = repo.select(&id).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.project_type, ProjectType::FrontendOnly);
        assert_eq!(first.generated_spec.as_deref(), Some("pack"));
        assert_eq!(repo.active_id(), Some(&id));
    }

    #[test]
    fn test_delete_active_clears_active_id() {
        let dir = tempfile::tempdir().unwrap();
        let mut repo = repo(&dir);
        let id = repo.save_active(vec![scene("A", "")], ProjectType::Fullstack, None);
        assert!(repo.delete(&id));
        assert!(repo.active_id().is_none());
        assert!(repo.is_empty());
        assert!(StorageAdapter::in_dir(dir.path()).load().is_empty());
    }

    #[test]
    fn test_delete_inactive_keeps_active_id() {
        let dir = tempfile::tempdir().unwrap();
        let mut repo = repo(&dir);
        let other = repo.save_active(vec![scene("A", "")], ProjectType::Fullstack, None);
        repo.clear_active();
        let active = repo.save_active(vec![scene("B", "")], ProjectType::Fullstack, None);

        assert!(!repo.delete(&other));
        assert_eq!(repo.active_id(), Some(&active));
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn test_delete_unknown_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let mut repo = repo(&dir);
        repo.save_active(vec![scene("A", "")], ProjectType::Fullstack, None);
        assert!(!repo.delete(&StoryboardId::from("nope")));
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn test_attach_generated_requires_active() {
        let dir = tempfile::tempdir().unwrap();
        let mut repo = repo(&dir);
        assert!(!repo.attach_generated("pack"));

        let id = repo.save_active(vec![scene("A", "")], ProjectType::Fullstack, None);
        assert!(repo.attach_generated("pack"));
        let reloaded = StorageAdapter::in_dir(dir.path()).load();
        assert_eq!(reloaded[0].id, id);
        assert_eq!(reloaded[0].generated_spec.as_deref(), Some("pack"));
        assert!(reloaded[0].generated_at.is_some());
    }

    #[test]
    fn test_open_reads_existing_history() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut repo = repo(&dir);
            repo.save_active(vec![scene("A", "")], ProjectType::Fullstack, None);
        }
        let reopened = repo(&dir);
        assert_eq!(reopened.len(), 1);
        assert!(reopened.active_id().is_none());
    }
}
