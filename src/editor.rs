//! Scene editor state for the storyboard currently being edited.

use tracing::debug;

use crate::model::{ProjectType, Scene, ScenePatch};
use crate::repository::Selection;

/// Ordered scenes under edit, the active tab, the selected project type and
/// the last prompt pack shown for these scenes.
#[derive(Debug, Clone)]
pub struct SceneEditor {
    scenes: Vec<Scene>,
    active_index: usize,
    pub project_type: ProjectType,
    pub generated_spec: Option<String>,
}

impl Default for SceneEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneEditor {
    /// One empty scene, default project type, nothing generated.
    pub fn new() -> Self {
        Self {
            scenes: vec![Scene::empty()],
            active_index: 0,
            project_type: ProjectType::default(),
            generated_spec: None,
        }
    }

    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    pub fn active_scene(&self) -> &Scene {
        &self.scenes[self.active_index]
    }

    /// Switch the active tab. Out-of-range indices are ignored.
    pub fn set_active(&mut self, index: usize) {
        if index < self.scenes.len() {
            self.active_index = index;
        }
    }

    pub fn next_tab(&mut self) {
        self.active_index = (self.active_index + 1) % self.scenes.len();
    }

    pub fn prev_tab(&mut self) {
        self.active_index = self
            .active_index
            .checked_sub(1)
            .unwrap_or(self.scenes.len() - 1);
    }

    /// Append an empty scene and make it the active tab.
    pub fn add_scene(&mut self) {
        self.scenes.push(Scene::empty());
        self.active_index = self.scenes.len() - 1;
        debug!(count = self.scenes.len(), "scene_added");
    }

    /// Merge `patch` into the scene at `index`. Out-of-range is a no-op.
    pub fn update_scene(&mut self, index: usize, patch: ScenePatch) {
        if let Some(scene) = self.scenes.get_mut(index) {
            scene.apply(patch);
        }
    }

    /// Remove the scene at `index`, refusing when it is the last one.
    /// Returns whether a scene was removed.
    pub fn delete_scene(&mut self, index: usize) -> bool {
        if self.scenes.len() <= 1 || index >= self.scenes.len() {
            return false;
        }
        self.scenes.remove(index);
        if self.active_index >= index && self.active_index > 0 {
            self.active_index -= 1;
        }
        self.active_index = self.active_index.min(self.scenes.len() - 1);
        debug!(index, count = self.scenes.len(), "scene_deleted");
        true
    }

    /// Back to a fresh, empty storyboard.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Replace the editor contents with a stored storyboard.
    pub fn load(&mut self, selection: Selection) {
        self.scenes = if selection.scenes.is_empty() {
            vec![Scene::empty()]
        } else {
            selection.scenes
        };
        self.project_type = selection.project_type;
        self.generated_spec = selection.generated_spec;
        self.active_index = 0;
    }

    /// Indices of scenes missing both title and objective.
    pub fn incomplete_scenes(&self) -> Vec<usize> {
        self.scenes
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_incomplete())
            .map(|(i, _)| i)
            .collect()
    }
}
