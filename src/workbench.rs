//! UI-free coordinator for one editing session.
//!
//! Owns the scene editor, the storyboard repository and the generation
//! state. The terminal layer calls into this and renders what it exposes;
//! nothing here knows about keys or widgets.

use tracing::{debug, info, warn};

use crate::completion::CompletionError;
use crate::editor::SceneEditor;
use crate::generation::GenerationState;
use crate::model::{Storyboard, StoryboardId};
use crate::prompt::{PromptTarget, compile_for};
use crate::repository::StoryboardRepository;
use crate::storage::StorageAdapter;

/// Result of asking to start a generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BeginOutcome {
    /// The request may be sent with this compiled prompt.
    Started { prompt: String },
    /// Scenes at these indices have neither title nor objective.
    NeedsConfirmation(Vec<usize>),
    /// A request is already outstanding.
    AlreadyRequesting,
}

/// What happened to a completed generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinishOutcome {
    /// Text stored in the editor, and on the active storyboard if any.
    Stored { attached: bool },
    /// The editor moved to a different storyboard while the request ran.
    Discarded,
    Failed { message: String },
}

pub struct Workbench {
    pub editor: SceneEditor,
    repository: StoryboardRepository,
    target: PromptTarget,
    generation: GenerationState,
    pending_delete: Option<StoryboardId>,
    /// Bumped whenever the editor switches to a different storyboard.
    epoch: u64,
    request_epoch: Option<u64>,
}

impl Workbench {
    pub fn open(storage: StorageAdapter, target: PromptTarget) -> Self {
        Self {
            editor: SceneEditor::new(),
            repository: StoryboardRepository::open(storage),
            target,
            generation: GenerationState::default(),
            pending_delete: None,
            epoch: 0,
            request_epoch: None,
        }
    }

    pub fn repository(&self) -> &StoryboardRepository {
        &self.repository
    }

    pub fn history(&self) -> Vec<&Storyboard> {
        self.repository.storyboards()
    }

    pub fn active_id(&self) -> Option<&StoryboardId> {
        self.repository.active_id()
    }

    pub fn target(&self) -> PromptTarget {
        self.target
    }

    /// Takes effect from the next generation.
    pub fn set_target(&mut self, target: PromptTarget) {
        self.target = target;
    }

    pub fn generation(&self) -> &GenerationState {
        &self.generation
    }

    pub fn pending_delete(&self) -> Option<&StoryboardId> {
        self.pending_delete.as_ref()
    }

    /// Persist the editor contents into the active storyboard (or a new one).
    pub fn save(&mut self) -> StoryboardId {
        let id = self.repository.save_active(
            self.editor.scenes().to_vec(),
            self.editor.project_type,
            self.editor.generated_spec.clone(),
        );
        info!(id = %id, scenes = self.editor.scenes().len(), "storyboard_saved");
        id
    }

    /// Load a stored storyboard into the editor. Unknown ids change nothing.
    ///
    /// Switching to a different storyboard orphans any request in flight;
    /// reloading the active one does not.
    pub fn select(&mut self, id: &StoryboardId) -> bool {
        let switching = self.repository.active_id() != Some(id);
        let Some(selection) = self.repository.select(id) else {
            debug!(id = %id, "select_unknown_storyboard");
            return false;
        };
        self.editor.load(selection);
        if switching {
            self.epoch += 1;
        }
        true
    }

    /// Mark a storyboard for deletion pending confirmation.
    pub fn request_delete(&mut self, id: &StoryboardId) -> bool {
        if self.repository.get(id).is_none() {
            return false;
        }
        self.pending_delete = Some(id.clone());
        true
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Delete the storyboard awaiting confirmation. Returns true when it was
    /// the active one and the editor was reset.
    pub fn confirm_delete(&mut self) -> bool {
        let Some(id) = self.pending_delete.take() else {
            return false;
        };
        if self.repository.delete(&id) {
            self.editor.reset();
            self.epoch += 1;
            true
        } else {
            false
        }
    }

    /// Start over with an empty, unsaved storyboard.
    pub fn new_storyboard(&mut self) {
        self.repository.clear_active();
        self.editor.reset();
        self.epoch += 1;
        info!("storyboard_new");
    }

    /// Validate and compile, moving to `Requesting` on success.
    ///
    /// Incomplete scenes need `confirmed` to proceed.
    pub fn begin_generation(&mut self, confirmed: bool) -> BeginOutcome {
        if self.generation.is_requesting() {
            return BeginOutcome::AlreadyRequesting;
        }
        let incomplete = self.editor.incomplete_scenes();
        if !incomplete.is_empty() && !confirmed {
            debug!(?incomplete, "generation_needs_confirmation");
            return BeginOutcome::NeedsConfirmation(incomplete);
        }
        if self.generation.begin().is_err() {
            return BeginOutcome::AlreadyRequesting;
        }
        self.request_epoch = Some(self.epoch);
        let prompt = compile_for(self.target, self.editor.scenes(), self.editor.project_type);
        BeginOutcome::Started { prompt }
    }

    /// Apply the completion result.
    pub fn finish_generation(&mut self, result: Result<String, CompletionError>) -> FinishOutcome {
        let request_epoch = self.request_epoch.take();
        match result {
            Ok(text) => {
                self.generation.succeed();
                if request_epoch != Some(self.epoch) {
                    warn!("generation_result_discarded");
                    return FinishOutcome::Discarded;
                }
                let attached = self.repository.attach_generated(&text);
                self.editor.generated_spec = Some(text);
                FinishOutcome::Stored { attached }
            }
            Err(err) => {
                let message = err.user_message(self.target);
                self.generation.fail(message.clone());
                FinishOutcome::Failed { message }
            }
        }
    }

    /// Clear a finished generation once the user has seen it.
    pub fn acknowledge_generation(&mut self) {
        self.generation.acknowledge();
    }
}
