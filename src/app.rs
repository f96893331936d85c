//! Application state and core logic.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::style::Color;
use ratatui::widgets::BorderType;
use tokio::runtime::Runtime;
use tracing::{debug, info, warn};

use crate::completion::{CompletionClient, CompletionError};
use crate::config::{Config, LoadedConfig, save_config};
use crate::form::SceneForm;
use crate::generation::GenerationState;
use crate::logging::{self, ReloadHandle};
use crate::modals::{
    ConfirmKind, ConfirmModalState, ResultViewState, SettingsModalState,
    handle_confirm_modal_input, handle_popup_input, handle_result_view_input,
    handle_settings_modal_input,
};
use crate::model::{SceneField, StoryboardId};
use crate::prompt::PromptTarget;
use crate::workbench::{BeginOutcome, FinishOutcome, Workbench};

/// How long a transient notice stays in the command panel.
const NOTICE_TTL: Duration = Duration::from_secs(3);

/// Application status states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppStatus {
    Idle,
    Generating,
    Error,
}

impl AppStatus {
    pub fn border_type(&self) -> BorderType {
        match self {
            AppStatus::Idle => BorderType::Rounded,
            AppStatus::Generating | AppStatus::Error => BorderType::Double,
        }
    }

    /// Returns the color for this status, with pulsing effect for Error state.
    /// The pulse alternates between red and dark red every 15 frames.
    pub fn pulsing_color(&self, frame_count: u64) -> Color {
        match self {
            AppStatus::Idle => Color::Cyan,
            AppStatus::Generating => Color::Green,
            AppStatus::Error => {
                if (frame_count / 15).is_multiple_of(2) {
                    Color::Red
                } else {
                    Color::Rgb(128, 0, 0)
                }
            }
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AppStatus::Idle => "Idle",
            AppStatus::Generating => "Generating",
            AppStatus::Error => "Error",
        }
    }
}

/// Pane that receives plain keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusPane {
    #[default]
    Editor,
    History,
}

impl FocusPane {
    pub fn toggle(self) -> Self {
        match self {
            Self::Editor => Self::History,
            Self::History => Self::Editor,
        }
    }
}

/// Dismissable message box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Popup {
    pub title: String,
    pub message: String,
    pub is_error: bool,
}

/// Main application state.
pub struct App {
    pub workbench: Workbench,
    pub form: SceneForm,
    pub focus: FocusPane,
    /// Index into the newest-first history list.
    pub history_selected: usize,
    /// Session ID for this invocation.
    pub session_id: String,
    /// Directory where logs are written.
    pub log_directory: Option<PathBuf>,
    pub config: Config,
    pub config_path: PathBuf,
    pub log_level_handle: Option<ReloadHandle>,
    /// Runs completion requests off the UI thread.
    pub runtime: Option<Runtime>,
    pub client: Option<Arc<CompletionClient>>,
    pub generation_rx: Option<Receiver<Result<String, CompletionError>>>,
    /// Frame counter for animations (incremented each render cycle).
    pub frame_count: u64,
    pub notice: Option<(String, Instant)>,
    pub popup: Option<Popup>,
    pub confirm_modal_state: Option<ConfirmModalState>,
    pub result_view_state: Option<ResultViewState>,
    pub settings_modal_state: Option<SettingsModalState>,
    pub should_quit: bool,
}

impl App {
    pub fn new(
        session_id: String,
        log_directory: Option<PathBuf>,
        loaded_config: LoadedConfig,
        log_level_handle: Option<ReloadHandle>,
    ) -> Self {
        let config = loaded_config.config;
        let workbench = Workbench::open(config.storage(), config.prompt.target);
        let mut form = SceneForm::default();
        form.reset(&workbench.editor);

        Self {
            workbench,
            form,
            focus: FocusPane::default(),
            history_selected: 0,
            session_id,
            log_directory,
            config,
            config_path: loaded_config.config_path,
            log_level_handle,
            runtime: None,
            client: None,
            generation_rx: None,
            frame_count: 0,
            notice: None,
            popup: None,
            confirm_modal_state: None,
            result_view_state: None,
            settings_modal_state: None,
            should_quit: false,
        }
    }

    /// Attach the runtime and client used for generation.
    pub fn with_completion(mut self, runtime: Runtime, client: CompletionClient) -> Self {
        self.runtime = Some(runtime);
        self.client = Some(Arc::new(client));
        self
    }

    pub fn status(&self) -> AppStatus {
        match self.workbench.generation() {
            GenerationState::Requesting { .. } => AppStatus::Generating,
            GenerationState::Failed { .. } => AppStatus::Error,
            _ => AppStatus::Idle,
        }
    }

    pub fn set_notice(&mut self, message: impl Into<String>) {
        self.notice = Some((message.into(), Instant::now()));
    }

    /// The notice text, if it has not expired yet.
    pub fn current_notice(&self) -> Option<&str> {
        self.notice
            .as_ref()
            .filter(|(_, at)| at.elapsed() < NOTICE_TTL)
            .map(|(msg, _)| msg.as_str())
    }

    fn show_error(&mut self, title: &str, message: String) {
        self.popup = Some(Popup {
            title: title.to_string(),
            message,
            is_error: true,
        });
    }

    pub fn dismiss_popup(&mut self) {
        self.popup = None;
        self.workbench.acknowledge_generation();
    }

    pub fn has_modal(&self) -> bool {
        self.popup.is_some()
            || self.confirm_modal_state.is_some()
            || self.settings_modal_state.is_some()
            || self.result_view_state.is_some()
    }

    // ---- storyboard actions ----

    pub fn save(&mut self) {
        let id = self.workbench.save();
        self.select_history_entry(&id);
        self.set_notice("分鏡腳本已儲存！");
    }

    pub fn new_storyboard(&mut self) {
        self.workbench.new_storyboard();
        self.form.reset(&self.workbench.editor);
        self.focus = FocusPane::Editor;
        self.set_notice("已建立新的分鏡腳本");
    }

    fn select_history_entry(&mut self, id: &StoryboardId) {
        if let Some(index) = self.workbench.history().iter().position(|sb| &sb.id == id) {
            self.history_selected = index;
        }
    }

    fn clamp_history_selection(&mut self) {
        let len = self.workbench.history().len();
        self.history_selected = self.history_selected.min(len.saturating_sub(1));
    }

    pub fn history_up(&mut self) {
        self.history_selected = self.history_selected.saturating_sub(1);
    }

    pub fn history_down(&mut self) {
        if self.history_selected + 1 < self.workbench.history().len() {
            self.history_selected += 1;
        }
    }

    /// Load the highlighted history entry into the editor.
    pub fn load_selected(&mut self) {
        let Some((id, title)) = self
            .workbench
            .history()
            .get(self.history_selected)
            .map(|sb| (sb.id.clone(), sb.title.clone()))
        else {
            return;
        };
        if self.workbench.select(&id) {
            self.form.reset(&self.workbench.editor);
            self.focus = FocusPane::Editor;
            self.set_notice(format!("已載入「{}」", title));
        }
    }

    pub fn request_delete_selected(&mut self) {
        let Some((id, title)) = self
            .workbench
            .history()
            .get(self.history_selected)
            .map(|sb| (sb.id.clone(), sb.title.clone()))
        else {
            return;
        };
        if self.workbench.request_delete(&id) {
            self.confirm_modal_state =
                Some(ConfirmModalState::new(ConfirmKind::DeleteStoryboard { title }));
        }
    }

    pub fn accept_confirm(&mut self) {
        let Some(state) = self.confirm_modal_state.take() else {
            return;
        };
        match state.kind {
            ConfirmKind::DeleteStoryboard { .. } => {
                if self.workbench.confirm_delete() {
                    self.form.reset(&self.workbench.editor);
                }
                self.clamp_history_selection();
                self.set_notice("紀錄已刪除");
            }
            ConfirmKind::IncompleteScenes(_) => self.start_generation(true),
        }
    }

    pub fn cancel_confirm(&mut self) {
        if let Some(state) = self.confirm_modal_state.take()
            && matches!(state.kind, ConfirmKind::DeleteStoryboard { .. })
        {
            self.workbench.cancel_delete();
        }
    }

    // ---- scene editing ----

    pub fn add_scene(&mut self) {
        self.workbench.editor.add_scene();
        self.form.reset(&self.workbench.editor);
    }

    pub fn delete_active_scene(&mut self) {
        let index = self.workbench.editor.active_index();
        if self.workbench.editor.delete_scene(index) {
            self.form.reset(&self.workbench.editor);
        } else {
            self.set_notice("至少需要保留一個場景");
        }
    }

    pub fn next_tab(&mut self) {
        self.workbench.editor.next_tab();
        self.form.sync(&self.workbench.editor);
    }

    /// Jump straight to the scene at `index`, if it exists.
    pub fn jump_to_tab(&mut self, index: usize) {
        self.workbench.editor.set_active(index);
        self.form.sync(&self.workbench.editor);
    }

    pub fn prev_tab(&mut self) {
        self.workbench.editor.prev_tab();
        self.form.sync(&self.workbench.editor);
    }

    pub fn cycle_project_type(&mut self, forward: bool) {
        let editor = &mut self.workbench.editor;
        editor.project_type = if forward {
            editor.project_type.next()
        } else {
            editor.project_type.prev()
        };
        debug!(project_type = %editor.project_type, "project_type_changed");
    }

    // ---- generation ----

    /// Start a generation. Incomplete scenes open a confirmation first
    /// unless `confirmed`.
    pub fn start_generation(&mut self, confirmed: bool) {
        match self.workbench.begin_generation(confirmed) {
            BeginOutcome::NeedsConfirmation(indices) => {
                self.confirm_modal_state = Some(ConfirmModalState::new(
                    ConfirmKind::IncompleteScenes(indices),
                ));
            }
            BeginOutcome::AlreadyRequesting => {
                self.set_notice("正在生成中，請稍候");
            }
            BeginOutcome::Started { prompt } => match self.dispatch(prompt) {
                Some(rx) => {
                    self.generation_rx = Some(rx);
                    info!(session_id = %self.session_id, "generation_dispatched");
                }
                None => {
                    let err = CompletionError::MissingCredential(
                        self.config.completion.api_key_env.clone(),
                    );
                    self.complete_generation(Err(err));
                }
            },
        }
    }

    /// Spawn the request on the runtime. `None` when no client is configured.
    fn dispatch(&self, prompt: String) -> Option<Receiver<Result<String, CompletionError>>> {
        let runtime = self.runtime.as_ref()?;
        let client = Arc::clone(self.client.as_ref()?);
        let target = self.workbench.target();
        let (tx, rx) = mpsc::channel();
        runtime.spawn(async move {
            let result = client.generate(target, &prompt).await;
            // Receiver gone means the app is shutting down.
            let _ = tx.send(result);
        });
        Some(rx)
    }

    /// Check whether the in-flight request has finished.
    pub fn poll_generation(&mut self) {
        let Some(rx) = &self.generation_rx else {
            return;
        };
        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => {
                warn!("generation_channel_disconnected");
                Err(CompletionError::Decode(
                    "completion task ended without a result".to_string(),
                ))
            }
        };
        self.generation_rx = None;
        self.complete_generation(result);
    }

    fn complete_generation(&mut self, result: Result<String, CompletionError>) {
        match self.workbench.finish_generation(result) {
            FinishOutcome::Stored { attached } => {
                if !attached {
                    self.set_notice("尚未儲存：生成結果會在下次儲存時一併保存");
                }
                self.open_generated_view();
            }
            FinishOutcome::Discarded => {
                self.workbench.acknowledge_generation();
                self.set_notice("已切換紀錄，捨棄先前的生成結果");
            }
            FinishOutcome::Failed { message } => {
                self.show_error(" 生成失敗 ", message);
            }
        }
    }

    /// Show the prompt pack held by the editor.
    pub fn open_generated_view(&mut self) {
        let Some(text) = self.workbench.editor.generated_spec.clone() else {
            self.set_notice("尚未生成 Prompts");
            return;
        };
        let title = format!(" {} Prompts ", self.workbench.target().label());
        self.result_view_state = Some(ResultViewState::new(title, text));
    }

    /// Show the prompt pack stored on the highlighted history entry.
    pub fn view_selected_history(&mut self) {
        let Some((title, generated)) = self
            .workbench
            .history()
            .get(self.history_selected)
            .map(|sb| (sb.title.clone(), sb.generated_spec.clone()))
        else {
            return;
        };
        match generated {
            Some(text) => {
                self.result_view_state = Some(ResultViewState::new(format!(" {} ", title), text));
            }
            None => self.set_notice("此紀錄沒有已生成的 Prompts"),
        }
    }

    pub fn close_result_view(&mut self) {
        self.result_view_state = None;
        self.workbench.acknowledge_generation();
    }

    // ---- settings ----

    pub fn open_settings(&mut self) {
        self.settings_modal_state = Some(SettingsModalState::from_config(&self.config));
    }

    /// Persist and apply new settings. The storage path applies on next start.
    pub fn apply_settings(&mut self, new_config: Config) -> Result<(), String> {
        let client = if new_config.completion != self.config.completion || self.client.is_none()
        {
            match CompletionClient::from_config(&new_config.completion) {
                Ok(client) => Some(Arc::new(client)),
                Err(e) => return Err(e.to_string()),
            }
        } else {
            None
        };

        save_config(&new_config, &self.config_path)?;

        if let Some(client) = client {
            info!(
                model = %client.model_for(PromptTarget::Cursor),
                copilot_model = %client.model_for(PromptTarget::Copilot),
                "completion_client_rebuilt"
            );
            self.client = Some(client);
        }

        if new_config.logging.level != self.config.logging.level
            && let Some(handle) = &self.log_level_handle
            && let Err(e) = logging::update_log_level(handle, &new_config.logging.level)
        {
            warn!(error = %e, "log_level_update_failed");
        }

        self.workbench.set_target(new_config.prompt.target);

        if new_config.storage != self.config.storage {
            self.set_notice("儲存位置將於下次啟動時生效");
        } else {
            self.set_notice("設定已儲存");
        }
        self.config = new_config;
        Ok(())
    }

    // ---- input ----

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if self.popup.is_some() {
            handle_popup_input(self, key.code);
            return;
        }
        if self.confirm_modal_state.is_some() {
            handle_confirm_modal_input(self, key.code);
            return;
        }
        if self.settings_modal_state.is_some() {
            handle_settings_modal_input(self, key.code, key.modifiers);
            return;
        }
        if self.result_view_state.is_some() {
            handle_result_view_input(self, key.code, key.modifiers);
            return;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            self.handle_control_key(key.code);
            return;
        }
        if key.modifiers.contains(KeyModifiers::ALT)
            && let KeyCode::Char(c @ '1'..='9') = key.code
        {
            self.jump_to_tab(c as usize - '1' as usize);
            return;
        }

        match key.code {
            KeyCode::Esc => self.focus = self.focus.toggle(),
            KeyCode::PageDown => self.next_tab(),
            KeyCode::PageUp => self.prev_tab(),
            _ => match self.focus {
                FocusPane::Editor => self.handle_editor_key(key),
                FocusPane::History => self.handle_history_key(key.code),
            },
        }
    }

    fn handle_control_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Char('c') => self.should_quit = true,
            KeyCode::Char('s') => self.save(),
            KeyCode::Char('g') => self.start_generation(false),
            KeyCode::Char('n') => self.new_storyboard(),
            KeyCode::Char('a') => self.add_scene(),
            KeyCode::Char('d') => self.delete_active_scene(),
            KeyCode::Char('t') => self.cycle_project_type(true),
            KeyCode::Char('T') => self.cycle_project_type(false),
            KeyCode::Char('o') => self.open_generated_view(),
            KeyCode::Char('e') => self.open_settings(),
            _ => {}
        }
    }

    fn handle_editor_key(&mut self, key: KeyEvent) {
        let editor = &mut self.workbench.editor;
        match key.code {
            KeyCode::Tab => self.form.focus_next(editor),
            KeyCode::BackTab => self.form.focus_prev(editor),
            KeyCode::Enter => {
                if self.form.focus.is_multiline() {
                    self.form.insert_char(editor, '\n');
                } else {
                    self.form.focus_next(editor);
                }
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::ALT) => {
                self.form.insert_char(editor, c);
            }
            KeyCode::Backspace => self.form.delete_char_before(editor),
            KeyCode::Delete => self.form.delete_char_at(editor),
            KeyCode::Left => self.form.cursor_left(),
            KeyCode::Right => self.form.cursor_right(editor),
            KeyCode::Home => self.form.cursor_home(editor),
            KeyCode::End => self.form.cursor_end(editor),
            KeyCode::Up => self.form.focus_prev(editor),
            KeyCode::Down => self.form.focus_next(editor),
            _ => {}
        }
    }

    fn handle_history_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('k') | KeyCode::Up => self.history_up(),
            KeyCode::Char('j') | KeyCode::Down => self.history_down(),
            KeyCode::Enter => self.load_selected(),
            KeyCode::Char('d') | KeyCode::Delete => self.request_delete_selected(),
            KeyCode::Char('v') => self.view_selected_history(),
            KeyCode::Char('n') => self.new_storyboard(),
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Tab => self.focus = FocusPane::Editor,
            _ => {}
        }
    }

    /// The focused scene field, for the UI to highlight.
    pub fn focused_field(&self) -> Option<SceneField> {
        (self.focus == FocusPane::Editor).then_some(self.form.focus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoadStatus;

    fn app_in(dir: &tempfile::TempDir) -> App {
        let mut config = Config::default();
        config.storage.path = dir
            .path()
            .join("history.json")
            .to_string_lossy()
            .into_owned();
        let loaded = LoadedConfig {
            config,
            config_path: dir.path().join("config.toml"),
            status: ConfigLoadStatus::Loaded,
        };
        App::new("abc123".to_string(), None, loaded, None)
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn ctrl(app: &mut App, c: char) {
        app.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL));
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_app_status_border_type() {
        assert_eq!(AppStatus::Idle.border_type(), BorderType::Rounded);
        assert_eq!(AppStatus::Generating.border_type(), BorderType::Double);
        assert_eq!(AppStatus::Error.border_type(), BorderType::Double);
    }

    #[test]
    fn test_app_status_pulsing_color() {
        assert_eq!(AppStatus::Idle.pulsing_color(0), Color::Cyan);
        assert_eq!(AppStatus::Generating.pulsing_color(7), Color::Green);
        assert_eq!(AppStatus::Error.pulsing_color(0), Color::Red);
        assert_eq!(AppStatus::Error.pulsing_color(15), Color::Rgb(128, 0, 0));
        assert_eq!(AppStatus::Error.pulsing_color(30), Color::Red);
    }

    #[test]
    fn test_typing_and_save() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        type_text(&mut app, "首頁");
        ctrl(&mut app, 's');

        assert_eq!(app.current_notice(), Some("分鏡腳本已儲存！"));
        let history = app.workbench.history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].title, "首頁");
    }

    #[test]
    fn test_enter_moves_from_title_but_breaks_lines_in_objective() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        type_text(&mut app, "A");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.form.focus, SceneField::Objective);
        type_text(&mut app, "x");
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "y");
        assert_eq!(app.workbench.editor.active_scene().objective, "x\ny");
    }

    #[test]
    fn test_release_events_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        let mut key = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;
        app.handle_key(key);
        assert_eq!(app.workbench.editor.active_scene().title, "");
    }

    #[test]
    fn test_delete_last_scene_refused_with_notice() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        ctrl(&mut app, 'd');
        assert_eq!(app.workbench.editor.scenes().len(), 1);
        assert_eq!(app.current_notice(), Some("至少需要保留一個場景"));
    }

    #[test]
    fn test_add_scene_and_switch_tabs() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        ctrl(&mut app, 'a');
        assert_eq!(app.workbench.editor.active_index(), 1);
        type_text(&mut app, "第二");
        press(&mut app, KeyCode::PageUp);
        assert_eq!(app.workbench.editor.active_index(), 0);
        assert_eq!(app.form.cursor, 0);
        press(&mut app, KeyCode::PageDown);
        assert_eq!(app.form.cursor, 2);
    }

    #[test]
    fn test_alt_digit_jumps_to_tab() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        ctrl(&mut app, 'a');
        ctrl(&mut app, 'a');
        let alt = |c| KeyEvent::new(KeyCode::Char(c), KeyModifiers::ALT);
        app.handle_key(alt('1'));
        assert_eq!(app.workbench.editor.active_index(), 0);
        app.handle_key(alt('9'));
        assert_eq!(app.workbench.editor.active_index(), 0);
        app.handle_key(alt('3'));
        assert_eq!(app.workbench.editor.active_index(), 2);
        assert_eq!(app.workbench.editor.active_scene().title, "");
    }

    #[test]
    fn test_generate_incomplete_asks_first() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        ctrl(&mut app, 'g');
        let state = app.confirm_modal_state.as_ref().unwrap();
        assert_eq!(state.kind, ConfirmKind::IncompleteScenes(vec![0]));

        press(&mut app, KeyCode::Char('n'));
        assert!(app.confirm_modal_state.is_none());
        assert_eq!(app.status(), AppStatus::Idle);
    }

    #[test]
    fn test_generate_without_client_reports_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        type_text(&mut app, "首頁");
        ctrl(&mut app, 'g');

        let popup = app.popup.clone().unwrap();
        assert!(popup.is_error);
        assert!(popup.message.contains("API_KEY"));
        assert_eq!(app.status(), AppStatus::Error);

        press(&mut app, KeyCode::Enter);
        assert!(app.popup.is_none());
        assert_eq!(app.status(), AppStatus::Idle);
    }

    #[test]
    fn test_poll_generation_opens_result_view() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        type_text(&mut app, "首頁");
        ctrl(&mut app, 's');
        assert!(matches!(
            app.workbench.begin_generation(false),
            BeginOutcome::Started { .. }
        ));

        let (tx, rx) = mpsc::channel();
        app.generation_rx = Some(rx);
        app.poll_generation();
        assert_eq!(app.status(), AppStatus::Generating);

        tx.send(Ok("P0 初始化".to_string())).unwrap();
        app.poll_generation();
        assert!(app.generation_rx.is_none());
        let view = app.result_view_state.as_ref().unwrap();
        assert_eq!(view.text, "P0 初始化");
        assert_eq!(view.title, " Cursor Prompts ");
        assert_eq!(
            app.workbench.history()[0].generated_spec.as_deref(),
            Some("P0 初始化")
        );

        press(&mut app, KeyCode::Esc);
        assert!(app.result_view_state.is_none());
        assert_eq!(*app.workbench.generation(), GenerationState::Idle);
    }

    #[test]
    fn test_poll_generation_disconnected_is_failure() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        type_text(&mut app, "首頁");
        app.workbench.begin_generation(false);

        let (tx, rx) = mpsc::channel::<Result<String, CompletionError>>();
        drop(tx);
        app.generation_rx = Some(rx);
        app.poll_generation();
        assert!(app.popup.as_ref().unwrap().is_error);
        assert!(app.workbench.editor.generated_spec.is_none());
    }

    #[test]
    fn test_history_delete_confirm_flow() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        type_text(&mut app, "首頁");
        ctrl(&mut app, 's');

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.focus, FocusPane::History);

        press(&mut app, KeyCode::Char('d'));
        assert!(app.confirm_modal_state.is_some());
        // Cancel has focus by default.
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.workbench.history().len(), 1);
        assert!(app.workbench.pending_delete().is_none());

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('y'));
        assert!(app.workbench.history().is_empty());
        assert_eq!(app.workbench.editor.active_scene().title, "");
    }

    #[test]
    fn test_history_load_selected() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        type_text(&mut app, "舊的");
        ctrl(&mut app, 's');
        ctrl(&mut app, 'n');
        assert_eq!(app.workbench.editor.active_scene().title, "");

        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.focus, FocusPane::Editor);
        assert_eq!(app.workbench.editor.active_scene().title, "舊的");
        assert_eq!(app.form.cursor, 2);
    }

    #[test]
    fn test_view_history_without_pack_sets_notice() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        ctrl(&mut app, 's');
        app.focus = FocusPane::History;
        press(&mut app, KeyCode::Char('v'));
        assert!(app.result_view_state.is_none());
        assert_eq!(app.current_notice(), Some("此紀錄沒有已生成的 Prompts"));
    }

    #[test]
    fn test_cycle_project_type() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        let before = app.workbench.editor.project_type;
        ctrl(&mut app, 't');
        assert_eq!(app.workbench.editor.project_type, before.next());
        app.handle_key(KeyEvent::new(
            KeyCode::Char('T'),
            KeyModifiers::CONTROL | KeyModifiers::SHIFT,
        ));
        assert_eq!(app.workbench.editor.project_type, before);
    }

    #[test]
    fn test_apply_settings_without_credential_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        let mut config = app.config.clone();
        config.completion.api_key_env = "STORYBOARD_TEST_UNSET_KEY".to_string();
        assert!(app.apply_settings(config).is_err());
        assert!(!app.config_path.exists());
    }

    #[test]
    fn test_apply_settings_switches_target() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        app.client = Some(Arc::new(CompletionClient::new(
            app.config.completion.endpoint.clone(),
            app.config.completion.model.clone(),
            "key".to_string(),
        )));
        let mut config = app.config.clone();
        config.prompt.target = PromptTarget::Copilot;

        app.apply_settings(config).unwrap();
        assert_eq!(app.workbench.target(), PromptTarget::Copilot);
        assert_eq!(app.config.prompt.target, PromptTarget::Copilot);
        assert!(app.config_path.exists());
    }

    #[test]
    fn test_quit_keys() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.should_quit);
        ctrl(&mut app, 'q');
        assert!(app.should_quit);
    }
}
