//! Modal dialog state and input handling.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use tracing::debug;

use crate::app::App;
use crate::config::{CompletionConfig, Config, LoggingConfig, PromptConfig, StorageConfig};
use crate::form::byte_index;
use crate::prompt::PromptTarget;
use crate::validators::{
    CONFIRM_DELETE_MESSAGE, CONFIRM_INCOMPLETE_MESSAGE, incomplete_scenes_warning,
    validate_endpoint, validate_env_var_name, validate_model, validate_storage_path,
};

/// What a confirmation dialog is asking about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmKind {
    DeleteStoryboard { title: String },
    IncompleteScenes(Vec<usize>),
}

/// Which button is focused in a confirmation dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmField {
    ConfirmButton,
    CancelButton,
}

impl ConfirmField {
    pub fn next(self) -> Self {
        match self {
            Self::ConfirmButton => Self::CancelButton,
            Self::CancelButton => Self::ConfirmButton,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfirmModalState {
    pub kind: ConfirmKind,
    pub focus: ConfirmField,
}

impl ConfirmModalState {
    /// Deletion starts on Cancel; everything else starts on Confirm.
    pub fn new(kind: ConfirmKind) -> Self {
        let focus = match kind {
            ConfirmKind::DeleteStoryboard { .. } => ConfirmField::CancelButton,
            ConfirmKind::IncompleteScenes(_) => ConfirmField::ConfirmButton,
        };
        Self { kind, focus }
    }

    pub fn title(&self) -> &'static str {
        match self.kind {
            ConfirmKind::DeleteStoryboard { .. } => " 刪除紀錄 ",
            ConfirmKind::IncompleteScenes(_) => " 場景未完成 ",
        }
    }

    /// Body lines shown above the buttons.
    pub fn lines(&self) -> Vec<String> {
        match &self.kind {
            ConfirmKind::DeleteStoryboard { title } => {
                vec![format!("「{}」", title), CONFIRM_DELETE_MESSAGE.to_string()]
            }
            ConfirmKind::IncompleteScenes(indices) => {
                let mut lines = Vec::new();
                if let Some(warning) = incomplete_scenes_warning(indices) {
                    lines.push(warning);
                }
                lines.push(CONFIRM_INCOMPLETE_MESSAGE.to_string());
                lines
            }
        }
    }
}

/// Scrollable read-only view of a prompt pack.
#[derive(Debug, Clone)]
pub struct ResultViewState {
    pub title: String,
    pub text: String,
    pub scroll: u16,
    /// Inner size from the last draw, used for scroll bounds.
    pub viewport_height: u16,
    pub viewport_width: u16,
}

impl ResultViewState {
    pub fn new(title: String, text: String) -> Self {
        Self {
            title,
            text,
            scroll: 0,
            viewport_height: 0,
            viewport_width: 0,
        }
    }

    pub fn visual_line_count(&self) -> u16 {
        if self.viewport_width == 0 {
            return 0;
        }
        let paragraph = Paragraph::new(self.text.as_str())
            .block(Block::default().borders(Borders::ALL))
            .wrap(Wrap { trim: false });
        paragraph.line_count(self.viewport_width.saturating_add(2)) as u16
    }

    pub fn max_scroll(&self) -> u16 {
        self.visual_line_count()
            .saturating_sub(self.viewport_height)
    }

    pub fn scroll_up(&mut self, amount: u16) {
        self.scroll = self.scroll.saturating_sub(amount);
    }

    pub fn scroll_down(&mut self, amount: u16) {
        self.scroll = (self.scroll.saturating_add(amount)).min(self.max_scroll());
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll = 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll = self.max_scroll();
    }
}

/// Log level options for the dropdown.
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Which field is focused in the settings modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingsField {
    Endpoint,
    Model,
    CopilotModel,
    ApiKeyEnv,
    StoragePath,
    Target,
    LogLevel,
    SaveButton,
    CancelButton,
}

impl SettingsField {
    pub fn next(self) -> Self {
        match self {
            Self::Endpoint => Self::Model,
            Self::Model => Self::CopilotModel,
            Self::CopilotModel => Self::ApiKeyEnv,
            Self::ApiKeyEnv => Self::StoragePath,
            Self::StoragePath => Self::Target,
            Self::Target => Self::LogLevel,
            Self::LogLevel => Self::SaveButton,
            Self::SaveButton => Self::CancelButton,
            Self::CancelButton => Self::Endpoint,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Endpoint => Self::CancelButton,
            Self::Model => Self::Endpoint,
            Self::CopilotModel => Self::Model,
            Self::ApiKeyEnv => Self::CopilotModel,
            Self::StoragePath => Self::ApiKeyEnv,
            Self::Target => Self::StoragePath,
            Self::LogLevel => Self::Target,
            Self::SaveButton => Self::LogLevel,
            Self::CancelButton => Self::SaveButton,
        }
    }

    pub fn is_text(self) -> bool {
        matches!(
            self,
            Self::Endpoint
                | Self::Model
                | Self::CopilotModel
                | Self::ApiKeyEnv
                | Self::StoragePath
        )
    }
}

/// State for the settings modal form.
#[derive(Debug, Clone)]
pub struct SettingsModalState {
    pub focus: SettingsField,
    pub endpoint: String,
    pub model: String,
    pub copilot_model: String,
    pub api_key_env: String,
    pub storage_path: String,
    pub target: PromptTarget,
    pub log_level_index: usize,
    /// Char index within the focused text field.
    pub cursor_pos: usize,
    /// Error message to display (e.g., save failed).
    pub error: Option<String>,
    pub validation_errors: HashMap<SettingsField, String>,
}

impl SettingsModalState {
    pub fn from_config(config: &Config) -> Self {
        let log_level_index = LOG_LEVELS
            .iter()
            .position(|&l| l == config.logging.level)
            .unwrap_or(2);

        Self {
            focus: SettingsField::Endpoint,
            endpoint: config.completion.endpoint.clone(),
            model: config.completion.model.clone(),
            copilot_model: config.completion.copilot_model.clone(),
            api_key_env: config.completion.api_key_env.clone(),
            storage_path: config.storage.path.clone(),
            target: config.prompt.target,
            log_level_index,
            cursor_pos: config.completion.endpoint.chars().count(),
            error: None,
            validation_errors: HashMap::new(),
        }
    }

    pub fn current_field_value(&self) -> Option<&String> {
        match self.focus {
            SettingsField::Endpoint => Some(&self.endpoint),
            SettingsField::Model => Some(&self.model),
            SettingsField::CopilotModel => Some(&self.copilot_model),
            SettingsField::ApiKeyEnv => Some(&self.api_key_env),
            SettingsField::StoragePath => Some(&self.storage_path),
            _ => None,
        }
    }

    fn current_field_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            SettingsField::Endpoint => Some(&mut self.endpoint),
            SettingsField::Model => Some(&mut self.model),
            SettingsField::CopilotModel => Some(&mut self.copilot_model),
            SettingsField::ApiKeyEnv => Some(&mut self.api_key_env),
            SettingsField::StoragePath => Some(&mut self.storage_path),
            _ => None,
        }
    }

    fn current_len(&self) -> usize {
        self.current_field_value()
            .map(|v| v.chars().count())
            .unwrap_or(0)
    }

    /// Validates the field being left.
    pub fn focus_next(&mut self) {
        let leaving = self.focus;
        self.focus = self.focus.next();
        self.cursor_pos = self.current_len();
        self.validate_field(leaving);
    }

    /// Validates the field being left.
    pub fn focus_prev(&mut self) {
        let leaving = self.focus;
        self.focus = self.focus.prev();
        self.cursor_pos = self.current_len();
        self.validate_field(leaving);
    }

    pub fn insert_char(&mut self, c: char) {
        let cursor = self.cursor_pos;
        let Some(value) = self.current_field_mut() else {
            return;
        };
        let at = byte_index(value, cursor);
        value.insert(at, c);
        self.cursor_pos += 1;
        self.clear_current_field_error();
    }

    /// Backspace.
    pub fn delete_char_before(&mut self) {
        if self.cursor_pos == 0 {
            return;
        }
        let cursor = self.cursor_pos;
        let Some(value) = self.current_field_mut() else {
            return;
        };
        let at = byte_index(value, cursor - 1);
        value.remove(at);
        self.cursor_pos -= 1;
        self.clear_current_field_error();
    }

    /// Delete key.
    pub fn delete_char_at(&mut self) {
        let cursor = self.cursor_pos;
        let Some(value) = self.current_field_mut() else {
            return;
        };
        if cursor < value.chars().count() {
            let at = byte_index(value, cursor);
            value.remove(at);
            self.clear_current_field_error();
        }
    }

    pub fn cursor_left(&mut self) {
        self.cursor_pos = self.cursor_pos.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        if self.cursor_pos < self.current_len() {
            self.cursor_pos += 1;
        }
    }

    pub fn cursor_home(&mut self) {
        self.cursor_pos = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor_pos = self.current_len();
    }

    pub fn toggle_target(&mut self) {
        self.target = match self.target {
            PromptTarget::Cursor => PromptTarget::Copilot,
            PromptTarget::Copilot => PromptTarget::Cursor,
        };
    }

    pub fn log_level_prev(&mut self) {
        self.log_level_index = self
            .log_level_index
            .checked_sub(1)
            .unwrap_or(LOG_LEVELS.len() - 1);
    }

    pub fn log_level_next(&mut self) {
        self.log_level_index = (self.log_level_index + 1) % LOG_LEVELS.len();
    }

    pub fn selected_log_level(&self) -> &'static str {
        LOG_LEVELS[self.log_level_index]
    }

    pub fn has_validation_errors(&self) -> bool {
        !self.validation_errors.is_empty()
    }

    pub fn validate_field(&mut self, field: SettingsField) {
        let error = match field {
            SettingsField::Endpoint => validate_endpoint(&self.endpoint),
            SettingsField::Model => validate_model(&self.model),
            // Empty means the shared model.
            SettingsField::CopilotModel if self.copilot_model.trim().is_empty() => None,
            SettingsField::CopilotModel => validate_model(&self.copilot_model),
            SettingsField::ApiKeyEnv => validate_env_var_name(&self.api_key_env),
            // Empty means the platform default.
            SettingsField::StoragePath if self.storage_path.trim().is_empty() => None,
            SettingsField::StoragePath => validate_storage_path(&self.storage_path),
            _ => None,
        };

        if let Some(msg) = error {
            self.validation_errors.insert(field, msg);
        } else {
            self.validation_errors.remove(&field);
        }
    }

    pub fn validate_all(&mut self) {
        for field in [
            SettingsField::Endpoint,
            SettingsField::Model,
            SettingsField::CopilotModel,
            SettingsField::ApiKeyEnv,
            SettingsField::StoragePath,
        ] {
            self.validate_field(field);
        }
    }

    fn clear_current_field_error(&mut self) {
        self.validation_errors.remove(&self.focus);
    }

    pub fn to_config(&self) -> Config {
        Config {
            completion: CompletionConfig {
                endpoint: self.endpoint.trim().to_string(),
                model: self.model.trim().to_string(),
                copilot_model: self.copilot_model.trim().to_string(),
                api_key_env: self.api_key_env.clone(),
            },
            prompt: PromptConfig {
                target: self.target,
            },
            storage: StorageConfig {
                path: self.storage_path.trim().to_string(),
            },
            logging: LoggingConfig {
                level: self.selected_log_level().to_string(),
            },
        }
    }
}

/// Handle keyboard input for a confirmation dialog.
pub fn handle_confirm_modal_input(app: &mut App, key_code: KeyCode) {
    let Some(state) = &mut app.confirm_modal_state else {
        return;
    };

    match key_code {
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Left | KeyCode::Right => {
            state.focus = state.focus.next();
        }
        KeyCode::Esc | KeyCode::Char('n') => {
            app.cancel_confirm();
        }
        KeyCode::Char('y') => {
            app.accept_confirm();
        }
        KeyCode::Enter => match state.focus {
            ConfirmField::ConfirmButton => app.accept_confirm(),
            ConfirmField::CancelButton => app.cancel_confirm(),
        },
        _ => {}
    }
}

/// Handle keyboard input for the prompt pack viewer.
pub fn handle_result_view_input(app: &mut App, key_code: KeyCode, modifiers: KeyModifiers) {
    let Some(state) = &mut app.result_view_state else {
        return;
    };
    let page = state.viewport_height.max(1);

    match key_code {
        KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => {
            app.close_result_view();
        }
        KeyCode::Char('k') | KeyCode::Up => state.scroll_up(1),
        KeyCode::Char('j') | KeyCode::Down => state.scroll_down(1),
        KeyCode::Char('u') if modifiers.contains(KeyModifiers::CONTROL) => {
            state.scroll_up(page / 2)
        }
        KeyCode::Char('d') if modifiers.contains(KeyModifiers::CONTROL) => {
            state.scroll_down(page / 2)
        }
        KeyCode::PageUp => state.scroll_up(page),
        KeyCode::PageDown | KeyCode::Char(' ') => state.scroll_down(page),
        KeyCode::Home | KeyCode::Char('g') => state.scroll_to_top(),
        KeyCode::End | KeyCode::Char('G') => state.scroll_to_bottom(),
        _ => {}
    }
}

/// Handle keyboard input for the notice / error popup.
pub fn handle_popup_input(app: &mut App, key_code: KeyCode) {
    if matches!(key_code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char('q')) {
        app.dismiss_popup();
    }
}

/// Handle keyboard input for the settings modal.
pub fn handle_settings_modal_input(app: &mut App, key_code: KeyCode, modifiers: KeyModifiers) {
    let Some(state) = &mut app.settings_modal_state else {
        return;
    };

    // Clear any previous error when user takes action
    if state.error.is_some() && key_code != KeyCode::Esc {
        state.error = None;
    }

    match key_code {
        KeyCode::Tab => {
            if modifiers.contains(KeyModifiers::SHIFT) {
                state.focus_prev();
            } else {
                state.focus_next();
            }
        }
        KeyCode::BackTab => state.focus_prev(),

        KeyCode::Esc => {
            app.settings_modal_state = None;
        }

        KeyCode::Enter => match state.focus {
            SettingsField::SaveButton => {
                state.validate_all();
                if state.has_validation_errors() {
                    return;
                }
                let new_config = state.to_config();
                match app.apply_settings(new_config) {
                    Ok(()) => {
                        app.settings_modal_state = None;
                        debug!("settings_saved_via_modal");
                    }
                    Err(e) => {
                        if let Some(state) = &mut app.settings_modal_state {
                            state.error = Some(e);
                        }
                    }
                }
            }
            SettingsField::CancelButton => {
                app.settings_modal_state = None;
            }
            SettingsField::Target => state.toggle_target(),
            _ => state.focus_next(),
        },

        KeyCode::Char(c) if state.focus.is_text() => state.insert_char(c),
        KeyCode::Char(' ') if state.focus == SettingsField::Target => state.toggle_target(),

        KeyCode::Backspace => state.delete_char_before(),
        KeyCode::Delete => state.delete_char_at(),

        KeyCode::Left => match state.focus {
            SettingsField::LogLevel => state.log_level_prev(),
            SettingsField::Target => state.toggle_target(),
            _ => state.cursor_left(),
        },
        KeyCode::Right => match state.focus {
            SettingsField::LogLevel => state.log_level_next(),
            SettingsField::Target => state.toggle_target(),
            _ => state.cursor_right(),
        },
        KeyCode::Home => state.cursor_home(),
        KeyCode::End => state.cursor_end(),

        KeyCode::Up => match state.focus {
            SettingsField::LogLevel => state.log_level_prev(),
            SettingsField::Target => state.toggle_target(),
            SettingsField::SaveButton | SettingsField::CancelButton => state.focus_prev(),
            _ => {}
        },
        KeyCode::Down => match state.focus {
            SettingsField::LogLevel => state.log_level_next(),
            SettingsField::Target => state.toggle_target(),
            SettingsField::SaveButton | SettingsField::CancelButton => state.focus_next(),
            _ => {}
        },

        _ => {}
    }
}
