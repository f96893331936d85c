//! Modal UI rendering functions.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap,
};

use crate::app::App;
use crate::modals::{ConfirmField, SettingsField, SettingsModalState};
use crate::ui::centered_rect;

const FIELD_WIDTH: usize = 44;

fn label_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

/// Two buttons side by side; the confirm one is highlighted in cyan.
fn button_line(
    confirm: &'static str,
    confirm_focused: bool,
    confirm_disabled: bool,
    cancel: &'static str,
    cancel_focused: bool,
    indent: usize,
) -> Line<'static> {
    let confirm_style = if confirm_disabled {
        Style::default().fg(Color::DarkGray)
    } else if confirm_focused {
        Style::default().fg(Color::Black).bg(Color::Cyan)
    } else {
        Style::default().fg(Color::Cyan)
    };
    let cancel_style = if cancel_focused {
        Style::default().fg(Color::Black).bg(Color::White)
    } else {
        Style::default().fg(Color::White)
    };
    Line::from(vec![
        Span::raw(" ".repeat(indent)),
        Span::styled(confirm, confirm_style),
        Span::raw("    "),
        Span::styled(cancel, cancel_style),
    ])
}

/// A single-line text input, windowed around the cursor when too long.
fn render_field(value: &str, focused: bool, cursor_pos: usize) -> Vec<Span<'static>> {
    let chars: Vec<char> = value.chars().collect();
    let start = if chars.len() > FIELD_WIDTH {
        let end = (cursor_pos.saturating_sub(FIELD_WIDTH / 2) + FIELD_WIDTH).min(chars.len());
        end.saturating_sub(FIELD_WIDTH)
    } else {
        0
    };
    let end = (start + FIELD_WIDTH).min(chars.len());
    let visible = &chars[start..end];

    if !focused {
        return vec![Span::styled(
            visible.iter().collect::<String>(),
            Style::default().fg(Color::White),
        )];
    }

    let cursor = cursor_pos.saturating_sub(start).min(visible.len());
    let before: String = visible[..cursor].iter().collect();
    let (cursor_char, rest) = match visible.get(cursor) {
        Some(c) => (c.to_string(), visible[cursor + 1..].iter().collect()),
        None => (" ".to_string(), String::new()),
    };
    vec![
        Span::styled(before, Style::default().fg(Color::White)),
        Span::styled(
            cursor_char,
            Style::default().fg(Color::Black).bg(Color::White),
        ),
        Span::styled(rest, Style::default().fg(Color::White)),
    ]
}

/// Draw the prompt pack viewer.
pub fn draw_result_view(f: &mut Frame, app: &mut App) {
    let area = f.area();
    let modal_area = Rect::new(
        area.x + area.width / 10,
        area.y + 1,
        area.width - area.width / 5,
        area.height.saturating_sub(2),
    );
    let Some(state) = &mut app.result_view_state else {
        return;
    };

    f.render_widget(Clear, modal_area);

    state.viewport_height = modal_area.height.saturating_sub(2);
    state.viewport_width = modal_area.width.saturating_sub(2);
    state.scroll = state.scroll.min(state.max_scroll());

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Line::from(state.title.clone()).left_aligned())
        .title_bottom(
            Line::from(" [j/k] 捲動  [g/G] 開頭/結尾  [Esc] 關閉 ").right_aligned(),
        );

    let paragraph = Paragraph::new(state.text.as_str())
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((state.scroll, 0));
    f.render_widget(paragraph, modal_area);

    // Scrollbar - only visible when content exceeds viewport
    let visual_lines = state.visual_line_count();
    if visual_lines > state.viewport_height {
        let scrollbar = Scrollbar::default()
            .orientation(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("▲"))
            .end_symbol(Some("▼"));
        let mut scrollbar_state = ScrollbarState::default()
            .content_length(visual_lines as usize)
            .position(state.scroll as usize)
            .viewport_content_length(state.viewport_height as usize);
        f.render_stateful_widget(scrollbar, modal_area, &mut scrollbar_state);
    }
}

/// Draw a yes/no confirmation dialog.
pub fn draw_confirm_modal(f: &mut Frame, app: &App) {
    let Some(state) = &app.confirm_modal_state else {
        return;
    };

    let body = state.lines();
    let modal_width = 56;
    let modal_height = body.len() as u16 + 6;
    let modal_area = centered_rect(modal_width, modal_height, f.area());
    f.render_widget(Clear, modal_area);

    let mut content: Vec<Line> = vec![Line::from("")];
    content.extend(body.into_iter().map(Line::from));
    content.push(Line::from(""));
    let mut buttons = button_line(
        " 確定 ",
        state.focus == ConfirmField::ConfirmButton,
        false,
        " 取消 ",
        state.focus == ConfirmField::CancelButton,
        0,
    );
    buttons.alignment = Some(Alignment::Center);
    content.push(buttons);

    let modal = Paragraph::new(content)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .title(state.title())
                .title_bottom(Line::from(" [y] 確定  [n] 取消 ").right_aligned()),
        );
    f.render_widget(modal, modal_area);
}

/// Draw the notice / error popup.
pub fn draw_popup(f: &mut Frame, app: &App) {
    let Some(popup) = &app.popup else {
        return;
    };

    let modal_area = centered_rect(60, 9, f.area());
    f.render_widget(Clear, modal_area);

    let color = if popup.is_error {
        Color::Red
    } else {
        Color::Yellow
    };
    let content = Paragraph::new(popup.message.as_str())
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .title(popup.title.as_str())
                .title_bottom(Line::from(" [Enter] 關閉 ").right_aligned()),
        );
    f.render_widget(content, modal_area);
}

fn text_field_line(
    state: &SettingsModalState,
    field: SettingsField,
    label: &'static str,
    value: &str,
) -> Line<'static> {
    let focused = state.focus == field;
    let mut spans = vec![Span::styled(label, label_style(focused))];
    spans.extend(render_field(value, focused, state.cursor_pos));
    Line::from(spans)
}

fn selector_line(focused: bool, label: &'static str, value: &str) -> Line<'static> {
    let (display, style) = if focused {
        (format!("< {} >", value), Style::default().fg(Color::Cyan))
    } else {
        (value.to_string(), Style::default().fg(Color::White))
    };
    Line::from(vec![
        Span::styled(label, label_style(focused)),
        Span::styled(display, style),
    ])
}

/// Draw the settings modal.
pub fn draw_settings_modal(f: &mut Frame, app: &App) {
    let Some(state) = &app.settings_modal_state else {
        return;
    };

    let modal_width = 72;
    let modal_height = 26;
    let modal_area = centered_rect(modal_width, modal_height, f.area());
    f.render_widget(Clear, modal_area);

    let separator = "─".repeat(modal_width.saturating_sub(4) as usize);
    let dim = Style::default().fg(Color::DarkGray);
    let error_style = Style::default().fg(Color::Yellow);

    let log_dir_display = app
        .log_directory
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(not configured)".to_string());
    let storage_display = app.workbench.repository().storage_path().display().to_string();

    let mut content: Vec<Line> = vec![
        Line::from(vec![
            Span::styled("  Config file:   ", dim),
            Span::raw(app.config_path.display().to_string()),
        ]),
        Line::from(vec![
            Span::styled("  Log directory: ", dim),
            Span::raw(log_dir_display),
        ]),
        Line::from(vec![
            Span::styled("  History file:  ", dim),
            Span::raw(storage_display),
        ]),
        Line::from(format!("  {separator}")),
    ];

    // Optional fields show what an empty value means.
    let text_fields = [
        (SettingsField::Endpoint, "  Endpoint:      ", &state.endpoint, None),
        (SettingsField::Model, "  Model:         ", &state.model, None),
        (
            SettingsField::CopilotModel,
            "  Copilot model: ",
            &state.copilot_model,
            Some("(empty: same as Model)"),
        ),
        (SettingsField::ApiKeyEnv, "  API key var:   ", &state.api_key_env, None),
        (
            SettingsField::StoragePath,
            "  History path:  ",
            &state.storage_path,
            Some("(empty: platform data directory)"),
        ),
    ];
    for (field, label, value, empty_hint) in text_fields {
        content.push(text_field_line(state, field, label, value));
        if let Some(error) = state.validation_errors.get(&field) {
            content.push(Line::from(Span::styled(
                format!("                   \u{26a0} {}", error),
                error_style,
            )));
        } else if let Some(hint) = empty_hint
            && value.trim().is_empty()
            && state.focus != field
        {
            content.push(Line::from(Span::styled(
                format!("                   {hint}"),
                dim,
            )));
        }
    }

    content.push(selector_line(
        state.focus == SettingsField::Target,
        "  Prompt target: ",
        state.target.label(),
    ));
    content.push(selector_line(
        state.focus == SettingsField::LogLevel,
        "  Log level:     ",
        state.selected_log_level(),
    ));

    content.push(Line::from(""));
    match &state.error {
        Some(error) => content.push(Line::from(Span::styled(
            format!("  Error: {}", error),
            Style::default().fg(Color::Red),
        ))),
        None => content.push(Line::from("")),
    }

    content.push(button_line(
        " Save ",
        state.focus == SettingsField::SaveButton,
        state.has_validation_errors(),
        " Cancel ",
        state.focus == SettingsField::CancelButton,
        22,
    ));

    let modal = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Settings ")
            .title_bottom(Line::from(" [Tab] next  [Esc] close ").right_aligned()),
    );
    f.render_widget(modal, modal_area);
}
