//! UI rendering functions.

use std::time::Duration;

use chrono::Local;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs, Wrap};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::app::{App, AppStatus, FocusPane};
use crate::modal_ui::{draw_confirm_modal, draw_popup, draw_result_view, draw_settings_modal};
use crate::model::{ProjectType, SceneField, UNTITLED_STORYBOARD};

/// Width of the history panel, borders included.
const HISTORY_WIDTH: u16 = 34;

/// Formats a duration as M:SS (under 1 hour) or H:MM:SS (1+ hours).
pub fn format_elapsed(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

/// Truncates a string to the given display width, appending "..." if
/// truncated. Wide characters count as two columns.
pub fn truncate_str(s: &str, max_width: usize) -> String {
    // Replace newlines with spaces for single-line display
    let single_line: String = s.chars().map(|c| if c == '\n' { ' ' } else { c }).collect();

    if single_line.width() <= max_width {
        return single_line;
    }

    let budget = max_width.saturating_sub(3);
    let mut used = 0;
    let mut out = String::new();
    for c in single_line.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push_str("...");
    out
}

/// Calculate a centered rectangle within the given area.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

/// Hint shown in an empty field.
fn field_hint(field: SceneField) -> &'static str {
    match field {
        SceneField::Title => "例如：商品列表頁",
        SceneField::Objective => "這個畫面要讓使用者完成什麼？",
        SceneField::Layout => "畫面上有哪些區塊、按鈕、表單？",
        SceneField::Interactions => "點擊、輸入、切換後會發生什麼？",
        SceneField::References => "API 文件、設計稿連結（選填）",
    }
}

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

/// Draw the main UI.
pub fn draw_ui(f: &mut Frame, app: &mut App) {
    // Increment frame counter for animations
    app.frame_count = app.frame_count.wrapping_add(1);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // History + editor
            Constraint::Length(3), // Command panel (border + 1 content row + border)
        ])
        .split(f.area());

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(HISTORY_WIDTH), Constraint::Min(0)])
        .split(chunks[0]);

    draw_history(f, app, body[0]);
    draw_editor(f, app, body[1]);
    draw_command_panel(f, app, chunks[1]);

    if app.result_view_state.is_some() {
        draw_result_view(f, app);
    }
    if app.settings_modal_state.is_some() {
        draw_settings_modal(f, app);
    }
    if app.confirm_modal_state.is_some() {
        draw_confirm_modal(f, app);
    }
    if app.popup.is_some() {
        draw_popup(f, app);
    }
}

fn draw_history(f: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == FocusPane::History;
    let history = app.workbench.history();
    let active_id = app.workbench.active_id();
    let text_width = area.width.saturating_sub(6) as usize;

    let items: Vec<ListItem> = history
        .iter()
        .map(|sb| {
            let is_active = active_id == Some(&sb.id);
            let marker = if is_active { "▶ " } else { "  " };
            let title_style = if is_active {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let updated = sb.updated_at.with_timezone(&Local).format("%m/%d %H:%M");
            let mut meta = vec![Span::styled(
                format!("  {}  {} 個場景", updated, sb.scenes.len()),
                Style::default().fg(Color::DarkGray),
            )];
            if sb.generated_spec.is_some() {
                meta.push(Span::styled(" ✓", Style::default().fg(Color::Green)));
            }
            ListItem::new(vec![
                Line::from(vec![
                    Span::raw(marker),
                    Span::styled(truncate_str(&sb.title, text_width), title_style),
                ]),
                Line::from(meta),
            ])
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(focus_style(focused))
        .title(Line::from(format!(" 紀錄 ({}) ", app.workbench.repository().len())).left_aligned());

    if items.is_empty() {
        let empty = Paragraph::new("尚無紀錄")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let highlight = if focused {
        Style::default().bg(Color::DarkGray)
    } else {
        Style::default()
    };
    let list = List::new(items).block(block).highlight_style(highlight);
    let mut state = ListState::default().with_selected(Some(app.history_selected));
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_editor(f: &mut Frame, app: &App, area: Rect) {
    let status = app.status();
    let title = app
        .workbench
        .repository()
        .active()
        .map(|sb| sb.title.clone())
        .unwrap_or_else(|| format!("{}（未儲存）", UNTITLED_STORYBOARD));

    let outer = Block::default()
        .borders(Borders::ALL)
        .border_type(status.border_type())
        .border_style(Style::default().fg(status.pulsing_color(app.frame_count)))
        .title(Line::from(format!(" {} ", title)).left_aligned())
        .title(Line::from(format!(" {} ", app.session_id)).right_aligned());
    let inner = outer.inner(area);
    f.render_widget(outer, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Project type selector
            Constraint::Length(3), // Scene tabs
            Constraint::Min(0),    // Scene fields
        ])
        .split(inner);

    draw_project_type(f, app.workbench.editor.project_type, rows[0]);
    draw_scene_tabs(f, app, rows[1]);
    draw_scene_fields(f, app, rows[2]);
}

fn draw_project_type(f: &mut Frame, selected: ProjectType, area: Rect) {
    let mut options = Vec::new();
    for project_type in ProjectType::ALL {
        let (dot, style) = if project_type == selected {
            (
                "◉ ",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )
        } else {
            ("○ ", Style::default().fg(Color::DarkGray))
        };
        options.push(Span::styled(format!("{}{}", dot, project_type.label()), style));
        options.push(Span::raw("   "));
    }

    let lines = vec![
        Line::from(options),
        Line::from(selected.description()),
        Line::styled(selected.example(), Style::default().fg(Color::DarkGray)),
        Line::styled(
            format!("技術：{}", selected.tech_details()),
            Style::default().fg(Color::DarkGray),
        ),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" 專案類型 [Ctrl-t] ");
    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn draw_scene_tabs(f: &mut Frame, app: &App, area: Rect) {
    let editor = &app.workbench.editor;
    let titles: Vec<Line> = editor
        .scenes()
        .iter()
        .enumerate()
        .map(|(i, scene)| {
            let label = match scene.title.trim() {
                "" => format!("場景 {}", i + 1),
                t => format!("{}. {}", i + 1, truncate_str(t, 12)),
            };
            if scene.is_incomplete() {
                Line::styled(label, Style::default().fg(Color::Yellow))
            } else {
                Line::from(label)
            }
        })
        .collect();

    let tabs = Tabs::new(titles)
        .select(editor.active_index())
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" 場景 [PgUp/PgDn] [Alt-1..9] ")
                .title_bottom(Line::from(" [Ctrl-a] 新增  [Ctrl-d] 刪除 ").right_aligned()),
        );
    f.render_widget(tabs, area);
}

fn draw_scene_fields(f: &mut Frame, app: &App, area: Rect) {
    let constraints: Vec<Constraint> = SceneField::ALL
        .iter()
        .map(|field| {
            if field.is_multiline() && *field != SceneField::References {
                Constraint::Fill(1)
            } else {
                Constraint::Length(3)
            }
        })
        .collect();
    let areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    let scene = app.workbench.editor.active_scene();
    let focused_field = app.focused_field();

    for (field, field_area) in SceneField::ALL.into_iter().zip(areas.iter().copied()) {
        let focused = focused_field == Some(field);
        let value = scene.field(field);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(focus_style(focused))
            .title(format!(" {} ", field.label()));
        let inner_height = field_area.height.saturating_sub(2);
        let inner_width = field_area.width.saturating_sub(2);

        if value.is_empty() {
            let hint = Paragraph::new(field_hint(field))
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            f.render_widget(hint, field_area);
        } else {
            let (scroll_y, scroll_x) = if focused {
                let (row, col) = app.form.cursor_position(&app.workbench.editor);
                (
                    row.saturating_sub(inner_height.saturating_sub(1)),
                    col.saturating_sub(inner_width.saturating_sub(1)),
                )
            } else {
                (0, 0)
            };
            let paragraph = Paragraph::new(value)
                .block(block)
                .scroll((scroll_y, scroll_x));
            f.render_widget(paragraph, field_area);
        }

        if focused && !app.has_modal() && inner_height > 0 && inner_width > 0 {
            let (row, col) = app.form.cursor_position(&app.workbench.editor);
            let row = row.min(inner_height - 1);
            let col = col.min(inner_width - 1);
            f.set_cursor_position((field_area.x + 1 + col, field_area.y + 1 + row));
        }
    }
}

fn shortcuts_for(app: &App) -> &'static str {
    match (app.focus, app.status()) {
        (FocusPane::History, _) => {
            "[Enter] 載入  [d] 刪除  [v] 檢視  [n] 新建  [Esc] 編輯  [q] 離開"
        }
        (FocusPane::Editor, AppStatus::Generating) => {
            "[^S] 儲存  [^N] 新建  [^E] 設定  [Esc] 紀錄  [^Q] 離開"
        }
        (FocusPane::Editor, _) => {
            "[^S] 儲存  [^G] 生成  [^N] 新建  [^O] 檢視  [^E] 設定  [Esc] 紀錄  [^Q] 離開"
        }
    }
}

fn draw_command_panel(f: &mut Frame, app: &App, area: Rect) {
    let status = app.status();

    let (left, left_style) = match app.current_notice() {
        Some(notice) => (notice.to_string(), Style::default().fg(Color::Yellow)),
        None => (
            shortcuts_for(app).to_string(),
            Style::default().fg(Color::DarkGray),
        ),
    };

    // Status indicator: colored dot + text (elapsed time while generating)
    let status_dot = "● ";
    let status_text = match status {
        AppStatus::Idle => format!("{} · IDLE", app.workbench.target().label()),
        AppStatus::Generating => {
            let elapsed = app.workbench.generation().elapsed().unwrap_or_default();
            format!("生成中 {}", format_elapsed(elapsed))
        }
        AppStatus::Error => "ERROR".to_string(),
    };
    let status_color = status.pulsing_color(app.frame_count);

    // Calculate spacing to right-align the status indicator
    let inner_width = area.width.saturating_sub(2) as usize;
    let status_len = status_dot.width() + status_text.width();
    let left = truncate_str(&left, inner_width.saturating_sub(status_len + 1));
    let spacing = inner_width.saturating_sub(left.width() + status_len);

    let command_line = Line::from(vec![
        Span::styled(left, left_style),
        Span::raw(" ".repeat(spacing)),
        Span::styled(status_dot, Style::default().fg(status_color)),
        Span::styled(status_text, Style::default().fg(status_color)),
    ]);

    let command_panel = Paragraph::new(command_line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(status.border_type())
            .border_style(Style::default().fg(status_color)),
    );

    f.render_widget(command_panel, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use crate::app::App;
    use crate::config::{Config, ConfigLoadStatus, LoadedConfig};

    // format_elapsed tests

    #[test]
    fn test_format_elapsed_zero() {
        assert_eq!(format_elapsed(Duration::from_secs(0)), "0:00");
    }

    #[test]
    fn test_format_elapsed_minutes_and_seconds() {
        assert_eq!(format_elapsed(Duration::from_secs(59)), "0:59");
        assert_eq!(format_elapsed(Duration::from_secs(65)), "1:05");
        assert_eq!(format_elapsed(Duration::from_secs(3599)), "59:59");
    }

    #[test]
    fn test_format_elapsed_hours() {
        assert_eq!(format_elapsed(Duration::from_secs(3600)), "1:00:00");
        assert_eq!(format_elapsed(Duration::from_secs(7325)), "2:02:05");
    }

    // truncate_str tests

    #[test]
    fn test_truncate_str_short_string() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello", 5), "hello");
    }

    #[test]
    fn test_truncate_str_long_string() {
        assert_eq!(truncate_str("hello world", 8), "hello...");
        assert_eq!(truncate_str("hello world", 10), "hello w...");
    }

    #[test]
    fn test_truncate_str_with_newlines() {
        assert_eq!(truncate_str("a\nb\nc", 10), "a b c");
        assert_eq!(truncate_str("hello\nworld", 8), "hello...");
    }

    #[test]
    fn test_truncate_str_wide_chars() {
        assert_eq!(truncate_str("分鏡", 4), "分鏡");
        assert_eq!(truncate_str("分鏡腳本編輯器", 9), "分鏡腳...");
        // A wide char never straddles the budget.
        assert_eq!(truncate_str("分鏡腳本", 6), "分...");
    }

    #[test]
    fn test_truncate_str_small_max_len() {
        assert_eq!(truncate_str("hello", 2), "...");
        assert_eq!(truncate_str("hello", 4), "h...");
    }

    #[test]
    fn test_centered_rect_clamps_to_area() {
        let area = Rect::new(0, 0, 20, 10);
        assert_eq!(centered_rect(10, 4, area), Rect::new(5, 3, 10, 4));
        assert_eq!(centered_rect(40, 40, area), Rect::new(0, 0, 20, 10));
    }

    fn render(app: &mut App) -> String {
        let backend = TestBackend::new(120, 40);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw_ui(f, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect::<String>()
    }

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

    #[test]
    fn test_draw_ui_shows_panels() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        let screen = render(&mut app);
        assert!(screen.contains("abc123"));
        assert!(screen.contains("IDLE"));
        assert_eq!(app.frame_count, 1);
    }

    #[test]
    fn test_draw_ui_with_modals_does_not_panic() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        app.workbench.editor.generated_spec = Some("P0\nP1".to_string());
        app.open_generated_view();
        app.open_settings();
        render(&mut app);
        let view = app.result_view_state.as_ref().unwrap();
        assert!(view.viewport_width > 0);
        assert!(view.viewport_height > 0);
    }
}
