//! Text editing over the active scene's fields.
//!
//! The cursor is a char index into the focused field. Every edit is written
//! straight back through [`SceneEditor::update_scene`].

use unicode_width::UnicodeWidthStr;

use crate::editor::SceneEditor;
use crate::model::{SceneField, ScenePatch};

pub(crate) fn byte_index(value: &str, char_index: usize) -> usize {
    value
        .char_indices()
        .nth(char_index)
        .map(|(i, _)| i)
        .unwrap_or(value.len())
}

/// Row and display column of `cursor` inside `value`, for placing the
/// terminal cursor. Wide (CJK) characters count as two columns.
pub fn cursor_position(value: &str, cursor: usize) -> (u16, u16) {
    let before = &value[..byte_index(value, cursor)];
    let row = before.matches('\n').count();
    let line = before.rsplit('\n').next().unwrap_or("");
    (row as u16, line.width() as u16)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneForm {
    pub focus: SceneField,
    pub cursor: usize,
}

impl Default for SceneForm {
    fn default() -> Self {
        Self {
            focus: SceneField::Title,
            cursor: 0,
        }
    }
}

impl SceneForm {
    fn value(editor: &SceneEditor, field: SceneField) -> String {
        editor.active_scene().field(field).to_string()
    }

    fn char_len(editor: &SceneEditor, field: SceneField) -> usize {
        editor.active_scene().field(field).chars().count()
    }

    fn write(&self, editor: &mut SceneEditor, value: String) {
        let index = editor.active_index();
        editor.update_scene(index, ScenePatch::field(self.focus, value));
    }

    /// Put the cursor at the end of the focused field, e.g. after the
    /// active scene changed underneath the form.
    pub fn sync(&mut self, editor: &SceneEditor) {
        self.cursor = Self::char_len(editor, self.focus);
    }

    /// Back to the title field of whatever scene is active.
    pub fn reset(&mut self, editor: &SceneEditor) {
        self.focus = SceneField::Title;
        self.sync(editor);
    }

    pub fn focus_next(&mut self, editor: &SceneEditor) {
        self.focus = self.focus.next();
        self.sync(editor);
    }

    pub fn focus_prev(&mut self, editor: &SceneEditor) {
        self.focus = self.focus.prev();
        self.sync(editor);
    }

    pub fn insert_char(&mut self, editor: &mut SceneEditor, c: char) {
        if c == '\n' && !self.focus.is_multiline() {
            return;
        }
        let mut value = Self::value(editor, self.focus);
        let cursor = self.cursor.min(value.chars().count());
        value.insert(byte_index(&value, cursor), c);
        self.write(editor, value);
        self.cursor = cursor + 1;
    }

    /// Backspace.
    pub fn delete_char_before(&mut self, editor: &mut SceneEditor) {
        if self.cursor == 0 {
            return;
        }
        let mut value = Self::value(editor, self.focus);
        let cursor = self.cursor.min(value.chars().count());
        if cursor == 0 {
            self.cursor = 0;
            return;
        }
        value.remove(byte_index(&value, cursor - 1));
        self.write(editor, value);
        self.cursor = cursor - 1;
    }

    /// Delete.
    pub fn delete_char_at(&mut self, editor: &mut SceneEditor) {
        let mut value = Self::value(editor, self.focus);
        if self.cursor >= value.chars().count() {
            return;
        }
        value.remove(byte_index(&value, self.cursor));
        self.write(editor, value);
    }

    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self, editor: &SceneEditor) {
        if self.cursor < Self::char_len(editor, self.focus) {
            self.cursor += 1;
        }
    }

    /// Start of the current line.
    pub fn cursor_home(&mut self, editor: &SceneEditor) {
        let value = Self::value(editor, self.focus);
        let chars: Vec<char> = value.chars().collect();
        let mut pos = self.cursor.min(chars.len());
        while pos > 0 && chars[pos - 1] != '\n' {
            pos -= 1;
        }
        self.cursor = pos;
    }

    /// End of the current line.
    pub fn cursor_end(&mut self, editor: &SceneEditor) {
        let value = Self::value(editor, self.focus);
        let chars: Vec<char> = value.chars().collect();
        let mut pos = self.cursor.min(chars.len());
        while pos < chars.len() && chars[pos] != '\n' {
            pos += 1;
        }
        self.cursor = pos;
    }

    /// Terminal cursor offset inside the focused field.
    pub fn cursor_position(&self, editor: &SceneEditor) -> (u16, u16) {
        cursor_position(editor.active_scene().field(self.focus), self.cursor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(form: &mut SceneForm, editor: &mut SceneEditor, text: &str) {
        for c in text.chars() {
            form.insert_char(editor, c);
        }
    }

    #[test]
    fn test_typing_updates_active_scene() {
        let mut editor = SceneEditor::new();
        let mut form = SceneForm::default();
        typed(&mut form, &mut editor, "首頁");
        assert_eq!(editor.active_scene().title, "首頁");
        assert_eq!(form.cursor, 2);
    }

    #[test]
    fn test_insert_in_middle_of_multibyte_text() {
        let mut editor = SceneEditor::new();
        let mut form = SceneForm::default();
        typed(&mut form, &mut editor, "商列表");
        form.cursor = 1;
        form.insert_char(&mut editor, '品');
        assert_eq!(editor.active_scene().title, "商品列表");
        assert_eq!(form.cursor, 2);
    }

    #[test]
    fn test_backspace_and_delete() {
        let mut editor = SceneEditor::new();
        let mut form = SceneForm::default();
        typed(&mut form, &mut editor, "登入頁");
        form.delete_char_before(&mut editor);
        assert_eq!(editor.active_scene().title, "登入");
        form.cursor = 0;
        form.delete_char_at(&mut editor);
        assert_eq!(editor.active_scene().title, "入");
        form.delete_char_before(&mut editor);
        assert_eq!(editor.active_scene().title, "入");
    }

    #[test]
    fn test_newline_only_in_multiline_fields() {
        let mut editor = SceneEditor::new();
        let mut form = SceneForm::default();
        form.insert_char(&mut editor, '\n');
        assert_eq!(editor.active_scene().title, "");

        form.focus_next(&editor);
        assert_eq!(form.focus, SceneField::Objective);
        typed(&mut form, &mut editor, "a\nb");
        assert_eq!(editor.active_scene().objective, "a\nb");
    }

    #[test]
    fn test_references_field_is_set() {
        let mut editor = SceneEditor::new();
        let mut form = SceneForm {
            focus: SceneField::References,
            cursor: 0,
        };
        typed(&mut form, &mut editor, "https://x");
        assert_eq!(editor.active_scene().references.as_deref(), Some("https://x"));
    }

    #[test]
    fn test_focus_moves_cursor_to_end() {
        let mut editor = SceneEditor::new();
        let mut form = SceneForm::default();
        typed(&mut form, &mut editor, "abc");
        form.focus_next(&editor);
        assert_eq!(form.cursor, 0);
        form.focus_prev(&editor);
        assert_eq!(form.cursor, 3);
    }

    #[test]
    fn test_home_end_work_per_line() {
        let mut editor = SceneEditor::new();
        let mut form = SceneForm::default();
        form.focus_next(&editor);
        typed(&mut form, &mut editor, "ab\ncd");
        form.cursor_home(&editor);
        assert_eq!(form.cursor, 3);
        form.cursor = 1;
        form.cursor_end(&editor);
        assert_eq!(form.cursor, 2);
    }

    #[test]
    fn test_cursor_right_stops_at_end() {
        let mut editor = SceneEditor::new();
        let mut form = SceneForm::default();
        typed(&mut form, &mut editor, "x");
        form.cursor_right(&editor);
        assert_eq!(form.cursor, 1);
        form.cursor_left();
        form.cursor_left();
        assert_eq!(form.cursor, 0);
    }

    #[test]
    fn test_cursor_position_counts_wide_chars() {
        assert_eq!(cursor_position("", 0), (0, 0));
        assert_eq!(cursor_position("首頁", 2), (0, 4));
        assert_eq!(cursor_position("ab\n商品x", 5), (1, 4));
        assert_eq!(cursor_position("abc", 10), (0, 3));
    }

    #[test]
    fn test_edits_follow_active_tab() {
        let mut editor = SceneEditor::new();
        let mut form = SceneForm::default();
        editor.add_scene();
        form.reset(&editor);
        typed(&mut form, &mut editor, "第二");
        assert_eq!(editor.scenes()[0].title, "");
        assert_eq!(editor.scenes()[1].title, "第二");
    }
}
