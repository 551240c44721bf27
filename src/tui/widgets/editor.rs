use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::Rect;
use std::cmp;

use crate::utils::has_primary_modifier;

/// Saved state for undo
#[derive(Debug, Clone, PartialEq)]
struct Snapshot {
    lines: Vec<String>,
    cursor_line: usize,
    cursor_col: usize,
}

/// Small multi-line text buffer used by every text field in the dashboard.
/// Columns are counted in chars, never bytes.
#[derive(Debug, Clone)]
pub struct Editor {
    pub lines: Vec<String>,
    pub cursor_line: usize,
    pub cursor_col: usize,
    pub scroll_offset: usize,
    undo_stack: Vec<Snapshot>,
    max_history: usize,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
            cursor_line: 0,
            cursor_col: 0,
            scroll_offset: 0,
            undo_stack: Vec::new(),
            max_history: 100,
        }
    }

    /// Editor holding `content`, cursor at the end
    pub fn from_string(content: &str) -> Self {
        let mut lines: Vec<String> = content.split('\n').map(str::to_string).collect();
        if lines.is_empty() {
            lines.push(String::new());
        }
        let cursor_line = lines.len() - 1;
        let cursor_col = lines[cursor_line].chars().count();
        Self {
            lines,
            cursor_line,
            cursor_col,
            ..Self::new()
        }
    }

    fn line_len(&self, line: usize) -> usize {
        self.lines.get(line).map(|l| l.chars().count()).unwrap_or(0)
    }

    fn snapshot(&mut self) {
        if self.undo_stack.len() >= self.max_history {
            self.undo_stack.remove(0);
        }
        self.undo_stack.push(Snapshot {
            lines: self.lines.clone(),
            cursor_line: self.cursor_line,
            cursor_col: self.cursor_col,
        });
    }

    fn clamp_cursor(&mut self) {
        if self.lines.is_empty() {
            self.lines.push(String::new());
        }
        self.cursor_line = cmp::min(self.cursor_line, self.lines.len() - 1);
        self.cursor_col = cmp::min(self.cursor_col, self.line_len(self.cursor_line));
    }

    pub fn insert_char(&mut self, ch: char) {
        if ch == '\n' {
            self.insert_newline();
            return;
        }
        self.snapshot();
        self.clamp_cursor();
        let line = &mut self.lines[self.cursor_line];
        let mut chars: Vec<char> = line.chars().collect();
        chars.insert(self.cursor_col, ch);
        *line = chars.into_iter().collect();
        self.cursor_col += 1;
    }

    /// Backspace
    pub fn delete_char(&mut self) {
        self.clamp_cursor();
        if self.cursor_col > 0 {
            self.snapshot();
            let line = &mut self.lines[self.cursor_line];
            let mut chars: Vec<char> = line.chars().collect();
            chars.remove(self.cursor_col - 1);
            *line = chars.into_iter().collect();
            self.cursor_col -= 1;
        } else if self.cursor_line > 0 {
            self.snapshot();
            let current = self.lines.remove(self.cursor_line);
            self.cursor_line -= 1;
            self.cursor_col = self.line_len(self.cursor_line);
            self.lines[self.cursor_line].push_str(&current);
        }
    }

    /// Delete key
    pub fn delete_forward(&mut self) {
        self.clamp_cursor();
        if self.cursor_col < self.line_len(self.cursor_line) {
            self.snapshot();
            let line = &mut self.lines[self.cursor_line];
            let mut chars: Vec<char> = line.chars().collect();
            chars.remove(self.cursor_col);
            *line = chars.into_iter().collect();
        } else if self.cursor_line + 1 < self.lines.len() {
            self.snapshot();
            let next = self.lines.remove(self.cursor_line + 1);
            self.lines[self.cursor_line].push_str(&next);
        }
    }

    pub fn insert_newline(&mut self) {
        self.snapshot();
        self.clamp_cursor();
        let line = &mut self.lines[self.cursor_line];
        let mut chars: Vec<char> = line.chars().collect();
        let remainder: String = chars.split_off(self.cursor_col).into_iter().collect();
        *line = chars.into_iter().collect();
        self.lines.insert(self.cursor_line + 1, remainder);
        self.cursor_line += 1;
        self.cursor_col = 0;
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor_col > 0 {
            self.cursor_col -= 1;
        } else if self.cursor_line > 0 {
            self.cursor_line -= 1;
            self.cursor_col = self.line_len(self.cursor_line);
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_col < self.line_len(self.cursor_line) {
            self.cursor_col += 1;
        } else if self.cursor_line + 1 < self.lines.len() {
            self.cursor_line += 1;
            self.cursor_col = 0;
        }
    }

    pub fn move_cursor_up(&mut self) {
        if self.cursor_line > 0 {
            self.cursor_line -= 1;
            self.cursor_col = cmp::min(self.cursor_col, self.line_len(self.cursor_line));
        }
    }

    pub fn move_cursor_down(&mut self) {
        if self.cursor_line + 1 < self.lines.len() {
            self.cursor_line += 1;
            self.cursor_col = cmp::min(self.cursor_col, self.line_len(self.cursor_line));
        }
    }

    pub fn move_cursor_home(&mut self) {
        self.cursor_col = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor_col = self.line_len(self.cursor_line);
    }

    pub fn move_cursor_word_left(&mut self) {
        let chars: Vec<char> = self.lines[self.cursor_line].chars().collect();
        let mut col = cmp::min(self.cursor_col, chars.len());
        while col > 0 && chars[col - 1].is_whitespace() {
            col -= 1;
        }
        while col > 0 && !chars[col - 1].is_whitespace() {
            col -= 1;
        }
        self.cursor_col = col;
    }

    pub fn move_cursor_word_right(&mut self) {
        let chars: Vec<char> = self.lines[self.cursor_line].chars().collect();
        let mut col = cmp::min(self.cursor_col, chars.len());
        while col < chars.len() && !chars[col].is_whitespace() {
            col += 1;
        }
        while col < chars.len() && chars[col].is_whitespace() {
            col += 1;
        }
        self.cursor_col = col;
    }

    pub fn undo(&mut self) -> bool {
        match self.undo_stack.pop() {
            Some(snapshot) => {
                self.lines = snapshot.lines;
                self.cursor_line = snapshot.cursor_line;
                self.cursor_col = snapshot.cursor_col;
                true
            }
            None => false,
        }
    }

    /// Apply an editing key. Enter is left to the caller, since its meaning
    /// depends on the field. Returns true when the buffer text changed.
    pub fn handle_key(&mut self, key_event: KeyEvent) -> bool {
        let before = self.lines.clone();
        let word = has_primary_modifier(key_event.modifiers);
        match key_event.code {
            KeyCode::Char('z') if word => {
                return self.undo();
            }
            KeyCode::Char(c) if !word => self.insert_char(c),
            KeyCode::Backspace => self.delete_char(),
            KeyCode::Delete => self.delete_forward(),
            KeyCode::Left if word => self.move_cursor_word_left(),
            KeyCode::Right if word => self.move_cursor_word_right(),
            KeyCode::Left => self.move_cursor_left(),
            KeyCode::Right => self.move_cursor_right(),
            KeyCode::Up => self.move_cursor_up(),
            KeyCode::Down => self.move_cursor_down(),
            KeyCode::Home => self.move_cursor_home(),
            KeyCode::End => self.move_cursor_end(),
            _ => {}
        }
        self.lines != before
    }

    pub fn is_blank(&self) -> bool {
        self.lines.iter().all(|l| l.trim().is_empty())
    }

    /// Keep the cursor line inside a viewport of `viewport_height` lines
    pub fn update_scroll(&mut self, viewport_height: usize) {
        if viewport_height == 0 {
            return;
        }
        if self.cursor_line < self.scroll_offset {
            self.scroll_offset = self.cursor_line;
        } else if self.cursor_line >= self.scroll_offset + viewport_height {
            self.scroll_offset = self.cursor_line + 1 - viewport_height;
        }
    }

    /// Lines currently in view
    pub fn visible_lines(&self, viewport_height: usize) -> &[String] {
        let start = cmp::min(self.scroll_offset, self.lines.len());
        let end = cmp::min(start + viewport_height, self.lines.len());
        &self.lines[start..end]
    }

    /// Screen position of the cursor inside `area` (no borders), if visible
    pub fn cursor_screen_pos(&self, area: Rect) -> Option<(u16, u16)> {
        if self.cursor_line < self.scroll_offset {
            return None;
        }
        let row = self.cursor_line - self.scroll_offset;
        if row >= area.height as usize {
            return None;
        }
        let col = cmp::min(self.cursor_col, area.width.saturating_sub(1) as usize);
        Some((area.x + col as u16, area.y + row as u16))
    }
}

impl std::fmt::Display for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn typing_and_backspace() {
        let mut editor = Editor::new();
        for c in "héllo".chars() {
            assert!(editor.handle_key(key(KeyCode::Char(c))));
        }
        editor.handle_key(key(KeyCode::Backspace));
        assert_eq!(editor.to_string(), "héll");
        assert_eq!(editor.cursor_col, 4);
    }

    #[test]
    fn newline_splits_and_backspace_joins() {
        let mut editor = Editor::from_string("ab");
        editor.move_cursor_left();
        editor.insert_newline();
        assert_eq!(editor.lines, vec!["a", "b"]);
        editor.delete_char();
        assert_eq!(editor.to_string(), "ab");
        assert_eq!((editor.cursor_line, editor.cursor_col), (0, 1));
    }

    #[test]
    fn from_string_keeps_blank_lines() {
        let editor = Editor::from_string("one\n\nthree");
        assert_eq!(editor.lines.len(), 3);
        assert_eq!(editor.to_string(), "one\n\nthree");
        assert_eq!((editor.cursor_line, editor.cursor_col), (2, 5));
    }

    #[test]
    fn undo_restores_previous_text() {
        let mut editor = Editor::from_string("abc");
        editor.delete_char();
        assert!(editor.handle_key(KeyEvent::new(KeyCode::Char('z'), KeyModifiers::CONTROL)));
        assert_eq!(editor.to_string(), "abc");
        assert!(!editor.undo());
    }

    #[test]
    fn cursor_movement_does_not_count_as_change() {
        let mut editor = Editor::from_string("one two");
        assert!(!editor.handle_key(key(KeyCode::Home)));
        editor.move_cursor_word_right();
        assert_eq!(editor.cursor_col, 4);
        editor.move_cursor_word_left();
        assert_eq!(editor.cursor_col, 0);
    }

    #[test]
    fn scroll_follows_cursor() {
        let mut editor = Editor::from_string("1\n2\n3\n4\n5");
        editor.update_scroll(2);
        assert_eq!(editor.scroll_offset, 3);
        assert_eq!(editor.visible_lines(2), &["4".to_string(), "5".to_string()]);
        let pos = editor.cursor_screen_pos(Rect::new(10, 5, 20, 2));
        assert_eq!(pos, Some((11, 6)));
    }

    #[test]
    fn blank_detection() {
        assert!(Editor::from_string("  \n ").is_blank());
        assert!(!Editor::from_string(" x ").is_blank());
    }

    #[test]
    fn typing_past_undo_history_still_reports_changes() {
        let mut editor = Editor::new();
        for i in 0..120 {
            assert!(editor.handle_key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE)), "key {}", i);
        }
        assert_eq!(editor.to_string().len(), 120);
        assert!(!editor.handle_key(KeyEvent::new(KeyCode::Left, KeyModifiers::NONE)));
    }
}
