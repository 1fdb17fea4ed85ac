use ropey::Rope;

use crate::traits::TextSurface;
use crate::types::{Position, Range};

/// A rope-backed in-memory editing surface.
///
/// Useful as a stand-in host for tests and for hosts that keep their own
/// rendering but want the interpreter to own the text.
#[derive(Debug, Clone)]
pub struct MemorySurface {
    rope: Rope,
    cursor: Position,
    read_only: bool,
    file_name: Option<String>,
    first_visible: usize,
    lines_on_screen: usize,
}

impl MemorySurface {
    pub fn new(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            cursor: 0,
            read_only: false,
            file_name: None,
            first_visible: 0,
            lines_on_screen: 24,
        }
    }

    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    pub fn with_viewport(mut self, first_visible: usize, lines: usize) -> Self {
        self.first_visible = first_visible;
        self.lines_on_screen = lines.max(1);
        self
    }

    /// Text of a line without its newline.
    pub fn line_text(&self, line: usize) -> String {
        if line >= self.rope.len_lines() {
            return String::new();
        }
        let mut s = self.rope.line(line).to_string();
        if s.ends_with('\n') {
            s.pop();
        }
        s
    }
}

impl TextSurface for MemorySurface {
    fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    fn char_at(&self, pos: Position) -> Option<char> {
        (pos < self.rope.len_chars()).then(|| self.rope.char(pos))
    }

    fn slice(&self, range: Range) -> String {
        let len = self.rope.len_chars();
        let end = range.end.min(len);
        let start = range.start.min(end);
        self.rope.slice(start..end).to_string()
    }

    fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    fn line_to_pos(&self, line: usize) -> Position {
        if line >= self.rope.len_lines() {
            return self.rope.len_chars();
        }
        self.rope.line_to_char(line)
    }

    fn pos_to_line(&self, pos: Position) -> usize {
        self.rope.char_to_line(pos.min(self.rope.len_chars()))
    }

    fn insert(&mut self, pos: Position, text: &str) {
        let pos = pos.min(self.rope.len_chars());
        self.rope.insert(pos, text);
    }

    fn remove(&mut self, range: Range) {
        let len = self.rope.len_chars();
        let end = range.end.min(len);
        let start = range.start.min(end);
        self.rope.remove(start..end);
        self.cursor = self.cursor.min(self.rope.len_chars());
    }

    fn cursor(&self) -> Position {
        self.cursor
    }

    fn set_cursor(&mut self, pos: Position) {
        self.cursor = pos.min(self.rope.len_chars());
    }

    fn lines_on_screen(&self) -> usize {
        self.lines_on_screen
    }

    fn first_visible_line(&self) -> usize {
        self.first_visible
    }

    fn scroll_to_line(&mut self, line: usize) {
        self.first_visible = line.min(self.rope.len_lines().saturating_sub(1));
    }

    fn is_read_only(&self) -> bool {
        self.read_only
    }

    fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    fn file_name(&self) -> Option<String> {
        self.file_name.clone()
    }
}
