use ropey::Rope;
use vim_modal::config::IndentOptions;
use vim_modal::traits::TextSurface;
use vim_modal::types::{Position, Range};

/// Rope-backed surface that also matches brackets and records indent
/// requests instead of applying them.
pub struct MockBuffer {
    rope: Rope,
    cursor: Position,
    first_visible: usize,
    lines_on_screen: usize,
    read_only: bool,
    file_name: Option<String>,
    pub indent_calls: Vec<(usize, usize, Option<char>)>,
}

impl MockBuffer {
    pub fn new(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            cursor: 0,
            first_visible: 0,
            lines_on_screen: 24,
            read_only: false,
            file_name: None,
            indent_calls: Vec::new(),
        }
    }

    pub fn at(mut self, cursor: Position) -> Self {
        self.cursor = cursor;
        self
    }

    pub fn with_viewport(mut self, first_visible: usize, lines: usize) -> Self {
        self.first_visible = first_visible;
        self.lines_on_screen = lines;
        self
    }

    pub fn with_file_name(mut self, name: &str) -> Self {
        self.file_name = Some(name.to_string());
        self
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn contents(&self) -> String {
        self.rope.to_string()
    }
}

impl TextSurface for MockBuffer {
    fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    fn char_at(&self, pos: Position) -> Option<char> {
        (pos < self.rope.len_chars()).then(|| self.rope.char(pos))
    }

    fn slice(&self, range: Range) -> String {
        let end = range.end.min(self.rope.len_chars());
        self.rope.slice(range.start.min(end)..end).to_string()
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
        self.rope.insert(pos.min(self.rope.len_chars()), text);
    }

    fn remove(&mut self, range: Range) {
        let end = range.end.min(self.rope.len_chars());
        self.rope.remove(range.start.min(end)..end);
    }

    fn cursor(&self) -> Position {
        self.cursor
    }

    fn set_cursor(&mut self, pos: Position) {
        self.cursor = pos;
    }

    fn lines_on_screen(&self) -> usize {
        self.lines_on_screen
    }

    fn first_visible_line(&self) -> usize {
        self.first_visible
    }

    fn scroll_to_line(&mut self, line: usize) {
        self.first_visible = line;
    }

    fn matching_bracket(&self, pos: Position) -> Option<Position> {
        let open = self.char_at(pos)?;
        let (close, forward) = match open {
            '(' => (')', true),
            '[' => (']', true),
            '{' => ('}', true),
            ')' => ('(', false),
            ']' => ('[', false),
            '}' => ('{', false),
            _ => return None,
        };
        let mut depth = 0usize;
        let mut p = pos;
        loop {
            let c = self.char_at(p)?;
            if c == open {
                depth += 1;
            } else if c == close {
                depth -= 1;
                if depth == 0 {
                    return Some(p);
                }
            }
            if forward {
                p += 1;
            } else {
                p = p.checked_sub(1)?;
            }
        }
    }

    fn indent_lines(
        &mut self,
        first: usize,
        last: usize,
        _options: &IndentOptions,
        typed: Option<char>,
    ) {
        self.indent_calls.push((first, last, typed));
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
