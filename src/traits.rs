use std::io;

use crate::config::IndentOptions;
use crate::types::{Position, Range};

/// The editable text surface the interpreter drives.
///
/// All positions are character offsets into the document. Lines are
/// separated by `'\n'` and numbered from zero; a document always has at
/// least one (possibly empty) line.
pub trait TextSurface {
    // Document queries
    fn len_chars(&self) -> usize;
    fn char_at(&self, pos: Position) -> Option<char>;
    fn slice(&self, range: Range) -> String;

    fn line_count(&self) -> usize;
    fn line_to_pos(&self, line: usize) -> Position; // start of line
    fn pos_to_line(&self, pos: Position) -> usize;

    /// Length of a line without its terminating newline.
    fn line_len(&self, line: usize) -> usize {
        let start = self.line_to_pos(line);
        if line + 1 < self.line_count() {
            self.line_to_pos(line + 1) - 1 - start
        } else {
            self.len_chars() - start
        }
    }

    fn text(&self) -> String {
        self.slice(Range::new(0, self.len_chars()))
    }

    // Mutation
    fn insert(&mut self, pos: Position, text: &str);
    fn remove(&mut self, range: Range);

    fn set_text(&mut self, text: &str) {
        let len = self.len_chars();
        self.remove(Range::new(0, len));
        self.insert(0, text);
    }

    // Cursor
    fn cursor(&self) -> Position;
    fn set_cursor(&mut self, pos: Position);

    // Viewport geometry
    fn lines_on_screen(&self) -> usize {
        24
    }
    fn columns_on_screen(&self) -> usize {
        80
    }
    fn first_visible_line(&self) -> usize {
        0
    }
    fn scroll_to_line(&mut self, _line: usize) {}

    /// Position of the bracket matching the one at `pos`, if any.
    fn matching_bracket(&self, _pos: Position) -> Option<Position> {
        None
    }

    /// Re-indent lines `first..=last`. `typed` is the electric character
    /// that triggered the request while typing, if any.
    fn indent_lines(
        &mut self,
        _first: usize,
        _last: usize,
        _options: &IndentOptions,
        _typed: Option<char>,
    ) {
    }

    fn is_read_only(&self) -> bool {
        false
    }
    fn set_read_only(&mut self, _read_only: bool) {}

    /// Path of the file shown in this surface, if any.
    fn file_name(&self) -> Option<String> {
        None
    }
}

/// Services used by ex commands: file access and external filters.
pub trait Host {
    fn file_exists(&self, path: &str) -> bool;
    fn read_file(&mut self, path: &str) -> io::Result<String>;
    fn write_file(&mut self, path: &str, contents: &str) -> io::Result<()>;

    /// Run `command`, feed it `input` on stdin and return its stdout.
    /// Blocks until the process exits.
    fn filter(&mut self, command: &str, input: &str) -> io::Result<String>;
}

pub trait Clipboard {
    fn get(&mut self) -> Option<String>;
    fn set(&mut self, text: String);
}
