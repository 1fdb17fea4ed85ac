//! Cursor motion primitives.
//!
//! These are pure functions of the document and a starting offset; the
//! engine decides how their result combines with a pending operator.

use crate::traits::TextSurface;
use crate::types::{FindKind, Position};

/// Character classes used by word motions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    Blank,
    Punctuation,
    Word,
}

/// Classifies `c`. With `simple` (the WORD motions) every non-blank
/// character is in the same class.
pub fn char_class(c: char, simple: bool) -> CharClass {
    if c.is_whitespace() {
        CharClass::Blank
    } else if simple || c.is_alphanumeric() || c == '_' {
        CharClass::Word
    } else {
        CharClass::Punctuation
    }
}

/// Character at `pos`; the end of the document reads as a line break.
pub fn char_at<S: TextSurface>(s: &S, pos: Position) -> char {
    s.char_at(pos).unwrap_or('\n')
}

fn class_at<S: TextSurface>(s: &S, pos: Position, simple: bool) -> CharClass {
    char_class(char_at(s, pos), simple)
}

fn starts_empty_line<S: TextSurface>(s: &S, pos: Position) -> bool {
    char_at(s, pos) == '\n' && (pos == 0 || char_at(s, pos - 1) == '\n')
}

pub fn line_of<S: TextSurface>(s: &S, pos: Position) -> usize {
    s.pos_to_line(pos)
}

pub fn line_start<S: TextSurface>(s: &S, line: usize) -> Position {
    s.line_to_pos(line)
}

/// Offset of the line break ending `line` (or the document end).
pub fn line_end<S: TextSurface>(s: &S, line: usize) -> Position {
    s.line_to_pos(line) + s.line_len(line)
}

pub fn column<S: TextSurface>(s: &S, pos: Position) -> usize {
    pos - s.line_to_pos(s.pos_to_line(pos))
}

pub fn last_line<S: TextSurface>(s: &S) -> usize {
    s.line_count().saturating_sub(1)
}

/// First non-blank character of `line`, or its end when it is all blank.
pub fn first_non_blank<S: TextSurface>(s: &S, line: usize) -> Position {
    let start = line_start(s, line);
    let end = line_end(s, line);
    (start..end)
        .find(|&p| !char_at(s, p).is_whitespace())
        .unwrap_or(end)
}

/// Position on `line` at the desired column; `None` means end of line.
pub fn at_column<S: TextSurface>(s: &S, line: usize, desired: Option<usize>) -> Position {
    let start = line_start(s, line);
    let len = s.line_len(line);
    start + desired.map_or(len, |col| col.min(len))
}

/// `w`/`W`: start of the `count`-th next word. Empty lines count as words.
pub fn next_word<S: TextSurface>(s: &S, mut pos: Position, count: usize, simple: bool) -> Position {
    let end = s.len_chars();
    let origin = pos;
    let mut repeat = count.max(1);
    let mut last = class_at(s, pos, simple);
    loop {
        let this = class_at(s, pos, simple);
        if (this != last && this != CharClass::Blank)
            || (pos != origin && starts_empty_line(s, pos))
        {
            repeat -= 1;
        }
        if repeat == 0 {
            break;
        }
        last = this;
        if pos >= end {
            break;
        }
        pos += 1;
        if pos == end {
            break;
        }
    }
    pos
}

/// `e`/`E`: last character of the `count`-th word end after `pos`.
pub fn word_end<S: TextSurface>(s: &S, mut pos: Position, count: usize, simple: bool) -> Position {
    let len = s.len_chars();
    if len == 0 {
        return 0;
    }
    let last = len - 1;
    for _ in 0..count.max(1) {
        if pos >= last {
            break;
        }
        pos += 1;
        while pos < last && class_at(s, pos, simple) == CharClass::Blank {
            pos += 1;
        }
        let class = class_at(s, pos, simple);
        while pos < last && class_at(s, pos + 1, simple) == class {
            pos += 1;
        }
    }
    pos.min(len)
}

/// `b`/`B`: start of the `count`-th word before `pos`.
pub fn prev_word_start<S: TextSurface>(
    s: &S,
    mut pos: Position,
    count: usize,
    simple: bool,
) -> Position {
    for _ in 0..count.max(1) {
        if pos == 0 {
            break;
        }
        pos -= 1;
        while pos > 0 && class_at(s, pos, simple) == CharClass::Blank {
            pos -= 1;
        }
        let class = class_at(s, pos, simple);
        while pos > 0 && class_at(s, pos - 1, simple) == class {
            pos -= 1;
        }
    }
    pos
}

/// `f F t T`: `count`-th occurrence of `target` within the current line.
pub fn find_in_line<S: TextSurface>(
    s: &S,
    pos: Position,
    target: char,
    kind: FindKind,
    count: usize,
) -> Option<Position> {
    let line = line_of(s, pos);
    let start = line_start(s, line);
    let end = line_end(s, line);
    let mut repeat = count.max(1);
    let hit = if kind.is_forward() {
        ((pos + 1)..end).find(|&p| {
            if char_at(s, p) == target {
                repeat -= 1;
            }
            repeat == 0
        })?
    } else {
        (start..pos).rev().find(|&p| {
            if char_at(s, p) == target {
                repeat -= 1;
            }
            repeat == 0
        })?
    };
    Some(match kind {
        FindKind::TillForward => hit - 1,
        FindKind::TillBackward => hit + 1,
        FindKind::Forward | FindKind::Backward => hit,
    })
}

fn is_empty_line<S: TextSurface>(s: &S, line: usize) -> bool {
    s.line_len(line) == 0
}

/// `}`: the `count`-th empty line after the current paragraph, or the
/// document end.
pub fn next_paragraph<S: TextSurface>(s: &S, pos: Position, count: usize) -> Position {
    let last = last_line(s);
    let mut line = line_of(s, pos);
    for _ in 0..count.max(1) {
        while line < last && is_empty_line(s, line) {
            line += 1;
        }
        while line < last && !is_empty_line(s, line) {
            line += 1;
        }
    }
    if is_empty_line(s, line) {
        line_start(s, line)
    } else {
        s.len_chars()
    }
}

/// `{`: the `count`-th empty line before the current paragraph, or the
/// document start.
pub fn prev_paragraph<S: TextSurface>(s: &S, pos: Position, count: usize) -> Position {
    let mut line = line_of(s, pos);
    for _ in 0..count.max(1) {
        while line > 0 && is_empty_line(s, line) {
            line -= 1;
        }
        while line > 0 && !is_empty_line(s, line) {
            line -= 1;
        }
    }
    line_start(s, line)
}
