use log::debug;

use super::{Engine, keys, repeat_capped};
use crate::key::Key;
use crate::mark::VISUAL_START;
use crate::motion::{self, first_non_blank, last_line, line_end, line_of, line_start};
use crate::register::{RegisterKind, UNNAMED};
use crate::traits::TextSurface;
use crate::types::{Position, Range, SubMode, SubSubMode, VisualMode};
use crate::undo::EditOperation;

impl<S: TextSurface> Engine<S> {
    pub(super) fn count(&self) -> usize {
        self.counts.count()
    }

    pub(super) fn line(&self) -> usize {
        line_of(&self.surface, self.position)
    }

    pub(super) fn left_dist(&self) -> usize {
        motion::column(&self.surface, self.position)
    }

    /// Characters between the cursor and the end of its line.
    pub(super) fn right_dist(&self) -> usize {
        self.line_end_pos() - self.position
    }

    pub(super) fn line_end_pos(&self) -> Position {
        line_end(&self.surface, self.line())
    }

    /// The cursor is on the line break of a non-empty line.
    pub(super) fn at_eol(&self) -> bool {
        self.position == self.line_end_pos() && self.surface.line_len(self.line()) > 0
    }

    pub(super) fn move_to_first_non_blank(&mut self) {
        self.position = first_non_blank(&self.surface, self.line());
    }

    pub(super) fn move_to_line(&mut self, line: usize) {
        let line = line.min(last_line(&self.surface));
        self.position = motion::at_column(&self.surface, line, self.desired_column);
    }

    /// Leading whitespace of `line`.
    pub(super) fn indentation(&self, line: usize) -> String {
        let start = line_start(&self.surface, line);
        self.surface
            .slice(Range::new(start, first_non_blank(&self.surface, line)))
    }

    // Recorded edits. The cursor ends after the inserted text or at the
    // start of the removed range.

    pub(super) fn insert_text(&mut self, pos: Position, text: &str) {
        if text.is_empty() {
            return;
        }
        self.surface.insert(pos, text);
        self.undo.record(EditOperation::insert(pos, text));
        self.position = pos + text.chars().count();
    }

    pub(super) fn remove_range(&mut self, range: Range) -> String {
        let text = self.surface.slice(range);
        if !range.is_empty() {
            self.surface.remove(range);
            self.undo.record(EditOperation::remove(range.start, text.clone()));
        }
        self.position = range.start;
        text
    }

    pub(super) fn replace_range(&mut self, range: Range, text: &str) -> String {
        let removed = self.surface.slice(range);
        if !range.is_empty() {
            self.surface.remove(range);
        }
        if !text.is_empty() {
            self.surface.insert(range.start, text);
        }
        self.undo
            .record(EditOperation::replace(range.start, removed.clone(), text));
        self.position = range.start;
        removed
    }

    pub(super) fn remove_selected_text(&mut self) -> String {
        let range = Range::new(self.anchor, self.position);
        let text = self.remove_range(range);
        self.anchor = self.position;
        text
    }

    /// Selects `first..=last` as whole lines: up to the start of the line
    /// after `last`, or to the document end.
    pub(super) fn select_lines(&mut self, first: usize, last: usize) {
        let s = &self.surface;
        let last_doc_line = last_line(s);
        let (first, last) = (first.min(last), first.max(last).min(last_doc_line));
        self.anchor = line_start(s, first);
        self.position = if last >= last_doc_line {
            s.len_chars()
        } else {
            line_start(s, last + 1)
        };
        self.linewise = true;
    }

    /// Selects `count` lines starting at the cursor line.
    pub(super) fn select_count_lines(&mut self) {
        let line = self.line();
        self.select_lines(line, line + self.count() - 1);
    }

    pub(super) fn set_dot(&mut self, command: Vec<Key>) {
        if !self.dot.replaying {
            debug!("dot command {command:?}");
            self.dot.command = command;
        }
    }

    /// Drops any pending operator, count and register.
    pub(super) fn reset_pending(&mut self) {
        self.submode = SubMode::None;
        self.subsubmode = SubSubMode::None;
        self.counts.clear();
        self.g_flag = false;
        self.linewise = false;
        self.register = UNNAMED;
        self.anchor = self.position;
        self.update_mini_buffer();
    }

    /// Applies the pending operator to the range between the anchor and the
    /// cursor, then resets the transient state. `dot` is the motion part of
    /// the command as it should be replayed by `.`.
    pub(super) fn finish_movement(&mut self, dot: &str) {
        if self.submode == SubMode::Filter {
            let end_pos = if self.linewise && self.position > self.anchor {
                self.position - 1
            } else {
                self.position
            };
            let begin = line_of(&self.surface, self.anchor);
            let end = line_of(&self.surface, end_pos);
            self.position = self.anchor.min(self.position);
            self.anchor = self.position;
            self.linewise = false;
            self.counts.clear();
            self.g_flag = false;
            self.register = UNNAMED;
            self.enter_ex_mode(&format!(".,+{}!", end.abs_diff(begin)));
            return;
        }

        let linewise = std::mem::take(&mut self.linewise);
        let kind = if linewise {
            RegisterKind::Line
        } else {
            RegisterKind::Char
        };
        match self.submode {
            SubMode::Change => {
                if linewise
                    && self.position > self.anchor
                    && self.surface.char_at(self.position - 1) == Some('\n')
                {
                    self.position -= 1;
                }
                if !dot.is_empty() {
                    self.dot.pending = Some(keys(&format!("c{dot}")));
                }
                let depth = self.undo.depth();
                self.insert_group = Some(depth);
                let text = self.remove_selected_text();
                self.undo.set_cursor_before(depth, self.saved_position);
                self.registers.set(self.register, text, kind);
                self.counts.clear();
                self.g_flag = false;
                self.register = UNNAMED;
                self.enter_insert_mode();
                self.update_selection();
                return;
            }
            SubMode::Delete => {
                if !dot.is_empty() {
                    self.set_dot(keys(&format!("d{dot}")));
                }
                let depth = self.undo.depth();
                let text = self.remove_selected_text();
                self.undo.set_cursor_before(depth, self.saved_position);
                self.registers.set(self.register, text, kind);
                if linewise {
                    self.move_to_first_non_blank();
                } else if self.at_eol() {
                    self.position -= 1;
                }
            }
            SubMode::Yank => {
                let text = self.surface.slice(Range::new(self.anchor, self.position));
                self.registers.set(self.register, text, kind);
                self.position = self.saved_position;
            }
            SubMode::Indent => {
                let first = line_of(&self.surface, self.anchor.min(self.position));
                let last = line_of(&self.surface, self.anchor.max(self.position));
                let end = self.anchor.max(self.position);
                let last = if linewise && last > first && end == line_start(&self.surface, last) {
                    last - 1
                } else {
                    last
                };
                let options = self.config.indent_options();
                self.surface.indent_lines(first, last, &options, None);
                self.position = first_non_blank(&self.surface, first);
                if !dot.is_empty() {
                    self.set_dot(keys(&format!("={dot}")));
                }
            }
            _ => {}
        }

        self.submode = SubMode::None;
        self.counts.clear();
        self.g_flag = false;
        self.register = UNNAMED;
        self.position = self.position.min(self.surface.len_chars());
        self.anchor = self.position;
        self.desired_column = Some(self.left_dist());
        self.update_selection();
        self.update_mini_buffer();
    }

    // Commands that edit without a motion.

    pub(super) fn put(&mut self, after: bool) {
        let count = self.count();
        let Some(reg) = self.registers.get(self.register) else {
            debug!("register {:?} is empty", self.register);
            self.reset_pending();
            return;
        };
        let mut text = repeat_capped(&reg.text, count);
        match reg.kind {
            RegisterKind::Line => {
                let line = self.line();
                let mut at = line_start(&self.surface, line);
                let mut landing = at;
                if after {
                    if line < last_line(&self.surface) {
                        at = line_start(&self.surface, line + 1);
                        landing = at;
                    } else {
                        text.pop();
                        text.insert(0, '\n');
                        at = self.surface.len_chars();
                        landing = at + 1;
                    }
                }
                self.insert_text(at, &text);
                self.position = landing;
                self.move_to_first_non_blank();
            }
            RegisterKind::Char => {
                let at = if after && self.position < self.line_end_pos() {
                    self.position + 1
                } else {
                    self.position
                };
                self.insert_text(at, &text);
                self.position = (at + text.chars().count()).saturating_sub(1).max(at);
            }
        }
        self.set_dot(keys(if after { "p" } else { "P" }));
        self.finish_movement("");
    }

    /// `r`: overwrites `count` characters with `c`.
    pub(super) fn replace_chars(&mut self, c: char) {
        let count = self.count();
        if self.at_eol() {
            self.position -= 1;
        }
        if self.right_dist() < count {
            self.reset_pending();
            return;
        }
        let start = self.position;
        let with: String = std::iter::repeat_n(c, count).collect();
        self.replace_range(Range::new(start, start + count), &with);
        self.position = if c == '\n' {
            start + count
        } else {
            start + count - 1
        };
        self.set_dot(vec![Key::Char('r'), Key::Char(c)]);
        self.submode = SubMode::None;
        self.finish_movement("");
    }

    /// `J`/`gJ`: joins the cursor line with the next `count - 1` lines
    /// (at least one).
    pub(super) fn join_lines(&mut self, spaced: bool) {
        let joins = self.count().max(2) - 1;
        let depth = self.undo.depth();
        let line = self.line();
        let start = self.position;
        for _ in 0..joins {
            if line >= last_line(&self.surface) {
                break;
            }
            let at = line_end(&self.surface, line);
            let next_text_start = first_non_blank(&self.surface, line + 1);
            let next_empty = next_text_start == line_end(&self.surface, line + 1);
            let glue = if spaced && !next_empty && self.surface.line_len(line) > 0 {
                " "
            } else {
                ""
            };
            let end = if spaced { next_text_start } else { at + 1 };
            self.replace_range(Range::new(at, end), glue);
            self.position = at;
        }
        self.undo.group_since(depth, start);
        self.set_dot(keys(if spaced { "J" } else { "gJ" }));
        self.finish_movement("");
    }

    /// `~`: switches the case of `count` characters and steps past them.
    pub(super) fn toggle_case(&mut self) {
        if self.at_eol() || self.right_dist() == 0 {
            self.finish_movement("");
            return;
        }
        let n = self.count().min(self.right_dist());
        let range = Range::new(self.position, self.position + n);
        let toggled: String = self
            .surface
            .slice(range)
            .chars()
            .flat_map(|c| {
                let flipped: Vec<char> = if c.is_uppercase() {
                    c.to_lowercase().collect()
                } else {
                    c.to_uppercase().collect()
                };
                flipped
            })
            .collect();
        self.replace_range(range, &toggled);
        self.position = range.start + toggled.chars().count();
        self.set_dot(keys("~"));
        self.finish_movement("");
    }

    pub(super) fn undo_command(&mut self) {
        let count = self.count();
        for _ in 0..count {
            match self.undo.undo(&mut self.surface) {
                Some(pos) => self.position = pos,
                None => {
                    self.show_black_message("Already at oldest change");
                    break;
                }
            }
        }
        self.position = self.position.min(self.surface.len_chars());
        self.finish_movement("");
    }

    pub(super) fn redo_command(&mut self) {
        let count = self.count();
        for _ in 0..count {
            match self.undo.redo(&mut self.surface) {
                Some(pos) => self.position = pos,
                None => {
                    self.show_black_message("Already at newest change");
                    break;
                }
            }
        }
        self.position = self.position.min(self.surface.len_chars());
        self.finish_movement("");
    }

    /// Applies `op` to the active visual selection. Uppercase operators
    /// always work on whole lines.
    pub(super) fn visual_operator(&mut self, op: char) {
        let visual = self.visual_mode;
        let start = self.marks.get(VISUAL_START).unwrap_or(self.position);
        self.leave_visual_mode();
        let (a, b) = (start.min(self.position), start.max(self.position));
        let linewise_op = matches!(op, 'D' | 'X' | 'Y' | 'C' | 'S' | 'R');

        match op {
            ':' => {
                self.position = a;
                self.enter_ex_mode("'<,'>");
                return;
            }
            '!' => {
                self.position = a;
                self.enter_ex_mode("'<,'>!");
                return;
            }
            '~' => {
                self.position = a;
                self.counts.clear();
                self.counts.motion = (b + 1 - a).min(self.right_dist()).max(1).to_string();
                self.toggle_case();
                return;
            }
            _ => {}
        }

        self.submode = match op {
            'd' | 'x' | 'D' | 'X' => SubMode::Delete,
            'y' | 'Y' => SubMode::Yank,
            'c' | 's' | 'C' | 'S' | 'R' => SubMode::Change,
            '=' => SubMode::Indent,
            _ => SubMode::None,
        };

        if visual == VisualMode::Block && !linewise_op && self.submode != SubMode::Indent {
            self.block_operator(a, b);
            return;
        }

        self.saved_position = a;
        if visual == VisualMode::Line || linewise_op || self.submode == SubMode::Indent {
            let first = line_of(&self.surface, a);
            let last = line_of(&self.surface, b);
            self.select_lines(first, last);
        } else {
            self.anchor = a;
            self.position = (b + 1).min(self.surface.len_chars());
        }
        self.finish_movement("");
    }

    fn block_operator(&mut self, a: Position, b: Position) {
        let segments = self.block_segments(a, b);
        let text = segments
            .iter()
            .map(|r| self.surface.slice(*r))
            .collect::<Vec<_>>()
            .join("\n");
        let top_left = segments.first().map_or(a, |r| r.start);
        let submode = self.submode;
        self.registers.set(self.register, text, RegisterKind::Char);
        if submode != SubMode::Yank {
            let depth = self.undo.depth();
            if submode == SubMode::Change {
                self.insert_group = Some(depth);
            }
            for range in segments.iter().rev() {
                self.remove_range(*range);
            }
            if submode != SubMode::Change {
                self.undo.group_since(depth, top_left);
            }
        }
        self.position = top_left;
        self.anchor = top_left;
        self.submode = SubMode::None;
        self.register = UNNAMED;
        self.counts.clear();
        if submode == SubMode::Change {
            self.enter_insert_mode();
        } else {
            self.finish_movement("");
        }
    }

    /// Range covering lines `first..=last` (0-based) including the final
    /// line break, when there is one.
    pub(super) fn line_range(&self, first: usize, last: usize) -> Range {
        let s = &self.surface;
        let last_doc_line = last_line(s);
        let (first, last) = (first.min(last), first.max(last).min(last_doc_line));
        let end = if last >= last_doc_line {
            s.len_chars()
        } else {
            line_start(s, last + 1)
        };
        Range::new(line_start(s, first), end)
    }
}
