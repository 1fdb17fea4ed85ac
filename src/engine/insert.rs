use log::debug;

use super::{Engine, repeat_capped};
use crate::key::Key;
use crate::motion::{first_non_blank, last_line, line_end, line_start};
use crate::traits::TextSurface;
use crate::types::{Mode, Range};

impl<S: TextSurface> Engine<S> {
    pub(super) fn handle_insert_mode(&mut self, key: Key) -> bool {
        match key {
            Key::Esc => self.leave_insert_mode(),
            Key::Left => {
                self.position -= self.left_dist().min(1);
                self.last_insertion.clear();
            }
            Key::Right => {
                if self.position < self.line_end_pos() {
                    self.position += 1;
                }
                self.last_insertion.clear();
            }
            Key::Down | Key::Up | Key::PageDown | Key::PageUp => {
                let step = match key {
                    Key::PageDown | Key::PageUp => {
                        let page = self.surface.lines_on_screen().saturating_sub(2).max(1);
                        self.count().saturating_mul(page)
                    }
                    _ => self.count(),
                };
                let line = if matches!(key, Key::Down | Key::PageDown) {
                    self.line().saturating_add(step)
                } else {
                    self.line().saturating_sub(step)
                };
                let line = line.min(last_line(&self.surface));
                let col = self.left_dist();
                self.position =
                    (line_start(&self.surface, line) + col).min(line_end(&self.surface, line));
                self.last_insertion.clear();
            }
            Key::Home => {
                self.position = line_start(&self.surface, self.line());
                self.last_insertion.clear();
            }
            Key::End => {
                self.position = self.line_end_pos();
                self.last_insertion.clear();
            }
            Key::Backspace | Key::Ctrl('h') => {
                if self.position > 0 {
                    let start = self.position - 1;
                    self.remove_range(Range::new(start, start + 1));
                    self.last_insertion.pop();
                }
            }
            Key::Delete => {
                if self.position < self.surface.len_chars() {
                    self.remove_range(Range::new(self.position, self.position + 1));
                }
                self.last_insertion.clear();
            }
            Key::Enter => self.insert_line_break(),
            Key::Tab if self.config.expand_tab() => {
                let line_head = Range::new(line_start(&self.surface, self.line()), self.position);
                let only_blanks = self.surface.slice(line_head).chars().all(char::is_whitespace);
                let width = if self.config.smart_tab() && only_blanks {
                    self.config.shift_width()
                } else {
                    self.config.tab_stop()
                };
                self.type_text(&" ".repeat(width));
            }
            Key::Ctrl(_) => {
                debug!("ignored in insert mode: {key:?}");
                return false;
            }
            _ => match key.text() {
                Some(c) => {
                    self.type_text(&c.to_string());
                    self.electric_indent(c);
                }
                None => return false,
            },
        }
        self.update_mini_buffer();
        true
    }

    fn type_text(&mut self, text: &str) {
        if self.overwrite {
            let n = text.chars().count().min(self.right_dist());
            if n > 0 {
                self.remove_range(Range::new(self.position, self.position + n));
            }
        }
        self.insert_text(self.position, text);
        self.last_insertion.push_str(text);
    }

    fn insert_line_break(&mut self) {
        let indent = if self.config.auto_indent() {
            self.indentation(self.line())
        } else {
            String::new()
        };
        let text = format!("\n{indent}");
        self.insert_text(self.position, &text);
        self.last_insertion.push_str(&text);
        if self.config.auto_indent() {
            let line = self.line();
            let options = self.config.indent_options();
            self.surface.indent_lines(line, line, &options, None);
            self.position = first_non_blank(&self.surface, line);
        }
    }

    /// Reindents the line after typing a brace or `#` into its leading blanks.
    fn electric_indent(&mut self, typed: char) {
        if !self.config.auto_indent() || !matches!(typed, '{' | '}' | '#') {
            return;
        }
        let line = self.line();
        let head = Range::new(line_start(&self.surface, line), self.position.saturating_sub(1));
        if !self.surface.slice(head).chars().all(char::is_whitespace) {
            return;
        }
        let offset = line_end(&self.surface, line) - self.position;
        let options = self.config.indent_options();
        self.surface.indent_lines(line, line, &options, Some(typed));
        self.position = line_end(&self.surface, line) - offset;
    }

    fn leave_insert_mode(&mut self) {
        let repeat = self.count().saturating_sub(1);
        if repeat > 0 && !self.last_insertion.is_empty() {
            let text = repeat_capped(&self.last_insertion, repeat);
            self.insert_text(self.position, &text);
        }
        self.position -= self.left_dist().min(1);
        if let Some(depth) = self.insert_group.take() {
            self.undo.group_since(depth, self.position);
        }
        if let Some(mut command) = self.dot.pending.take() {
            command.extend(self.last_insertion.chars().map(Key::Char));
            command.push(Key::Esc);
            self.set_dot(command);
        }
        self.counts.clear();
        self.enter_command_mode();
        self.desired_column = Some(self.left_dist());
    }

    pub(super) fn handle_mini_buffer_modes(&mut self, key: Key) -> bool {
        let searching = self.mode != Mode::Ex;
        match key {
            Key::Esc | Key::Ctrl('c') => {
                self.command_buffer.clear();
                if searching {
                    self.search_history.cancel();
                } else {
                    self.command_history.cancel();
                }
                self.enter_command_mode();
            }
            Key::Backspace | Key::Ctrl('h') | Key::Left => {
                if self.command_buffer.pop().is_none() {
                    if searching {
                        self.search_history.cancel();
                    } else {
                        self.command_history.cancel();
                    }
                    self.enter_command_mode();
                }
            }
            Key::Right | Key::Home | Key::End | Key::Delete => {}
            Key::Up | Key::Down => {
                let history = if searching {
                    &mut self.search_history
                } else {
                    &mut self.command_history
                };
                let recalled = if key == Key::Up {
                    history.up()
                } else {
                    history.down()
                };
                if let Some(text) = recalled {
                    self.command_buffer = text.to_string();
                }
            }
            Key::Enter => {
                let text = std::mem::take(&mut self.command_buffer);
                if searching {
                    self.run_search_prompt(text);
                } else if text.is_empty() {
                    self.command_history.cancel();
                    self.enter_command_mode();
                } else {
                    self.command_history.commit(&text);
                    self.execute_ex_line(&text);
                }
            }
            Key::Tab => self.command_buffer.push('\t'),
            Key::Ctrl(c) => {
                if let Some(ctrl) = char::from_u32((c.to_ascii_uppercase() as u32).wrapping_sub(64))
                    && (ctrl as u32) < 32
                {
                    self.command_buffer.push(ctrl);
                }
            }
            Key::Char(c) => self.command_buffer.push(c),
            _ => return false,
        }
        self.update_mini_buffer();
        true
    }

    fn run_search_prompt(&mut self, text: String) {
        let forward = self.mode == Mode::SearchForward;
        let needle = if text.is_empty() {
            self.search_history.cancel();
            self.last_search_string()
        } else {
            self.search_history.commit(&text);
            text
        };
        self.last_search_forward = forward;
        self.enter_command_mode();
        if self.search(&needle, forward) {
            self.finish_movement("");
        } else {
            self.reset_pending();
        }
    }
}
