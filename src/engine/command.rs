use log::debug;

use super::{Engine, keys};
use crate::key::Key;
use crate::motion::{self, first_non_blank, last_line, line_end, line_of, line_start};
use crate::register::UNNAMED;
use crate::traits::TextSurface;
use crate::types::{FindKind, Mode, Range, SubMode, SubSubMode, VisualMode};

impl<S: TextSurface> Engine<S> {
    pub(super) fn handle_command_mode(&mut self, key: Key) -> bool {
        if self.submode == SubMode::Register {
            match key {
                Key::Char(c) => self.register = c,
                _ => self.register = UNNAMED,
            }
            self.submode = SubMode::None;
            return true;
        }

        if let Some(handled) = self.handle_doubled_operator(key) {
            return handled;
        }

        match self.submode {
            SubMode::Replace => {
                match key.text() {
                    Some(c) => self.replace_chars(c),
                    None => self.reset_pending(),
                }
                return true;
            }
            SubMode::Z => {
                self.handle_z(key);
                return true;
            }
            _ => {}
        }

        match self.subsubmode {
            SubSubMode::None => {}
            SubSubMode::FindChar(kind) => {
                self.subsubmode = SubSubMode::None;
                match key.text() {
                    Some(c) => self.find_char(kind, c),
                    None => self.reset_pending(),
                }
                return true;
            }
            SubSubMode::Mark => {
                self.subsubmode = SubSubMode::None;
                if let Key::Char(c) = key {
                    self.marks.set(c, self.position);
                }
                return true;
            }
            SubSubMode::BackTick | SubSubMode::Tick => {
                let exact = self.subsubmode == SubSubMode::BackTick;
                self.subsubmode = SubSubMode::None;
                if let Key::Char(c) = key {
                    self.jump_to_mark(c, exact);
                } else {
                    self.reset_pending();
                }
                return true;
            }
        }

        if let Key::Char(c @ '0'..='9') = key
            && (c != '0' || !self.counts.motion.is_empty())
        {
            self.counts.push_digit(c);
            return true;
        }

        let g = std::mem::take(&mut self.g_flag);
        self.handle_command_key(key, g)
    }

    /// `dd`, `cc`, `yy`, `==`, `!!`.
    fn handle_doubled_operator(&mut self, key: Key) -> Option<bool> {
        let Key::Char(c) = key else {
            return None;
        };
        let doubled = matches!(
            (self.submode, c),
            (SubMode::Change, 'c')
                | (SubMode::Delete, 'd')
                | (SubMode::Yank, 'y')
                | (SubMode::Indent, '=')
                | (SubMode::Filter, '!')
        );
        if !doubled {
            return None;
        }
        self.select_count_lines();
        let dot = if matches!(c, 'c' | 'd' | '=') {
            c.to_string()
        } else {
            String::new()
        };
        self.finish_movement(&dot);
        Some(true)
    }

    fn handle_z(&mut self, key: Key) {
        let line = self.line();
        let height = self.surface.lines_on_screen().max(1);
        let top = match key {
            Key::Enter | Key::Char('t') => Some(line),
            Key::Char('.' | 'z') => Some(line.saturating_sub(height / 2)),
            Key::Char('-' | 'b') => Some(line.saturating_sub(height - 1)),
            _ => None,
        };
        self.submode = SubMode::None;
        match top {
            Some(top) => {
                self.surface.scroll_to_line(top);
                if matches!(key, Key::Enter | Key::Char('.' | '-')) {
                    self.move_to_first_non_blank();
                }
                self.finish_movement("");
            }
            None => self.reset_pending(),
        }
    }

    fn find_char(&mut self, kind: FindKind, c: char) {
        let found = motion::find_in_line(&self.surface, self.position, c, kind, self.count());
        let Some(mut target) = found else {
            self.reset_pending();
            return;
        };
        if kind.is_forward()
            && matches!(
                self.submode,
                SubMode::Change | SubMode::Delete | SubMode::Yank
            )
        {
            target += 1;
        }
        self.position = target;
        self.finish_movement(&format!("{}{c}", kind.as_char()));
    }

    fn jump_to_mark(&mut self, name: char, exact: bool) {
        let Some(pos) = self.marks.get(name) else {
            self.show_red_message(&format!("E20: Mark '{name}' not set"));
            self.reset_pending();
            return;
        };
        let pos = pos.min(self.surface.len_chars());
        if exact {
            self.position = pos;
        } else if self.submode.is_operator() {
            let from = self.line();
            self.select_lines(from, line_of(&self.surface, pos));
        } else {
            self.position = first_non_blank(&self.surface, line_of(&self.surface, pos));
        }
        self.finish_movement("");
    }

    /// Moves to line `target`. Under an operator the covered lines are
    /// selected whole.
    fn move_vertically(&mut self, target: usize, first_non_blank_col: bool, dot: &str) {
        let target = target.min(last_line(&self.surface));
        if self.submode.is_operator() {
            let from = self.line();
            self.select_lines(from, target);
            self.finish_movement(dot);
            return;
        }
        let desired = self.desired_column;
        if first_non_blank_col {
            self.position = first_non_blank(&self.surface, target);
            self.finish_movement(dot);
        } else {
            self.move_to_line(target);
            self.finish_movement(dot);
            self.desired_column = desired;
        }
    }

    fn goto_line(&mut self, line: usize) {
        if self.submode.is_operator() {
            let from = self.line();
            self.select_lines(from, line);
        } else {
            let line = line.min(last_line(&self.surface));
            self.position = if self.config.start_of_line() {
                first_non_blank(&self.surface, line)
            } else {
                motion::at_column(&self.surface, line, self.desired_column)
            };
        }
        self.finish_movement("");
    }

    fn enter_operator(&mut self, submode: SubMode) {
        if self.at_eol() {
            self.position -= 1;
            self.anchor = self.position;
        }
        self.counts.promote();
        self.submode = submode;
    }

    fn begin_insert(&mut self, entry: &str) {
        self.dot.pending = Some(keys(entry));
        self.enter_insert_mode();
    }

    fn open_line(&mut self, below: bool) {
        let line = self.line();
        let indent = if self.config.auto_indent() {
            self.indentation(line)
        } else {
            String::new()
        };
        self.begin_insert(if below { "o" } else { "O" });
        let new_line = if below {
            let at = line_end(&self.surface, line);
            self.insert_text(at, &format!("\n{indent}"));
            line + 1
        } else {
            let at = line_start(&self.surface, line);
            self.insert_text(at, &format!("{indent}\n"));
            self.position = at + indent.chars().count();
            line
        };
        if self.config.auto_indent() {
            let options = self.config.indent_options();
            self.surface.indent_lines(new_line, new_line, &options, None);
            self.position = line_end(&self.surface, new_line);
        }
    }

    fn word_motion(&mut self, simple: bool) {
        let count = self.count();
        let s = &self.surface;
        let on_word = self
            .surface
            .char_at(self.position)
            .is_some_and(|c| !c.is_whitespace());
        if self.submode == SubMode::Change && on_word {
            let class_at = |p| motion::char_class(motion::char_at(s, p), simple);
            let class = class_at(self.position);
            let mut end = self.position;
            while end + 1 < s.len_chars() && class_at(end + 1) == class {
                end += 1;
            }
            if count > 1 {
                end = motion::word_end(s, end, count - 1, simple);
            }
            self.position = (end + 1).min(s.len_chars());
            self.finish_movement(if simple { "W" } else { "w" });
            return;
        }
        let mut target = motion::next_word(s, self.position, count, simple);
        if self.submode.is_operator() {
            let line = line_of(s, target);
            if line > self.line() && first_non_blank(s, line) >= target {
                target = line_end(s, line - 1);
            }
        }
        self.position = target;
        self.finish_movement(if simple { "W" } else { "w" });
    }

    fn handle_command_key(&mut self, key: Key, g: bool) -> bool {
        let visual_op = matches!(
            key,
            Key::Char('d' | 'x' | 'D' | 'X' | 'y' | 'Y' | 'c' | 's' | 'C' | 'S' | 'R' | '=' | ':' | '!' | '~')
        );
        if visual_op && self.visual_mode != VisualMode::None {
            if let Key::Char(op) = key {
                self.visual_operator(op);
            }
            return true;
        }

        let count = self.count();
        match key {
            Key::Char(':') => self.enter_ex_mode(""),
            Key::Char('/') => self.enter_search_mode(true),
            Key::Char('?') => self.enter_search_mode(false),
            Key::Char('`') => self.subsubmode = SubSubMode::BackTick,
            Key::Char('\'') => self.subsubmode = SubSubMode::Tick,
            Key::Char('"') => self.submode = SubMode::Register,
            Key::Char('!') => self.enter_operator(SubMode::Filter),
            Key::Char('=') => self.enter_operator(SubMode::Indent),
            Key::Char('c') => self.enter_operator(SubMode::Change),
            Key::Char('d') => self.enter_operator(SubMode::Delete),
            Key::Char('y') => self.enter_operator(SubMode::Yank),
            Key::Char('z') => self.submode = SubMode::Z,
            Key::Char('m') => self.subsubmode = SubSubMode::Mark,
            Key::Char(c @ ('f' | 'F' | 't' | 'T')) => {
                if let Some(kind) = FindKind::from_char(c) {
                    self.subsubmode = SubSubMode::FindChar(kind);
                }
            }
            Key::Char('|') => {
                let col = count.min(self.surface.line_len(self.line())).saturating_sub(1);
                self.position = line_start(&self.surface, self.line()) + col;
                self.finish_movement("|");
            }
            Key::Char('0') | Key::Home => {
                self.position = line_start(&self.surface, self.line());
                self.finish_movement("0");
            }
            Key::Char('^') => {
                self.move_to_first_non_blank();
                self.finish_movement("^");
            }
            Key::Char('$') | Key::End => {
                let plain = self.submode == SubMode::None;
                let line = (self.line() + count - 1).min(last_line(&self.surface));
                self.position = line_end(&self.surface, line);
                self.finish_movement("$");
                if plain {
                    self.desired_column = None;
                }
            }
            Key::Char('h') | Key::Left => {
                let mut n = count.min(self.left_dist());
                if self.fake_end && self.at_eol() {
                    n = (n + 1).min(self.left_dist());
                }
                self.position -= n;
                self.finish_movement("h");
            }
            Key::Char('l' | ' ') | Key::Right => {
                self.position += count.min(self.right_dist());
                self.finish_movement("l");
            }
            Key::Char('j') | Key::Down | Key::Ctrl('n') => {
                self.move_vertically(self.line() + count, false, "j");
            }
            Key::Char('k') | Key::Up | Key::Ctrl('p') => {
                self.move_vertically(self.line().saturating_sub(count), false, "k");
            }
            Key::Char('+') | Key::Enter => {
                self.move_vertically(self.line() + count, true, "+");
            }
            Key::Char('-') => {
                self.move_vertically(self.line().saturating_sub(count), true, "-");
            }
            Key::PageDown | Key::Ctrl('f') => {
                let page = self.surface.lines_on_screen().saturating_sub(2).max(1);
                self.move_vertically(self.line().saturating_add(count.saturating_mul(page)), false, "");
            }
            Key::PageUp | Key::Ctrl('b') => {
                let page = self.surface.lines_on_screen().saturating_sub(2).max(1);
                self.move_vertically(self.line().saturating_sub(count.saturating_mul(page)), false, "");
            }
            Key::Char('w') => self.word_motion(false),
            Key::Char('W') => self.word_motion(true),
            Key::Char(c @ ('e' | 'E')) => {
                let simple = c == 'E';
                let mut target = motion::word_end(&self.surface, self.position, count, simple);
                if matches!(
                    self.submode,
                    SubMode::Change | SubMode::Delete | SubMode::Yank
                ) {
                    target = (target + 1).min(self.surface.len_chars());
                }
                self.position = target;
                self.finish_movement(if simple { "E" } else { "e" });
            }
            Key::Char(c @ ('b' | 'B')) => {
                let simple = c == 'B';
                self.position = motion::prev_word_start(&self.surface, self.position, count, simple);
                self.finish_movement(if simple { "B" } else { "b" });
            }
            Key::Char('}') => {
                self.position = motion::next_paragraph(&self.surface, self.position, count);
                self.finish_movement("}");
            }
            Key::Char('{') => {
                self.position = motion::prev_paragraph(&self.surface, self.position, count);
                self.finish_movement("{");
            }
            Key::Char('%') => match self.surface.matching_bracket(self.position) {
                Some(target) => {
                    if self.submode.is_operator() {
                        if target >= self.position {
                            self.position = target + 1;
                        } else {
                            self.anchor += 1;
                            self.position = target;
                        }
                    } else {
                        self.position = target;
                    }
                    self.finish_movement("%");
                }
                None => self.reset_pending(),
            },
            Key::Char('g') => {
                if g {
                    let line = if self.counts.is_empty() { 0 } else { count - 1 };
                    self.goto_line(line);
                } else {
                    self.g_flag = true;
                }
            }
            Key::Char('G') => {
                let line = if self.counts.is_empty() {
                    last_line(&self.surface)
                } else {
                    count - 1
                };
                self.goto_line(line);
            }
            Key::Char('H') => {
                let first = self.surface.first_visible_line();
                self.goto_line(first.saturating_add(count - 1));
            }
            Key::Char('L') => {
                let first = self.surface.first_visible_line();
                let height = self.surface.lines_on_screen();
                self.goto_line((first + height).saturating_sub(count));
            }
            Key::Char('M') => {
                let first = self.surface.first_visible_line();
                self.goto_line(first + self.surface.lines_on_screen() / 2);
            }
            Key::Char('n' | 'N') => {
                let forward = self.last_search_forward == key.is_char('n');
                let needle = self.last_search_string();
                if self.search(&needle, forward) {
                    self.finish_movement("");
                } else {
                    self.reset_pending();
                }
            }
            Key::Char('i') => {
                if self.at_eol() {
                    self.position -= 1;
                }
                self.begin_insert("i");
            }
            Key::Char('a') => {
                if self.position < self.line_end_pos() {
                    self.position += 1;
                }
                self.begin_insert("a");
            }
            Key::Char('I') => {
                if g {
                    self.position = line_start(&self.surface, self.line());
                    self.begin_insert("gI");
                } else {
                    self.move_to_first_non_blank();
                    self.begin_insert("I");
                }
            }
            Key::Char('A') => {
                self.position = self.line_end_pos();
                self.begin_insert("A");
            }
            Key::Char('o') => self.open_line(true),
            Key::Char('O') => self.open_line(false),
            Key::Char('R') => {
                self.begin_insert("R");
                self.overwrite = true;
            }
            Key::Char('C' | 'D') => {
                self.counts.promote();
                self.submode = if key.is_char('C') {
                    SubMode::Change
                } else {
                    SubMode::Delete
                };
                let line = (self.line() + count - 1).min(last_line(&self.surface));
                self.position = line_end(&self.surface, line);
                self.finish_movement("$");
            }
            Key::Char('S') => {
                self.counts.promote();
                self.submode = SubMode::Change;
                self.select_count_lines();
                self.finish_movement("c");
            }
            Key::Char('s') => {
                if self.at_eol() {
                    self.position -= 1;
                    self.anchor = self.position;
                }
                self.submode = SubMode::Change;
                self.position += count.min(self.right_dist());
                self.finish_movement("l");
            }
            Key::Char('x') | Key::Delete => {
                if self.at_eol() {
                    self.position -= 1;
                    self.anchor = self.position;
                }
                self.submode = SubMode::Delete;
                self.position += count.min(self.right_dist());
                self.finish_movement("l");
            }
            Key::Char('X') => {
                let n = count.min(self.left_dist());
                self.submode = SubMode::Delete;
                self.position -= n;
                self.finish_movement("h");
            }
            Key::Backspace | Key::Ctrl('h') => {
                if self.position > 0 {
                    let start = self.position - 1;
                    self.remove_range(Range::new(start, start + 1));
                }
                self.finish_movement("");
            }
            Key::Char('Y') => {
                self.submode = SubMode::Yank;
                self.select_count_lines();
                self.finish_movement("");
            }
            Key::Char('p') => self.put(true),
            Key::Char('P') => self.put(false),
            Key::Char('r') => {
                self.submode = SubMode::Replace;
            }
            Key::Char('J') => self.join_lines(!g),
            Key::Char('~') => self.toggle_case(),
            Key::Char('u') => self.undo_command(),
            Key::Char('U') | Key::Ctrl('r') => self.redo_command(),
            Key::Char('v') => self.toggle_visual(VisualMode::Char),
            Key::Char('V') => self.toggle_visual(VisualMode::Line),
            Key::Ctrl('v') => self.toggle_visual(VisualMode::Block),
            Key::Char(',') => {
                self.clear_submodes();
                self.mode = Mode::Passing;
                self.update_mini_buffer();
            }
            Key::Char('.') => self.repeat_dot(count),
            Key::Esc => {
                if self.visual_mode != VisualMode::None {
                    self.leave_visual_mode();
                }
                self.reset_pending();
            }
            _ => {
                debug!("ignored in command mode: {key:?}");
                return matches!(key, Key::Char(_));
            }
        }
        true
    }

    fn toggle_visual(&mut self, visual_mode: VisualMode) {
        if self.visual_mode == visual_mode {
            self.leave_visual_mode();
        } else if self.visual_mode == VisualMode::None {
            self.enter_visual_mode(visual_mode);
        } else {
            self.visual_mode = visual_mode;
            self.update_mini_buffer();
            self.update_selection();
        }
    }

    fn repeat_dot(&mut self, count: usize) {
        let command = self.dot.command.clone();
        debug!("repeat {command:?} x{count}");
        self.counts.clear();
        let replaying = std::mem::replace(&mut self.dot.replaying, true);
        for _ in 0..count {
            for &key in &command {
                self.handle_key(key);
            }
        }
        self.dot.replaying = replaying;
    }
}
