//! The modal state machine.
//!
//! [`Engine`] owns every piece of interpreter state (mode, counts,
//! registers, marks, history) and drives a host [`TextSurface`]. Key
//! tables live in the submodules, each adding an `impl` block:
//!
//! - `command`: command-mode dispatch
//! - `insert`: insert mode and the `:`/`/`/`?` prompts
//! - `operator`: edit primitives, operator completion, visual operators
//! - `ex`: the ex command interpreter

mod command;
mod ex;
mod insert;
mod operator;

use log::trace;
use unicode_segmentation::UnicodeSegmentation;

use crate::config::Config;
use crate::history::History;
use crate::host::SystemHost;
use crate::key::{InputEvent, Key};
use crate::mark::{MarkStore, VISUAL_END, VISUAL_START};
use crate::motion::{self, line_end, line_of, line_start};
use crate::register::{RegisterStore, UNNAMED};
use crate::search::{self, SearchOutcome};
use crate::traits::{Clipboard, Host, TextSurface};
use crate::types::{Event, MessageKind, Mode, Position, Range, SubMode, SubSubMode, VisualMode};
use crate::undo::UndoRedoStack;

/// Pending count digits: one string typed before the operator, one after.
#[derive(Debug, Default, Clone)]
struct Counts {
    motion: String,
    operator: String,
}

fn digits_value(s: &str) -> usize {
    s.parse::<usize>().ok().filter(|&n| n > 0).unwrap_or(1)
}

impl Counts {
    const MAX_DIGITS: usize = 9;

    fn push_digit(&mut self, c: char) {
        if self.motion.len() < Self::MAX_DIGITS {
            self.motion.push(c);
        }
    }

    /// Moves the digits typed so far in front of the operator.
    fn promote(&mut self) {
        self.operator = std::mem::take(&mut self.motion);
    }

    fn count(&self) -> usize {
        digits_value(&self.motion).saturating_mul(digits_value(&self.operator))
    }

    fn is_empty(&self) -> bool {
        self.motion.is_empty() && self.operator.is_empty()
    }

    fn clear(&mut self) {
        self.motion.clear();
        self.operator.clear();
    }
}

/// Replay buffer for `.`.
#[derive(Debug, Default, Clone)]
struct DotState {
    command: Vec<Key>,
    /// Keys of a change still in progress; completed when insert mode ends.
    pending: Option<Vec<Key>>,
    replaying: bool,
}

/// Upper bound on the text a counted put or insert may generate.
const MAX_REPEAT_BYTES: usize = 16 << 20;

/// `text` repeated `count` times, with `count` lowered so the result stays
/// within `MAX_REPEAT_BYTES`. A single copy is never cut.
fn repeat_capped(text: &str, count: usize) -> String {
    let limit = (MAX_REPEAT_BYTES / text.len().max(1)).max(1);
    text.repeat(count.min(limit))
}

fn keys(s: &str) -> Vec<Key> {
    s.chars().map(Key::Char).collect()
}

#[derive(Debug, Clone)]
pub struct EngineSnapshot {
    pub mode: Mode,
    pub submode: SubMode,
    pub subsubmode: SubSubMode,
    pub visual_mode: VisualMode,
    pub pending_count: Option<usize>,
    pub register: char,
    pub desired_column: Option<usize>,
}

pub struct EngineBuilder {
    config: Config,
    host: Box<dyn Host>,
    clipboard: Option<Box<dyn Clipboard>>,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            config: Config::default(),
            host: Box::new(SystemHost),
            clipboard: None,
        }
    }
}

impl EngineBuilder {
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn host(mut self, host: impl Host + 'static) -> Self {
        self.host = Box::new(host);
        self
    }

    pub fn clipboard(mut self, clipboard: impl Clipboard + 'static) -> Self {
        self.clipboard = Some(Box::new(clipboard));
        self
    }

    /// Starts a modal session on `surface`.
    pub fn attach<S: TextSurface>(self, surface: S) -> Engine<S> {
        let registers = match self.clipboard {
            Some(clipboard) => RegisterStore::with_clipboard(clipboard),
            None => RegisterStore::new(),
        };
        let position = surface.cursor();
        let current_file = surface.file_name();
        let was_read_only = surface.is_read_only();
        let mut engine = Engine {
            surface,
            host: self.host,
            config: self.config,
            mode: Mode::Command,
            submode: SubMode::None,
            subsubmode: SubSubMode::None,
            anchor: position,
            position,
            fake_end: false,
            synced: position,
            linewise: false,
            overwrite: false,
            registers,
            register: UNNAMED,
            counts: Counts::default(),
            g_flag: false,
            command_buffer: String::new(),
            current_file,
            current_message: None,
            mini_buffer_dirty: false,
            last_search_forward: true,
            last_insertion: String::new(),
            undo: UndoRedoStack::new(),
            insert_group: None,
            dot: DotState::default(),
            search_history: History::new(),
            command_history: History::new(),
            visual_mode: VisualMode::None,
            marks: MarkStore::new(),
            saved_position: position,
            desired_column: Some(0),
            was_read_only,
            last_selection: Vec::new(),
            events: Vec::new(),
        };
        engine.desired_column = Some(engine.left_dist());
        engine.show_black_message("vi emulation mode.");
        engine.flush_mini_buffer();
        engine
    }
}

pub struct Engine<S: TextSurface> {
    surface: S,
    host: Box<dyn Host>,
    config: Config,

    mode: Mode,
    submode: SubMode,
    subsubmode: SubSubMode,

    anchor: Position,
    position: Position,
    /// The cursor sits one left of a line end it really occupies.
    fake_end: bool,
    /// Cursor last written to the surface.
    synced: Position,
    /// The pending selection covers whole lines.
    linewise: bool,
    /// Insert mode overwrites (`R`).
    overwrite: bool,

    registers: RegisterStore,
    register: char,
    counts: Counts,
    g_flag: bool,

    command_buffer: String,
    current_file: Option<String>,
    current_message: Option<String>,
    mini_buffer_dirty: bool,

    last_search_forward: bool,
    last_insertion: String,

    undo: UndoRedoStack,
    /// Undo depth when the running insert session started.
    insert_group: Option<usize>,
    dot: DotState,

    search_history: History,
    command_history: History,

    visual_mode: VisualMode,
    marks: MarkStore,

    saved_position: Position,
    /// `None` sticks to the end of line.
    desired_column: Option<usize>,
    was_read_only: bool,

    last_selection: Vec<Range>,
    events: Vec<Event>,
}

impl<S: TextSurface> Engine<S> {
    /// Starts a session with the default configuration and system host.
    pub fn attach(surface: S) -> Self {
        EngineBuilder::default().attach(surface)
    }

    /// Ends the session, restoring the surface's read-only state.
    pub fn detach(mut self) -> S {
        self.surface.set_read_only(self.was_read_only);
        self.surface
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn set_config_value(&mut self, key: &str, value: &str) {
        self.config.set(key, value);
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            mode: self.mode,
            submode: self.submode,
            subsubmode: self.subsubmode,
            visual_mode: self.visual_mode,
            pending_count: (!self.counts.is_empty()).then(|| self.counts.count()),
            register: self.register,
            desired_column: self.desired_column,
        }
    }

    /// Text currently stored in register `name`.
    pub fn register_text(&self, name: char) -> String {
        self.registers.text(name).to_string()
    }

    pub fn mark(&self, name: char) -> Option<Position> {
        self.marks.get(name)
    }

    /// The text of the `:`/`/` prompt being edited.
    pub fn command_buffer(&self) -> &str {
        &self.command_buffer
    }

    /// Drains the notifications produced since the last call.
    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    /// Processes one key. Returns `false` when the key was not consumed
    /// and should reach the surface unmodified.
    pub fn handle_event(&mut self, input: InputEvent) -> bool {
        let Some(key) = Key::from_event(&input) else {
            return false;
        };
        if self.mode == Mode::Passing {
            if key.is_char(',') {
                self.enter_command_mode();
                self.update_mini_buffer();
                self.flush_mini_buffer();
                return true;
            }
            return false;
        }

        self.position = self.surface.cursor().min(self.surface.len_chars());
        if self.fake_end && self.position == self.synced && self.position < self.line_end_pos() {
            self.position += 1;
        }
        let handled = self.handle_key(key);

        self.fake_end = self.mode == Mode::Command && self.at_eol();
        if self.fake_end {
            self.position -= 1;
        }
        self.surface.set_cursor(self.position);
        self.synced = self.position;
        self.flush_mini_buffer();
        handled
    }

    /// Runs an ex command line (without the leading `:`).
    pub fn handle_ex_command(&mut self, cmd: &str) {
        self.position = self.surface.cursor().min(self.surface.len_chars());
        self.anchor = self.position;
        self.execute_ex_line(cmd);
        self.surface.set_cursor(self.position);
        self.synced = self.position;
        self.flush_mini_buffer();
    }

    /// Asks the host to end the session.
    pub fn quit(&mut self) {
        self.show_black_message("");
        self.events.push(Event::QuitRequested);
    }

    fn handle_key(&mut self, key: Key) -> bool {
        trace!(
            "key {key:?} mode {:?} submode {:?} subsubmode {:?}",
            self.mode, self.submode, self.subsubmode
        );
        self.saved_position = self.position;
        self.anchor = self.position;
        match self.mode {
            Mode::Insert => self.handle_insert_mode(key),
            Mode::Command => self.handle_command_mode(key),
            Mode::Ex | Mode::SearchForward | Mode::SearchBackward => {
                self.handle_mini_buffer_modes(key)
            }
            Mode::Passing => false,
        }
    }

    // Mode transitions

    fn clear_submodes(&mut self) {
        self.submode = SubMode::None;
        self.subsubmode = SubSubMode::None;
    }

    fn enter_insert_mode(&mut self) {
        self.clear_submodes();
        self.mode = Mode::Insert;
        self.last_insertion.clear();
        if self.insert_group.is_none() {
            self.insert_group = Some(self.undo.depth());
        }
        self.update_mini_buffer();
    }

    fn enter_command_mode(&mut self) {
        self.mode = Mode::Command;
        self.overwrite = false;
    }

    fn enter_ex_mode(&mut self, initial: &str) {
        self.clear_submodes();
        self.mode = Mode::Ex;
        self.command_buffer = initial.to_string();
        self.command_history.start();
        self.update_mini_buffer();
    }

    fn enter_search_mode(&mut self, forward: bool) {
        self.clear_submodes();
        self.mode = if forward {
            Mode::SearchForward
        } else {
            Mode::SearchBackward
        };
        self.command_buffer.clear();
        self.search_history.start();
        self.update_mini_buffer();
    }

    fn enter_visual_mode(&mut self, visual_mode: VisualMode) {
        self.visual_mode = visual_mode;
        self.marks.set(VISUAL_START, self.position);
        self.update_mini_buffer();
        self.update_selection();
    }

    fn leave_visual_mode(&mut self) {
        self.visual_mode = VisualMode::None;
        self.marks.set(VISUAL_END, self.position);
        self.update_mini_buffer();
        self.update_selection();
    }

    // Search

    fn last_search_string(&self) -> String {
        self.search_history.last().unwrap_or_default().to_string()
    }

    /// Moves to the next match of `needle`. Returns whether one was found.
    fn search(&mut self, needle: &str, forward: bool) -> bool {
        match search::search(&self.surface, needle, self.position, forward) {
            SearchOutcome::Found(pos) => {
                self.position = pos;
                true
            }
            SearchOutcome::Wrapped(pos) => {
                self.position = pos;
                self.show_red_message(if forward {
                    "search hit BOTTOM, continuing at TOP"
                } else {
                    "search hit TOP, continuing at BOTTOM"
                });
                true
            }
            SearchOutcome::NotFound => {
                self.show_red_message(&format!("E486: Pattern not found: {needle}"));
                false
            }
        }
    }

    // Host notifications

    fn show_red_message(&mut self, msg: &str) {
        self.current_message = Some(msg.to_string());
        self.update_mini_buffer();
    }

    fn show_black_message(&mut self, msg: &str) {
        self.command_buffer = msg.to_string();
        self.update_mini_buffer();
    }

    fn update_mini_buffer(&mut self) {
        self.mini_buffer_dirty = true;
    }

    fn mini_buffer_text(&mut self) -> (String, MessageKind) {
        if self.mode == Mode::Passing {
            return ("-- PASSING --".to_string(), MessageKind::Info);
        }
        if let Some(msg) = self.current_message.take() {
            return (msg, MessageKind::Error);
        }
        let banner = match (self.mode, self.visual_mode) {
            (Mode::Command, VisualMode::Char) => Some("-- VISUAL --"),
            (Mode::Command, VisualMode::Line) => Some("-- VISUAL LINE --"),
            (Mode::Command, VisualMode::Block) => Some("-- VISUAL BLOCK --"),
            (Mode::Insert, _) if self.overwrite => Some("-- REPLACE --"),
            (Mode::Insert, _) => Some("-- INSERT --"),
            _ => None,
        };
        if let Some(banner) = banner {
            return (banner.to_string(), MessageKind::Info);
        }
        let mut msg = String::new();
        match self.mode {
            Mode::SearchForward => msg.push('/'),
            Mode::SearchBackward => msg.push('?'),
            Mode::Ex => msg.push(':'),
            _ => {}
        }
        for c in self.command_buffer.chars() {
            if (c as u32) < 32 {
                msg.push('^');
                msg.push(char::from_u32(c as u32 + 64).unwrap_or('?'));
            } else {
                msg.push(c);
            }
        }
        if !msg.is_empty() && self.mode != Mode::Command {
            msg.push('\u{2759}');
        }
        (msg, MessageKind::Info)
    }

    fn status_text(&self) -> String {
        let line = self.line();
        let start = line_start(&self.surface, line);
        let prefix = self.surface.slice(Range::new(start, self.position));
        let col = prefix.graphemes(true).count();
        let pos = format!("{},{}", line + 1, col + 1);
        let lines = self.surface.line_count();
        if lines == 0 {
            format!("{pos:<10}All")
        } else {
            format!("{pos:<10}{:>4}%", line * 100 / lines)
        }
    }

    fn flush_mini_buffer(&mut self) {
        if !self.mini_buffer_dirty {
            return;
        }
        self.mini_buffer_dirty = false;
        let (text, kind) = self.mini_buffer_text();
        self.events.push(Event::CommandBuffer { text, kind });
        let status = self.status_text();
        self.events.push(Event::StatusData(status));
    }

    fn visual_ranges(&self) -> Vec<Range> {
        let s = &self.surface;
        let cursor = self.position;
        let Some(anchor) = self.marks.get(VISUAL_START) else {
            return Vec::new();
        };
        match self.visual_mode {
            VisualMode::None => Vec::new(),
            VisualMode::Char => {
                let end = (anchor.max(cursor) + 1).min(s.len_chars());
                vec![Range::new(anchor.min(cursor), end)]
            }
            VisualMode::Line => {
                let first = line_of(s, anchor.min(cursor));
                let last = line_of(s, anchor.max(cursor));
                vec![Range::new(line_start(s, first), line_end(s, last))]
            }
            VisualMode::Block => self
                .block_segments(anchor, cursor)
                .into_iter()
                .filter(|r| !r.is_empty())
                .collect(),
        }
    }

    /// Per-line column spans of a rectangular selection.
    fn block_segments(&self, a: Position, b: Position) -> Vec<Range> {
        let s = &self.surface;
        let (la, lb) = (line_of(s, a), line_of(s, b));
        let (ca, cb) = (motion::column(s, a), motion::column(s, b));
        let (first, last) = (la.min(lb), la.max(lb));
        let (left, right) = (ca.min(cb), ca.max(cb));
        (first..=last)
            .map(|line| {
                let start = line_start(s, line);
                let len = s.line_len(line);
                if left >= len {
                    Range::new(start + len, start + len)
                } else {
                    Range::new(start + left, start + right.min(len - 1) + 1)
                }
            })
            .collect()
    }

    fn update_selection(&mut self) {
        let ranges = self.visual_ranges();
        if ranges != self.last_selection {
            self.last_selection = ranges.clone();
            self.events.push(Event::SelectionChanged(ranges));
        }
    }
}
