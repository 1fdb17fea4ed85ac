/// A document position: a zero-based character offset.
pub type Position = usize;

/// A range of text defined by start and end offsets.
///
/// Ranges are half-open intervals [start, end), meaning the start position
/// is included but the end position is excluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    /// The start position (inclusive).
    pub start: Position,
    /// The end position (exclusive).
    pub end: Position,
}

impl Range {
    pub fn new(a: Position, b: Position) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }
}

/// The current mode of the interpreter.
///
/// Exactly one mode is active at a time. Sub-modes only carry meaning
/// while in [`Mode::Command`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Typed text is inserted into the document.
    Insert,
    /// Normal vi command mode: motions, operators and edits.
    Command,
    /// A `:` command line is being entered.
    Ex,
    /// A `/` search prompt is being entered.
    SearchForward,
    /// A `?` search prompt is being entered.
    SearchBackward,
    /// Keys are passed through to the host untouched.
    Passing,
}

/// Pending operator or prefix awaiting further keys in command mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubMode {
    None,
    Register,
    Change,
    Delete,
    Filter,
    Replace,
    Yank,
    Indent,
    Z,
}

impl SubMode {
    /// Whether this sub-mode is an operator that consumes the next motion.
    pub fn is_operator(self) -> bool {
        matches!(
            self,
            SubMode::Change | SubMode::Delete | SubMode::Yank | SubMode::Indent | SubMode::Filter
        )
    }

    /// Sub-modes under which motions move the cursor freely instead of
    /// selecting whole lines.
    pub(crate) fn is_plain(self) -> bool {
        matches!(self, SubMode::None | SubMode::Z | SubMode::Register)
    }
}

/// The four in-line character searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindKind {
    /// `f`: forward onto the character.
    Forward,
    /// `F`: backward onto the character.
    Backward,
    /// `t`: forward, stopping just before the character.
    TillForward,
    /// `T`: backward, stopping just after the character.
    TillBackward,
}

impl FindKind {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'f' => Some(FindKind::Forward),
            'F' => Some(FindKind::Backward),
            't' => Some(FindKind::TillForward),
            'T' => Some(FindKind::TillBackward),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            FindKind::Forward => 'f',
            FindKind::Backward => 'F',
            FindKind::TillForward => 't',
            FindKind::TillBackward => 'T',
        }
    }

    pub fn is_forward(self) -> bool {
        matches!(self, FindKind::Forward | FindKind::TillForward)
    }
}

/// A pending single-key target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubSubMode {
    None,
    FindChar(FindKind),
    Mark,
    BackTick,
    Tick,
}

/// The type of visual selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualMode {
    None,
    /// Character-wise selection (v).
    Char,
    /// Line-wise selection (V).
    Line,
    /// Rectangular selection (Ctrl-V).
    Block,
}

/// How a minibuffer message should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Error,
}

/// Notifications emitted by the interpreter for the host to display.
///
/// The host drains these with [`crate::Engine::take_events`] after each key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The minibuffer line changed.
    CommandBuffer { text: String, kind: MessageKind },
    /// Cursor position indicator (`line,col` and a percentage).
    StatusData(String),
    /// Multi-line information, e.g. the `:set` listing.
    ExtraInformation(String),
    /// Ranges to highlight for the current visual selection.
    SelectionChanged(Vec<Range>),
    /// The session asked to be closed.
    QuitRequested,
}
