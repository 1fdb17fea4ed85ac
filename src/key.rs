/// Key codes representing individual keys on the keyboard.
///
/// This enum provides a platform-agnostic representation of keys.
/// Hosts should map their platform-specific key events to these codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    /// A character key. Letters may be delivered in either case; the
    /// interpreter folds them using the SHIFT flag.
    Char(char),
    /// The Escape key, used to exit modes and cancel operations.
    Esc,
    /// The Enter/Return key.
    Enter,
    /// The Backspace key.
    Backspace,
    /// The forward Delete key.
    Delete,
    /// The Tab key.
    Tab,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    /// Modifier keys pressed on their own. These are never consumed so the
    /// host keeps its own shortcut handling.
    Shift,
    Control,
    Alt,
    Meta,
}

bitflags::bitflags! {
    /// Keyboard modifier flags.
    ///
    /// These can be combined to represent multiple modifiers held simultaneously.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const CTRL  = 0b0010;
        const ALT   = 0b0100;
        const META  = 0b1000;
    }
}

/// A key press event with optional modifiers.
///
/// This represents a single key press, including any modifier keys held down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key that was pressed.
    pub code: KeyCode,
    /// Modifier keys held during the key press.
    pub mods: Modifiers,
}

impl KeyEvent {
    /// A key press without modifiers.
    pub const fn plain(code: KeyCode) -> Self {
        Self {
            code,
            mods: Modifiers::empty(),
        }
    }

    /// A key press with modifiers.
    pub const fn with_mods(code: KeyCode, mods: Modifiers) -> Self {
        Self { code, mods }
    }
}

/// Input events that can be processed by the interpreter.
///
/// This enum distinguishes between key presses (used for commands)
/// and text input (used in insert/search modes).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// A key press event, typically used for commands and navigation.
    Key(KeyEvent),
    /// A character received as produced text.
    /// This allows hosts to handle composed characters and IME input.
    ReceivedChar(char),
}

/// A key after normalization: letter case resolved from SHIFT and control
/// chords folded into their own variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Key {
    Char(char),
    Ctrl(char),
    Esc,
    Enter,
    Backspace,
    Delete,
    Tab,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
}

impl Key {
    /// Normalizes a host event. Returns `None` for bare modifier keys.
    pub(crate) fn from_event(event: &InputEvent) -> Option<Key> {
        let ke = match event {
            InputEvent::ReceivedChar(c) => return Some(Key::Char(*c)),
            InputEvent::Key(ke) => ke,
        };
        let key = match ke.code {
            KeyCode::Char(c) if ke.mods.contains(Modifiers::CTRL) => {
                Key::Ctrl(c.to_ascii_lowercase())
            }
            KeyCode::Char(c) if c.is_ascii_alphabetic() => {
                if ke.mods.contains(Modifiers::SHIFT) {
                    Key::Char(c.to_ascii_uppercase())
                } else {
                    Key::Char(c.to_ascii_lowercase())
                }
            }
            KeyCode::Char(c) => Key::Char(c),
            KeyCode::Esc => Key::Esc,
            KeyCode::Enter => Key::Enter,
            KeyCode::Backspace if ke.mods.contains(Modifiers::CTRL) => Key::Ctrl('h'),
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Delete => Key::Delete,
            KeyCode::Tab => Key::Tab,
            KeyCode::Left => Key::Left,
            KeyCode::Right => Key::Right,
            KeyCode::Up => Key::Up,
            KeyCode::Down => Key::Down,
            KeyCode::Home => Key::Home,
            KeyCode::End => Key::End,
            KeyCode::PageUp => Key::PageUp,
            KeyCode::PageDown => Key::PageDown,
            KeyCode::Shift | KeyCode::Control | KeyCode::Alt | KeyCode::Meta => return None,
        };
        Some(key)
    }

    /// The text this key produces when typed.
    pub(crate) fn text(self) -> Option<char> {
        match self {
            Key::Char(c) => Some(c),
            Key::Tab => Some('\t'),
            Key::Enter => Some('\n'),
            _ => None,
        }
    }

    pub(crate) fn is_char(self, c: char) -> bool {
        self == Key::Char(c)
    }
}
