#![allow(dead_code)]

pub mod mock_buffer;
pub mod mock_clipboard;
pub mod mock_host;

use vim_modal::{Engine, InputEvent, KeyCode, KeyEvent, Modifiers, TextSurface};

pub fn key(c: char) -> InputEvent {
    let mods = if c.is_ascii_uppercase() {
        Modifiers::SHIFT
    } else {
        Modifiers::empty()
    };
    InputEvent::Key(KeyEvent::with_mods(KeyCode::Char(c), mods))
}

pub fn special(code: KeyCode) -> InputEvent {
    InputEvent::Key(KeyEvent::plain(code))
}

pub fn ctrl(c: char) -> InputEvent {
    InputEvent::Key(KeyEvent::with_mods(KeyCode::Char(c), Modifiers::CTRL))
}

pub fn esc() -> InputEvent {
    special(KeyCode::Esc)
}

pub fn enter() -> InputEvent {
    special(KeyCode::Enter)
}

/// Types `keys` one character at a time; `\n` is Enter and `\x1b` is Esc.
pub fn feed<S: TextSurface>(engine: &mut Engine<S>, keys: &str) {
    for c in keys.chars() {
        let event = match c {
            '\n' => enter(),
            '\x1b' => esc(),
            c => key(c),
        };
        engine.handle_event(event);
    }
}
