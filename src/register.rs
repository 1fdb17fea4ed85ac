//! Registers: character-keyed text slots for yank, delete and put.
//!
//! The unnamed register `"` receives every write. Lowercase names
//! overwrite their slot, uppercase names append to the lowercase slot,
//! and `+`/`*` go through the host clipboard when one is configured.

use std::collections::HashMap;

use crate::traits::Clipboard;

pub const UNNAMED: char = '"';

/// How the text was captured; decides where `p`/`P` put it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegisterKind {
    #[default]
    Char,
    Line,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Register {
    pub text: String,
    pub kind: RegisterKind,
}

impl Register {
    pub fn new(text: impl Into<String>, kind: RegisterKind) -> Self {
        let mut text = text.into();
        if kind == RegisterKind::Line && !text.ends_with('\n') {
            text.push('\n');
        }
        Self { text, kind }
    }
}

#[derive(Default)]
pub struct RegisterStore {
    slots: HashMap<char, Register>,
    clipboard: Option<Box<dyn Clipboard>>,
}

impl std::fmt::Debug for RegisterStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterStore")
            .field("slots", &self.slots)
            .field("clipboard", &self.clipboard.is_some())
            .finish()
    }
}

fn is_clipboard(name: char) -> bool {
    name == '+' || name == '*'
}

impl RegisterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_clipboard(clipboard: Box<dyn Clipboard>) -> Self {
        Self {
            slots: HashMap::new(),
            clipboard: Some(clipboard),
        }
    }

    /// Stores `text` under `name` and mirrors it into the unnamed register.
    pub fn set(&mut self, name: char, text: impl Into<String>, kind: RegisterKind) {
        let reg = Register::new(text, kind);
        if is_clipboard(name)
            && let Some(clipboard) = self.clipboard.as_mut()
        {
            clipboard.set(reg.text.clone());
        }
        let stored = if name.is_ascii_uppercase() {
            let slot = self.slots.entry(name.to_ascii_lowercase()).or_default();
            if reg.kind == RegisterKind::Line && !slot.text.is_empty() && !slot.text.ends_with('\n')
            {
                slot.text.push('\n');
            }
            slot.text.push_str(&reg.text);
            if reg.kind == RegisterKind::Line {
                slot.kind = RegisterKind::Line;
            }
            slot.clone()
        } else {
            self.slots.insert(name, reg.clone());
            reg
        };
        if name != UNNAMED {
            self.slots.insert(UNNAMED, stored);
        }
    }

    pub fn get(&mut self, name: char) -> Option<Register> {
        if is_clipboard(name)
            && let Some(text) = self.clipboard.as_mut().and_then(|c| c.get())
        {
            let kind = if text.ends_with('\n') {
                RegisterKind::Line
            } else {
                RegisterKind::Char
            };
            return Some(Register { text, kind });
        }
        self.slots.get(&name.to_ascii_lowercase()).cloned()
    }

    /// Text stored under `name`, empty when unset.
    pub fn text(&self, name: char) -> &str {
        self.slots
            .get(&name.to_ascii_lowercase())
            .map_or("", |r| r.text.as_str())
    }
}
