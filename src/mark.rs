use std::collections::HashMap;

use crate::types::Position;

/// Start of the most recent visual selection.
pub const VISUAL_START: char = '<';
/// End of the most recent visual selection.
pub const VISUAL_END: char = '>';

/// Named document positions set with `m` and read by `` ` ``, `'` and ex
/// addresses.
#[derive(Debug, Clone, Default)]
pub struct MarkStore {
    marks: HashMap<char, Position>,
}

impl MarkStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: char, pos: Position) {
        self.marks.insert(name, pos);
    }

    pub fn get(&self, name: char) -> Option<Position> {
        self.marks.get(&name).copied()
    }
}
