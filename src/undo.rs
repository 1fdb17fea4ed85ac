//! Linear undo/redo history.
//!
//! Every document mutation the interpreter performs is recorded as an
//! [`EditOperation`]. A composite operation (`item_count > 0`) stands for
//! the `item_count` entries recorded just below it and is undone and
//! redone with them as one unit. Recording anything new discards the
//! redo branch.

use log::debug;

use crate::traits::TextSurface;
use crate::types::{Position, Range};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditOperation {
    pub position: Position,
    /// Number of preceding operations grouped under this one.
    pub item_count: usize,
    /// Text that was in the document before the edit.
    pub removed: String,
    /// Text that is in the document after the edit.
    pub inserted: String,
    /// Cursor to restore on undo, when it was not at `position`.
    pub cursor_before: Option<Position>,
}

impl EditOperation {
    pub fn insert(position: Position, text: impl Into<String>) -> Self {
        Self {
            position,
            inserted: text.into(),
            ..Self::default()
        }
    }

    pub fn remove(position: Position, text: impl Into<String>) -> Self {
        Self {
            position,
            removed: text.into(),
            ..Self::default()
        }
    }

    pub fn replace(
        position: Position,
        removed: impl Into<String>,
        inserted: impl Into<String>,
    ) -> Self {
        Self {
            position,
            item_count: 0,
            removed: removed.into(),
            inserted: inserted.into(),
            cursor_before: None,
        }
    }

    pub fn group(position: Position, item_count: usize) -> Self {
        Self {
            position,
            item_count,
            ..Self::default()
        }
    }

    pub fn is_group(&self) -> bool {
        self.item_count > 0
    }
}

fn swap_text<S: TextSurface>(surface: &mut S, pos: Position, from: &str, to: &str) {
    let from_len = from.chars().count();
    if from_len > 0 {
        surface.remove(Range::new(pos, pos + from_len));
    }
    if !to.is_empty() {
        surface.insert(pos, to);
    }
}

#[derive(Debug, Clone, Default)]
pub struct UndoRedoStack {
    undo: Vec<EditOperation>,
    redo: Vec<EditOperation>,
}

impl UndoRedoStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, op: EditOperation) {
        self.undo.push(op);
        self.redo.clear();
    }

    /// Number of top-level entries on the undo stack.
    pub fn depth(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }

    /// Groups everything recorded since the stack had `depth` entries into
    /// one composite. Does nothing when fewer than two entries were added.
    pub fn group_since(&mut self, depth: usize, position: Position) {
        let added = self.undo.len().saturating_sub(depth);
        if added > 1 {
            self.record(EditOperation::group(position, added));
        }
    }

    /// Makes undoing the edits recorded since the stack had `depth` entries
    /// put the cursor back at `cursor`.
    pub fn set_cursor_before(&mut self, depth: usize, cursor: Position) {
        if let Some(op) = self.undo.get_mut(depth) {
            op.cursor_before = Some(cursor);
        }
    }

    /// Reverts the newest operation. Returns the cursor position to
    /// restore, or `None` when there is nothing to undo.
    pub fn undo<S: TextSurface>(&mut self, surface: &mut S) -> Option<Position> {
        let op = self.undo.pop()?;
        debug!("undo {op:?}");
        let mut cursor = op.cursor_before.unwrap_or(op.position);
        if op.is_group() {
            for _ in 0..op.item_count {
                if let Some(pos) = self.undo(surface) {
                    cursor = pos;
                }
            }
        } else {
            swap_text(surface, op.position, &op.inserted, &op.removed);
        }
        self.redo.push(op);
        Some(cursor)
    }

    /// Re-applies the most recently undone operation.
    pub fn redo<S: TextSurface>(&mut self, surface: &mut S) -> Option<Position> {
        let op = self.redo.pop()?;
        debug!("redo {op:?}");
        let mut cursor = op.position;
        if op.is_group() {
            for _ in 0..op.item_count {
                if let Some(pos) = self.redo(surface) {
                    cursor = pos;
                }
            }
        } else {
            swap_text(surface, op.position, &op.removed, &op.inserted);
        }
        self.undo.push(op);
        Some(cursor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::MemorySurface;

    fn apply(surface: &mut MemorySurface, stack: &mut UndoRedoStack, op: EditOperation) {
        swap_text(surface, op.position, &op.removed, &op.inserted);
        stack.record(op);
    }

    #[test]
    fn undo_then_redo_restores_text() {
        let mut surface = MemorySurface::new("hello world");
        let mut stack = UndoRedoStack::new();
        apply(&mut surface, &mut stack, EditOperation::remove(0, "hello "));
        assert_eq!(surface.text(), "world");

        assert_eq!(stack.undo(&mut surface), Some(0));
        assert_eq!(surface.text(), "hello world");
        assert_eq!(stack.redo(&mut surface), Some(0));
        assert_eq!(surface.text(), "world");
    }

    #[test]
    fn empty_stacks_report_none() {
        let mut surface = MemorySurface::new("x");
        let mut stack = UndoRedoStack::new();
        assert_eq!(stack.undo(&mut surface), None);
        assert_eq!(stack.redo(&mut surface), None);
    }

    #[test]
    fn new_record_clears_redo() {
        let mut surface = MemorySurface::new("ab");
        let mut stack = UndoRedoStack::new();
        apply(&mut surface, &mut stack, EditOperation::insert(2, "c"));
        stack.undo(&mut surface);
        assert_eq!(stack.redo_depth(), 1);
        apply(&mut surface, &mut stack, EditOperation::insert(0, "z"));
        assert_eq!(stack.redo_depth(), 0);
    }

    #[test]
    fn groups_undo_as_one_unit() {
        let mut surface = MemorySurface::new("abc");
        let mut stack = UndoRedoStack::new();
        apply(&mut surface, &mut stack, EditOperation::insert(1, "X"));
        let mark = stack.depth();
        apply(&mut surface, &mut stack, EditOperation::insert(3, "Y"));
        apply(&mut surface, &mut stack, EditOperation::replace(0, "a", "Z"));
        stack.group_since(mark, 0);
        assert_eq!(surface.text(), "ZXbYc");

        stack.undo(&mut surface);
        assert_eq!(surface.text(), "aXbc");
        stack.redo(&mut surface);
        assert_eq!(surface.text(), "ZXbYc");
        stack.undo(&mut surface);
        stack.undo(&mut surface);
        assert_eq!(surface.text(), "abc");
    }

    #[test]
    fn single_entry_is_not_grouped() {
        let mut stack = UndoRedoStack::new();
        stack.record(EditOperation::insert(0, "a"));
        stack.group_since(0, 0);
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn undo_restores_recorded_cursor() {
        let mut surface = MemorySurface::new("abc def");
        let mut stack = UndoRedoStack::new();
        let depth = stack.depth();
        apply(&mut surface, &mut stack, EditOperation::remove(4, "d"));
        apply(&mut surface, &mut stack, EditOperation::insert(4, "X"));
        stack.group_since(depth, 4);
        stack.set_cursor_before(depth, 5);

        assert_eq!(stack.undo(&mut surface), Some(5));
        assert_eq!(surface.text(), "abc def");
        assert_eq!(stack.redo(&mut surface), Some(4));
    }
}
