use crate::traits::TextSurface;
use crate::types::{Position, Range};

/// Result of a literal search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    Found(Position),
    /// Found only after restarting from the opposite end of the document.
    Wrapped(Position),
    NotFound,
}

impl SearchOutcome {
    pub fn position(self) -> Option<Position> {
        match self {
            SearchOutcome::Found(p) | SearchOutcome::Wrapped(p) => Some(p),
            SearchOutcome::NotFound => None,
        }
    }
}

fn matches_at(hay: &[char], needle: &[char], at: usize) -> bool {
    hay.get(at..at + needle.len()) == Some(needle)
}

/// Case-sensitive substring search starting one past `from` (forward) or
/// strictly before `from` (backward), wrapping around once.
pub fn search<S: TextSurface>(
    s: &S,
    needle: &str,
    from: Position,
    forward: bool,
) -> SearchOutcome {
    let needle: Vec<char> = needle.chars().collect();
    if needle.is_empty() {
        return SearchOutcome::NotFound;
    }
    let hay: Vec<char> = s.slice(Range::new(0, s.len_chars())).chars().collect();
    if needle.len() > hay.len() {
        return SearchOutcome::NotFound;
    }
    let last_start = hay.len() - needle.len();

    if forward {
        let start = from.saturating_add(1);
        if let Some(p) = (start..=last_start).find(|&p| matches_at(&hay, &needle, p)) {
            return SearchOutcome::Found(p);
        }
        if let Some(p) = (0..=last_start).find(|&p| matches_at(&hay, &needle, p)) {
            return SearchOutcome::Wrapped(p);
        }
    } else {
        let below = from.min(last_start + 1);
        if let Some(p) = (0..below).rev().find(|&p| matches_at(&hay, &needle, p)) {
            return SearchOutcome::Found(p);
        }
        if let Some(p) = (0..=last_start).rev().find(|&p| matches_at(&hay, &needle, p)) {
            return SearchOutcome::Wrapped(p);
        }
    }
    SearchOutcome::NotFound
}
