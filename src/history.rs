/// Recall list for the `:` and `/` prompts.
///
/// Starting a prompt appends an empty slot that receives the text when the
/// prompt is committed; Up/Down walk the list with an index.
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Vec<String>,
    index: usize,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        self.entries.push(String::new());
        self.index = self.entries.len() - 1;
    }

    /// Replaces the open slot with the executed text.
    pub fn commit(&mut self, text: &str) {
        self.entries.pop();
        self.entries.push(text.to_string());
        self.index = self.entries.len() - 1;
    }

    /// Drops the open slot of an abandoned prompt.
    pub fn cancel(&mut self) {
        if self.entries.last().is_some_and(String::is_empty) {
            self.entries.pop();
        }
        self.index = self.entries.len().saturating_sub(1);
    }

    pub fn up(&mut self) -> Option<&str> {
        if self.index > 0 {
            self.index -= 1;
            return self.entries.get(self.index).map(String::as_str);
        }
        None
    }

    pub fn down(&mut self) -> Option<&str> {
        if self.index + 1 < self.entries.len() {
            self.index += 1;
            return self.entries.get(self.index).map(String::as_str);
        }
        None
    }

    pub fn last(&self) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|e| !e.is_empty())
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recall_walks_back_and_forth() {
        let mut h = History::new();
        h.start();
        h.commit("first");
        h.start();
        h.commit("second");
        h.start();
        assert_eq!(h.up(), Some("second"));
        assert_eq!(h.up(), Some("first"));
        assert_eq!(h.up(), None);
        assert_eq!(h.down(), Some("second"));
        assert_eq!(h.down(), Some(""));
        assert_eq!(h.down(), None);
    }

    #[test]
    fn cancel_drops_open_slot() {
        let mut h = History::new();
        h.start();
        h.commit("kept");
        h.start();
        h.cancel();
        assert_eq!(h.last(), Some("kept"));
        h.start();
        assert_eq!(h.up(), Some("kept"));
    }
}
