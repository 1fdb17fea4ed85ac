use std::cell::RefCell;
use std::collections::HashMap;
use std::io;
use std::rc::Rc;

use vim_modal::traits::Host;

/// In-memory files plus a canned filter. Clones share their state so a
/// test can inspect what the engine wrote.
#[derive(Default, Debug, Clone)]
pub struct MockHost {
    files: Rc<RefCell<HashMap<String, String>>>,
    filters: Rc<RefCell<Vec<(String, String)>>>,
}

impl MockHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, name: &str, contents: &str) -> Self {
        self.files
            .borrow_mut()
            .insert(name.to_string(), contents.to_string());
        self
    }

    pub fn file(&self, name: &str) -> Option<String> {
        self.files.borrow().get(name).cloned()
    }

    /// Commands and inputs the filter was called with.
    pub fn filter_calls(&self) -> Vec<(String, String)> {
        self.filters.borrow().clone()
    }
}

impl Host for MockHost {
    fn file_exists(&self, path: &str) -> bool {
        self.files.borrow().contains_key(path)
    }

    fn read_file(&mut self, path: &str) -> io::Result<String> {
        self.files
            .borrow()
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.to_string()))
    }

    fn write_file(&mut self, path: &str, contents: &str) -> io::Result<()> {
        self.files
            .borrow_mut()
            .insert(path.to_string(), contents.to_string());
        Ok(())
    }

    /// `sort` sorts lines, `upper` upper-cases, anything else fails.
    fn filter(&mut self, command: &str, input: &str) -> io::Result<String> {
        self.filters
            .borrow_mut()
            .push((command.to_string(), input.to_string()));
        match command {
            "sort" => {
                let mut lines: Vec<&str> = input.lines().collect();
                lines.sort_unstable();
                Ok(lines.iter().map(|l| format!("{l}\n")).collect())
            }
            "upper" => Ok(input.to_uppercase()),
            _ => Err(io::Error::other(format!("unknown command {command}"))),
        }
    }
}
