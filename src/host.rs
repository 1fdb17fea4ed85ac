use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;

use log::debug;

use crate::traits::Host;

/// File access through `std::fs` and filters run through the platform shell.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemHost;

impl Host for SystemHost {
    fn file_exists(&self, path: &str) -> bool {
        Path::new(path).exists()
    }

    fn read_file(&mut self, path: &str) -> io::Result<String> {
        fs::read_to_string(path)
    }

    fn write_file(&mut self, path: &str, contents: &str) -> io::Result<()> {
        fs::write(path, contents)
    }

    fn filter(&mut self, command: &str, input: &str) -> io::Result<String> {
        debug!("filter through {command:?}");
        let mut child = shell(command)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()?;
        // Feed stdin from its own thread so a child writing a full stdout
        // pipe cannot deadlock against us.
        let writer = child.stdin.take().map(|mut stdin| {
            let input = input.to_owned();
            thread::spawn(move || match stdin.write_all(input.as_bytes()) {
                Err(err) if err.kind() == io::ErrorKind::BrokenPipe => Ok(()),
                other => other,
            })
        });
        let output = child.wait_with_output()?;
        if let Some(writer) = writer {
            writer
                .join()
                .map_err(|_| io::Error::other("filter input writer panicked"))??;
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(windows)]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.args(["/C", command]);
    cmd
}

#[cfg(not(windows))]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.args(["-c", command]);
    cmd
}

/// Clipboard backed by the system clipboard.
#[cfg(feature = "clipboard")]
pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

#[cfg(feature = "clipboard")]
impl SystemClipboard {
    pub fn new() -> Result<Self, arboard::Error> {
        Ok(Self {
            inner: arboard::Clipboard::new()?,
        })
    }
}

#[cfg(feature = "clipboard")]
impl crate::traits::Clipboard for SystemClipboard {
    fn get(&mut self) -> Option<String> {
        self.inner.get_text().ok()
    }

    fn set(&mut self, text: String) {
        if let Err(err) = self.inner.set_text(text) {
            log::warn!("clipboard write failed: {err}");
        }
    }
}
