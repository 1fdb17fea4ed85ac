//! Ex command lines: `[range]command[!] [argument]`.

use log::{debug, warn};

use super::Engine;
use crate::error::ExError;
use crate::motion::{first_non_blank, line_of, line_start};
use crate::register::{RegisterKind, UNNAMED};
use crate::traits::TextSurface;
use crate::types::{Event, Range, VisualMode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ExCommand<'a> {
    /// A bare address.
    Goto,
    Quit { force: bool },
    Delete { register: Option<char> },
    Write { force: bool, file: Option<&'a str> },
    Read { file: &'a str },
    Filter { command: &'a str },
    Redo,
    Set { args: Option<&'a str> },
}

/// Splits `name[ argument]`; `None` when `cmd` is a different command.
fn argument<'a>(cmd: &'a str, name: &str) -> Option<Option<&'a str>> {
    let rest = cmd.strip_prefix(name)?;
    if rest.is_empty() {
        Some(None)
    } else {
        rest.strip_prefix(' ').map(Some)
    }
}

impl<'a> ExCommand<'a> {
    /// Parses the part of an ex line after its range.
    pub(crate) fn parse(cmd: &'a str) -> Option<Self> {
        if cmd.is_empty() {
            return Some(ExCommand::Goto);
        }
        match cmd {
            "q" => return Some(ExCommand::Quit { force: false }),
            "q!" => return Some(ExCommand::Quit { force: true }),
            "red" | "redo" => return Some(ExCommand::Redo),
            _ => {}
        }
        if let Some(command) = cmd.strip_prefix('!') {
            return Some(ExCommand::Filter { command });
        }
        if let Some(arg) = argument(cmd, "d") {
            let register = arg.and_then(|a| a.trim().chars().next());
            return Some(ExCommand::Delete { register });
        }
        if let Some(rest) = cmd.strip_prefix('w') {
            let (force, rest) = match rest.strip_prefix('!') {
                Some(rest) => (true, rest),
                None => (false, rest),
            };
            if let Some(arg) = argument(rest, "") {
                let file = arg.map(str::trim).filter(|f| !f.is_empty());
                return Some(ExCommand::Write { force, file });
            }
        }
        if let Some(Some(file)) = argument(cmd, "r") {
            return Some(ExCommand::Read { file: file.trim() });
        }
        if let Some(arg) = argument(cmd, "set").or_else(|| argument(cmd, "se")) {
            return Some(ExCommand::Set {
                args: arg.map(str::trim).filter(|a| !a.is_empty()),
            });
        }
        None
    }
}

fn count_lines(text: &str) -> usize {
    let breaks = text.matches('\n').count();
    if text.is_empty() || text.ends_with('\n') {
        breaks
    } else {
        breaks + 1
    }
}

impl<S: TextSurface> Engine<S> {
    /// Runs one ex line, reports any failure on the minibuffer and always
    /// returns to command mode.
    pub(super) fn execute_ex_line(&mut self, line: &str) {
        debug!("ex command {line:?}");
        self.enter_command_mode();
        if let Err(err) = self.run_ex_command(line) {
            warn!("{err}");
            self.show_red_message(&err.to_string());
        }
        self.anchor = self.position;
        self.update_mini_buffer();
    }

    /// Reads one address: `.`, `$`, a line number, `'x`, or `+n`/`-n`
    /// relative to the cursor line. Lines are 1-based.
    fn read_line_code(&self, cmd: &mut &str) -> Result<Option<usize>, ExError> {
        let current = self.line() + 1;
        let Some(c) = cmd.chars().next() else {
            return Ok(None);
        };
        match c {
            '.' => {
                *cmd = &cmd[1..];
                Ok(Some(current))
            }
            '$' => {
                *cmd = &cmd[1..];
                Ok(Some(self.surface.line_count()))
            }
            '\'' => {
                let Some(name) = cmd[1..].chars().next() else {
                    return Ok(None);
                };
                *cmd = &cmd[1 + name.len_utf8()..];
                let pos = self.marks.get(name).ok_or(ExError::MarkNotSet(name))?;
                Ok(Some(line_of(&self.surface, pos) + 1))
            }
            '+' | '-' => {
                *cmd = &cmd[1..];
                let n = self.read_line_code(cmd)?.unwrap_or(1);
                Ok(Some(if c == '+' {
                    current.saturating_add(n)
                } else {
                    current.saturating_sub(n)
                }))
            }
            '0'..='9' => {
                let digits = cmd.len() - cmd.trim_start_matches(|c: char| c.is_ascii_digit()).len();
                let n = cmd[..digits].parse().unwrap_or(usize::MAX);
                *cmd = &cmd[digits..];
                Ok(Some(n))
            }
            _ => Ok(None),
        }
    }

    /// Clamps a 1-based line number to a 0-based document line.
    fn ex_line(&self, line: usize) -> usize {
        line.clamp(1, self.surface.line_count().max(1)) - 1
    }

    fn run_ex_command(&mut self, line: &str) -> Result<(), ExError> {
        let expanded;
        let mut cmd = match line.strip_prefix('%') {
            Some(rest) => {
                expanded = format!("1,${rest}");
                expanded.as_str()
            }
            None => line,
        };
        let begin = self.read_line_code(&mut cmd)?;
        let end = match cmd.strip_prefix(',') {
            Some(rest) => {
                cmd = rest;
                self.read_line_code(&mut cmd)?
            }
            None => None,
        };
        let cmd = cmd.trim_start();
        let command =
            ExCommand::parse(cmd).ok_or_else(|| ExError::NotAnEditorCommand(line.to_string()))?;
        debug!("ex range {begin:?},{end:?} command {command:?}");

        let current = self.line() + 1;
        match command {
            ExCommand::Goto => {
                if let Some(target) = end.or(begin) {
                    self.position = line_start(&self.surface, self.ex_line(target));
                    self.desired_column = Some(0);
                }
                self.show_black_message("");
            }
            ExCommand::Quit { force } => {
                debug!("quit requested (force: {force})");
                self.quit();
            }
            ExCommand::Delete { register } => {
                let b = begin.unwrap_or(current);
                let range = self.line_range(self.ex_line(b), self.ex_line(end.unwrap_or(b)));
                let text = self.remove_range(range);
                self.registers
                    .set(register.unwrap_or(UNNAMED), text, RegisterKind::Line);
                self.position = first_non_blank(&self.surface, self.line());
                self.show_black_message("");
            }
            ExCommand::Write { force, file } => {
                let range = match begin {
                    None => Range::new(0, self.surface.len_chars()),
                    Some(b) => self.line_range(
                        self.ex_line(b),
                        self.ex_line(end.unwrap_or(self.surface.line_count())),
                    ),
                };
                self.write_file(range, force, file)?;
            }
            ExCommand::Read { file } => {
                let data = self
                    .host
                    .read_file(file)
                    .map_err(|_| ExError::CannotOpen(file.to_string()))?;
                self.replace_range(Range::new(0, self.surface.len_chars()), &data);
                self.position = 0;
                self.current_file = Some(file.to_string());
                self.show_black_message(&format!(
                    "\"{file}\" {}L, {}C",
                    count_lines(&data),
                    data.chars().count()
                ));
            }
            ExCommand::Filter { command } => {
                let b = begin.unwrap_or(current);
                let range = self.line_range(self.ex_line(b), self.ex_line(end.unwrap_or(b)));
                let input = self.surface.slice(range);
                let command = command.trim();
                let output = self.host.filter(command, &input).map_err(|source| {
                    ExError::Filter {
                        command: command.to_string(),
                        source,
                    }
                })?;
                self.replace_range(range, &output);
                self.position = range.start;
                if self.visual_mode != VisualMode::None {
                    self.leave_visual_mode();
                }
                self.show_black_message(&format!("{} lines filtered", count_lines(&input)));
            }
            ExCommand::Redo => self.redo_command(),
            ExCommand::Set { args: None } => {
                let listing = self.config.describe();
                self.events.push(Event::ExtraInformation(listing));
                self.show_black_message("");
            }
            ExCommand::Set { args: Some(args) } => {
                for arg in args.split_whitespace() {
                    self.config.apply_set_argument(arg);
                }
                self.show_black_message("");
            }
        }
        Ok(())
    }

    fn write_file(&mut self, range: Range, force: bool, file: Option<&str>) -> Result<(), ExError> {
        let name = match file {
            Some(name) => name.to_string(),
            None => self.current_file.clone().ok_or(ExError::NoFileName)?,
        };
        let exists = self.host.file_exists(&name);
        if exists && !force && file.is_some() {
            return Err(ExError::FileExists(name));
        }
        let contents = self.surface.slice(range);
        self.host
            .write_file(&name, &contents)
            .map_err(|source| ExError::Io {
                path: name.clone(),
                source,
            })?;
        if self.current_file.is_none() {
            self.current_file = Some(name.clone());
        }
        self.show_black_message(&format!(
            "\"{name}\" {}{}L, {}C written",
            if exists { "" } else { "[New] " },
            count_lines(&contents),
            contents.chars().count()
        ));
        Ok(())
    }
}
