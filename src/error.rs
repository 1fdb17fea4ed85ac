use std::io;

use thiserror::Error;

/// Failures of ex commands and the operations they trigger.
///
/// None of these are fatal: the interpreter reports them on the
/// minibuffer and returns to command mode.
#[derive(Debug, Error)]
pub enum ExError {
    #[error("E492: Not an editor command: {0}")]
    NotAnEditorCommand(String),

    #[error("E20: Mark '{0}' not set")]
    MarkNotSet(char),

    #[error("File '{0}' exists (add ! to override)")]
    FileExists(String),

    #[error("Cannot open file '{0}' for reading")]
    CannotOpen(String),

    #[error("E32: No file name")]
    NoFileName,

    #[error("Cannot write '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Cannot run '{command}': {source}")]
    Filter {
        command: String,
        #[source]
        source: io::Error,
    },
}
