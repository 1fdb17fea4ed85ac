pub mod config;
pub mod engine;
pub mod error;
pub mod history;
pub mod host;
pub mod key;
pub mod mark;
pub mod motion;
pub mod register;
pub mod search;
pub mod surface;
pub mod traits;
pub mod types;
pub mod undo;

pub use crate::config::{Config, IndentOptions};
pub use crate::engine::{Engine, EngineBuilder, EngineSnapshot};
pub use crate::error::ExError;
#[cfg(feature = "clipboard")]
pub use crate::host::SystemClipboard;
pub use crate::host::SystemHost;
pub use crate::key::{InputEvent, KeyCode, KeyEvent, Modifiers};
pub use crate::register::{Register, RegisterKind};
pub use crate::surface::MemorySurface;
pub use crate::traits::{Clipboard, Host, TextSurface};
pub use crate::types::{
    Event, FindKind, MessageKind, Mode, Position, Range, SubMode, SubSubMode, VisualMode,
};
