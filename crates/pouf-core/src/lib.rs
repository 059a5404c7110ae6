//! Core types and configuration for pouf.
//!
//! This crate provides platform-agnostic types that are shared by the
//! capture layer, the rephrase backends and the activation engine. Nothing
//! in here talks to the operating system directly.

pub mod clipboard;
mod config;
mod event;
pub mod input;
mod shortcut;
mod state;

pub use clipboard::{
    ClipboardError, ClipboardRepresentation, ClipboardSnapshot, ClipboardTransaction,
    ClipboardTransactor,
};
pub use config::{Backend, Config, ConfigManager};
pub use event::KeySignal;
pub use global_hotkey::hotkey::{Code, Modifiers};
pub use input::InputEmitter;
pub use shortcut::{SharedShortcut, ShortcutParseError, ShortcutSpec};
pub use state::EngineState;

/// Application name
pub const APP_NAME: &str = "pouf";

/// Pretty application name for display
pub const APP_NAME_PRETTY: &str = "Pouf";

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable used to override the log filter
pub const LOG_ENV: &str = "POUF_LOG";
