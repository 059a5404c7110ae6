//! Signals handed from the keyboard listener to the activation engine.
//!
//! The listener runs on the OS event-delivery thread and may only classify
//! events; all state lives behind the channel that carries these values.

/// A classified key-down event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySignal {
    /// The configured shortcut chord was pressed
    Hotkey,
    /// Backspace was pressed
    Backspace,
    /// Printable text was typed
    Append(String),
}
