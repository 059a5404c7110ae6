//! Operating system bindings for pouf.
//!
//! Everything here is a thin adapter: the global keyboard hook that feeds the
//! engine, and the clipboard and synthetic input implementations the engine
//! drives. The engine itself only sees the traits from `pouf-core`.

mod capture;
mod clipboard;
mod emitter;
pub mod keymap;
mod permission;

pub use capture::{CaptureError, Classifier, KeyboardMonitor};
pub use clipboard::SystemClipboard;
pub use emitter::{EnigoEmitter, InputError};
pub use permission::input_monitoring_granted;
