// Re-export from sub-crates
pub use pouf_core::{
    APP_NAME, APP_NAME_PRETTY, Config, ConfigManager, DEFAULT_LOG_LEVEL, EngineState, KeySignal,
    LOG_ENV, SharedShortcut,
};
pub use pouf_engine::{Engine, Timings};
pub use pouf_input::{CaptureError, KeyboardMonitor};

// App-specific modules
pub mod event;
pub mod icon;
pub mod notify;
pub mod process;

// Version from this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
