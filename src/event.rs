//! Application events for the tao event loop.

use crate::EngineState;

/// Events sent to the tao event loop from other threads.
#[derive(Debug, Clone)]
pub enum PoufEvent {
    /// The engine started or finished a pipeline
    StateChanged(EngineState),
}
