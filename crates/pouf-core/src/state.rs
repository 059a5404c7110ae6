//! Activation engine state types.

/// The current state of the activation engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EngineState {
    /// Waiting for a hotkey or a typed trigger
    #[default]
    Idle,
    /// A capture, rephrase and inject pipeline is in flight
    Busy,
}

impl EngineState {
    pub fn is_busy(&self) -> bool {
        matches!(self, EngineState::Busy)
    }
}
