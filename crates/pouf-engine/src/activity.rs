//! Keystrokes seen while a pipeline runs.

use std::cell::Cell;

/// Shared between the engine, which records key signals as they arrive, and
/// the running pipeline, which checks them before it edits typed text.
///
/// The OS hook also reports the backspaces the pipeline sends itself. Those
/// are announced with [`KeyActivity::expect_echoes`] and swallowed by
/// [`KeyActivity::take_echo`] so they neither edit the buffer nor count as
/// typing.
#[derive(Debug, Default)]
pub struct KeyActivity {
    typed: Cell<usize>,
    echoes: Cell<usize>,
}

impl KeyActivity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything recorded so far.
    pub fn reset(&self) {
        self.typed.set(0);
        self.echoes.set(0);
    }

    /// The user typed `keys` characters or backspaces.
    pub fn record_typing(&self, keys: usize) {
        self.typed.set(self.typed.get() + keys);
    }

    /// Keys typed since the last reset.
    pub fn typed(&self) -> usize {
        self.typed.get()
    }

    /// The next `count` backspaces reported by the hook are our own.
    pub fn expect_echoes(&self, count: usize) {
        self.echoes.set(self.echoes.get() + count);
    }

    /// Consume one expected echo. `false` means the backspace came from the
    /// user.
    pub fn take_echo(&self) -> bool {
        match self.echoes.get() {
            0 => false,
            n => {
                self.echoes.set(n - 1);
                true
            }
        }
    }
}
