//! Fixed settle delays.
//!
//! The target application gives no acknowledgement for synthetic input, so
//! each step waits a fixed time for it to catch up before the next one.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    /// After the copy chord, before reading the clipboard
    pub copy_settle: Duration,
    /// After the paste chord, before restoring the clipboard
    pub paste_settle: Duration,
    /// Between synthetic backspaces
    pub backspace_interval: Duration,
    /// After the last backspace, before pasting
    pub pre_paste: Duration,
    /// Upper bound on one rephrase call
    pub request_timeout: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            copy_settle: Duration::from_millis(100),
            paste_settle: Duration::from_millis(100),
            backspace_interval: Duration::from_millis(10),
            pre_paste: Duration::from_millis(50),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl Timings {
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}
