//! Synthetic key events through enigo.

use enigo::Direction::{Click, Press, Release};
use enigo::{Enigo, Keyboard, Settings};
use pouf_core::{Code, InputEmitter, Modifiers};
use thiserror::Error;
use tracing::warn;

use crate::keymap::{enigo_key, enigo_modifiers};

#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to connect to the input system: {0}")]
    Connect(String),
}

/// Posts key events at the OS input layer. Enigo is not Send, so this lives
/// on the engine thread.
pub struct EnigoEmitter {
    enigo: Enigo,
}

impl EnigoEmitter {
    pub fn new() -> Result<Self, InputError> {
        let enigo =
            Enigo::new(&Settings::default()).map_err(|e| InputError::Connect(e.to_string()))?;
        Ok(Self { enigo })
    }
}

impl InputEmitter for EnigoEmitter {
    fn press_key(&mut self, key: Code, modifiers: Modifiers) {
        let Some(target) = enigo_key(key) else {
            warn!(key = ?key, "No synthetic key for code");
            return;
        };
        let held = enigo_modifiers(modifiers);

        for modifier in &held {
            if let Err(e) = self.enigo.key(*modifier, Press) {
                warn!("Failed to press {:?}: {}", modifier, e);
            }
        }
        if let Err(e) = self.enigo.key(target, Click) {
            warn!("Failed to post {:?}: {}", key, e);
        }
        // Always release, even after a failed click, so no modifier sticks.
        for modifier in held.iter().rev() {
            if let Err(e) = self.enigo.key(*modifier, Release) {
                warn!("Failed to release {:?}: {}", modifier, e);
            }
        }
    }
}
