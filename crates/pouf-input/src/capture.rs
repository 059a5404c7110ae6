//! System-wide keyboard capture.
//!
//! The OS delivers key events on its own thread through `rdev::listen`. The
//! callback only classifies them and hands the result to the engine over an
//! unbounded channel, so it never blocks and never touches engine state.
//! Listening is passive: events reach their target application unchanged.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;

use pouf_core::{KeySignal, Modifiers, SharedShortcut};
use rdev::{Event, EventType, Key, listen};
use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, error, info, warn};

use crate::keymap::{code_for, is_return, modifier_for};
use crate::permission::input_monitoring_granted;

static INSTALLED: AtomicBool = AtomicBool::new(false);

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("input monitoring permission not granted")]
    PermissionDenied,

    #[error("keyboard listener already installed")]
    AlreadyInstalled,

    #[error("failed to start listener thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Turns raw key events into [`KeySignal`]s.
///
/// The hook reports keys rather than modifier flags, so held modifiers are
/// tracked from their own press and release events.
pub struct Classifier {
    shortcut: SharedShortcut,
    typed_trigger: Arc<AtomicBool>,
    held: Vec<Key>,
}

impl Classifier {
    pub fn new(shortcut: SharedShortcut, typed_trigger: Arc<AtomicBool>) -> Self {
        Self {
            shortcut,
            typed_trigger,
            held: Vec::new(),
        }
    }

    /// Modifiers currently held down.
    pub fn modifiers(&self) -> Modifiers {
        self.held
            .iter()
            .filter_map(|key| modifier_for(*key))
            .fold(Modifiers::empty(), |acc, m| acc | m)
    }

    /// Classify one event. `text` is the character data the OS attached to
    /// a key press, if any.
    pub fn classify(&mut self, event: &EventType, text: Option<&str>) -> Option<KeySignal> {
        match *event {
            EventType::KeyPress(key) if modifier_for(key).is_some() => {
                if !self.held.contains(&key) {
                    self.held.push(key);
                }
                None
            }
            EventType::KeyRelease(key) => {
                self.held.retain(|held| *held != key);
                None
            }
            EventType::KeyPress(key) => self.key_down(key, text),
            _ => None,
        }
    }

    fn key_down(&self, key: Key, text: Option<&str>) -> Option<KeySignal> {
        let modifiers = self.modifiers();

        if let Some(code) = code_for(key) {
            let shortcut = self.shortcut.get();
            if shortcut.is_valid() && shortcut.matches(code, modifiers) {
                return Some(KeySignal::Hotkey);
            }
        }

        if !self.typed_trigger.load(Ordering::Relaxed) {
            return None;
        }

        // Our own synthetic backspaces come through here too. The engine
        // knows how many it sent and drops them.
        if key == Key::Backspace {
            return Some(KeySignal::Backspace);
        }

        // Chords are commands, not typing. This also keeps our own
        // synthetic copy and paste out of the buffer.
        if modifiers.intersects(Modifiers::CONTROL | Modifiers::SUPER | Modifiers::META) {
            return None;
        }

        if is_return(key) {
            return Some(KeySignal::Append("\n".to_string()));
        }

        let text = text?;
        if text.is_empty() || text.chars().any(char::is_control) {
            return None;
        }
        Some(KeySignal::Append(text.to_string()))
    }
}

/// The single system-wide key listener.
pub struct KeyboardMonitor {
    classifier: Classifier,
}

impl KeyboardMonitor {
    pub fn new(shortcut: SharedShortcut, typed_trigger: Arc<AtomicBool>) -> Self {
        Self {
            classifier: Classifier::new(shortcut, typed_trigger),
        }
    }

    /// Install the listener on its own thread, forwarding signals to
    /// `sender`. Without input monitoring permission nothing is installed.
    pub fn spawn(self, sender: UnboundedSender<KeySignal>) -> Result<JoinHandle<()>, CaptureError> {
        if !input_monitoring_granted() {
            return Err(CaptureError::PermissionDenied);
        }
        if INSTALLED.swap(true, Ordering::SeqCst) {
            return Err(CaptureError::AlreadyInstalled);
        }

        let mut classifier = self.classifier;
        let handle = std::thread::Builder::new()
            .name("pouf-capture".to_string())
            .spawn(move || {
                info!("Keyboard listener installed");
                let callback = move |event: Event| {
                    if let Some(signal) = classifier.classify(&event.event_type, event.name.as_deref())
                    {
                        if sender.send(signal).is_err() {
                            debug!("Engine is gone, dropping key signal");
                        }
                    }
                };

                // Blocks for the lifetime of the process unless the hook fails.
                if let Err(e) = listen(callback) {
                    error!("Keyboard listener failed: {:?}", e);
                    warn!("Grant input monitoring permission to pouf and restart it");
                }
                INSTALLED.store(false, Ordering::SeqCst);
            });

        match handle {
            Ok(handle) => Ok(handle),
            Err(e) => {
                INSTALLED.store(false, Ordering::SeqCst);
                Err(e.into())
            }
        }
    }
}
