//! Keyboard shortcut configuration.
//!
//! A [`ShortcutSpec`] is a plain value: a physical key plus the modifiers
//! that must be held. It is replaced wholesale on reconfiguration, never
//! mutated in place. The capture layer reads the active spec through a
//! [`SharedShortcut`] on every key-down, so a replacement takes effect on the
//! very next event.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use global_hotkey::hotkey::{Code, HotKey, Modifiers};
use parking_lot::RwLock;
use thiserror::Error;

/// The modifiers a shortcut may require. Everything else an event reports
/// (caps lock, fn, ...) is ignored.
const TRACKED: Modifiers = Modifiers::CONTROL
    .union(Modifiers::ALT)
    .union(Modifiers::SHIFT)
    .union(Modifiers::SUPER);

#[derive(Debug, Error)]
pub enum ShortcutParseError {
    #[error("invalid shortcut {input:?}: {reason}")]
    Invalid { input: String, reason: String },
}

/// A key plus the set of modifiers required to activate it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShortcutSpec {
    key: Code,
    modifiers: Modifiers,
}

impl ShortcutSpec {
    /// Command, the ⌘ key. Reported as `SUPER` (or `META` by some backends).
    pub const COMMAND: Modifiers = Modifiers::SUPER;
    /// Option, the ⌥ key.
    pub const OPTION: Modifiers = Modifiers::ALT;
    pub const CONTROL: Modifiers = Modifiers::CONTROL;
    pub const SHIFT: Modifiers = Modifiers::SHIFT;

    pub fn new(key: Code, modifiers: Modifiers) -> Self {
        Self {
            key,
            modifiers: normalize(modifiers),
        }
    }

    pub fn key(&self) -> Code {
        self.key
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// A shortcut is only usable when it requires command or control, so a
    /// plain key chord can never fire it by accident.
    pub fn is_valid(&self) -> bool {
        self.modifiers.intersects(Self::COMMAND | Self::CONTROL)
    }

    /// True when `key` is this shortcut's key and every required modifier is
    /// held. Extra modifiers in `observed` are tolerated.
    pub fn matches(&self, key: Code, observed: Modifiers) -> bool {
        self.key == key && normalize(observed).contains(self.modifiers)
    }

    pub fn has_command(&self) -> bool {
        self.modifiers.contains(Self::COMMAND)
    }

    pub fn has_option(&self) -> bool {
        self.modifiers.contains(Self::OPTION)
    }

    pub fn has_control(&self) -> bool {
        self.modifiers.contains(Self::CONTROL)
    }

    pub fn has_shift(&self) -> bool {
        self.modifiers.contains(Self::SHIFT)
    }

    /// Human readable label, e.g. `⌥⌘/`.
    pub fn label(&self) -> String {
        let mut label = String::new();
        if self.has_control() {
            label.push('⌃');
        }
        if self.has_option() {
            label.push('⌥');
        }
        if self.has_shift() {
            label.push('⇧');
        }
        if self.has_command() {
            label.push('⌘');
        }
        label.push_str(&key_label(self.key));
        label
    }
}

impl Default for ShortcutSpec {
    /// `/` with command and option; control stands in for command off macOS.
    fn default() -> Self {
        #[cfg(target_os = "macos")]
        let modifiers = Self::COMMAND | Self::OPTION;
        #[cfg(not(target_os = "macos"))]
        let modifiers = Self::CONTROL | Self::OPTION;

        Self::new(Code::Slash, modifiers)
    }
}

impl From<HotKey> for ShortcutSpec {
    fn from(hotkey: HotKey) -> Self {
        Self::new(hotkey.key, hotkey.mods)
    }
}

impl FromStr for ShortcutSpec {
    type Err = ShortcutParseError;

    /// Parses `"modifier+modifier+Key"`, e.g. `"super+alt+Slash"` or
    /// `"ctrl+shift+K"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hotkey = HotKey::from_str(s.trim()).map_err(|e| ShortcutParseError::Invalid {
            input: s.to_string(),
            reason: e.to_string(),
        })?;
        Ok(hotkey.into())
    }
}

impl fmt::Display for ShortcutSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (flag, name) in [
            (Self::CONTROL, "control"),
            (Self::OPTION, "alt"),
            (Self::SHIFT, "shift"),
            (Self::COMMAND, "super"),
        ] {
            if self.modifiers.contains(flag) {
                write!(f, "{name}+")?;
            }
        }
        write!(f, "{:?}", self.key)
    }
}

/// Folds `META` into `SUPER` and drops modifiers a shortcut can't require.
fn normalize(modifiers: Modifiers) -> Modifiers {
    let mut normalized = modifiers & TRACKED;
    if modifiers.contains(Modifiers::META) {
        normalized.insert(Modifiers::SUPER);
    }
    normalized
}

fn key_label(key: Code) -> String {
    let label = match key {
        Code::KeyA => "A",
        Code::KeyB => "B",
        Code::KeyC => "C",
        Code::KeyD => "D",
        Code::KeyE => "E",
        Code::KeyF => "F",
        Code::KeyG => "G",
        Code::KeyH => "H",
        Code::KeyI => "I",
        Code::KeyJ => "J",
        Code::KeyK => "K",
        Code::KeyL => "L",
        Code::KeyM => "M",
        Code::KeyN => "N",
        Code::KeyO => "O",
        Code::KeyP => "P",
        Code::KeyQ => "Q",
        Code::KeyR => "R",
        Code::KeyS => "S",
        Code::KeyT => "T",
        Code::KeyU => "U",
        Code::KeyV => "V",
        Code::KeyW => "W",
        Code::KeyX => "X",
        Code::KeyY => "Y",
        Code::KeyZ => "Z",
        Code::Digit0 => "0",
        Code::Digit1 => "1",
        Code::Digit2 => "2",
        Code::Digit3 => "3",
        Code::Digit4 => "4",
        Code::Digit5 => "5",
        Code::Digit6 => "6",
        Code::Digit7 => "7",
        Code::Digit8 => "8",
        Code::Digit9 => "9",
        Code::Minus => "-",
        Code::Equal => "=",
        Code::BracketLeft => "[",
        Code::BracketRight => "]",
        Code::Semicolon => ";",
        Code::Quote => "'",
        Code::Comma => ",",
        Code::Period => ".",
        Code::Slash => "/",
        Code::Backslash => "\\",
        Code::Backquote => "`",
        Code::Space => "Space",
        Code::Enter => "↩",
        Code::Tab => "⇥",
        Code::Backspace => "⌫",
        Code::Delete => "⌦",
        Code::Escape => "⎋",
        Code::ArrowLeft => "←",
        Code::ArrowRight => "→",
        Code::ArrowUp => "↑",
        Code::ArrowDown => "↓",
        Code::Home => "↖",
        Code::End => "↘",
        Code::PageUp => "⇞",
        Code::PageDown => "⇟",
        Code::F1 => "F1",
        Code::F2 => "F2",
        Code::F3 => "F3",
        Code::F4 => "F4",
        Code::F5 => "F5",
        Code::F6 => "F6",
        Code::F7 => "F7",
        Code::F8 => "F8",
        Code::F9 => "F9",
        Code::F10 => "F10",
        Code::F11 => "F11",
        Code::F12 => "F12",
        other => return format!("{other:?}"),
    };
    label.to_string()
}

/// The active shortcut, shared between the config owner and the capture
/// callback. Readers copy the value out; writers swap it wholesale.
#[derive(Debug, Clone, Default)]
pub struct SharedShortcut {
    inner: Arc<RwLock<ShortcutSpec>>,
}

impl SharedShortcut {
    pub fn new(spec: ShortcutSpec) -> Self {
        Self {
            inner: Arc::new(RwLock::new(spec)),
        }
    }

    pub fn get(&self) -> ShortcutSpec {
        *self.inner.read()
    }

    /// Installs `spec` and returns the one it replaced.
    pub fn replace(&self, spec: ShortcutSpec) -> ShortcutSpec {
        std::mem::replace(&mut *self.inner.write(), spec)
    }
}
