//! Synthetic keyboard input.

use global_hotkey::hotkey::{Code, Modifiers};

/// A key press with the modifiers held around it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keystroke {
    pub key: Code,
    pub modifiers: Modifiers,
}

impl Keystroke {
    pub fn new(key: Code, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    /// The platform copy chord, ⌘C or Ctrl+C.
    pub fn copy() -> Self {
        Self::new(Code::KeyC, primary_modifier())
    }

    /// The platform paste chord, ⌘V or Ctrl+V.
    pub fn paste() -> Self {
        Self::new(Code::KeyV, primary_modifier())
    }

    pub fn backspace() -> Self {
        Self::new(Code::Backspace, Modifiers::empty())
    }
}

/// The modifier used for clipboard chords on this platform.
pub fn primary_modifier() -> Modifiers {
    #[cfg(target_os = "macos")]
    let modifier = Modifiers::SUPER;
    #[cfg(not(target_os = "macos"))]
    let modifier = Modifiers::CONTROL;

    modifier
}

/// Posts synthetic key events at the OS input layer.
///
/// Posting is best effort: there is no acknowledgement from the target
/// application, so implementations log failures instead of returning them.
pub trait InputEmitter {
    /// Post a key-down/key-up pair for `key` with `modifiers` held.
    fn press_key(&mut self, key: Code, modifiers: Modifiers);

    fn press(&mut self, keystroke: Keystroke) {
        self.press_key(keystroke.key, keystroke.modifiers);
    }
}

impl<T: InputEmitter + ?Sized> InputEmitter for Box<T> {
    fn press_key(&mut self, key: Code, modifiers: Modifiers) {
        (**self).press_key(key, modifiers);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clipboard_chords_use_primary_modifier() {
        assert_eq!(Keystroke::copy().key, Code::KeyC);
        assert_eq!(Keystroke::paste().key, Code::KeyV);
        assert_eq!(Keystroke::copy().modifiers, primary_modifier());
        assert!(Keystroke::backspace().modifiers.is_empty());
    }
}
