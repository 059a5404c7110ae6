//! Translation between the OS hook's keys, the shortcut key codes and the
//! keys the input emitter can post.

use enigo::Key as EnigoKey;
use pouf_core::{Code, Modifiers};
use rdev::Key;

/// The modifier bit a key press sets, if it is a modifier key.
pub fn modifier_for(key: Key) -> Option<Modifiers> {
    match key {
        Key::ShiftLeft | Key::ShiftRight => Some(Modifiers::SHIFT),
        Key::ControlLeft | Key::ControlRight => Some(Modifiers::CONTROL),
        Key::Alt | Key::AltGr => Some(Modifiers::ALT),
        Key::MetaLeft | Key::MetaRight => Some(Modifiers::SUPER),
        _ => None,
    }
}

/// The physical key code for a hooked key. Modifiers and keys without a
/// code map to `None`.
pub fn code_for(key: Key) -> Option<Code> {
    let code = match key {
        Key::KeyA => Code::KeyA,
        Key::KeyB => Code::KeyB,
        Key::KeyC => Code::KeyC,
        Key::KeyD => Code::KeyD,
        Key::KeyE => Code::KeyE,
        Key::KeyF => Code::KeyF,
        Key::KeyG => Code::KeyG,
        Key::KeyH => Code::KeyH,
        Key::KeyI => Code::KeyI,
        Key::KeyJ => Code::KeyJ,
        Key::KeyK => Code::KeyK,
        Key::KeyL => Code::KeyL,
        Key::KeyM => Code::KeyM,
        Key::KeyN => Code::KeyN,
        Key::KeyO => Code::KeyO,
        Key::KeyP => Code::KeyP,
        Key::KeyQ => Code::KeyQ,
        Key::KeyR => Code::KeyR,
        Key::KeyS => Code::KeyS,
        Key::KeyT => Code::KeyT,
        Key::KeyU => Code::KeyU,
        Key::KeyV => Code::KeyV,
        Key::KeyW => Code::KeyW,
        Key::KeyX => Code::KeyX,
        Key::KeyY => Code::KeyY,
        Key::KeyZ => Code::KeyZ,
        Key::Num0 => Code::Digit0,
        Key::Num1 => Code::Digit1,
        Key::Num2 => Code::Digit2,
        Key::Num3 => Code::Digit3,
        Key::Num4 => Code::Digit4,
        Key::Num5 => Code::Digit5,
        Key::Num6 => Code::Digit6,
        Key::Num7 => Code::Digit7,
        Key::Num8 => Code::Digit8,
        Key::Num9 => Code::Digit9,
        Key::BackQuote => Code::Backquote,
        Key::Minus => Code::Minus,
        Key::Equal => Code::Equal,
        Key::LeftBracket => Code::BracketLeft,
        Key::RightBracket => Code::BracketRight,
        Key::BackSlash => Code::Backslash,
        Key::IntlBackslash => Code::IntlBackslash,
        Key::SemiColon => Code::Semicolon,
        Key::Quote => Code::Quote,
        Key::Comma => Code::Comma,
        Key::Dot => Code::Period,
        Key::Slash => Code::Slash,
        Key::Space => Code::Space,
        Key::Tab => Code::Tab,
        Key::Return => Code::Enter,
        Key::KpReturn => Code::NumpadEnter,
        Key::Backspace => Code::Backspace,
        Key::Delete => Code::Delete,
        Key::Escape => Code::Escape,
        Key::Insert => Code::Insert,
        Key::Home => Code::Home,
        Key::End => Code::End,
        Key::PageUp => Code::PageUp,
        Key::PageDown => Code::PageDown,
        Key::UpArrow => Code::ArrowUp,
        Key::DownArrow => Code::ArrowDown,
        Key::LeftArrow => Code::ArrowLeft,
        Key::RightArrow => Code::ArrowRight,
        Key::F1 => Code::F1,
        Key::F2 => Code::F2,
        Key::F3 => Code::F3,
        Key::F4 => Code::F4,
        Key::F5 => Code::F5,
        Key::F6 => Code::F6,
        Key::F7 => Code::F7,
        Key::F8 => Code::F8,
        Key::F9 => Code::F9,
        Key::F10 => Code::F10,
        Key::F11 => Code::F11,
        Key::F12 => Code::F12,
        _ => return None,
    };
    Some(code)
}

/// Keys that end the current line when typed.
pub fn is_return(key: Key) -> bool {
    matches!(key, Key::Return | Key::KpReturn)
}

/// The emitter key for a key code. Letters and digits are posted as their
/// lowercase character so the OS resolves the layout.
pub fn enigo_key(code: Code) -> Option<EnigoKey> {
    if let Some(c) = code_char(code) {
        return Some(EnigoKey::Unicode(c));
    }
    let key = match code {
        Code::Backspace => EnigoKey::Backspace,
        Code::Delete => EnigoKey::Delete,
        Code::Enter | Code::NumpadEnter => EnigoKey::Return,
        Code::Tab => EnigoKey::Tab,
        Code::Space => EnigoKey::Space,
        Code::Escape => EnigoKey::Escape,
        Code::Home => EnigoKey::Home,
        Code::End => EnigoKey::End,
        Code::PageUp => EnigoKey::PageUp,
        Code::PageDown => EnigoKey::PageDown,
        Code::ArrowUp => EnigoKey::UpArrow,
        Code::ArrowDown => EnigoKey::DownArrow,
        Code::ArrowLeft => EnigoKey::LeftArrow,
        Code::ArrowRight => EnigoKey::RightArrow,
        Code::F1 => EnigoKey::F1,
        Code::F2 => EnigoKey::F2,
        Code::F3 => EnigoKey::F3,
        Code::F4 => EnigoKey::F4,
        Code::F5 => EnigoKey::F5,
        Code::F6 => EnigoKey::F6,
        Code::F7 => EnigoKey::F7,
        Code::F8 => EnigoKey::F8,
        Code::F9 => EnigoKey::F9,
        Code::F10 => EnigoKey::F10,
        Code::F11 => EnigoKey::F11,
        Code::F12 => EnigoKey::F12,
        _ => return None,
    };
    Some(key)
}

/// Emitter keys to hold for a modifier set, in press order.
pub fn enigo_modifiers(modifiers: Modifiers) -> Vec<EnigoKey> {
    let mut keys = Vec::new();
    if modifiers.contains(Modifiers::CONTROL) {
        keys.push(EnigoKey::Control);
    }
    if modifiers.contains(Modifiers::ALT) {
        keys.push(EnigoKey::Alt);
    }
    if modifiers.contains(Modifiers::SHIFT) {
        keys.push(EnigoKey::Shift);
    }
    if modifiers.intersects(Modifiers::SUPER | Modifiers::META) {
        keys.push(EnigoKey::Meta);
    }
    keys
}

fn code_char(code: Code) -> Option<char> {
    let c = match code {
        Code::KeyA => 'a',
        Code::KeyB => 'b',
        Code::KeyC => 'c',
        Code::KeyD => 'd',
        Code::KeyE => 'e',
        Code::KeyF => 'f',
        Code::KeyG => 'g',
        Code::KeyH => 'h',
        Code::KeyI => 'i',
        Code::KeyJ => 'j',
        Code::KeyK => 'k',
        Code::KeyL => 'l',
        Code::KeyM => 'm',
        Code::KeyN => 'n',
        Code::KeyO => 'o',
        Code::KeyP => 'p',
        Code::KeyQ => 'q',
        Code::KeyR => 'r',
        Code::KeyS => 's',
        Code::KeyT => 't',
        Code::KeyU => 'u',
        Code::KeyV => 'v',
        Code::KeyW => 'w',
        Code::KeyX => 'x',
        Code::KeyY => 'y',
        Code::KeyZ => 'z',
        Code::Digit0 => '0',
        Code::Digit1 => '1',
        Code::Digit2 => '2',
        Code::Digit3 => '3',
        Code::Digit4 => '4',
        Code::Digit5 => '5',
        Code::Digit6 => '6',
        Code::Digit7 => '7',
        Code::Digit8 => '8',
        Code::Digit9 => '9',
        Code::Slash => '/',
        Code::Backslash => '\\',
        Code::Comma => ',',
        Code::Period => '.',
        Code::Semicolon => ';',
        Code::Quote => '\'',
        Code::Minus => '-',
        Code::Equal => '=',
        Code::BracketLeft => '[',
        Code::BracketRight => ']',
        Code::Backquote => '`',
        _ => return None,
    };
    Some(c)
}
