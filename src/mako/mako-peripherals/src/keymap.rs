//! Host keyboard glue: physical keys drive the KY button mask, typed
//! characters feed the KB queue.

use mako_core::constants::keys::*;
use mako_core::memory::Keypad;

/// Keys the host front end distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostKey {
    Left,
    Up,
    Right,
    Down,
    Z,
    X,
    Space,
    Backspace,
    Other,
}

impl HostKey {
    /// Translate a browser-style key code
    pub fn from_code(code: u32) -> HostKey {
        match code {
            37 => HostKey::Left,
            38 => HostKey::Up,
            39 => HostKey::Right,
            40 => HostKey::Down,
            90 => HostKey::Z,
            88 => HostKey::X,
            32 => HostKey::Space,
            8 => HostKey::Backspace,
            _ => HostKey::Other,
        }
    }

    /// Button bit this key holds down, if any
    pub fn button(self) -> Option<i32> {
        match self {
            HostKey::Left => Some(KEY_LF),
            HostKey::Up => Some(KEY_UP),
            HostKey::Right => Some(KEY_RT),
            HostKey::Down => Some(KEY_DN),
            HostKey::Z | HostKey::Space => Some(KEY_A),
            HostKey::X => Some(KEY_B),
            HostKey::Backspace | HostKey::Other => None,
        }
    }
}

pub fn key_down(keypad: &Keypad, key: HostKey) {
    if let Some(bit) = key.button() {
        keypad.press(bit);
    }
    // Backspace never arrives as a typed character
    if key == HostKey::Backspace {
        keypad.push_char(8);
    }
}

pub fn key_up(keypad: &Keypad, key: HostKey) {
    if let Some(bit) = key.button() {
        keypad.release(bit);
    }
}

/// A character typed on the host keyboard
pub fn key_typed(keypad: &Keypad, code: i32) {
    if code == 8 {
        return;
    }
    keypad.push_char(code);
}

#[cfg(test)]
mod keymap_tests {
    use super::*;
    use mako_core::memory::input::InputPorts;

    #[test]
    fn test_key_codes() {
        assert_eq!(HostKey::from_code(37).button(), Some(KEY_LF));
        assert_eq!(HostKey::from_code(40).button(), Some(KEY_DN));
        assert_eq!(HostKey::from_code(32).button(), Some(KEY_A));
        assert_eq!(HostKey::from_code(90).button(), Some(KEY_A));
        assert_eq!(HostKey::from_code(88).button(), Some(KEY_B));
        assert_eq!(HostKey::from_code(65), HostKey::Other);
    }

    #[test]
    fn test_buttons_follow_key_state() {
        let ports = InputPorts::new();
        let keypad = ports.keypad();
        key_down(&keypad, HostKey::Up);
        key_down(&keypad, HostKey::Space);
        key_down(&keypad, HostKey::Z);
        assert_eq!(keypad.held(), KEY_UP | KEY_A);

        key_up(&keypad, HostKey::Z);
        assert_eq!(keypad.held(), KEY_UP);
        key_up(&keypad, HostKey::Up);
        assert_eq!(keypad.held(), 0);
    }

    #[test]
    fn test_typed_characters_queue() {
        let mut ports = InputPorts::new();
        let keypad = ports.keypad();
        key_typed(&keypad, 'h' as i32);
        key_typed(&keypad, 8);
        key_down(&keypad, HostKey::Backspace);
        key_typed(&keypad, 13);
        key_typed(&keypad, 0);

        assert_eq!(ports.next_char(), 'h' as i32);
        assert_eq!(ports.next_char(), 8);
        assert_eq!(ports.next_char(), 10);
        assert_eq!(ports.next_char(), -1);
        assert_eq!(keypad.held(), 0);
    }
}
