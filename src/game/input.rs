//! Logical input vocabulary
//!
//! Device decoding belongs to the presentation layer; the core only sees
//! these keys and board-relative mouse points.

use serde::{Deserialize, Serialize};

/// Logical key. Declaration order matters: everything from `Left` on is
/// accepted by key remapping, everything after `Space` is a nick character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Key {
    None,
    F1,
    Enter,
    Escape,
    Left,
    Right,
    Up,
    Down,
    Backspace,
    Space,
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,
    Num0, Num1, Num2, Num3, Num4, Num5, Num6, Num7, Num8, Num9,
    Underscore,
    Dash,
}

const LETTERS: [Key; 26] = [
    Key::A, Key::B, Key::C, Key::D, Key::E, Key::F, Key::G, Key::H, Key::I, Key::J, Key::K,
    Key::L, Key::M, Key::N, Key::O, Key::P, Key::Q, Key::R, Key::S, Key::T, Key::U, Key::V,
    Key::W, Key::X, Key::Y, Key::Z,
];

const DIGITS: [Key; 10] = [
    Key::Num0, Key::Num1, Key::Num2, Key::Num3, Key::Num4, Key::Num5, Key::Num6, Key::Num7,
    Key::Num8, Key::Num9,
];

impl Key {
    /// Keys that can be bound to an action
    pub fn is_bindable(&self) -> bool {
        *self >= Key::Left
    }

    /// Character typed into a nick, if any
    pub fn to_char(&self) -> Option<char> {
        if *self <= Key::Space {
            return None;
        }
        if let Some(i) = LETTERS.iter().position(|k| k == self) {
            return Some((b'A' + i as u8) as char);
        }
        if let Some(i) = DIGITS.iter().position(|k| k == self) {
            return Some((b'0' + i as u8) as char);
        }
        match self {
            Key::Underscore => Some('_'),
            Key::Dash => Some('-'),
            _ => None,
        }
    }

    /// Inverse of `to_char`, case-insensitive for letters
    pub fn from_char(c: char) -> Option<Key> {
        match c {
            'a'..='z' | 'A'..='Z' => {
                let i = (c.to_ascii_uppercase() as u8 - b'A') as usize;
                Some(LETTERS[i])
            }
            '0'..='9' => Some(DIGITS[(c as u8 - b'0') as usize]),
            '_' => Some(Key::Underscore),
            '-' => Some(Key::Dash),
            ' ' => Some(Key::Space),
            _ => None,
        }
    }
}

/// Remappable player action
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Left,
    Right,
    Up,
    Down,
    Fire,
    Bomb,
    Tnt,
}

impl Action {
    /// Order in which the setup board captures bindings
    pub const SETUP_ORDER: [Action; 7] = [
        Action::Left,
        Action::Right,
        Action::Up,
        Action::Down,
        Action::Fire,
        Action::Bomb,
        Action::Tnt,
    ];

    pub fn default_key(&self) -> Key {
        match self {
            Action::Left => Key::Left,
            Action::Right => Key::Right,
            Action::Up => Key::Up,
            Action::Down => Key::Down,
            Action::Fire => Key::Space,
            Action::Bomb => Key::B,
            Action::Tnt => Key::T,
        }
    }
}
