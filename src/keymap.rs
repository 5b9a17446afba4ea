//! Computer-keyboard to note mapping.
//!
//! The top two letter rows form the piano: letters are the white keys and
//! the digit row above them the black keys, from C up to the G an octave
//! and a half higher.

use egui::Key;

use crate::synth::NUM_KEYS;

/// Physical key and its hint character, indexed by note.
const KEYMAP: [(Key, char); NUM_KEYS] = [
    (Key::Q, 'Q'),            // C
    (Key::Num2, '2'),         //
    (Key::W, 'W'),            // D
    (Key::Num3, '3'),         //
    (Key::E, 'E'),            // E
    (Key::R, 'R'),            // F
    (Key::Num5, '5'),         //
    (Key::T, 'T'),            // G
    (Key::Num6, '6'),         //
    (Key::Y, 'Y'),            // A
    (Key::Num7, '7'),         //
    (Key::U, 'U'),            // B
    (Key::I, 'I'),            // C
    (Key::Num9, '9'),         //
    (Key::O, 'O'),            // D
    (Key::Num0, '0'),         //
    (Key::P, 'P'),            // E
    (Key::OpenBracket, '['),  // F
    (Key::Equals, '='),       //
    (Key::CloseBracket, ']'), // G
];

/// Note played by `key`, if it is one of the piano keys.
pub fn note_for_key(key: Key) -> Option<usize> {
    KEYMAP.iter().position(|&(mapped, _)| mapped == key)
}

/// Single-character hint drawn on the key for `note`.
pub fn label_for_note(note: usize) -> char {
    KEYMAP[note].1
}
