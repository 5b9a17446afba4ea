//! Piano key geometry and colors, as pure functions of the note index.

use egui::{pos2, vec2, Color32, Pos2, Rect, Vec2};

use crate::synth::NUM_KEYS;

/// Number of white keys on the keyboard.
pub const NUM_WHITE_KEYS: usize = 12;

/// Default window size.
pub const KEYBOARD_SIZE: Vec2 = vec2(200.0, 70.0);

/// Label font size.
pub const LABEL_SIZE: f32 = 12.0;

/// Labels start this far above the bottom of their key.
const LABEL_RISE: f32 = 18.0;

const BLACK_WIDTH_RATIO: f32 = 0.6;

pub const PRESSED_WHITE: Color32 = Color32::from_rgb(0x87, 0xed, 0xa2);
pub const PRESSED_BLACK: Color32 = Color32::from_rgb(0x0e, 0x7d, 0x2b);

/// Whether `note` is a white key (C D E F G A B).
pub fn is_white(note: usize) -> bool {
    matches!(note % 12, 0 | 2 | 4 | 5 | 7 | 9 | 11)
}

/// Fill color of a key.
pub fn key_color(pressed: bool, white: bool) -> Color32 {
    match (pressed, white) {
        (false, true) => Color32::WHITE,
        (false, false) => Color32::BLACK,
        (true, true) => PRESSED_WHITE,
        (true, false) => PRESSED_BLACK,
    }
}

/// Number of white keys strictly below `note`.
fn white_keys_below(note: usize) -> usize {
    (0..note).filter(|&n| is_white(n)).count()
}

/// Key rectangles for a keyboard filling `rect`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyboardLayout {
    rect: Rect,
}

impl KeyboardLayout {
    pub fn new(rect: Rect) -> Self {
        Self { rect }
    }

    pub fn white_width(&self) -> f32 {
        self.rect.width() / NUM_WHITE_KEYS as f32
    }

    pub fn black_width(&self) -> f32 {
        self.white_width() * BLACK_WIDTH_RATIO
    }

    pub fn black_height(&self) -> f32 {
        self.rect.height() / 2.0
    }

    /// Rectangle of `note`. Black keys straddle the boundary to their left.
    pub fn key_rect(&self, note: usize) -> Rect {
        let boundary = self.rect.left() + white_keys_below(note) as f32 * self.white_width();
        if is_white(note) {
            Rect::from_min_size(
                pos2(boundary, self.rect.top()),
                vec2(self.white_width(), self.rect.height()),
            )
        } else {
            Rect::from_min_size(
                pos2(boundary - self.black_width() / 2.0, self.rect.top()),
                vec2(self.black_width(), self.black_height()),
            )
        }
    }

    /// Vertical lines between adjacent white keys.
    pub fn separators(&self) -> impl Iterator<Item = [Pos2; 2]> + '_ {
        (1..NUM_WHITE_KEYS).map(move |i| {
            let x = self.rect.left() + i as f32 * self.white_width();
            [pos2(x, self.rect.top()), pos2(x, self.rect.bottom())]
        })
    }

    /// Top-center point of the label of `note` and its text color.
    pub fn label_anchor(&self, note: usize) -> (Pos2, Color32) {
        let key = self.key_rect(note);
        let anchor = pos2(key.center().x, key.bottom() - LABEL_RISE);
        let color = if is_white(note) {
            Color32::BLACK
        } else {
            Color32::WHITE
        };
        (anchor, color)
    }

    /// White notes first, then black, in pitch order: the paint order.
    pub fn paint_order() -> impl Iterator<Item = usize> {
        (0..NUM_KEYS)
            .filter(|&n| is_white(n))
            .chain((0..NUM_KEYS).filter(|&n| !is_white(n)))
    }
}

impl Default for KeyboardLayout {
    fn default() -> Self {
        Self::new(Rect::from_min_size(Pos2::ZERO, KEYBOARD_SIZE))
    }
}
