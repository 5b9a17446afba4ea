use egui::Key;
use tracing::debug;

use crate::keymap::note_for_key;
use crate::synth::NUM_KEYS;

/// Model of the frame loop: which notes are held and whether the audio is stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PianoState {
    /// Held flag per note.
    keys: [bool; NUM_KEYS],

    /// Set on every key transition, cleared once the buffer is regenerated.
    dirty: bool,
}

impl PianoState {
    /// Create a `PianoState` with every key released.
    ///
    /// Starts dirty so the first frame synthesizes the silent buffer.
    pub fn new() -> Self {
        Self {
            keys: [false; NUM_KEYS],
            dirty: true,
        }
    }

    pub fn keys(&self) -> &[bool; NUM_KEYS] {
        &self.keys
    }

    pub fn is_pressed(&self, note: usize) -> bool {
        self.keys[note]
    }

    #[cfg(test)]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Holds `note`. Returns `false` (and leaves the state clean) on auto-repeat.
    pub fn press(&mut self, note: usize) -> bool {
        if self.keys[note] {
            return false;
        }
        self.keys[note] = true;
        self.dirty = true;
        debug!(note, "key down");
        true
    }

    /// Releases `note`. Returns `false` if it was not held.
    pub fn release(&mut self, note: usize) -> bool {
        if !self.keys[note] {
            return false;
        }
        self.keys[note] = false;
        self.dirty = true;
        debug!(note, "key up");
        true
    }

    /// Applies a key event; keys outside the piano are ignored.
    pub fn handle_key(&mut self, key: Key, pressed: bool) -> bool {
        match note_for_key(key) {
            Some(note) if pressed => self.press(note),
            Some(note) => self.release(note),
            None => false,
        }
    }

    /// Releases every held note, marking dirty if any was down.
    pub fn release_all(&mut self) -> bool {
        let mut changed = false;
        for note in 0..NUM_KEYS {
            changed |= self.release(note);
        }
        changed
    }

    /// Returns whether the buffer needs regenerating and clears the flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

impl Default for PianoState {
    fn default() -> Self {
        Self::new()
    }
}
