//! Additive sine synthesis of the held notes into a fixed looping buffer.
//!
//! The whole buffer is recomputed from scratch whenever the pressed-key set
//! changes; nothing is streamed.

use std::f64::consts::PI;

use tracing::debug;

use crate::audio::PcmSink;

/// Output sample rate in Hz.
pub const SAMPLE_RATE: u32 = 44_100;

/// Length of the looped buffer in seconds.
pub const DURATION_SECS: usize = 5;

/// Number of samples in the looped buffer.
pub const NUM_SAMPLES: usize = DURATION_SECS * SAMPLE_RATE as usize;

/// Number of playable notes.
pub const NUM_KEYS: usize = 20;

/// Default amplitude of a single note.
pub const VOLUME: f64 = 500.0;

/// Reference pitch (A) in Hz.
pub const REFERENCE_HZ: f64 = 440.0;

/// Note 0 sits this many semitones above the reference pitch.
pub const REFERENCE_OFFSET: i32 = 3;

/// Frequency of a note index in equal temperament.
///
/// Note 0 is the C three semitones above A 440, so `note_frequency(9)` is
/// the A an octave up at 880 Hz.
pub fn note_frequency(note: usize) -> f64 {
    let semitone = 2.0_f64.powf(1.0 / 12.0);
    let steps = note as i32 + REFERENCE_OFFSET;
    REFERENCE_HZ * semitone.powi(steps)
}

/// Converts an accumulated sum to a sample, truncating toward zero.
///
/// Out-of-range sums wrap around instead of clipping.
fn to_sample(sum: f64) -> i16 {
    sum as i32 as i16
}

/// Regenerates the looped sample buffer from the pressed-key set.
pub struct Synthesizer {
    volume: f64,
    /// Floating-point running sums, one per sample.
    mix: Box<[f64]>,
    samples: Box<[i16]>,
}

impl Synthesizer {
    /// Creates a synthesizer whose notes sound at `volume` amplitude.
    pub fn new(volume: f64) -> Self {
        Self {
            volume,
            mix: vec![0.0; NUM_SAMPLES].into_boxed_slice(),
            samples: vec![0; NUM_SAMPLES].into_boxed_slice(),
        }
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    /// The most recently generated buffer.
    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    /// Overwrites the buffer with the sum of one sine per pressed key.
    pub fn regenerate(&mut self, keys: &[bool; NUM_KEYS]) -> &[i16] {
        self.mix.fill(0.0);

        for (note, _) in keys.iter().enumerate().filter(|&(_, &down)| down) {
            let freq = note_frequency(note);
            let phase_step = 2.0 * PI * freq / f64::from(SAMPLE_RATE);
            for (s, sum) in self.mix.iter_mut().enumerate() {
                *sum += self.volume * (s as f64 * phase_step).sin();
            }
        }

        for (sample, &sum) in self.samples.iter_mut().zip(self.mix.iter()) {
            *sample = to_sample(sum);
        }

        &self.samples
    }

    /// Regenerates and restarts looped playback of the new buffer on `sink`.
    pub fn regenerate_into(&mut self, keys: &[bool; NUM_KEYS], sink: &mut dyn PcmSink) {
        self.regenerate(keys);
        debug!(
            notes = keys.iter().filter(|&&down| down).count(),
            "regenerated sample buffer"
        );
        sink.play_looped(&self.samples, SAMPLE_RATE);
    }
}

impl Default for Synthesizer {
    fn default() -> Self {
        Self::new(VOLUME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pressed(notes: &[usize]) -> [bool; NUM_KEYS] {
        let mut keys = [false; NUM_KEYS];
        for &note in notes {
            keys[note] = true;
        }
        keys
    }

    fn expected(notes: &[usize], s: usize) -> f64 {
        notes
            .iter()
            .map(|&note| {
                let t = s as f64 / f64::from(SAMPLE_RATE);
                VOLUME * (2.0 * PI * note_frequency(note) * t).sin()
            })
            .sum()
    }

    #[derive(Default)]
    struct RecordingSink {
        loads: Vec<(Vec<i16>, u32)>,
    }

    impl PcmSink for RecordingSink {
        fn play_looped(&mut self, samples: &[i16], sample_rate: u32) {
            self.loads.push((samples.to_vec(), sample_rate));
        }
    }

    #[test]
    fn frequency_follows_equal_temperament() {
        for note in 0..NUM_KEYS {
            let want = 440.0 * 2.0_f64.powf((note as f64 + 3.0) / 12.0);
            assert!((note_frequency(note) - want).abs() < 1e-9, "note {note}");
        }
        assert!((note_frequency(0) - 523.2511).abs() < 1e-3);
        assert!((note_frequency(9) - 880.0).abs() < 1e-9);
    }

    #[test]
    fn consecutive_notes_are_a_semitone_apart() {
        for note in 1..NUM_KEYS {
            let ratio = note_frequency(note) / note_frequency(note - 1);
            assert!((ratio - 2.0_f64.powf(1.0 / 12.0)).abs() < 1e-12);
        }
    }

    #[test]
    fn buffer_has_fixed_length() {
        let synth = Synthesizer::default();
        assert_eq!(synth.samples().len(), NUM_SAMPLES);
        assert_eq!(NUM_SAMPLES, 220_500);
    }

    #[test]
    fn released_keys_produce_silence() {
        let mut synth = Synthesizer::default();
        let samples = synth.regenerate(&[false; NUM_KEYS]);
        assert_eq!(samples.len(), NUM_SAMPLES);
        assert!(samples.iter().all(|&s| s == 0));
    }

    #[test]
    fn single_key_is_a_sine() {
        let mut synth = Synthesizer::default();
        for note in [0, 7, 19] {
            let samples = synth.regenerate(&pressed(&[note]));
            for (s, &sample) in samples.iter().enumerate() {
                let want = expected(&[note], s).round();
                assert!(
                    (f64::from(sample) - want).abs() <= 1.0,
                    "note {note} sample {s}: {sample} vs {want}"
                );
            }
        }
    }

    #[test]
    fn two_keys_superpose() {
        let mut synth = Synthesizer::default();
        let a: Vec<i16> = synth.regenerate(&pressed(&[2])).to_vec();
        let b: Vec<i16> = synth.regenerate(&pressed(&[11])).to_vec();
        let both = synth.regenerate(&pressed(&[2, 11]));

        for s in 0..NUM_SAMPLES {
            let want = expected(&[2, 11], s).trunc();
            assert!((f64::from(both[s]) - want).abs() <= 1.0, "sample {s}");
            let summed = i32::from(a[s]) + i32::from(b[s]);
            assert!((i32::from(both[s]) - summed).abs() <= 1, "sample {s}");
        }
    }

    #[test]
    fn release_restores_silence_regardless_of_history() {
        let mut synth = Synthesizer::default();
        synth.regenerate(&pressed(&[0, 4, 7]));
        synth.regenerate(&pressed(&[4]));
        let samples = synth.regenerate(&[false; NUM_KEYS]);
        assert!(samples.iter().all(|&s| s == 0));
    }

    #[test]
    fn all_keys_stay_in_range_at_default_volume() {
        let mut synth = Synthesizer::default();
        let samples = synth.regenerate(&[true; NUM_KEYS]);
        let peak = samples.iter().map(|s| i32::from(*s).abs()).max();
        assert!(peak.is_some_and(|p| p <= 20 * 500));
    }

    #[test]
    fn sums_outside_i16_wrap() {
        assert_eq!(to_sample(1234.9), 1234);
        assert_eq!(to_sample(-1234.9), -1234);
        assert_eq!(to_sample(32_768.0), i16::MIN);
        assert_eq!(to_sample(-32_769.0), i16::MAX);
    }

    #[test]
    fn every_regeneration_restarts_the_sink() {
        let mut synth = Synthesizer::new(100.0);
        let mut sink = RecordingSink::default();

        synth.regenerate_into(&[false; NUM_KEYS], &mut sink);
        synth.regenerate_into(&pressed(&[5]), &mut sink);
        synth.regenerate_into(&pressed(&[5]), &mut sink);

        assert_eq!(sink.loads.len(), 3);
        assert!(sink.loads.iter().all(|(_, rate)| *rate == SAMPLE_RATE));
        assert!(sink.loads[0].0.iter().all(|&s| s == 0));
        assert_eq!(sink.loads[1].0, sink.loads[2].0);
        assert_eq!(sink.loads[1].0.as_slice(), synth.samples());
    }
}
