use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use cpal::{
    traits::{DeviceTrait, HostTrait, StreamTrait},
    Sample, StreamConfig,
};
use tracing::{debug, error, info};

use crate::error::{PianoError, Result};

/// Accepts a whole PCM buffer and plays it on a loop.
pub trait PcmSink {
    /// Replaces whatever is playing with `samples` and restarts from the first sample.
    fn play_looped(&mut self, samples: &[i16], sample_rate: u32);
}

/// Playback cursor over a looped mono buffer.
#[derive(Debug, Default, Clone)]
pub struct LoopVoice {
    samples: Vec<i16>,
    sample_rate: u32,
    /// Fractional read position in source samples.
    position: f64,
}

impl LoopVoice {
    /// Loads a new buffer and rewinds to its start.
    pub fn load(&mut self, samples: &[i16], sample_rate: u32) {
        self.samples.clear();
        self.samples.extend_from_slice(samples);
        self.sample_rate = sample_rate;
        self.position = 0.0;
    }

    #[cfg(test)]
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Next sample for a device running at `output_rate`, wrapping at the end.
    pub fn next_sample(&mut self, output_rate: u32) -> i16 {
        if self.samples.is_empty() || output_rate == 0 {
            return 0;
        }
        let len = self.samples.len() as f64;
        let sample = self.samples[self.position as usize];
        self.position += f64::from(self.sample_rate) / f64::from(output_rate);
        if self.position >= len {
            self.position %= len;
        }
        sample
    }
}

/// Looped playback on the default output device.
pub struct LoopPlayer {
    voice: Arc<Mutex<LoopVoice>>,
    /// Kept alive for as long as audio should play.
    _stream: cpal::Stream,
}

impl LoopPlayer {
    /// Opens the default output device and starts a stream playing silence.
    pub fn open() -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(PianoError::NoOutputDevice)?;
        info!(
            "Default output device found: {}",
            device.name().unwrap_or_else(|_| "Unknown".to_string())
        );

        let supported_config = device.default_output_config()?;
        let config = StreamConfig {
            channels: supported_config.channels(),
            sample_rate: supported_config.sample_rate(),
            buffer_size: cpal::BufferSize::Default,
        };
        info!("Audio stream configuration: {:?}", config);

        let voice = Arc::new(Mutex::new(LoopVoice::default()));
        let callback_voice = Arc::clone(&voice);
        let channels = usize::from(config.channels.max(1));
        let output_rate = config.sample_rate.0;

        let stream = device.build_output_stream(
            &config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                fill_frames(data, channels, &mut lock(&callback_voice), output_rate);
            },
            |err| {
                error!("An error occurred on the audio stream: {}", err);
            },
            None,
        )?;

        info!("Starting audio stream...");
        stream.play()?;

        Ok(Self {
            voice,
            _stream: stream,
        })
    }
}

impl PcmSink for LoopPlayer {
    fn play_looped(&mut self, samples: &[i16], sample_rate: u32) {
        lock(&self.voice).load(samples, sample_rate);
    }
}

/// Stand-in sink when no output device could be opened.
#[derive(Debug, Default)]
pub struct MutedSink;

impl PcmSink for MutedSink {
    fn play_looped(&mut self, samples: &[i16], _sample_rate: u32) {
        debug!(samples = samples.len(), "no audio output, dropping buffer");
    }
}

/// Opens the output device, falling back to [`MutedSink`] when that fails.
pub fn open_sink() -> Box<dyn PcmSink> {
    match LoopPlayer::open() {
        Ok(player) => Box::new(player),
        Err(e) => {
            error!("Audio disabled: {}", e);
            Box::new(MutedSink)
        }
    }
}

fn lock(voice: &Mutex<LoopVoice>) -> MutexGuard<'_, LoopVoice> {
    voice.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Writes the voice's mono signal to every channel of each interleaved frame.
fn fill_frames(data: &mut [f32], channels: usize, voice: &mut LoopVoice, output_rate: u32) {
    for frame in data.chunks_mut(channels) {
        let value: f32 = Sample::from_sample(voice.next_sample(output_rate));
        for sample in frame.iter_mut() {
            *sample = value;
        }
    }
}
