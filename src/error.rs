use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the piano application.
#[derive(Debug, Error)]
pub enum PianoError {
    #[error("no audio output device found")]
    NoOutputDevice,

    #[error("failed to get default output config: {0}")]
    OutputConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("failed to build audio stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("failed to play audio stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[error("failed to load font {}: {source}", .path.display())]
    Font {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("ui error: {0}")]
    Ui(#[from] eframe::Error),
}

pub type Result<T> = std::result::Result<T, PianoError>;
