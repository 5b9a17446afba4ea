//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;
use tracing::Level;

use crate::synth::VOLUME;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "Piano")]
#[command(about = "Play sine-wave notes from the computer keyboard", long_about = None)]
pub struct Args {
    /// Font file used for the key labels (built-in font when omitted)
    #[arg(long, value_name = "PATH")]
    pub font: Option<PathBuf>,

    /// Amplitude of each sounding note
    #[arg(long, value_name = "AMP", default_value_t = VOLUME)]
    pub volume: f64,

    /// Frame-rate cap
    #[arg(long, value_name = "FPS", default_value_t = 60)]
    pub fps: u32,

    /// Show a waveform plot of the current buffer under the keys
    #[arg(long)]
    pub scope: bool,

    /// Maximum log level: error, warn, info, debug, trace
    #[arg(long, value_name = "LEVEL", default_value_t = Level::INFO)]
    pub log_level: Level,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_arguments_keeps_defaults() {
        let args = Args::parse_from(["piano"]);
        assert!(args.font.is_none());
        assert_eq!(args.volume, 500.0);
        assert_eq!(args.fps, 60);
        assert!(!args.scope);
        assert_eq!(args.log_level, Level::INFO);
    }

    #[test]
    fn parses_all_flags() {
        let args = Args::parse_from([
            "piano",
            "--font",
            "Rubik-Regular.ttf",
            "--volume",
            "250",
            "--fps",
            "30",
            "--scope",
            "--log-level",
            "debug",
        ]);
        assert_eq!(args.font, Some(PathBuf::from("Rubik-Regular.ttf")));
        assert_eq!(args.volume, 250.0);
        assert_eq!(args.fps, 30);
        assert!(args.scope);
        assert_eq!(args.log_level, Level::DEBUG);
    }
}
