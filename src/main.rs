mod audio;
mod cli;
mod error;
mod keyboard;
mod keymap;
mod state;
mod synth;
mod ui;

use clap::Parser;
use tracing::{error, info};

use crate::cli::Args;
use crate::error::Result;
use crate::synth::Synthesizer;
use crate::ui::UiConfig;

fn main() {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .init();

    if let Err(e) = run(args) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let font = args.font.as_deref().map(ui::load_font).transpose()?;
    let config = UiConfig {
        fps: args.fps,
        scope: args.scope,
        font,
    };

    info!(volume = args.volume, fps = args.fps, "Starting piano");
    let sink = audio::open_sink();
    ui::run_ui(Synthesizer::new(args.volume), sink, config)
}
