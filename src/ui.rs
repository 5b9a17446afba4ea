use std::path::Path;
use std::time::Duration;

use eframe::{App, CreationContext};
use egui::{
    Align2, CentralPanel, Context, Event, FontData, FontDefinitions, FontFamily, FontId, Frame,
    Sense, Stroke, TopBottomPanel, ViewportBuilder,
};
use egui_plot::{Line, Plot, PlotPoints};
use tracing::info;

use crate::audio::PcmSink;
use crate::error::{PianoError, Result};
use crate::keyboard::{is_white, key_color, KeyboardLayout, KEYBOARD_SIZE, LABEL_SIZE};
use crate::keymap::label_for_note;
use crate::state::PianoState;
use crate::synth::{Synthesizer, SAMPLE_RATE};

/// Height of the optional waveform plot.
const SCOPE_HEIGHT: f32 = 120.0;

/// Samples shown by the waveform plot: 20 ms.
const SCOPE_SAMPLES: usize = SAMPLE_RATE as usize / 50;

const LABEL_FONT: &str = "key-labels";

/// Window options fixed at startup.
#[derive(Debug, Clone)]
pub struct UiConfig {
    pub fps: u32,
    pub scope: bool,
    pub font: Option<Vec<u8>>,
}

/// The piano window.
pub struct PianoApp {
    state: PianoState,
    synth: Synthesizer,
    sink: Box<dyn PcmSink>,
    frame_interval: Duration,
    scope: bool,
}

impl PianoApp {
    /// Creates the app and synthesizes the initial, silent buffer.
    pub fn new(synth: Synthesizer, sink: Box<dyn PcmSink>, config: &UiConfig) -> Self {
        let mut app = Self {
            state: PianoState::new(),
            synth,
            sink,
            frame_interval: Duration::from_secs_f64(1.0 / f64::from(config.fps.max(1))),
            scope: config.scope,
        };
        app.refresh();
        app
    }

    /// Applies this frame's key events.
    ///
    /// Keys are matched by physical position so modifiers cannot change the
    /// note a press or release belongs to. Losing focus releases everything,
    /// since the key-ups would never arrive.
    fn poll_keys(&mut self, ctx: &Context) {
        let events = ctx.input(|i| i.events.clone());
        for event in events {
            match event {
                Event::Key {
                    key,
                    physical_key,
                    pressed,
                    ..
                } => {
                    self.state.handle_key(physical_key.unwrap_or(key), pressed);
                }
                Event::WindowFocused(false) => {
                    self.state.release_all();
                }
                _ => {}
            }
        }
    }

    /// Regenerates the audio if any key changed since the last pass.
    fn refresh(&mut self) {
        if self.state.take_dirty() {
            self.synth.regenerate_into(self.state.keys(), self.sink.as_mut());
        }
    }

    fn paint_keyboard(&self, ui: &mut egui::Ui) {
        let (response, painter) = ui.allocate_painter(KEYBOARD_SIZE, Sense::hover());
        let layout = KeyboardLayout::new(response.rect);
        let font = FontId::new(LABEL_SIZE, FontFamily::Proportional);

        for note in KeyboardLayout::paint_order().filter(|&n| is_white(n)) {
            let color = key_color(self.state.is_pressed(note), true);
            painter.rect_filled(layout.key_rect(note), 0.0, color);
        }
        for line in layout.separators() {
            painter.line_segment(line, Stroke::new(1.0, egui::Color32::BLACK));
        }
        for note in KeyboardLayout::paint_order().filter(|&n| !is_white(n)) {
            let color = key_color(self.state.is_pressed(note), false);
            painter.rect_filled(layout.key_rect(note), 0.0, color);
        }
        for note in KeyboardLayout::paint_order() {
            let (anchor, color) = layout.label_anchor(note);
            painter.text(
                anchor,
                Align2::CENTER_TOP,
                label_for_note(note),
                font.clone(),
                color,
            );
        }
    }

    fn plot_waveform(&self, ui: &mut egui::Ui) {
        let volume = self.synth.volume();
        let points: PlotPoints = self.synth.samples()[..SCOPE_SAMPLES]
            .iter()
            .enumerate()
            .map(|(i, &v)| [i as f64, f64::from(v)])
            .collect();

        Plot::new("Waveform")
            .show_axes([false, true])
            .include_y(-volume)
            .include_y(volume)
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                plot_ui.line(Line::new(points));
            });
    }
}

impl App for PianoApp {
    /// Polls input, regenerates the audio when needed and paints the keys.
    fn update(&mut self, ctx: &Context, _: &mut eframe::Frame) {
        self.poll_keys(ctx);
        self.refresh();

        if self.scope {
            TopBottomPanel::bottom("scope")
                .exact_height(SCOPE_HEIGHT)
                .show(ctx, |ui| self.plot_waveform(ui));
        }
        CentralPanel::default()
            .frame(Frame::none())
            .show(ctx, |ui| self.paint_keyboard(ui));

        ctx.request_repaint_after(self.frame_interval);
    }
}

/// Reads a label font from disk.
pub fn load_font(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|source| PianoError::Font {
        path: path.to_path_buf(),
        source,
    })
}

/// Puts `bytes` first in the proportional family used by the labels.
fn install_font(ctx: &Context, bytes: Vec<u8>) {
    let mut fonts = FontDefinitions::default();
    fonts
        .font_data
        .insert(LABEL_FONT.to_owned(), FontData::from_owned(bytes));
    fonts
        .families
        .entry(FontFamily::Proportional)
        .or_default()
        .insert(0, LABEL_FONT.to_owned());
    ctx.set_fonts(fonts);
}

/// Opens the piano window and runs it until closed.
pub fn run_ui(synth: Synthesizer, sink: Box<dyn PcmSink>, config: UiConfig) -> Result<()> {
    let mut size = KEYBOARD_SIZE;
    if config.scope {
        size.y += SCOPE_HEIGHT;
    }
    let options = eframe::NativeOptions {
        viewport: ViewportBuilder::default()
            .with_title("Piano")
            .with_inner_size(size)
            .with_resizable(false),
        ..Default::default()
    };

    info!("Opening piano window");
    eframe::run_native(
        "Piano",
        options,
        Box::new(move |cc: &CreationContext| {
            if let Some(bytes) = config.font.clone() {
                install_font(&cc.egui_ctx, bytes);
            }
            Ok(Box::new(PianoApp::new(synth, sink, &config)))
        }),
    )?;
    Ok(())
}
