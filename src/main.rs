mod audio_output;
mod curve;
mod notes;
mod params;
mod settings;
mod tone;
mod ui;

use anyhow::Context;
use clap::Parser;
use eframe::egui;

use audio_output::{CpalPlayer, SilentPlayer, TonePlayer};
use settings::{Cli, Settings};
use ui::LissajousUI;

struct LissajousApp {
    ui: LissajousUI,
}

impl eframe::App for LissajousApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui.update(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        log::info!("Closing Lissajous Generator");
    }
}

fn run(settings: Settings) -> anyhow::Result<()> {
    let player: Box<dyn TonePlayer> = if settings.audio_enabled {
        Box::new(CpalPlayer)
    } else {
        log::info!("Audio muted");
        Box::new(SilentPlayer)
    };

    let ui = LissajousUI::new(settings, player);

    let options = eframe::NativeOptions {
        initial_window_size: Some(egui::Vec2::new(660.0, 800.0)),
        ..Default::default()
    };

    eframe::run_native(
        "Lissajous Generator",
        options,
        Box::new(|_cc| Box::new(LissajousApp { ui })),
    )
    .map_err(|e| anyhow::anyhow!("failed to open window: {}", e))?;

    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = Settings::try_from(Cli::parse()).context("invalid settings")?;
    log::info!("Settings: {:?}", settings);

    run(settings)
}
