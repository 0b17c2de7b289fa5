use std::path::PathBuf;

mod backend_bridge;
mod controller;
mod ui;

use clap::Parser;
use crossbeam_channel::bounded;
use eframe::egui;
use timetable_core::{load_settings, DataLocation};
use tracing_subscriber::EnvFilter;

use backend_bridge::commands::BackendCommand;
use controller::events::UiEvent;
use ui::{app::StartupConfig, DesktopGuiApp};

#[derive(Parser, Debug)]
#[command(about = "Class timetable viewer")]
struct Args {
    /// Page address to open: a data directory or http(s) base, optionally with `?query`.
    #[arg(long)]
    address: Option<String>,
    #[arg(long)]
    config: Option<PathBuf>,
    /// Font file with Japanese glyphs; common system fonts are tried otherwise.
    #[arg(long)]
    font: Option<PathBuf>,
}

/// Address opened when none is given: the configured data location's page.
fn default_address(data_location: &str) -> String {
    data_location
        .parse::<DataLocation>()
        .and_then(|location| location.page_url())
        .map(|url| url.to_string())
        .unwrap_or_else(|_| data_location.to_string())
}

fn main() -> eframe::Result<()> {
    let args = Args::parse();
    let settings = load_settings(args.config.as_deref());

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.log_filter.clone()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(16);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(16);
    backend_bridge::runtime::launch(cmd_rx, ui_tx, settings.catalog());

    let startup = StartupConfig {
        address: args
            .address
            .unwrap_or_else(|| default_address(&settings.data_location)),
        font: args.font,
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("時間割")
            .with_inner_size([1100.0, 720.0])
            .with_min_inner_size([640.0, 420.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Timetable Viewer",
        options,
        Box::new(|cc| Ok(Box::new(DesktopGuiApp::new(cc, cmd_tx, ui_rx, startup)))),
    )
}
