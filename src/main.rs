//! Crashboard - Road Traffic Crash Dashboard
//!
//! Loads a crash CSV and shows filters, KPIs and fixed aggregate charts.

mod charts;
mod config;
mod data;
mod gui;
mod logging;
mod stats;

use clap::Parser;
use config::Config;
use eframe::egui;
use gui::DashboardApp;
use logging::{init_logging, Verbosity};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "crashboard", version, about = "Road traffic crash dashboard")]
struct Cli {
    /// CSV file to open (overrides `data.path`)
    #[arg(long, value_name = "FILE")]
    data: Option<PathBuf>,

    /// Configuration file (default: ./crashboard.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(Verbosity::from_flags(cli.quiet, cli.verbose));

    let mut config = Config::load_from(cli.config.as_deref())?;
    if let Some(path) = cli.data {
        config.data.path = path;
    }
    info!(data = %config.data.path.display(), "starting crashboard");

    let window = &config.window;
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([window.width, window.height])
            .with_min_inner_size([window.min_width, window.min_height])
            .with_title("Crashboard"),
        ..Default::default()
    };

    eframe::run_native(
        "Crashboard",
        options,
        Box::new(move |cc| Ok(Box::new(DashboardApp::new(cc, &config)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
