mod app;
mod charts;
mod cli;
mod color;
mod data;
mod state;
mod ui;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use eframe::egui;

use app::SeasonChartsApp;
use cli::Args;
use state::AppState;

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    if args.print {
        return print_chart(&args);
    }

    let state = AppState::new(Some(args.data.clone()), args.chart, args.role_filter());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 760.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Season Charts",
        options,
        Box::new(|_cc| Ok(Box::new(SeasonChartsApp::new(state)))),
    )
    .map_err(|e| anyhow!("viewer failed: {e}"))
}

/// Headless mode: one view, JSON on stdout.
fn print_chart(args: &Args) -> Result<()> {
    let roles = args
        .role_filter()
        .unwrap_or_else(|| args.chart.default_roles());
    let chart = charts::run(args.chart, &args.data, &roles)
        .with_context(|| format!("building '{}' from {}", args.chart, args.data.display()))?;
    let json = serde_json::to_string_pretty(&chart).context("serializing chart")?;
    println!("{json}");
    Ok(())
}
