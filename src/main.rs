use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use avocado_analytics::app::AvocadoApp;
use avocado_analytics::config::{CliArgs, DashboardConfig, CONFIG_ENV};
use avocado_analytics::data::loader::load_file;
use avocado_analytics::state::AppState;
use avocado_analytics::view::WINDOW_TITLE;
use clap::Parser;
use eframe::egui;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = CliArgs::parse();

    let cwd = std::env::current_dir().context("resolving working directory")?;
    let env_config = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
    let mut config = DashboardConfig::resolve(args.config.as_deref(), env_config, &cwd)
        .inspect_err(|e| log::error!("{e:#}"))?;
    args.apply(&mut config);

    // A dataset that cannot be read is fatal at startup.
    let dataset = load_file(&config.data_path)
        .inspect_err(|e| log::error!("Failed to load dataset: {e}"))
        .with_context(|| format!("loading {}", config.data_path.display()))?;
    let state = AppState::new(dataset, &config);

    if args.print_view {
        let json = serde_json::to_string_pretty(&state.view).context("serializing view")?;
        println!("{json}");
        return Ok(());
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window.width, config.window.height])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        WINDOW_TITLE,
        options,
        Box::new(|_cc| Ok(Box::new(AvocadoApp::new(state)))),
    )
    .map_err(|e| anyhow!("running dashboard window: {e}"))
}
