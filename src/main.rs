//! Caro GUI
//!
//! Play connect-five on a 10x10 board against another player or the computer.
//! An optional TOML config path can be given as the first argument; otherwise
//! `caro.toml` in the working directory is used when present.

use std::path::PathBuf;

use caro::config::{CaroConfig, DEFAULT_CONFIG_PATH};
use caro::ui::CaroApp;
use tracing_subscriber::EnvFilter;

fn main() -> eframe::Result {
    let path = std::env::args_os()
        .nth(1)
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);

    // Logged once the subscriber is up
    let loaded = CaroConfig::load_if_present(&path);
    let config = match &loaded {
        Ok(Some(config)) => config.clone(),
        Ok(None) | Err(_) => CaroConfig::default(),
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match loaded {
        Ok(Some(_)) => tracing::debug!(path = %path.display(), "config loaded"),
        Ok(None) => tracing::warn!(path = %path.display(), "config file not found, using defaults"),
        Err(err) => tracing::error!(path = %path.display(), %err, "ignoring config file"),
    }
    tracing::info!(?config, "starting caro");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 640.0])
            .with_min_inner_size([640.0, 480.0])
            .with_title("Caro"),
        ..Default::default()
    };

    eframe::run_native(
        "Caro",
        options,
        Box::new(move |cc| Ok(Box::new(CaroApp::new(cc, &config)))),
    )
}
