#![forbid(unsafe_code)]

mod config;
mod constants;
mod controller;
mod crosshair_code;
mod error;
mod gui;
mod hotkeys;
mod overlay;
mod render;
mod renderer;
mod types;
mod x11_utils;

use anyhow::{Context, Result};
use tracing::{error, info, Level as TraceLevel};
use tracing_subscriber::FmtSubscriber;
use x11rb::connection::Connection;

use config::{store, CrosshairConfig};
use controller::SettingsController;
use overlay::X11Overlay;
use renderer::OverlayRenderer;

fn main() -> Result<()> {
    // Parse log level from environment variable
    let log_level = match std::env::var("LOG_LEVEL")
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "warn" => TraceLevel::WARN,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install tracing subscriber")?;

    let (conn, screen_num) = x11rb::connect(None)
        .context("Failed to connect to the X server. Is DISPLAY set?")?;
    let screen = &conn.setup().roots[screen_num];
    info!("successfully connected to x11: screen={screen_num}, dimensions={}x{}",
          screen.width_in_pixels, screen.height_in_pixels);

    let overlay = X11Overlay::new(conn, screen_num)
        .inspect_err(|e| error!("Failed to create overlay window: {e:#}"))?;

    let renderer = OverlayRenderer::new(CrosshairConfig::default(), overlay);
    let mut controller = SettingsController::new(renderer, store::settings_path());
    info!("settings file: {}", controller.settings_path().display());

    // Missing or broken settings leave the defaults in place
    controller.load();
    let config = controller.config();
    info!(
        size = config.size,
        procedural = config.draw_procedural,
        image = ?config.custom_image_path,
        "Crosshair ready"
    );

    gui::run_gui(controller)
}
