//! Settings panel implemented with egui/eframe

mod app;
mod components;
mod constants;

pub use app::run_gui;
