//! GUI-specific constants for layout, status colors and intervals

use egui;

/// Settings window dimensions
pub const WINDOW_WIDTH: f32 = 420.0;
pub const WINDOW_HEIGHT: f32 = 720.0;
pub const WINDOW_MIN_WIDTH: f32 = 360.0;
pub const WINDOW_MIN_HEIGHT: f32 = 480.0;

pub const WINDOW_TITLE: &str = "Crosshair Settings";

/// Layout spacing
pub const PADDING: f32 = 8.0;
pub const SECTION_SPACING: f32 = 15.0;
pub const ITEM_SPACING: f32 = 8.0;
pub const LABEL_WIDTH: f32 = 110.0;

/// Status colors
pub const STATUS_SUCCESS: egui::Color32 = egui::Color32::from_rgb(0, 200, 0);
pub const STATUS_ERROR: egui::Color32 = egui::Color32::from_rgb(200, 0, 0);
pub const STATUS_INFO: egui::Color32 = egui::Color32::from_rgb(200, 200, 0);

/// Frame interval while idle; also paces the overlay re-centering tick
pub const TICK_INTERVAL_MS: u64 = crate::constants::overlay::RECENTER_INTERVAL_MS;

/// File picker filter
pub const IMAGE_FILTER_NAME: &str = "Images";
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp"];
