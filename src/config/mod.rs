//! Configuration management for the crosshair overlay
//!
//! - **crosshair**: `CrosshairConfig`, the single live configuration
//! - **color**: RGB triples as stored in the settings file
//! - **store**: JSON load/save with per-field defaults

pub mod color;
pub mod crosshair;
pub mod store;

pub use color::Rgb;
pub use crosshair::CrosshairConfig;
