pub mod crosshair_settings;
pub mod import_export;
