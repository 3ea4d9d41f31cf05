//! JSON settings file
//!
//! The whole configuration is written on every save and read back with
//! per-field defaulting. A missing file is not an error.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::info;

use super::crosshair::CrosshairConfig;
use crate::error::SettingsError;

/// Default settings file: `$XDG_CONFIG_HOME/crosshair-overlay/crosshair_settings.json`
pub fn settings_path() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(crate::constants::config::APP_DIR);
    path.push(crate::constants::config::FILENAME);
    path
}

/// Read settings from `path`
///
/// Returns `Ok(None)` when the file does not exist.
pub fn load_from(path: &Path) -> Result<Option<CrosshairConfig>, SettingsError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!(path = %path.display(), "No settings file, keeping defaults");
            return Ok(None);
        }
        Err(source) => {
            return Err(SettingsError::Io { path: path.to_path_buf(), source });
        }
    };

    let mut config: CrosshairConfig = serde_json::from_str(&contents)
        .map_err(|source| SettingsError::Parse { path: path.to_path_buf(), source })?;
    config.validate_and_clamp();

    info!(path = %path.display(), "Loaded settings");
    Ok(Some(config))
}

/// Write all persisted fields of `config` to `path`, creating parent directories
pub fn save_to(config: &CrosshairConfig, path: &Path) -> Result<(), SettingsError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .map_err(|source| SettingsError::Io { path: parent.to_path_buf(), source })?;
    }

    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json)
        .map_err(|source| SettingsError::Io { path: path.to_path_buf(), source })?;

    info!(path = %path.display(), "Saved settings");
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::test_support::scratch_dir;
    use super::*;
    use crate::config::Rgb;

    #[test]
    fn test_save_load_roundtrip() {
        let dir = scratch_dir("roundtrip");
        let path = dir.join("settings.json");

        let config = CrosshairConfig {
            size: 143,
            color: Rgb::new(10, 20, 30),
            outline_color: Rgb::new(200, 100, 50),
            thickness: 7,
            outline_thickness: 3,
            show_outline: true,
            inner_length: 8,
            inner_opacity: 0.75,
            show_inner: false,
            outer_length: 12,
            outer_opacity: 0.3,
            show_outer: false,
            show_dot: true,
            dot_opacity: 0.42,
            dot_size: 5,
            draw_procedural: true,
            custom_image_path: Some(PathBuf::from("/tmp/crosshair.png")),
            custom_image: None,
        };

        save_to(&config, &path).unwrap();
        let loaded = load_from(&path).unwrap().unwrap();

        assert_eq!(loaded, config);
        assert_eq!(loaded.color.0, [10, 20, 30]);
        assert_eq!(loaded.outline_color.0, [200, 100, 50]);
    }

    #[test]
    fn test_roundtrip_keeps_outer_opacity_above_one() {
        let dir = scratch_dir("outer-opacity");
        let path = dir.join("settings.json");

        let config = CrosshairConfig { outer_opacity: 1.5, ..Default::default() };
        save_to(&config, &path).unwrap();
        let loaded = load_from(&path).unwrap().unwrap();
        assert_eq!(loaded.outer_opacity, 1.5);
    }

    #[test]
    fn test_missing_file_is_none() {
        let dir = scratch_dir("missing");
        let result = load_from(&dir.join("nope.json")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_corrupt_file_is_parse_error() {
        let dir = scratch_dir("corrupt");
        let path = dir.join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = load_from(&path).unwrap_err();
        assert!(matches!(err, SettingsError::Parse { .. }));
    }

    #[test]
    fn test_missing_dot_size_in_file() {
        let dir = scratch_dir("dot-size");
        let path = dir.join("settings.json");
        std::fs::write(&path, r#"{"size": 100, "show_dot": true}"#).unwrap();

        let loaded = load_from(&path).unwrap().unwrap();
        assert_eq!(loaded.dot_size, 2);
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = scratch_dir("nested");
        let path = dir.join("a").join("b").join("settings.json");

        save_to(&CrosshairConfig::default(), &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_saved_file_is_flat_object() {
        let dir = scratch_dir("flat");
        let path = dir.join("settings.json");
        save_to(&CrosshairConfig::default(), &path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object["color"], serde_json::json!([0, 255, 0]));
        assert_eq!(object["dot_size"], serde_json::json!(2));
        assert!(object.values().all(|v| !v.is_object()));
    }
}
