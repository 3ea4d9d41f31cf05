//! Crosshair configuration
//!
//! One instance lives for the whole process inside the overlay renderer. Every
//! field has its own serde default, so a settings file missing any key still
//! produces a fully defined configuration.

use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

use super::color::Rgb;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrosshairConfig {
    /// Overlay size in pixels (settings panel range 50-200)
    #[serde(default = "default_size")]
    pub size: u32,

    /// Primary line and dot color
    #[serde(default = "default_color")]
    pub color: Rgb,

    #[serde(default = "default_outline_color")]
    pub outline_color: Rgb,

    /// Line thickness in pixels
    #[serde(default = "default_thickness")]
    pub thickness: u32,

    #[serde(default = "default_outline_thickness")]
    pub outline_thickness: u32,

    #[serde(default)]
    pub show_outline: bool,

    #[serde(default = "default_inner_length")]
    pub inner_length: u32,

    #[serde(default = "default_opacity")]
    pub inner_opacity: f32,

    #[serde(default = "default_true")]
    pub show_inner: bool,

    #[serde(default)]
    pub outer_length: u32,

    /// Stored as decoded, may exceed 1.0 after a code import
    #[serde(default = "default_opacity")]
    pub outer_opacity: f32,

    #[serde(default = "default_true")]
    pub show_outer: bool,

    #[serde(default)]
    pub show_dot: bool,

    #[serde(default = "default_opacity")]
    pub dot_opacity: f32,

    #[serde(default = "default_dot_size")]
    pub dot_size: u32,

    /// Draw lines and dot from the fields above when no custom image is loaded
    #[serde(default)]
    pub draw_procedural: bool,

    /// Source file of the custom image, reloaded together with the settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_image_path: Option<PathBuf>,

    /// Normalized custom image; preferred over procedural drawing
    #[serde(skip)]
    pub custom_image: Option<RgbaImage>,
}

fn default_size() -> u32 {
    100
}

fn default_color() -> Rgb {
    Rgb::new(0, 255, 0)
}

fn default_outline_color() -> Rgb {
    Rgb::new(0, 0, 0)
}

fn default_thickness() -> u32 {
    2
}

fn default_outline_thickness() -> u32 {
    1
}

fn default_inner_length() -> u32 {
    4
}

fn default_opacity() -> f32 {
    1.0
}

fn default_true() -> bool {
    true
}

fn default_dot_size() -> u32 {
    2
}

impl Default for CrosshairConfig {
    fn default() -> Self {
        Self {
            size: default_size(),
            color: default_color(),
            outline_color: default_outline_color(),
            thickness: default_thickness(),
            outline_thickness: default_outline_thickness(),
            show_outline: false,
            inner_length: default_inner_length(),
            inner_opacity: default_opacity(),
            show_inner: true,
            outer_length: 0,
            outer_opacity: default_opacity(),
            show_outer: true,
            show_dot: false,
            dot_opacity: default_opacity(),
            dot_size: default_dot_size(),
            draw_procedural: false,
            custom_image_path: None,
            custom_image: None,
        }
    }
}

impl CrosshairConfig {
    /// Copy every persisted field from `other`, keeping the loaded image
    pub fn assign_scalars(&mut self, other: &CrosshairConfig) {
        let image = self.custom_image.take();
        *self = CrosshairConfig {
            custom_image: image,
            ..other.clone()
        };
    }

    /// Validate and clamp values to the ranges the overlay can draw
    /// Called after loading a settings file
    pub fn validate_and_clamp(&mut self) {
        use crate::constants::validation::*;

        if self.size < MIN_SIZE {
            warn!(size = self.size, min = MIN_SIZE, "size below minimum, clamping");
            self.size = MIN_SIZE;
        } else if self.size > MAX_SIZE {
            warn!(size = self.size, max = MAX_SIZE, "size exceeds maximum, clamping");
            self.size = MAX_SIZE;
        }

        if self.thickness < MIN_THICKNESS {
            warn!(thickness = self.thickness, "thickness must be at least 1");
            self.thickness = MIN_THICKNESS;
        }
        if self.outline_thickness < MIN_THICKNESS {
            warn!(outline_thickness = self.outline_thickness, "outline_thickness must be at least 1");
            self.outline_thickness = MIN_THICKNESS;
        }
        if self.dot_size < MIN_DOT_SIZE {
            warn!(dot_size = self.dot_size, "dot_size must be at least 1");
            self.dot_size = MIN_DOT_SIZE;
        }

        for (name, length) in [
            ("inner_length", &mut self.inner_length),
            ("outer_length", &mut self.outer_length),
        ] {
            if *length > MAX_LINE_LENGTH {
                warn!(field = name, value = *length, max = MAX_LINE_LENGTH, "line length exceeds maximum, clamping");
                *length = MAX_LINE_LENGTH;
            }
        }

        // Inner and dot opacity come from the panel only and must stay in 0..=1.
        // Outer opacity is left as decoded from a crosshair code.
        for (name, opacity) in [
            ("inner_opacity", &mut self.inner_opacity),
            ("dot_opacity", &mut self.dot_opacity),
        ] {
            if !opacity.is_finite() {
                warn!(field = name, "opacity is not a number, using default");
                *opacity = default_opacity();
            } else if !(0.0..=1.0).contains(&*opacity) {
                warn!(field = name, value = *opacity, "opacity out of range, clamping");
                *opacity = opacity.clamp(0.0, 1.0);
            }
        }
        if !self.outer_opacity.is_finite() || self.outer_opacity < 0.0 {
            warn!(value = self.outer_opacity, "outer_opacity invalid, using default");
            self.outer_opacity = default_opacity();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_uses_defaults() {
        let config: CrosshairConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, CrosshairConfig::default());
    }

    #[test]
    fn test_missing_dot_size_defaults_to_two() {
        let json = r#"{"size": 150, "color": [255, 0, 0], "show_dot": true}"#;
        let config: CrosshairConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.dot_size, 2);
        assert_eq!(config.size, 150);
        assert_eq!(config.color, Rgb::new(255, 0, 0));
        assert!(config.show_dot);
        assert!(config.show_inner);
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let json = r#"{"size": 120, "legacy_key": "whatever"}"#;
        let config: CrosshairConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.size, 120);
    }

    #[test]
    fn test_image_path_omitted_when_unset() {
        let json = serde_json::to_string(&CrosshairConfig::default()).unwrap();
        assert!(!json.contains("custom_image_path"));
        assert!(!json.contains("custom_image\""));
    }

    #[test]
    fn test_validate_clamps_size() {
        let mut config = CrosshairConfig { size: 10, ..Default::default() };
        config.validate_and_clamp();
        assert_eq!(config.size, 50);

        config.size = 900;
        config.validate_and_clamp();
        assert_eq!(config.size, 200);
    }

    #[test]
    fn test_validate_keeps_outer_opacity_above_one() {
        let mut config = CrosshairConfig { outer_opacity: 1.5, inner_opacity: 1.5, ..Default::default() };
        config.validate_and_clamp();
        assert_eq!(config.outer_opacity, 1.5);
        assert_eq!(config.inner_opacity, 1.0);
    }

    #[test]
    fn test_validate_raises_zero_thickness() {
        let mut config = CrosshairConfig { thickness: 0, dot_size: 0, ..Default::default() };
        config.validate_and_clamp();
        assert_eq!(config.thickness, 1);
        assert_eq!(config.dot_size, 1);
    }

    #[test]
    fn test_validate_clamps_line_lengths() {
        let mut config = CrosshairConfig {
            inner_length: u32::MAX - 1,
            outer_length: 101,
            ..Default::default()
        };
        config.validate_and_clamp();
        assert_eq!(config.inner_length, 100);
        assert_eq!(config.outer_length, 100);
    }

    #[test]
    fn test_assign_scalars_keeps_image() {
        let mut config = CrosshairConfig {
            custom_image: Some(RgbaImage::new(4, 4)),
            ..Default::default()
        };
        let loaded = CrosshairConfig { size: 180, ..Default::default() };
        config.assign_scalars(&loaded);
        assert_eq!(config.size, 180);
        assert!(config.custom_image.is_some());
    }
}
