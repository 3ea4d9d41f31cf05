//! Application-wide constants
//!
//! This module contains all magic numbers and string literals used throughout
//! the application, providing a single source of truth for constant values.

/// X11 protocol constants
pub mod x11 {
    /// ARGB color depth (32-bit: 8 bits each for Alpha, Red, Green, Blue)
    pub const ARGB_DEPTH: u8 = 32;

    /// Override redirect flag for unmanaged windows
    pub const OVERRIDE_REDIRECT: u32 = 1;

    /// WM_CLASS value (instance\0class\0)
    pub const WM_CLASS: &[u8] = b"crosshair-overlay\0crosshair-overlay\0";

    /// _NET_WM_NAME of the overlay window
    pub const WINDOW_TITLE: &str = "Crosshair Overlay";
}

/// Crosshair compositing constants
pub mod compositing {
    /// Transparent border added around the crosshair on every side combined
    pub const CANVAS_PADDING: u32 = 32;

    /// Upscale factor applied to the normalized custom image
    pub const IMAGE_SCALE_FACTOR: u32 = 2;

    /// Side length of the canonical custom image
    pub const CANONICAL_SIZE: u32 = 64;

    /// Linear contrast gain applied to RGB channels during normalization
    pub const CONTRAST_GAIN: f32 = 1.5;

    /// Brightness offset applied after the contrast gain
    pub const BRIGHTNESS_OFFSET: f32 = 30.0;

    /// Gap in pixels between the crosshair center and the inner lines
    pub const INNER_GAP: u32 = 3;

    /// Gap in pixels between the end of the inner lines and the outer lines
    pub const OUTER_GAP: u32 = 4;
}

/// Overlay window behaviour
pub mod overlay {
    /// Interval of the position re-assertion tick
    pub const RECENTER_INTERVAL_MS: u64 = 16;

    /// The window origin is nudged up-left by this many pixels after centering
    pub const CENTER_NUDGE: i32 = 1;
}

/// Input event constants (from evdev)
pub mod input {
    use evdev::KeyCode;

    /// Key press event value
    pub const KEY_PRESS: i32 = 1;

    /// Key that toggles both windows
    pub const TOGGLE_KEY: KeyCode = KeyCode::KEY_H;
}

/// Filesystem paths
pub mod paths {
    /// Input device directory
    pub const DEV_INPUT: &str = "/dev/input";
}

/// Input device permissions
pub mod permissions {
    /// Group required for /dev/input access
    pub const INPUT_GROUP: &str = "input";

    /// Command to add the current user to the input group
    pub const ADD_TO_INPUT_GROUP: &str = "sudo usermod -aG input $USER";
}

/// Settings file location
pub mod config {
    /// Directory under the XDG config dir
    pub const APP_DIR: &str = "crosshair-overlay";

    /// Settings file name
    pub const FILENAME: &str = "crosshair_settings.json";
}

/// Slider and value ranges enforced by the settings panel and on load
pub mod validation {
    pub const MIN_SIZE: u32 = 50;
    pub const MAX_SIZE: u32 = 200;
    pub const MIN_THICKNESS: u32 = 1;
    pub const MAX_THICKNESS: u32 = 10;
    pub const MAX_OUTLINE_THICKNESS: u32 = 10;
    pub const MAX_LINE_LENGTH: u32 = 100;
    pub const MIN_DOT_SIZE: u32 = 1;
    pub const MAX_DOT_SIZE: u32 = 20;
}
