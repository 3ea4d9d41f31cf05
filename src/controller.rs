//! Settings controller
//!
//! Sits between the settings panel and the overlay renderer. Every user
//! action goes through here; failures become a `StatusMessage` for the panel
//! plus a log line, and never leave the configuration half-changed.

use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use crate::config::{store, CrosshairConfig};
use crate::crosshair_code::CrosshairCode;
use crate::render::load_and_normalize;
use crate::renderer::{OverlayRenderer, OverlaySurface, RenderOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
}

impl StatusMessage {
    fn new(kind: StatusKind, text: impl Into<String>) -> Self {
        Self { text: text.into(), kind }
    }
}

pub struct SettingsController<S: OverlaySurface> {
    renderer: OverlayRenderer<S>,
    settings_path: PathBuf,
    status: Option<StatusMessage>,
    visible: bool,
}

impl<S: OverlaySurface> SettingsController<S> {
    pub fn new(renderer: OverlayRenderer<S>, settings_path: PathBuf) -> Self {
        Self {
            renderer,
            settings_path,
            status: None,
            visible: true,
        }
    }

    pub fn config(&self) -> &CrosshairConfig {
        self.renderer.config()
    }

    /// Direct access for panel widgets; call `rerender()` after a change
    pub fn config_mut(&mut self) -> &mut CrosshairConfig {
        self.renderer.config_mut()
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    #[cfg(test)]
    pub fn renderer(&self) -> &OverlayRenderer<S> {
        &self.renderer
    }

    fn set_status(&mut self, kind: StatusKind, text: impl Into<String>) {
        self.status = Some(StatusMessage::new(kind, text));
    }

    /// Re-composite after a configuration change
    ///
    /// Returns false when compositing failed; the overlay keeps its last bitmap.
    pub fn rerender(&mut self) -> bool {
        match self.renderer.render() {
            Ok(RenderOutcome::Presented { size }) => {
                debug!(size, "Crosshair re-rendered");
                true
            }
            Ok(RenderOutcome::Skipped) => true,
            Err(err) => {
                error!(error = %err, "Failed to render crosshair");
                self.set_status(StatusKind::Error, format!("Failed to render crosshair: {err}"));
                false
            }
        }
    }

    /// Decode a crosshair code and apply it; a bad code changes nothing
    pub fn apply_code(&mut self, code: &str) -> bool {
        match CrosshairCode::parse(code) {
            Ok(decoded) => {
                info!(code = ?decoded, "Applying crosshair code");
                decoded.apply(self.renderer.config_mut());
                self.set_status(StatusKind::Success, "Crosshair code applied");
                self.rerender()
            }
            Err(err) => {
                warn!(error = %err, "Rejected crosshair code");
                self.set_status(StatusKind::Info, format!("Invalid crosshair code: {err}"));
                false
            }
        }
    }

    /// Normalize the image at `path` and make it the crosshair
    pub fn load_image(&mut self, path: &Path) -> bool {
        match load_and_normalize(path) {
            Ok(image) => {
                self.renderer.set_custom_image(image);
                self.renderer.config_mut().custom_image_path = Some(path.to_path_buf());
                self.set_status(
                    StatusKind::Success,
                    format!("Loaded crosshair image {}", path.display()),
                );
                self.rerender()
            }
            Err(err) => {
                error!(error = %err, "Failed to load crosshair image");
                self.set_status(StatusKind::Error, format!("Failed to load image: {err}"));
                false
            }
        }
    }

    pub fn clear_image(&mut self) -> bool {
        self.renderer.clear_custom_image();
        self.set_status(StatusKind::Info, "Custom crosshair image removed");
        self.rerender()
    }

    pub fn save(&mut self) -> bool {
        match store::save_to(self.renderer.config(), &self.settings_path) {
            Ok(()) => {
                let text = format!("Settings saved to {}", self.settings_path.display());
                self.set_status(StatusKind::Success, text);
                true
            }
            Err(err) => {
                error!(error = %err, "Failed to save settings");
                self.set_status(StatusKind::Error, format!("Failed to save settings: {err}"));
                false
            }
        }
    }

    /// Load the settings file and reload the custom image it names
    ///
    /// If the image cannot be reloaded, the scalar settings still apply and the
    /// current image stays.
    pub fn load(&mut self) -> bool {
        let loaded = match store::load_from(&self.settings_path) {
            Ok(Some(loaded)) => loaded,
            Ok(None) => {
                self.set_status(StatusKind::Info, "No saved settings found");
                return false;
            }
            Err(err) => {
                error!(error = %err, "Failed to load settings");
                self.set_status(StatusKind::Error, format!("Failed to load settings: {err}"));
                return false;
            }
        };

        let reloaded = loaded.custom_image_path.as_deref().map(load_and_normalize);

        let config = self.renderer.config_mut();
        let previous_path = config.custom_image_path.take();
        config.assign_scalars(&loaded);

        let status = match reloaded {
            Some(Ok(image)) => {
                config.custom_image = Some(image);
                StatusMessage::new(StatusKind::Success, "Settings loaded")
            }
            Some(Err(err)) => {
                warn!(error = %err, "Failed to reload crosshair image from settings");
                config.custom_image_path = previous_path;
                StatusMessage::new(
                    StatusKind::Error,
                    format!("Settings loaded, but the crosshair image could not be reloaded: {err}"),
                )
            }
            None => {
                config.custom_image_path = previous_path;
                StatusMessage::new(StatusKind::Success, "Settings loaded")
            }
        };
        self.status = Some(status);
        self.rerender()
    }

    /// Flip visibility of the overlay; the panel follows the returned value
    ///
    /// If the overlay refuses the change, both windows stay as they were.
    pub fn toggle_visibility(&mut self) -> bool {
        let target = !self.visible;
        match self.renderer.set_visible(target) {
            Ok(()) => {
                self.visible = target;
                info!(visible = target, "Toggled visibility");
            }
            Err(err) => {
                error!(error = ?err, visible = target, "Failed to change overlay visibility");
                self.set_status(
                    StatusKind::Error,
                    format!("Failed to change overlay visibility: {err}"),
                );
            }
        }
        self.visible
    }

    /// Re-centering tick, driven by the panel's frame loop
    pub fn tick(&mut self) {
        if let Err(err) = self.renderer.tick() {
            debug!(error = ?err, "Overlay tick failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::store::test_support::scratch_dir;
    use crate::renderer::test_support::RecordingSurface;
    use image::{Rgba, RgbaImage};

    const SAMPLE_CODE: &str = "0;P;x;0t;1;0l;4;0o;2;0a;75;0f;0;1t;3;1o;50;1a;2";

    fn controller(dir: &Path) -> SettingsController<RecordingSurface> {
        let renderer = OverlayRenderer::new(CrosshairConfig::default(), RecordingSurface::default());
        SettingsController::new(renderer, dir.join("crosshair_settings.json"))
    }

    fn write_png(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        RgbaImage::from_pixel(32, 32, Rgba([100, 0, 0, 255]))
            .save(&path)
            .unwrap();
        path
    }

    #[test]
    fn test_apply_code_updates_config() {
        let dir = scratch_dir("controller-code");
        let mut controller = controller(&dir);

        assert!(controller.apply_code(SAMPLE_CODE));
        assert!(controller.config().show_outline);
        assert_eq!(controller.config().inner_length, 8);
        assert_eq!(controller.status().unwrap().kind, StatusKind::Success);
    }

    #[test]
    fn test_bad_code_leaves_config_unchanged() {
        let dir = scratch_dir("controller-bad-code");
        let mut controller = controller(&dir);
        let before = controller.config().clone();

        assert!(!controller.apply_code("0;P;0t;1"));
        assert_eq!(controller.config(), &before);
        let status = controller.status().unwrap();
        assert_eq!(status.kind, StatusKind::Info);
        assert!(status.text.contains("0l"));
    }

    #[test]
    fn test_load_image_renders_overlay() {
        let dir = scratch_dir("controller-image");
        let path = write_png(&dir, "cross.png");
        let mut controller = controller(&dir);

        assert!(controller.load_image(&path));
        assert_eq!(controller.config().custom_image_path.as_deref(), Some(path.as_path()));
        assert_eq!(controller.renderer().window_size(), Some(133));
        // 100 * 1.5 + 30 = 180
        let (bitmap, _) = &controller.renderer().surface().presented[0];
        assert_eq!(bitmap.get_pixel(66, 66).0, [180, 30, 30, 255]);
    }

    #[test]
    fn test_failed_image_load_keeps_state() {
        let dir = scratch_dir("controller-bad-image");
        let good = write_png(&dir, "good.png");
        let mut controller = controller(&dir);
        controller.load_image(&good);

        assert!(!controller.load_image(&dir.join("missing.png")));
        assert_eq!(controller.config().custom_image_path.as_deref(), Some(good.as_path()));
        assert!(controller.config().custom_image.is_some());
        assert_eq!(controller.status().unwrap().kind, StatusKind::Error);
        assert_eq!(controller.renderer().surface().presented.len(), 1);
    }

    #[test]
    fn test_render_failure_is_reported() {
        let dir = scratch_dir("controller-too-small");
        let path = write_png(&dir, "cross.png");
        let mut controller = controller(&dir);
        controller.load_image(&path);

        controller.config_mut().size = 50;
        assert!(!controller.rerender());
        assert_eq!(controller.status().unwrap().kind, StatusKind::Error);
        assert_eq!(controller.renderer().window_size(), Some(133));
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = scratch_dir("controller-round-trip");
        let mut controller = controller(&dir);
        controller.apply_code(SAMPLE_CODE);
        controller.config_mut().size = 175;
        assert!(controller.save());

        let mut fresh = self::controller(&dir);
        assert!(fresh.load());
        assert_eq!(fresh.config().size, 175);
        assert_eq!(fresh.config().outline_thickness, 3);
        assert_eq!(fresh.config().outer_opacity, 1.0);
    }

    #[test]
    fn test_load_reloads_custom_image() {
        let dir = scratch_dir("controller-reload-image");
        let path = write_png(&dir, "cross.png");
        let mut controller = controller(&dir);
        controller.load_image(&path);
        controller.save();

        let mut fresh = self::controller(&dir);
        assert!(fresh.load());
        assert!(fresh.config().custom_image.is_some());
        assert_eq!(fresh.renderer().window_size(), Some(133));
    }

    #[test]
    fn test_load_with_missing_image_keeps_scalars() {
        let dir = scratch_dir("controller-missing-image");
        let path = write_png(&dir, "cross.png");
        let mut controller = controller(&dir);
        controller.load_image(&path);
        controller.config_mut().thickness = 7;
        controller.save();
        std::fs::remove_file(&path).unwrap();

        let mut fresh = self::controller(&dir);
        fresh.load();
        assert_eq!(fresh.config().thickness, 7);
        assert!(fresh.config().custom_image.is_none());
        assert!(fresh.config().custom_image_path.is_none());
        assert_eq!(fresh.status().unwrap().kind, StatusKind::Error);
    }

    #[test]
    fn test_load_without_file_keeps_defaults() {
        let dir = scratch_dir("controller-no-file");
        let mut controller = controller(&dir);
        assert!(!controller.load());
        assert_eq!(controller.config(), &CrosshairConfig::default());
        assert_eq!(controller.status().unwrap().kind, StatusKind::Info);
    }

    #[test]
    fn test_corrupt_file_keeps_config() {
        let dir = scratch_dir("controller-corrupt");
        std::fs::write(dir.join("crosshair_settings.json"), "{ not json").unwrap();
        let mut controller = controller(&dir);
        controller.config_mut().size = 120;

        assert!(!controller.load());
        assert_eq!(controller.config().size, 120);
        assert_eq!(controller.status().unwrap().kind, StatusKind::Error);
    }

    #[test]
    fn test_toggle_visibility_hides_overlay() {
        let dir = scratch_dir("controller-toggle");
        let mut controller = controller(&dir);

        assert!(!controller.toggle_visibility());
        assert!(!controller.renderer().surface().visible);
        assert!(controller.toggle_visibility());
        assert!(controller.renderer().surface().visible);
    }

    #[test]
    fn test_failed_toggle_keeps_windows_in_sync() {
        let dir = scratch_dir("controller-toggle-fail");
        let mut controller = controller(&dir);
        controller.renderer.surface_mut().fail_visibility = true;

        assert!(controller.toggle_visibility());
        assert!(controller.renderer().surface().visible);
        assert_eq!(controller.status().unwrap().kind, StatusKind::Error);

        controller.renderer.surface_mut().fail_visibility = false;
        assert!(!controller.toggle_visibility());
        assert!(!controller.renderer().surface().visible);
    }
}
