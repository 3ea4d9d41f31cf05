//! Overlay renderer
//!
//! Owns the live `CrosshairConfig` and turns it into a bitmap on an
//! `OverlaySurface`. The settings controller mutates the configuration through
//! `config_mut()` and then calls `render()`.

use anyhow::Result;
use image::RgbaImage;
use tracing::{debug, info};

use crate::config::CrosshairConfig;
use crate::constants::overlay::CENTER_NUDGE;
use crate::error::CompositeError;
use crate::render::{compose_custom, draw_procedural};
use crate::types::{MonitorGeometry, Position};

/// Display target for crosshair bitmaps
pub trait OverlaySurface {
    /// Resize the window to the bitmap, move it to `origin` and show the bitmap
    fn present(&mut self, bitmap: &RgbaImage, origin: Position) -> Result<()>;

    fn move_to(&mut self, origin: Position) -> Result<()>;

    /// Put the window back on top of the stacking order
    fn raise(&mut self) -> Result<()>;

    fn set_visible(&mut self, visible: bool) -> Result<()>;

    /// Geometry of the display the overlay is centered on
    fn screen_geometry(&self) -> Result<MonitorGeometry>;

    /// Drain pending display events and errors
    fn poll(&mut self) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// A square bitmap of `size` pixels is now on screen
    Presented { size: u32 },
    /// Nothing to draw; the surface was left alone
    Skipped,
}

pub struct OverlayRenderer<S: OverlaySurface> {
    config: CrosshairConfig,
    surface: S,
    /// Side of the bitmap currently on screen
    window_size: Option<u32>,
    visible: bool,
}

impl<S: OverlaySurface> OverlayRenderer<S> {
    pub fn new(config: CrosshairConfig, surface: S) -> Self {
        Self {
            config,
            surface,
            window_size: None,
            visible: true,
        }
    }

    pub fn config(&self) -> &CrosshairConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut CrosshairConfig {
        &mut self.config
    }

    #[cfg(test)]
    pub fn window_size(&self) -> Option<u32> {
        self.window_size
    }

    #[cfg(test)]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    #[cfg(test)]
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn set_custom_image(&mut self, image: RgbaImage) {
        self.config.custom_image = Some(image);
    }

    pub fn clear_custom_image(&mut self) {
        self.config.custom_image = None;
        self.config.custom_image_path = None;
    }

    /// Composite the current configuration and hand it to the surface
    ///
    /// A loaded custom image wins over procedural drawing. On error the surface
    /// keeps showing whatever it showed before.
    pub fn render(&mut self) -> Result<RenderOutcome, CompositeError> {
        let bitmap = match &self.config.custom_image {
            Some(image) => compose_custom(image, self.config.size)?,
            None if self.config.draw_procedural => draw_procedural(&self.config),
            None => {
                debug!("No custom crosshair loaded, skipping render");
                return Ok(RenderOutcome::Skipped);
            }
        };

        let size = bitmap.width();
        let geometry = self.surface.screen_geometry().map_err(CompositeError::Surface)?;
        let origin = geometry.centered_origin(size, CENTER_NUDGE);
        self.surface
            .present(&bitmap, origin)
            .map_err(CompositeError::Surface)?;

        if self.window_size != Some(size) {
            info!(size, x = origin.x, y = origin.y, "Overlay resized");
        }
        self.window_size = Some(size);
        Ok(RenderOutcome::Presented { size })
    }

    /// Move the overlay so it is centered on the display again
    pub fn recenter(&mut self) -> Result<()> {
        let Some(size) = self.window_size else {
            return Ok(());
        };
        let geometry = self.surface.screen_geometry()?;
        self.surface.move_to(geometry.centered_origin(size, CENTER_NUDGE))
    }

    /// Periodic safeguard: re-assert position and stacking of a visible overlay
    pub fn tick(&mut self) -> Result<()> {
        self.surface.poll()?;
        if !self.visible {
            return Ok(());
        }
        self.recenter()?;
        if self.window_size.is_some() {
            self.surface.raise()?;
        }
        Ok(())
    }

    pub fn set_visible(&mut self, visible: bool) -> Result<()> {
        if visible == self.visible {
            return Ok(());
        }
        self.surface.set_visible(visible)?;
        self.visible = visible;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// In-memory surface that records every call
    #[derive(Debug)]
    pub struct RecordingSurface {
        pub geometry: MonitorGeometry,
        pub presented: Vec<(RgbaImage, Position)>,
        pub moves: Vec<Position>,
        pub raises: usize,
        pub visible: bool,
        pub polls: usize,
        pub fail_present: bool,
        pub fail_visibility: bool,
    }

    impl Default for RecordingSurface {
        fn default() -> Self {
            Self {
                geometry: MonitorGeometry { x: 0, y: 0, width: 1920, height: 1080 },
                presented: Vec::new(),
                moves: Vec::new(),
                raises: 0,
                visible: true,
                polls: 0,
                fail_present: false,
                fail_visibility: false,
            }
        }
    }

    impl OverlaySurface for RecordingSurface {
        fn present(&mut self, bitmap: &RgbaImage, origin: Position) -> Result<()> {
            if self.fail_present {
                anyhow::bail!("surface refused the bitmap");
            }
            self.presented.push((bitmap.clone(), origin));
            Ok(())
        }

        fn move_to(&mut self, origin: Position) -> Result<()> {
            self.moves.push(origin);
            Ok(())
        }

        fn raise(&mut self) -> Result<()> {
            self.raises += 1;
            Ok(())
        }

        fn set_visible(&mut self, visible: bool) -> Result<()> {
            if self.fail_visibility {
                anyhow::bail!("surface refused to change visibility");
            }
            self.visible = visible;
            Ok(())
        }

        fn screen_geometry(&self) -> Result<MonitorGeometry> {
            Ok(self.geometry)
        }

        fn poll(&mut self) -> Result<()> {
            self.polls += 1;
            Ok(())
        }
    }
}
