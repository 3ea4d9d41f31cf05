use anyhow::{Context, Result};
use image::RgbaImage;
use tracing::{debug, error, info, warn};
use x11rb::connection::Connection;
use x11rb::protocol::randr::{ConnectionExt as RandrExt, NotifyMask};
use x11rb::protocol::shape::{ConnectionExt as ShapeExt, SK, SO};
use x11rb::protocol::xproto::*;
use x11rb::protocol::Event;
use x11rb::rust_connection::RustConnection;
use x11rb::wrapper::ConnectionExt as WrapperExt;

use crate::constants::x11;
use crate::renderer::OverlaySurface;
use crate::types::{MonitorGeometry, Position};
use crate::x11_utils::{
    find_argb_visual, has_randr_monitors, primary_monitor_geometry, CachedAtoms, GeometryCache,
};

/// Frameless, always-on-top, click-through X11 window showing the crosshair
///
/// The bitmap is uploaded into a pixmap that becomes the window background, so
/// the server repaints it on its own and no expose handling is needed.
pub struct X11Overlay {
    conn: RustConnection,
    screen_num: usize,
    window: Window,
    colormap: Colormap,
    gc: Gcontext,
    use_randr: bool,
    /// Primary monitor, dropped on RandR layout changes
    geometry: GeometryCache,
    /// Set once the first bitmap has been uploaded
    has_content: bool,
    /// Requested visibility; the window is only mapped with content
    visible: bool,
    mapped: bool,
}

impl X11Overlay {
    pub fn new(conn: RustConnection, screen_num: usize) -> Result<Self> {
        let screen = &conn.setup().roots[screen_num];
        let root = screen.root;
        let visual = find_argb_visual(screen)?;
        let atoms = CachedAtoms::new(&conn)?;
        let use_randr = has_randr_monitors(&conn);

        let colormap = conn.generate_id()
            .context("Failed to generate X11 colormap ID")?;
        conn.create_colormap(ColormapAlloc::NONE, colormap, root, visual)
            .context("Failed to create ARGB colormap")?;

        // Start at 1x1 in the corner; the first render sizes and centers it
        let window = conn.generate_id()
            .context("Failed to generate X11 window ID")?;
        conn.create_window(
            x11::ARGB_DEPTH,
            window,
            root,
            0,
            0,
            1,
            1,
            0,
            WindowClass::INPUT_OUTPUT,
            visual,
            &CreateWindowAux::new()
                .background_pixel(0)
                .border_pixel(0)
                .colormap(colormap)
                .override_redirect(x11::OVERRIDE_REDIRECT),
        )
        .context("Failed to create overlay window")?;

        let gc = conn.generate_id()
            .context("Failed to generate ID for overlay graphics context")?;
        conn.create_gc(gc, window, &CreateGCAux::new())
            .context("Failed to create overlay graphics context")?;

        let overlay = Self {
            conn,
            screen_num,
            window,
            colormap,
            gc,
            use_randr,
            geometry: GeometryCache::default(),
            has_content: false,
            visible: true,
            mapped: false,
        };
        // From here on Drop releases the window if setup fails
        overlay.setup_window_properties(&atoms)?;
        overlay.make_click_through()?;
        if use_randr {
            overlay.conn
                .randr_select_input(root, NotifyMask::SCREEN_CHANGE | NotifyMask::CRTC_CHANGE)
                .context("Failed to subscribe to RandR layout changes")?;
        }
        overlay.conn.flush()
            .context("Failed to flush X11 connection after overlay setup")?;

        info!("Created overlay window {} (randr monitors: {})", overlay.window, use_randr);
        Ok(overlay)
    }

    /// WM_CLASS, window title and always-on-top hint
    fn setup_window_properties(&self, atoms: &CachedAtoms) -> Result<()> {
        self.conn.change_property8(
            PropMode::REPLACE,
            self.window,
            AtomEnum::WM_CLASS,
            AtomEnum::STRING,
            x11::WM_CLASS,
        )
        .context("Failed to set WM_CLASS for overlay")?;

        self.conn.change_property8(
            PropMode::REPLACE,
            self.window,
            atoms.net_wm_name,
            atoms.utf8_string,
            x11::WINDOW_TITLE.as_bytes(),
        )
        .context("Failed to set _NET_WM_NAME for overlay")?;

        self.conn.change_property32(
            PropMode::REPLACE,
            self.window,
            atoms.net_wm_state,
            AtomEnum::ATOM,
            &[atoms.net_wm_state_above],
        )
        .context("Failed to set overlay always-on-top")?;

        Ok(())
    }

    /// Empty input region: pointer events fall through to the window below
    fn make_click_through(&self) -> Result<()> {
        self.conn
            .shape_rectangles(SO::SET, SK::INPUT, ClipOrdering::UNSORTED, self.window, 0, 0, &[])
            .context("Failed to clear overlay input region (check SHAPE extension)")?;
        Ok(())
    }

    fn upload(&self, bitmap: &RgbaImage) -> Result<()> {
        let (width, height) = (bitmap.width() as u16, bitmap.height() as u16);
        let pixmap = self.conn.generate_id()
            .context("Failed to generate ID for crosshair pixmap")?;
        self.conn.create_pixmap(x11::ARGB_DEPTH, pixmap, self.window, width, height)
            .context("Failed to create crosshair pixmap")?;

        let data = to_premultiplied_bgra(bitmap);
        let uploaded = self.conn
            .put_image(
                ImageFormat::Z_PIXMAP,
                pixmap,
                self.gc,
                width,
                height,
                0,
                0,
                0,
                x11::ARGB_DEPTH,
                &data,
            )
            .context("Failed to upload crosshair image")
            .and_then(|_| {
                self.conn
                    .change_window_attributes(
                        self.window,
                        &ChangeWindowAttributesAux::new().background_pixmap(pixmap),
                    )
                    .context("Failed to install crosshair pixmap as window background")
            });

        // The window keeps its own reference to the background
        if let Err(e) = self.conn.free_pixmap(pixmap) {
            error!("Failed to free crosshair pixmap {}: {}", pixmap, e);
        }
        uploaded.map(|_| ())
    }

    fn map(&mut self) -> Result<()> {
        self.conn.map_window(self.window)
            .inspect_err(|e| error!("Failed to map overlay window {}: {:?}", self.window, e))
            .context("Failed to map overlay window")?;
        self.mapped = true;
        Ok(())
    }
}

impl OverlaySurface for X11Overlay {
    fn present(&mut self, bitmap: &RgbaImage, origin: Position) -> Result<()> {
        let size = (bitmap.width() as u16, bitmap.height() as u16);
        // Upload first: a failed upload leaves the window as it was
        self.upload(bitmap)?;
        self.conn.configure_window(
            self.window,
            &ConfigureWindowAux::new()
                .x(origin.x)
                .y(origin.y)
                .width(size.0 as u32)
                .height(size.1 as u32),
        )
        .context(format!("Failed to resize overlay to {}x{}", size.0, size.1))?;
        self.conn.clear_area(false, self.window, 0, 0, 0, 0)
            .context("Failed to repaint overlay window")?;
        self.has_content = true;
        if self.visible && !self.mapped {
            self.map()?;
        }
        self.conn.flush()
            .context("Failed to flush X11 connection after presenting crosshair")?;
        debug!("Presented {}x{} crosshair at ({}, {})", size.0, size.1, origin.x, origin.y);
        Ok(())
    }

    fn move_to(&mut self, origin: Position) -> Result<()> {
        self.conn.configure_window(
            self.window,
            &ConfigureWindowAux::new().x(origin.x).y(origin.y),
        )
        .context(format!("Failed to move overlay to ({}, {})", origin.x, origin.y))?;
        self.conn.flush()
            .context("Failed to flush X11 connection after move")?;
        Ok(())
    }

    fn raise(&mut self) -> Result<()> {
        self.conn.configure_window(
            self.window,
            &ConfigureWindowAux::new().stack_mode(StackMode::ABOVE),
        )
        .context("Failed to raise overlay window")?;
        self.conn.flush()
            .context("Failed to flush X11 connection after raise")?;
        Ok(())
    }

    fn set_visible(&mut self, visible: bool) -> Result<()> {
        self.visible = visible;
        if visible {
            // Never map before the first bitmap, it would show an empty 1x1 window
            if self.has_content && !self.mapped {
                self.map()?;
            }
        } else {
            self.conn.unmap_window(self.window)
                .context("Failed to unmap overlay window")?;
            self.mapped = false;
        }
        self.conn.flush()
            .context("Failed to flush X11 connection after visibility change")?;
        Ok(())
    }

    fn screen_geometry(&self) -> Result<MonitorGeometry> {
        self.geometry.get_or_refresh(|| {
            let screen = &self.conn.setup().roots[self.screen_num];
            primary_monitor_geometry(&self.conn, screen, self.use_randr)
        })
    }

    fn poll(&mut self) -> Result<()> {
        while let Some(event) = self.conn.poll_for_event()
            .context("X11 connection lost")?
        {
            match event {
                Event::Error(e) => warn!("X11 error on overlay: {:?}", e),
                Event::RandrScreenChangeNotify(_) | Event::RandrNotify(_) => {
                    debug!("Monitor layout changed, refreshing geometry");
                    self.geometry.invalidate();
                }
                other => debug!("Ignoring X11 event: {:?}", other),
            }
        }
        Ok(())
    }
}

impl Drop for X11Overlay {
    fn drop(&mut self) {
        // Clean up each resource independently so one failure does not leak the rest
        if let Err(e) = self.conn.free_gc(self.gc) {
            error!("Failed to free GC {}: {}", self.gc, e);
        }

        if let Err(e) = self.conn.destroy_window(self.window) {
            error!("Failed to destroy overlay window {}: {}", self.window, e);
        }

        if let Err(e) = self.conn.free_colormap(self.colormap) {
            error!("Failed to free colormap {}: {}", self.colormap, e);
        }

        if let Err(e) = self.conn.flush() {
            error!("Failed to flush X11 connection during cleanup: {}", e);
        }
    }
}

/// RGBA to the byte layout of a 32-bit ARGB visual (little-endian BGRA), premultiplied
fn to_premultiplied_bgra(bitmap: &RgbaImage) -> Vec<u8> {
    let mut data = Vec::with_capacity(bitmap.as_raw().len());
    for pixel in bitmap.pixels() {
        let [r, g, b, a] = pixel.0;
        let premultiply = |c: u8| ((c as u16 * a as u16 + 127) / 255) as u8;
        data.push(premultiply(b));
        data.push(premultiply(g));
        data.push(premultiply(r));
        data.push(a);
    }
    data
}
