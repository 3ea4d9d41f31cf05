use anyhow::{Context, Result};
use std::cell::Cell;
use tracing::{debug, info};
use x11rb::protocol::randr::ConnectionExt as RandrExt;
use x11rb::protocol::xproto::*;
use x11rb::rust_connection::RustConnection;

use crate::constants::x11;
use crate::types::MonitorGeometry;

/// Pre-cached X11 atoms to avoid repeated roundtrips
pub struct CachedAtoms {
    pub net_wm_state: Atom,
    pub net_wm_state_above: Atom,
    pub net_wm_name: Atom,
    pub utf8_string: Atom,
}

impl CachedAtoms {
    pub fn new(conn: &RustConnection) -> Result<Self> {
        Ok(Self {
            net_wm_state: intern(conn, b"_NET_WM_STATE")?,
            net_wm_state_above: intern(conn, b"_NET_WM_STATE_ABOVE")?,
            net_wm_name: intern(conn, b"_NET_WM_NAME")?,
            utf8_string: intern(conn, b"UTF8_STRING")?,
        })
    }
}

fn intern(conn: &RustConnection, name: &[u8]) -> Result<Atom> {
    let display = String::from_utf8_lossy(name);
    Ok(conn
        .intern_atom(false, name)
        .context(format!("Failed to intern {} atom", display))?
        .reply()
        .context(format!("Failed to get reply for {} atom", display))?
        .atom)
}

/// Find a 32-bit TrueColor visual, needed for per-pixel transparency
pub fn find_argb_visual(screen: &Screen) -> Result<Visualid> {
    screen
        .allowed_depths
        .iter()
        .filter(|depth| depth.depth == x11::ARGB_DEPTH)
        .flat_map(|depth| depth.visuals.iter())
        .find(|visual| visual.class == VisualClass::TRUE_COLOR)
        .map(|visual| {
            debug!("using ARGB visual: id={}", visual.visual_id);
            visual.visual_id
        })
        .context("No 32-bit TrueColor visual found. A compositing X server is required for a transparent overlay.")
}

/// Whether the server supports RandR monitor queries (1.5+)
pub fn has_randr_monitors(conn: &RustConnection) -> bool {
    match conn.randr_query_version(1, 5).map(|cookie| cookie.reply()) {
        Ok(Ok(version)) => {
            let supported = (version.major_version, version.minor_version) >= (1, 5);
            info!(
                "RandR {}.{} detected (monitor queries: {})",
                version.major_version, version.minor_version, supported
            );
            supported
        }
        Ok(Err(e)) => {
            info!("RandR unavailable, centering on the root window: {}", e);
            false
        }
        Err(e) => {
            info!("RandR unavailable, centering on the root window: {}", e);
            false
        }
    }
}

/// Geometry of the primary monitor, or the whole root window without RandR
pub fn primary_monitor_geometry(
    conn: &RustConnection,
    screen: &Screen,
    use_randr: bool,
) -> Result<MonitorGeometry> {
    let root = root_geometry(screen);
    if !use_randr {
        return Ok(root);
    }

    let monitors = conn
        .randr_get_monitors(screen.root, true)
        .context("Failed to query RandR monitors")?
        .reply()
        .context("Failed to get reply for RandR monitors query")?
        .monitors
        .iter()
        .map(|monitor| {
            (
                monitor.primary,
                MonitorGeometry {
                    x: monitor.x as i32,
                    y: monitor.y as i32,
                    width: monitor.width as u32,
                    height: monitor.height as u32,
                },
            )
        })
        .collect::<Vec<_>>();

    Ok(choose_monitor(&monitors).unwrap_or(root))
}

/// Last known monitor geometry, queried again only after `invalidate`
#[derive(Debug, Default)]
pub struct GeometryCache {
    cached: Cell<Option<MonitorGeometry>>,
}

impl GeometryCache {
    pub fn get_or_refresh(
        &self,
        refresh: impl FnOnce() -> Result<MonitorGeometry>,
    ) -> Result<MonitorGeometry> {
        if let Some(geometry) = self.cached.get() {
            return Ok(geometry);
        }
        let geometry = refresh()?;
        debug!(?geometry, "Monitor geometry refreshed");
        self.cached.set(Some(geometry));
        Ok(geometry)
    }

    pub fn invalidate(&self) {
        self.cached.set(None);
    }
}

fn root_geometry(screen: &Screen) -> MonitorGeometry {
    MonitorGeometry {
        x: 0,
        y: 0,
        width: screen.width_in_pixels as u32,
        height: screen.height_in_pixels as u32,
    }
}

/// Primary monitor if one is flagged, otherwise the first one listed
fn choose_monitor(monitors: &[(bool, MonitorGeometry)]) -> Option<MonitorGeometry> {
    monitors
        .iter()
        .find(|(primary, _)| *primary)
        .or_else(|| monitors.first())
        .map(|(_, geometry)| *geometry)
        .filter(|geometry| geometry.width > 0 && geometry.height > 0)
}
