//! Small geometry types shared by the renderer and the X11 surface

/// Window origin in root-window coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Area of the display the overlay is centered on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorGeometry {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl MonitorGeometry {
    /// Top-left origin that centers a square window of `side` pixels, nudged up-left by `nudge`
    pub fn centered_origin(&self, side: u32, nudge: i32) -> Position {
        let offset = |extent: u32| (extent as i64 - side as i64).div_euclid(2) as i32 - nudge;
        Position::new(self.x + offset(self.width), self.y + offset(self.height))
    }
}
