//! RGB color stored as a 3-element JSON array

use serde::{Deserialize, Serialize};

/// Opaque RGB color, serialized as `[r, g, b]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    pub fn r(self) -> u8 {
        self.0[0]
    }

    pub fn g(self) -> u8 {
        self.0[1]
    }

    pub fn b(self) -> u8 {
        self.0[2]
    }

    /// RGBA pixel with the given opacity (clamped to 0.0..=1.0)
    pub fn with_opacity(self, opacity: f32) -> [u8; 4] {
        let alpha = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
        [self.r(), self.g(), self.b(), alpha]
    }
}
