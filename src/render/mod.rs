//! Crosshair bitmap pipeline
//!
//! - **normalize**: canonical 64x64 RGBA form of a loaded image
//! - **compositor**: scales a normalized image onto the odd-sized overlay canvas
//! - **procedural**: draws lines and dot from the configuration

pub mod compositor;
pub mod normalize;
pub mod procedural;

pub use compositor::compose_custom;
pub use normalize::load_and_normalize;
pub use procedural::draw_procedural;
