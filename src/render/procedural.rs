//! Procedural crosshair drawing
//!
//! Draws inner lines, outer lines and the center dot straight from the
//! configuration. Outlines are drawn first for every element, fills on top.

use image::{Rgba, RgbaImage};

use super::compositor::canvas_size;
use crate::config::{CrosshairConfig, Rgb};
use crate::constants::compositing::{INNER_GAP, OUTER_GAP};

/// Axis-aligned rectangle in canvas pixels, `x1`/`y1` exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Rect {
    x0: i64,
    y0: i64,
    x1: i64,
    y1: i64,
}

impl Rect {
    fn grow(self, by: i64) -> Self {
        Self {
            x0: self.x0 - by,
            y0: self.y0 - by,
            x1: self.x1 + by,
            y1: self.y1 + by,
        }
    }
}

struct Element {
    rects: Vec<Rect>,
    opacity: f32,
}

/// Render the crosshair described by `config` on a transparent odd-sized canvas
pub fn draw_procedural(config: &CrosshairConfig) -> RgbaImage {
    let side = canvas_size(config.size, 0);
    let mut canvas = RgbaImage::new(side, side);
    let center = (side / 2) as i64;

    let elements = elements(config, center);

    if config.show_outline {
        let grow = config.outline_thickness as i64;
        for element in &elements {
            for rect in &element.rects {
                fill(&mut canvas, rect.grow(grow), config.outline_color, element.opacity);
            }
        }
    }
    for element in &elements {
        for rect in &element.rects {
            fill(&mut canvas, *rect, config.color, element.opacity);
        }
    }

    canvas
}

fn elements(config: &CrosshairConfig, center: i64) -> Vec<Element> {
    let thickness = config.thickness.max(1) as i64;
    let mut elements = Vec::new();

    if config.show_inner && config.inner_length > 0 {
        elements.push(Element {
            rects: arms(center, thickness, INNER_GAP as i64, config.inner_length as i64),
            opacity: config.inner_opacity,
        });
    }

    if config.show_outer && config.outer_length > 0 {
        let gap = INNER_GAP as i64 + config.inner_length as i64 + OUTER_GAP as i64;
        elements.push(Element {
            rects: arms(center, thickness, gap, config.outer_length as i64),
            opacity: config.outer_opacity,
        });
    }

    if config.show_dot {
        let size = config.dot_size.max(1) as i64;
        let start = center - size / 2;
        elements.push(Element {
            rects: vec![Rect { x0: start, y0: start, x1: start + size, y1: start + size }],
            opacity: config.dot_opacity,
        });
    }

    elements
}

/// Four arms of `length` pixels starting `gap` pixels away from the center pixel
fn arms(center: i64, thickness: i64, gap: i64, length: i64) -> Vec<Rect> {
    let band0 = center - thickness / 2;
    let band1 = band0 + thickness;
    let near = center + 1 + gap;
    let far = center - gap;
    vec![
        // right, left
        Rect { x0: near, y0: band0, x1: near + length, y1: band1 },
        Rect { x0: far - length, y0: band0, x1: far, y1: band1 },
        // down, up
        Rect { x0: band0, y0: near, x1: band1, y1: near + length },
        Rect { x0: band0, y0: far - length, x1: band1, y1: far },
    ]
}

fn fill(canvas: &mut RgbaImage, rect: Rect, color: Rgb, opacity: f32) {
    let pixel = Rgba(color.with_opacity(opacity));
    let (width, height) = (canvas.width() as i64, canvas.height() as i64);
    for y in rect.y0.max(0)..rect.y1.min(height) {
        for x in rect.x0.max(0)..rect.x1.min(width) {
            canvas.put_pixel(x as u32, y as u32, pixel);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> CrosshairConfig {
        CrosshairConfig {
            size: 100,
            thickness: 2,
            inner_length: 4,
            show_inner: true,
            show_outer: false,
            show_dot: false,
            show_outline: false,
            draw_procedural: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_canvas_is_odd() {
        let canvas = draw_procedural(&config());
        assert_eq!(canvas.dimensions(), (133, 133));
    }

    #[test]
    fn test_inner_arms_leave_center_gap() {
        let canvas = draw_procedural(&config());
        let c = 66;
        // Center and gap stay transparent
        assert_eq!(canvas.get_pixel(c, c).0[3], 0);
        assert_eq!(canvas.get_pixel(c + 3, c).0[3], 0);
        // Right arm starts after the 3px gap and is 4px long
        assert_eq!(canvas.get_pixel(c + 4, c).0, [0, 255, 0, 255]);
        assert_eq!(canvas.get_pixel(c + 7, c).0, [0, 255, 0, 255]);
        assert_eq!(canvas.get_pixel(c + 8, c).0[3], 0);
        // Left arm mirrors it
        assert_eq!(canvas.get_pixel(c - 4, c).0, [0, 255, 0, 255]);
        assert_eq!(canvas.get_pixel(c - 7, c).0, [0, 255, 0, 255]);
        assert_eq!(canvas.get_pixel(c - 8, c).0[3], 0);
    }

    #[test]
    fn test_hidden_inner_draws_nothing() {
        let canvas = draw_procedural(&CrosshairConfig { show_inner: false, ..config() });
        assert!(canvas.pixels().all(|p| p.0[3] == 0));
    }

    #[test]
    fn test_dot_uses_dot_opacity() {
        let canvas = draw_procedural(&CrosshairConfig {
            show_inner: false,
            show_dot: true,
            dot_size: 1,
            dot_opacity: 0.5,
            ..config()
        });
        assert_eq!(canvas.get_pixel(66, 66).0, [0, 255, 0, 128]);
        assert_eq!(canvas.get_pixel(67, 66).0[3], 0);
    }

    #[test]
    fn test_outline_surrounds_fill() {
        let canvas = draw_procedural(&CrosshairConfig {
            show_inner: false,
            show_dot: true,
            dot_size: 1,
            show_outline: true,
            outline_thickness: 1,
            outline_color: Rgb::new(1, 2, 3),
            ..config()
        });
        assert_eq!(canvas.get_pixel(66, 66).0, [0, 255, 0, 255]);
        assert_eq!(canvas.get_pixel(65, 66).0, [1, 2, 3, 255]);
        assert_eq!(canvas.get_pixel(67, 67).0, [1, 2, 3, 255]);
        assert_eq!(canvas.get_pixel(68, 66).0[3], 0);
    }

    #[test]
    fn test_outer_arms_sit_beyond_inner_arms() {
        let canvas = draw_procedural(&CrosshairConfig {
            show_outer: true,
            outer_length: 2,
            outer_opacity: 2.0,
            ..config()
        });
        let c = 66;
        // inner ends at c + 7, outer starts at c + 1 + 3 + 4 + 4 = c + 12
        assert_eq!(canvas.get_pixel(c + 11, c).0[3], 0);
        assert_eq!(canvas.get_pixel(c + 12, c).0, [0, 255, 0, 255]);
        assert_eq!(canvas.get_pixel(c + 13, c).0, [0, 255, 0, 255]);
        assert_eq!(canvas.get_pixel(c + 14, c).0[3], 0);
    }

    #[test]
    fn test_long_arms_are_clipped() {
        let canvas = draw_procedural(&CrosshairConfig { inner_length: 10_000, ..config() });
        assert_eq!(canvas.get_pixel(132, 66).0[3], 255);
        assert_eq!(canvas.get_pixel(0, 66).0[3], 255);
    }

    #[test]
    fn test_huge_inner_length_pushes_outer_arms_off_canvas() {
        let canvas = draw_procedural(&CrosshairConfig {
            inner_length: u32::MAX - 1,
            show_outer: true,
            outer_length: 4,
            ..config()
        });
        // Inner arms fill to the edge, outer arms start beyond it
        assert_eq!(canvas.get_pixel(132, 66).0[3], 255);
        assert_eq!(canvas.get_pixel(66, 66).0[3], 0);
    }
}
