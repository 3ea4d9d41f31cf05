//! Custom-image compositing
//!
//! The normalized image is scaled up and centered on a transparent square
//! canvas whose side is always odd, so the crosshair has an exact center pixel.

use image::imageops::{self, FilterType};
use image::RgbaImage;
use tracing::debug;

use crate::constants::compositing::{CANVAS_PADDING, IMAGE_SCALE_FACTOR};
use crate::error::CompositeError;

/// Side of the overlay canvas: `max(size, image_height) + padding`, rounded up to odd
pub fn canvas_size(size: u32, image_height: u32) -> u32 {
    let side = size.max(image_height) + CANVAS_PADDING;
    if side % 2 == 0 { side + 1 } else { side }
}

/// Top-left corner that centers a `width`x`height` bitmap on the canvas
///
/// Returns `None` when the bitmap is larger than the canvas.
pub fn placement(canvas: u32, width: u32, height: u32) -> Option<(u32, u32)> {
    let x = canvas.checked_sub(width)? / 2;
    let y = canvas.checked_sub(height)? / 2;
    Some((x, y))
}

/// Build the overlay bitmap for a custom image
pub fn compose_custom(image: &RgbaImage, size: u32) -> Result<RgbaImage, CompositeError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(CompositeError::EmptyImage { width, height });
    }

    let side = canvas_size(size, height);
    let scaled = imageops::resize(
        image,
        width * IMAGE_SCALE_FACTOR,
        height * IMAGE_SCALE_FACTOR,
        FilterType::Triangle,
    );
    let (x, y) = placement(side, scaled.width(), scaled.height()).ok_or(
        CompositeError::DoesNotFit {
            canvas: side,
            width: scaled.width(),
            height: scaled.height(),
        },
    )?;

    let mut canvas = RgbaImage::new(side, side);
    // replace() copies alpha as-is, which is what we want on a transparent canvas
    imageops::replace(&mut canvas, &scaled, x as i64, y as i64);

    debug!(canvas = side, x, y, scaled = ?scaled.dimensions(), "Composited custom crosshair");
    Ok(canvas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use proptest::prelude::*;

    #[test]
    fn test_canvas_size_examples() {
        // 100 + 32 = 132 -> 133
        assert_eq!(canvas_size(100, 64), 133);
        // 64 image wins over a size of 50: 96 -> 97
        assert_eq!(canvas_size(50, 64), 97);
        // 199 + 32 = 231 already odd
        assert_eq!(canvas_size(199, 64), 231);
    }

    #[test]
    fn test_compose_centers_scaled_image() {
        let image = RgbaImage::from_pixel(64, 64, Rgba([255, 0, 0, 255]));
        let canvas = compose_custom(&image, 100).unwrap();

        assert_eq!(canvas.dimensions(), (133, 133));
        // (133 - 128) / 2 = 2
        assert_eq!(canvas.get_pixel(1, 1).0, [0, 0, 0, 0]);
        assert_eq!(canvas.get_pixel(2, 2).0, [255, 0, 0, 255]);
        assert_eq!(canvas.get_pixel(129, 129).0, [255, 0, 0, 255]);
        assert_eq!(canvas.get_pixel(130, 130).0, [0, 0, 0, 0]);
        assert_eq!(canvas.get_pixel(66, 66).0, [255, 0, 0, 255]);
    }

    #[test]
    fn test_compose_keeps_source_alpha() {
        let image = RgbaImage::from_pixel(64, 64, Rgba([10, 20, 30, 40]));
        let canvas = compose_custom(&image, 150).unwrap();
        let center = canvas.width() / 2;
        assert_eq!(canvas.get_pixel(center, center).0, [10, 20, 30, 40]);
    }

    #[test]
    fn test_compose_rejects_image_larger_than_canvas() {
        // 97px canvas cannot hold the 128px scaled image
        let image = RgbaImage::from_pixel(64, 64, Rgba([1, 1, 1, 255]));
        let err = compose_custom(&image, 50).unwrap_err();
        assert!(matches!(err, CompositeError::DoesNotFit { canvas: 97, width: 128, height: 128 }));
    }

    #[test]
    fn test_compose_rejects_empty_image() {
        let err = compose_custom(&RgbaImage::new(0, 0), 100).unwrap_err();
        assert!(matches!(err, CompositeError::EmptyImage { .. }));
    }

    proptest! {
        #[test]
        fn canvas_is_odd_and_padded(size in 0u32..10_000, height in 0u32..10_000) {
            let side = canvas_size(size, height);
            prop_assert_eq!(side % 2, 1);
            prop_assert!(side >= size.max(height) + CANVAS_PADDING);
            prop_assert!(side <= size.max(height) + CANVAS_PADDING + 1);
        }

        #[test]
        fn placement_centers_and_fits(canvas in 1u32..2_000, width in 0u32..2_000, height in 0u32..2_000) {
            match placement(canvas, width, height) {
                Some((x, y)) => {
                    prop_assert_eq!(x, (canvas - width) / 2);
                    prop_assert_eq!(y, (canvas - height) / 2);
                    prop_assert!(x + width <= canvas);
                    prop_assert!(y + height <= canvas);
                }
                None => prop_assert!(width > canvas || height > canvas),
            }
        }
    }
}
