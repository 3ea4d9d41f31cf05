//! Bitmap normalizer
//!
//! Brings any loaded image into the canonical form the compositor expects:
//! 64x64 RGBA with a fixed contrast/brightness boost on the color channels.

use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, RgbaImage};
use std::path::Path;
use tracing::{debug, info};

use crate::constants::compositing::{
    BRIGHTNESS_OFFSET, CANONICAL_SIZE, CONTRAST_GAIN,
};
use crate::error::ImageError;

/// Open an image file and normalize it
pub fn load_and_normalize(path: &Path) -> Result<RgbaImage, ImageError> {
    let image = image::open(path).map_err(|source| ImageError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    info!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        color = ?image.color(),
        "Loaded custom crosshair image"
    );
    normalize(&image)
}

/// Convert to RGBA, resize to the canonical square and boost contrast
///
/// Shape is a fixed point (64x64 RGBA stays 64x64 RGBA) but pixel values are
/// not: every pass applies the boost again.
pub fn normalize(image: &DynamicImage) -> Result<RgbaImage, ImageError> {
    let (width, height) = (image.width(), image.height());
    if width == 0 || height == 0 {
        return Err(ImageError::Empty { width, height });
    }

    // Gray, gray+alpha and RGB sources all get an opaque alpha channel here
    let rgba = image.to_rgba8();
    let mut resized = resize_area(&rgba, CANONICAL_SIZE, CANONICAL_SIZE);
    boost_contrast(&mut resized);

    debug!(
        from = ?(width, height),
        to = ?resized.dimensions(),
        "Normalized crosshair image"
    );
    Ok(resized)
}

/// Apply `v * gain + offset` to RGB, saturating to 0..=255; alpha is untouched
pub fn boost_contrast(image: &mut RgbaImage) {
    for pixel in image.pixels_mut() {
        for channel in &mut pixel.0[..3] {
            *channel = saturate(*channel as f32 * CONTRAST_GAIN + BRIGHTNESS_OFFSET);
        }
    }
}

fn saturate(value: f32) -> u8 {
    value.round_ties_even().clamp(0.0, 255.0) as u8
}

/// Area-averaging resize
///
/// Each destination pixel is the coverage-weighted mean of the source pixels
/// under it. Enlarging along either axis falls back to linear interpolation.
pub fn resize_area(src: &RgbaImage, dst_width: u32, dst_height: u32) -> RgbaImage {
    let (src_width, src_height) = src.dimensions();
    if (src_width, src_height) == (dst_width, dst_height) {
        return src.clone();
    }
    if src_width < dst_width || src_height < dst_height {
        return imageops::resize(src, dst_width, dst_height, FilterType::Triangle);
    }

    let x_weights = coverage(src_width, dst_width);
    let y_weights = coverage(src_height, dst_height);
    let area = (src_width as f32 / dst_width as f32) * (src_height as f32 / dst_height as f32);

    RgbaImage::from_fn(dst_width, dst_height, |dx, dy| {
        let mut sum = [0.0f32; 4];
        for &(sy, wy) in &y_weights[dy as usize] {
            for &(sx, wx) in &x_weights[dx as usize] {
                let weight = wx * wy;
                let pixel = src.get_pixel(sx, sy);
                for (acc, &value) in sum.iter_mut().zip(pixel.0.iter()) {
                    *acc += value as f32 * weight;
                }
            }
        }
        Rgba(sum.map(|acc| saturate(acc / area)))
    })
}

/// For every destination index, the source indices it covers and by how much
fn coverage(src_len: u32, dst_len: u32) -> Vec<Vec<(u32, f32)>> {
    let scale = src_len as f64 / dst_len as f64;
    (0..dst_len)
        .map(|d| {
            let start = d as f64 * scale;
            let end = (start + scale).min(src_len as f64);
            let mut weights = Vec::new();
            let mut s = start.floor() as u32;
            while (s as f64) < end && s < src_len {
                let lo = start.max(s as f64);
                let hi = end.min(s as f64 + 1.0);
                let weight = (hi - lo) as f32;
                if weight > 1e-6 {
                    weights.push((s, weight));
                }
                s += 1;
            }
            weights
        })
        .collect()
}
