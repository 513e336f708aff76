//! Image preprocessing ahead of text recognition.
//!
//! The preprocessing stage converts the input to grayscale, suppresses
//! scan/sensor noise with a small Gaussian blur, estimates the skew angle
//! from the minimum-area rectangle of the thresholded foreground, and
//! rotates the image about its center to remove the skew.
//!
//! The rotation is applied to the color image and the returned grayscale is
//! derived from the rotated color image, so the two outputs are always
//! geometrically consistent.

use image::{GrayImage, Rgb, RgbImage};
use imageproc::filter::gaussian_blur_f32;
use rayon::prelude::*;
use tracing::debug;

use crate::processors::geometry::{Point, min_area_rect};
use crate::utils::image::to_grayscale;

/// Sigma of the Gaussian blur applied before skew estimation.
const DENOISE_SIGMA: f32 = 0.8;

/// Half-width of the local mean window used by adaptive thresholding.
const THRESHOLD_BLOCK_RADIUS: u32 = 12;

/// Offset subtracted from the local mean; pixels darker than
/// `mean - offset` count as foreground.
const THRESHOLD_OFFSET: i32 = 15;

/// Minimum number of foreground pixels required to estimate skew.
///
/// Below this the image is presumed already aligned, or too sparse for the
/// estimate to mean anything.
const MIN_FOREGROUND_POINTS: usize = 10;

/// Rotations smaller than this (in degrees) are skipped.
const MIN_CORRECTION_DEGREES: f32 = 0.05;

/// Output of the preprocessing stage.
#[derive(Debug, Clone)]
pub struct Preprocessed {
    /// The deskewed color image.
    pub image: RgbImage,
    /// Grayscale of the deskewed color image.
    pub gray: GrayImage,
    /// The estimated skew angle in degrees, if one could be estimated.
    pub skew_angle: Option<f32>,
}

/// Preprocesses an image for recognition.
///
/// Converts to grayscale, denoises, estimates the skew angle and rotates the
/// color image about its center by the negated estimate. Returns the
/// processed color image together with its grayscale rendition.
pub fn preprocess(image: &RgbImage) -> Preprocessed {
    let gray = to_grayscale(image);
    let denoised = denoise(&gray);

    let skew_angle = estimate_skew_angle(&denoised);

    let processed = match skew_angle {
        Some(angle) if angle.abs() >= MIN_CORRECTION_DEGREES => {
            debug!("correcting skew of {:.2} degrees", angle);
            rotate_about_center(image, -angle)
        }
        Some(angle) => {
            debug!("skew estimate {:.3} degrees below threshold, not rotating", angle);
            image.clone()
        }
        None => {
            debug!("too few foreground pixels to estimate skew, not rotating");
            image.clone()
        }
    };

    let processed_gray = to_grayscale(&processed);

    Preprocessed {
        image: processed,
        gray: processed_gray,
        skew_angle,
    }
}

/// Applies a small Gaussian blur to suppress scan/sensor noise.
pub fn denoise(gray: &GrayImage) -> GrayImage {
    gaussian_blur_f32(gray, DENOISE_SIGMA)
}

/// Estimates the skew angle of a grayscale image in degrees.
///
/// Thresholds the image into foreground/background with a local adaptive
/// threshold (tolerant of uneven lighting), collects the foreground pixel
/// coordinates and fits a minimum-area rectangle to them. The rectangle's
/// orientation, folded into [-45°, 45°], is the skew estimate.
///
/// Returns `None` when fewer than [`MIN_FOREGROUND_POINTS`] foreground
/// pixels exist.
pub fn estimate_skew_angle(gray: &GrayImage) -> Option<f32> {
    let binary = adaptive_threshold(gray, THRESHOLD_BLOCK_RADIUS, THRESHOLD_OFFSET);

    let foreground: Vec<Point> = binary
        .enumerate_pixels()
        .filter(|(_, _, p)| p.0[0] == 0)
        .map(|(x, y, _)| Point::new(x as f32, y as f32))
        .collect();

    if foreground.len() < MIN_FOREGROUND_POINTS {
        return None;
    }

    let rect = min_area_rect(&foreground);
    let angle = rect.normalized_angle();
    debug!(
        foreground = foreground.len(),
        angle, "estimated skew from min-area rectangle"
    );
    Some(angle)
}

/// Binarizes a grayscale image with a local adaptive threshold.
///
/// Each pixel is compared against the mean of the surrounding
/// `(2 * block_radius + 1)²` window minus `offset`; darker pixels become
/// foreground (0), the rest background (255). The local mean is computed
/// from an integral image so the cost is independent of the window size.
pub fn adaptive_threshold(gray: &GrayImage, block_radius: u32, offset: i32) -> GrayImage {
    let (width, height) = gray.dimensions();
    if width == 0 || height == 0 {
        return gray.clone();
    }

    // Integral image with a zero row/column of padding.
    let w = width as usize;
    let h = height as usize;
    let mut integral = vec![0u64; (w + 1) * (h + 1)];
    for y in 0..h {
        let mut row_sum = 0u64;
        for x in 0..w {
            row_sum += gray.get_pixel(x as u32, y as u32).0[0] as u64;
            integral[(y + 1) * (w + 1) + (x + 1)] = integral[y * (w + 1) + (x + 1)] + row_sum;
        }
    }

    let mut binary = GrayImage::new(width, height);
    let radius = block_radius as i64;

    for y in 0..h {
        let y0 = (y as i64 - radius).max(0) as usize;
        let y1 = (y as i64 + radius + 1).min(h as i64) as usize;
        for x in 0..w {
            let x0 = (x as i64 - radius).max(0) as usize;
            let x1 = (x as i64 + radius + 1).min(w as i64) as usize;

            let sum = integral[y1 * (w + 1) + x1] + integral[y0 * (w + 1) + x0]
                - integral[y0 * (w + 1) + x1]
                - integral[y1 * (w + 1) + x0];
            let count = ((y1 - y0) * (x1 - x0)) as u64;
            let mean = (sum / count) as i32;

            let value = gray.get_pixel(x as u32, y as u32).0[0] as i32;
            let out = if value > mean - offset { 255 } else { 0 };
            binary.put_pixel(x as u32, y as u32, image::Luma([out as u8]));
        }
    }

    binary
}

/// Rotates an image about its center by the given angle in degrees.
///
/// Uses inverse mapping with bicubic (Catmull-Rom) interpolation. Source
/// coordinates falling outside the image are clamped to the nearest edge
/// pixel, so no fill color is ever introduced. Rows of the output are
/// computed in parallel.
pub fn rotate_about_center(image: &RgbImage, degrees: f32) -> RgbImage {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return image.clone();
    }

    let theta = degrees.to_radians();
    let (sin, cos) = theta.sin_cos();
    let cx = width as f32 / 2.0;
    let cy = height as f32 / 2.0;

    let mut rotated = RgbImage::new(width, height);
    let buffer: &mut [u8] = rotated.as_mut();

    buffer
        .par_chunks_mut((width * 3) as usize)
        .enumerate()
        .for_each(|(dst_y, row)| {
            let dy = dst_y as f32 - cy;
            for dst_x in 0..width {
                let dx = dst_x as f32 - cx;

                // Inverse rotation of the destination coordinate.
                let src_x = cos * dx + sin * dy + cx;
                let src_y = -sin * dx + cos * dy + cy;

                let pixel = bicubic_interpolate(image, src_x, src_y);
                let index = (dst_x * 3) as usize;
                row[index..index + 3].copy_from_slice(&pixel.0);
            }
        });

    rotated
}

/// Samples a pixel at fractional coordinates with bicubic interpolation.
///
/// The 4x4 sampling neighborhood is clamped to the image bounds, which
/// replicates edge pixels for coordinates outside the image.
fn bicubic_interpolate(image: &RgbImage, x: f32, y: f32) -> Rgb<u8> {
    let (width, height) = image.dimensions();

    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;

    let wx = cubic_weights(fx);
    let wy = cubic_weights(fy);

    let clamp_x = |v: i64| v.clamp(0, width as i64 - 1) as u32;
    let clamp_y = |v: i64| v.clamp(0, height as i64 - 1) as u32;

    let mut result = [0u8; 3];
    for (c, result_channel) in result.iter_mut().enumerate() {
        let mut acc = 0.0f32;
        for (j, wyj) in wy.iter().enumerate() {
            let sy = clamp_y(y0 as i64 - 1 + j as i64);
            for (i, wxi) in wx.iter().enumerate() {
                let sx = clamp_x(x0 as i64 - 1 + i as i64);
                acc += wyj * wxi * image.get_pixel(sx, sy).0[c] as f32;
            }
        }
        *result_channel = acc.round().clamp(0.0, 255.0) as u8;
    }

    Rgb(result)
}

/// Catmull-Rom weights for the four taps around a fractional offset.
fn cubic_weights(t: f32) -> [f32; 4] {
    let t2 = t * t;
    let t3 = t2 * t;
    [
        -0.5 * t3 + t2 - 0.5 * t,
        1.5 * t3 - 2.5 * t2 + 1.0,
        -1.5 * t3 + 2.0 * t2 + 0.5 * t,
        0.5 * t3 - 0.5 * t2,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn blank_gray(width: u32, height: u32) -> GrayImage {
        GrayImage::from_pixel(width, height, Luma([255]))
    }

    #[test]
    fn test_estimate_skew_skips_sparse_foreground() {
        // A uniform image thresholds to all background.
        let gray = blank_gray(64, 64);
        assert!(estimate_skew_angle(&gray).is_none());
    }

    #[test]
    fn test_estimate_skew_on_axis_aligned_bar() {
        // A thick horizontal dark bar on a light background.
        let mut gray = blank_gray(100, 100);
        for y in 40..60 {
            for x in 10..90 {
                gray.put_pixel(x, y, Luma([0]));
            }
        }

        let angle = estimate_skew_angle(&gray).unwrap();
        assert!(angle.abs() < 1.0, "expected near-zero skew, got {angle}");
    }

    #[test]
    fn test_adaptive_threshold_handles_uneven_lighting() {
        // Dark text pixels on a background whose brightness varies by column.
        let mut gray = GrayImage::new(60, 20);
        for (x, _, p) in gray.enumerate_pixels_mut() {
            p.0[0] = 150 + (x as u8);
        }
        gray.put_pixel(10, 10, Luma([40]));
        gray.put_pixel(50, 10, Luma([120]));

        let binary = adaptive_threshold(&gray, 5, 15);
        assert_eq!(binary.get_pixel(10, 10).0[0], 0);
        assert_eq!(binary.get_pixel(50, 10).0[0], 0);
        // Background stays background despite the gradient.
        assert_eq!(binary.get_pixel(30, 5).0[0], 255);
    }

    #[test]
    fn test_rotate_zero_degrees_is_identity() {
        let mut image = RgbImage::new(8, 8);
        for (x, y, p) in image.enumerate_pixels_mut() {
            *p = image::Rgb([(x * 30) as u8, (y * 30) as u8, 7]);
        }

        let rotated = rotate_about_center(&image, 0.0);
        assert_eq!(rotated, image);
    }

    #[test]
    fn test_rotate_keeps_dimensions_and_replicates_edges() {
        let image = RgbImage::from_pixel(20, 10, image::Rgb([200, 10, 10]));
        let rotated = rotate_about_center(&image, 30.0);

        assert_eq!(rotated.dimensions(), (20, 10));
        // A constant image stays constant: corners outside the source are
        // filled by edge replication, never by a fill color.
        assert!(rotated.pixels().all(|p| *p == image::Rgb([200, 10, 10])));
    }

    #[test]
    fn test_preprocess_outputs_are_consistent() {
        let mut image = RgbImage::from_pixel(80, 80, image::Rgb([255, 255, 255]));
        // A slightly tilted dark bar.
        for x in 10i32..70 {
            let y = 40 + x / 14;
            for t in 0..8 {
                image.put_pixel(x as u32, (y + t) as u32, image::Rgb([0, 0, 0]));
            }
        }

        let result = preprocess(&image);
        assert_eq!(result.image.dimensions(), image.dimensions());
        assert_eq!(result.gray.dimensions(), image.dimensions());
        // The returned grayscale is derived from the returned color image.
        assert_eq!(result.gray, to_grayscale(&result.image));
        assert!(result.skew_angle.is_some());
    }
}
