//! Image loading and conversion utilities.
//!
//! Input images arrive either as encoded bytes (PNG, JPEG, TIFF, BMP, or any
//! other format the `image` crate decodes) or as raw pixel buffers handed
//! over by a host, which may store channels in reverse (BGR) order. The
//! [`LabelImage`] wrapper keeps the channel order explicit so the recognition
//! adapter can normalize it before invoking the engine.

use std::borrow::Cow;
use std::path::Path;

use image::{GrayImage, RgbImage, imageops};
use serde::{Deserialize, Serialize};

use crate::core::{OcrError, OcrResult};

/// Color channel order of a 3-channel pixel buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelOrder {
    /// Canonical red-green-blue order.
    Rgb,
    /// Reverse order, as produced by BGR-native host frameworks.
    Bgr,
}

/// A decoded label image with an explicit channel order.
///
/// Immutable after construction; each pipeline stage produces a new image
/// rather than mutating one in place.
#[derive(Debug, Clone)]
pub struct LabelImage {
    pixels: RgbImage,
    order: ChannelOrder,
}

impl LabelImage {
    /// Wraps an existing pixel buffer with the given channel order.
    ///
    /// The buffer is stored as-is; no reordering happens until a consumer
    /// asks for the canonical RGB view.
    pub fn new(pixels: RgbImage, order: ChannelOrder) -> Self {
        Self { pixels, order }
    }

    /// Decodes an image from raw encoded bytes.
    ///
    /// # Errors
    ///
    /// Returns [`OcrError::Decode`] if the bytes do not form a valid image.
    pub fn from_bytes(bytes: &[u8]) -> OcrResult<Self> {
        Ok(Self {
            pixels: decode_image(bytes)?,
            order: ChannelOrder::Rgb,
        })
    }

    /// Width of the image in pixels.
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Height of the image in pixels.
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// The channel order of the underlying buffer.
    pub fn order(&self) -> ChannelOrder {
        self.order
    }

    /// Returns the image in canonical RGB order, swapping channels if the
    /// buffer is stored in reverse order.
    pub fn to_rgb(&self) -> Cow<'_, RgbImage> {
        match self.order {
            ChannelOrder::Rgb => Cow::Borrowed(&self.pixels),
            ChannelOrder::Bgr => Cow::Owned(swap_red_blue(&self.pixels)),
        }
    }

    /// Consumes the image, returning a buffer in canonical RGB order.
    pub fn into_rgb(self) -> RgbImage {
        match self.order {
            ChannelOrder::Rgb => self.pixels,
            ChannelOrder::Bgr => swap_red_blue(&self.pixels),
        }
    }
}

/// Decodes an image from a byte stream.
///
/// # Errors
///
/// Returns [`OcrError::Decode`] if the bytes are not a valid image in any
/// supported format.
pub fn decode_image(bytes: &[u8]) -> OcrResult<RgbImage> {
    let img = image::load_from_memory(bytes).map_err(OcrError::Decode)?;
    Ok(img.to_rgb8())
}

/// Loads an image from a file path.
///
/// # Errors
///
/// Returns [`OcrError::Io`] if the file cannot be read and
/// [`OcrError::Decode`] if its contents are not a valid image.
pub fn load_image(path: &Path) -> OcrResult<RgbImage> {
    let bytes = std::fs::read(path)?;
    decode_image(&bytes)
}

/// Converts an RGB image to grayscale with the standard luminance weighting.
pub fn to_grayscale(image: &RgbImage) -> GrayImage {
    imageops::grayscale(image)
}

/// Produces a copy of the image with the red and blue channels exchanged.
fn swap_red_blue(image: &RgbImage) -> RgbImage {
    let mut swapped = image.clone();
    for pixel in swapped.pixels_mut() {
        pixel.0.swap(0, 2);
    }
    swapped
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use std::io::Cursor;

    fn encode_png(image: &RgbImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgb8(image.clone())
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_decode_round_trips_png() {
        let original = RgbImage::from_pixel(5, 3, Rgb([10, 20, 30]));
        let decoded = decode_image(&encode_png(&original)).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_decode_empty_bytes_is_decode_error() {
        let err = decode_image(&[]).unwrap_err();
        assert!(matches!(err, OcrError::Decode(_)));
    }

    #[test]
    fn test_decode_garbage_bytes_is_decode_error() {
        let err = decode_image(b"definitely not an image").unwrap_err();
        assert!(matches!(err, OcrError::Decode(_)));
    }

    #[test]
    fn test_load_image_from_path() {
        let original = RgbImage::from_pixel(4, 4, Rgb([90, 60, 30]));
        let path = std::env::temp_dir().join("label_ocr_load_image_test.png");
        std::fs::write(&path, encode_png(&original)).unwrap();

        let loaded = load_image(&path).unwrap();
        assert_eq!(loaded, original);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_image_missing_file_is_io_error() {
        let path = std::env::temp_dir().join("label_ocr_does_not_exist.png");
        let err = load_image(&path).unwrap_err();
        assert!(matches!(err, OcrError::Io(_)));
    }

    #[test]
    fn test_label_image_dimensions_and_order() {
        let image = LabelImage::new(RgbImage::new(7, 5), ChannelOrder::Bgr);
        assert_eq!(image.width(), 7);
        assert_eq!(image.height(), 5);
        assert_eq!(image.order(), ChannelOrder::Bgr);
    }

    #[test]
    fn test_bgr_buffer_is_normalized() {
        // A red pixel stored in BGR order.
        let bgr = RgbImage::from_pixel(1, 1, Rgb([0, 0, 255]));
        let label_image = LabelImage::new(bgr, ChannelOrder::Bgr);

        let rgb = label_image.to_rgb();
        assert_eq!(*rgb.get_pixel(0, 0), Rgb([255, 0, 0]));
    }

    #[test]
    fn test_rgb_buffer_is_borrowed_unchanged() {
        let rgb = RgbImage::from_pixel(2, 2, Rgb([1, 2, 3]));
        let label_image = LabelImage::new(rgb.clone(), ChannelOrder::Rgb);

        assert!(matches!(label_image.to_rgb(), Cow::Borrowed(_)));
        assert_eq!(label_image.into_rgb(), rgb);
    }

    #[test]
    fn test_grayscale_weighting() {
        let image = RgbImage::from_pixel(1, 1, Rgb([255, 0, 0]));
        let gray = to_grayscale(&image);
        // Red contributes far less than full brightness under luminance
        // weighting.
        let value = gray.get_pixel(0, 0).0[0];
        assert!(value > 0 && value < 128);
    }
}
