//! Overlay rendering for pattern matches.
//!
//! This module draws the chosen match's bounding quadrilateral and label
//! text onto a copy of the input image. The input is never mutated in
//! place; callers always get a new image back.

use ab_glyph::FontVec;
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_line_segment_mut, draw_text_mut};
use tracing::{debug, info};

use crate::processors::geometry::Quad;

const STROKE_COLOR: Rgb<u8> = Rgb([0, 255, 0]);

/// Vertical distance in pixels between the quadrilateral's first corner and
/// the label baseline.
const LABEL_OFFSET: i32 = 10;

/// Styling for the match overlay.
///
/// Controls the stroke color and width of the quadrilateral outline and the
/// font used for the label text. Without a font, label rendering is skipped
/// and only the outline is drawn.
pub struct OverlayStyle {
    /// Stroke color for the outline and label.
    pub color: Rgb<u8>,
    /// Stroke width of the outline in pixels.
    pub thickness: u32,
    /// The font to use for the label. If None, label rendering is skipped.
    pub font: Option<FontVec>,
    /// The scale factor for the label font.
    pub font_scale: f32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            color: STROKE_COLOR,
            thickness: 2,
            font: None,
            font_scale: 16.0,
        }
    }
}

impl OverlayStyle {
    /// Creates an OverlayStyle with a font loaded from the given bytes.
    pub fn with_font_bytes(font_data: Vec<u8>) -> Result<Self, ab_glyph::InvalidFont> {
        let font = FontVec::try_from_vec(font_data)?;
        Ok(Self {
            font: Some(font),
            ..Self::default()
        })
    }

    /// Creates an OverlayStyle with a system font.
    ///
    /// Attempts to load a font from common system locations, falling back to
    /// the default (no label text) if none is found.
    pub fn with_system_font() -> Self {
        let font_paths = [
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/System/Library/Fonts/Arial.ttf",
            "C:\\Windows\\Fonts\\arial.ttf",
        ];

        for path in &font_paths {
            if let Ok(font_data) = std::fs::read(path)
                && let Ok(style) = Self::with_font_bytes(font_data)
            {
                info!("loaded system font: {}", path);
                return style;
            }
        }

        debug!("no system font found, label rendering will be skipped");
        Self::default()
    }
}

/// Draws a match overlay onto a copy of the given image.
///
/// Connects the quadrilateral's corner points with a closed polyline in the
/// style's stroke color and width. If a label is supplied and the style has
/// a font, the label is rendered above the quadrilateral's first corner,
/// offset upward by a fixed margin and clamped so it never leaves the top of
/// the image.
pub fn draw_match_overlay(
    image: &RgbImage,
    quad: &Quad,
    label: Option<&str>,
    style: &OverlayStyle,
) -> RgbImage {
    let mut out = image.clone();

    for i in 0..4 {
        let start = quad.points[i];
        let end = quad.points[(i + 1) % 4];
        draw_thick_line(
            &mut out,
            (start.x, start.y),
            (end.x, end.y),
            style.color,
            style.thickness,
        );
    }

    if let Some(text) = label
        && let Some(ref font) = style.font
    {
        let (x, y) = label_anchor(quad, LABEL_OFFSET);
        if x < out.width() as i32 && y < out.height() as i32 {
            draw_text_mut(&mut out, style.color, x, y, style.font_scale, font, text);
        }
    }

    out
}

/// Computes the label anchor for a quadrilateral.
///
/// The label sits above the first corner point by `offset` pixels; the
/// vertical coordinate is clamped at zero so the label never leaves the
/// image.
pub fn label_anchor(quad: &Quad, offset: i32) -> (i32, i32) {
    let anchor = quad.anchor();
    let x = anchor.x as i32;
    let y = (anchor.y as i32 - offset).max(0);
    (x, y)
}

/// Draws a line segment with the given stroke width.
///
/// Strokes wider than one pixel are drawn as parallel one-pixel segments
/// offset along the line's perpendicular.
fn draw_thick_line(
    image: &mut RgbImage,
    start: (f32, f32),
    end: (f32, f32),
    color: Rgb<u8>,
    thickness: u32,
) {
    let dx = end.0 - start.0;
    let dy = end.1 - start.1;
    let length = dx.hypot(dy);

    if length < f32::EPSILON || thickness <= 1 {
        draw_line_segment_mut(image, start, end, color);
        return;
    }

    let nx = -dy / length;
    let ny = dx / length;

    for i in 0..thickness {
        let offset = i as f32 - (thickness - 1) as f32 / 2.0;
        draw_line_segment_mut(
            image,
            (start.0 + nx * offset, start.1 + ny * offset),
            (end.0 + nx * offset, end.1 + ny * offset),
            color,
        );
    }
}
