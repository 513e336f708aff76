//! Pipeline orchestration: decode, preprocess, recognize, match, overlay.
//!
//! [`LabelOcr`] wires the stages together for one invocation. Control flow
//! is strictly linear and nothing is retained across invocations; the only
//! long-lived state is the recognition engine a host constructs once and
//! hands to the builder.

pub mod matcher;

pub use matcher::{TokenMatch, find_matches, pick_best};

use std::sync::Arc;

use image::{GrayImage, RgbImage};
use tracing::{debug, info};

use crate::core::{OcrError, OcrResult, RecognizerOptions};
use crate::processors::preprocess::{Preprocessed, preprocess};
use crate::recognition::{RecognitionAdapter, TextRecognizer, TextRegion};
use crate::utils::image::{ChannelOrder, LabelImage};
use crate::utils::visualization::{OverlayStyle, draw_match_overlay};

/// The label OCR pipeline.
///
/// Construct one with [`LabelOcr::builder`], keep it alive for as long as
/// the engine should be reused, and call [`scan`](LabelOcr::scan) once per
/// image.
pub struct LabelOcr {
    adapter: RecognitionAdapter,
    overlay_style: OverlayStyle,
    render_overlay: bool,
}

impl LabelOcr {
    /// Starts building a pipeline around the given recognition engine.
    pub fn builder(engine: Box<dyn TextRecognizer>) -> LabelOcrBuilder {
        LabelOcrBuilder::new(engine)
    }

    /// Scans an image supplied as raw encoded bytes.
    ///
    /// Decoding failure surfaces immediately as
    /// [`OcrError::Decode`](crate::core::OcrError::Decode) without touching
    /// any later stage; a scan that finds no match is a success with an
    /// empty match list.
    pub fn scan(&self, bytes: &[u8]) -> OcrResult<LabelScanResult> {
        let image = LabelImage::from_bytes(bytes)?;
        self.scan_image(image)
    }

    /// Scans an already-decoded image.
    ///
    /// Buffers in reverse (BGR) channel order are normalized before
    /// preprocessing.
    ///
    /// # Errors
    ///
    /// Returns [`OcrError::InvalidInput`] if the image has zero width or
    /// height.
    pub fn scan_image(&self, image: LabelImage) -> OcrResult<LabelScanResult> {
        if image.width() == 0 || image.height() == 0 {
            return Err(OcrError::invalid_input("image has zero width or height"));
        }

        let input = image.into_rgb();
        info!(
            width = input.width(),
            height = input.height(),
            "scanning label image"
        );

        let Preprocessed {
            image: processed,
            gray: processed_gray,
            skew_angle,
        } = preprocess(&input);

        let processed = LabelImage::new(processed, ChannelOrder::Rgb);
        let regions = self.adapter.recognize(&processed)?;
        let processed = processed.into_rgb();

        let matches = find_matches(&regions);
        debug!(
            regions = regions.len(),
            matches = matches.len(),
            "recognition and matching complete"
        );

        let overlay = if self.render_overlay {
            pick_best(&matches).map(|best| {
                info!(token = %best.token, confidence = best.confidence, "best match");
                draw_match_overlay(
                    &processed,
                    &best.bounds,
                    Some(&best.token),
                    &self.overlay_style,
                )
            })
        } else {
            None
        };

        if matches.is_empty() {
            info!("no pattern match found");
        }

        Ok(LabelScanResult {
            input: Arc::new(input),
            processed: Arc::new(processed),
            processed_gray: Arc::new(processed_gray),
            skew_angle,
            regions,
            matches,
            overlay,
        })
    }
}

/// Builder for [`LabelOcr`] instances.
pub struct LabelOcrBuilder {
    engine: Box<dyn TextRecognizer>,
    options: RecognizerOptions,
    overlay_style: OverlayStyle,
    render_overlay: bool,
}

impl LabelOcrBuilder {
    /// Creates a builder with default options: paragraph grouping off,
    /// default overlay styling, overlay rendering on.
    pub fn new(engine: Box<dyn TextRecognizer>) -> Self {
        Self {
            engine,
            options: RecognizerOptions::default(),
            overlay_style: OverlayStyle::default(),
            render_overlay: true,
        }
    }

    /// Overrides the per-call options forwarded to the engine.
    pub fn recognizer_options(mut self, options: RecognizerOptions) -> Self {
        self.options = options;
        self
    }

    /// Overrides the overlay styling.
    pub fn overlay_style(mut self, style: OverlayStyle) -> Self {
        self.overlay_style = style;
        self
    }

    /// Enables or disables overlay rendering entirely.
    pub fn render_overlay(mut self, render: bool) -> Self {
        self.render_overlay = render;
        self
    }

    /// Builds the pipeline.
    pub fn build(self) -> LabelOcr {
        LabelOcr {
            adapter: RecognitionAdapter::with_options(self.engine, self.options),
            overlay_style: self.overlay_style,
            render_overlay: self.render_overlay,
        }
    }
}

/// Everything one pipeline invocation produced.
#[derive(Debug, Clone)]
pub struct LabelScanResult {
    /// The decoded input image in canonical RGB order.
    pub input: Arc<RgbImage>,
    /// The preprocessed (deskewed) color image recognition ran on.
    pub processed: Arc<RgbImage>,
    /// Grayscale of the preprocessed image, geometrically consistent with it.
    pub processed_gray: Arc<GrayImage>,
    /// The estimated skew angle in degrees, if one could be estimated.
    pub skew_angle: Option<f32>,
    /// All text regions the engine reported, in detection order.
    pub regions: Vec<TextRegion>,
    /// Pattern matches sorted by confidence descending.
    pub matches: Vec<TokenMatch>,
    /// Overlay image highlighting the best match, when one exists and
    /// overlay rendering is enabled. Quadrilateral coordinates refer to the
    /// processed image, so the overlay is drawn on it.
    pub overlay: Option<RgbImage>,
}

impl LabelScanResult {
    /// The highest-confidence match, if any.
    pub fn best_match(&self) -> Option<&TokenMatch> {
        pick_best(&self.matches)
    }

    /// True if at least one pattern match was found.
    pub fn has_match(&self) -> bool {
        !self.matches.is_empty()
    }

    /// Iterates over the recognized text of every region, without boxes.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.regions.iter().map(|r| &*r.text)
    }
}
