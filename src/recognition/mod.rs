//! The text recognition seam and its adapter.
//!
//! The recognition engine itself (model loading, inference) is an opaque
//! capability consumed through the [`TextRecognizer`] trait: given an RGB
//! image, it returns detected text regions with confidence scores. Any
//! concrete engine plugs in here, and tests substitute stubs returning
//! fixed detections.
//!
//! The [`RecognitionAdapter`] sits between the pipeline and the engine. It
//! normalizes the image's channel order to the canonical RGB the engine
//! contract documents, forwards the per-call options (paragraph grouping
//! off, so the target token stays isolated in its own region), and
//! validates the engine's output before mapping each result triple 1:1 to
//! a [`TextRegion`].

use std::sync::Arc;

use image::RgbImage;
use tracing::debug;

use crate::core::{OcrError, OcrResult, RecognizerOptions};
use crate::processors::geometry::Quad;
use crate::utils::image::LabelImage;

/// A text region produced by the recognition adapter.
///
/// Immutable once produced; a region has no identity beyond its position in
/// the result sequence for a given invocation.
#[derive(Debug, Clone)]
pub struct TextRegion {
    /// The bounding quadrilateral of the region, corners in reading order.
    pub bounds: Quad,
    /// The recognized text.
    pub text: Arc<str>,
    /// The engine-reported confidence score in [0, 1].
    pub confidence: f32,
}

/// A raw result triple reported by a recognition engine.
#[derive(Debug, Clone)]
pub struct RawDetection {
    /// The bounding quadrilateral of the detected text.
    pub bounds: Quad,
    /// The recognized text.
    pub text: String,
    /// The engine's confidence score, expected to be in [0, 1].
    pub confidence: f32,
}

/// The black-box text recognition capability.
///
/// Implementations receive a canonical RGB image and return one detection
/// per text region. Engine initialization (model loading) is the
/// implementor's concern and is expected to happen once per process, ahead
/// of the first call; see [`EngineConfig`](crate::core::EngineConfig) for
/// the construction surface hosts pass to concrete engines.
///
/// Implementations take `&self` and must not mutate engine state between
/// calls. Thread-safety of concurrent calls on one instance is not assumed
/// anywhere in this crate; hosts that share an engine across threads must
/// serialize calls themselves.
pub trait TextRecognizer {
    /// Runs text recognition over the given image.
    ///
    /// # Errors
    ///
    /// Returns [`OcrError::Recognition`] if the engine fails.
    fn recognize(
        &self,
        image: &RgbImage,
        options: &RecognizerOptions,
    ) -> OcrResult<Vec<RawDetection>>;
}

/// Adapter wrapping a [`TextRecognizer`] behind a uniform contract.
pub struct RecognitionAdapter {
    engine: Box<dyn TextRecognizer>,
    options: RecognizerOptions,
}

impl RecognitionAdapter {
    /// Creates an adapter around the given engine with default options
    /// (paragraph grouping disabled).
    pub fn new(engine: Box<dyn TextRecognizer>) -> Self {
        Self {
            engine,
            options: RecognizerOptions::default(),
        }
    }

    /// Creates an adapter with explicit per-call options.
    pub fn with_options(engine: Box<dyn TextRecognizer>, options: RecognizerOptions) -> Self {
        Self { engine, options }
    }

    /// Runs recognition over an image, normalizing channel order first.
    ///
    /// Images stored in reverse (BGR) channel order are reordered to the
    /// canonical RGB the engine contract documents. Each valid result
    /// triple maps to one [`TextRegion`].
    ///
    /// # Errors
    ///
    /// Returns [`OcrError::Recognition`] if the engine fails, or
    /// [`OcrError::InvalidRecognition`] if the engine reports a confidence
    /// outside [0, 1] or a non-finite bounding quadrilateral. Malformed
    /// output is never silently treated as "zero regions".
    pub fn recognize(&self, image: &LabelImage) -> OcrResult<Vec<TextRegion>> {
        let rgb = image.to_rgb();
        let detections = self.engine.recognize(&rgb, &self.options)?;

        debug!(regions = detections.len(), "engine returned text regions");

        detections
            .into_iter()
            .map(|d| {
                if !d.confidence.is_finite() || !(0.0..=1.0).contains(&d.confidence) {
                    return Err(OcrError::invalid_recognition(format!(
                        "confidence {} outside [0, 1] for text {:?}",
                        d.confidence, d.text
                    )));
                }
                if !d.bounds.is_finite() {
                    return Err(OcrError::invalid_recognition(format!(
                        "non-finite bounding quadrilateral for text {:?}",
                        d.text
                    )));
                }
                Ok(TextRegion {
                    bounds: d.bounds,
                    text: Arc::from(d.text),
                    confidence: d.confidence,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::image::ChannelOrder;
    use image::Rgb;
    use std::sync::Mutex;

    /// Stub engine returning canned detections.
    struct StubEngine {
        detections: Vec<RawDetection>,
    }

    impl StubEngine {
        fn new(detections: Vec<RawDetection>) -> Self {
            Self { detections }
        }
    }

    impl TextRecognizer for StubEngine {
        fn recognize(
            &self,
            _image: &RgbImage,
            _options: &RecognizerOptions,
        ) -> OcrResult<Vec<RawDetection>> {
            Ok(self.detections.clone())
        }
    }

    /// Engine that records the images it is handed.
    struct RecordingEngine {
        seen: Arc<Mutex<Vec<RgbImage>>>,
    }

    impl TextRecognizer for RecordingEngine {
        fn recognize(
            &self,
            image: &RgbImage,
            _options: &RecognizerOptions,
        ) -> OcrResult<Vec<RawDetection>> {
            self.seen.lock().unwrap().push(image.clone());
            Ok(vec![])
        }
    }

    fn detection(text: &str, confidence: f32) -> RawDetection {
        RawDetection {
            bounds: Quad::from_coords(0.0, 0.0, 10.0, 10.0),
            text: text.to_string(),
            confidence,
        }
    }

    #[test]
    fn test_adapter_maps_detections_one_to_one() {
        let engine = StubEngine::new(vec![detection("FOO", 0.9), detection("BAR", 0.5)]);
        let adapter = RecognitionAdapter::new(Box::new(engine));

        let image = LabelImage::new(RgbImage::new(4, 4), ChannelOrder::Rgb);
        let regions = adapter.recognize(&image).unwrap();

        assert_eq!(regions.len(), 2);
        assert_eq!(&*regions[0].text, "FOO");
        assert_eq!(regions[0].confidence, 0.9);
        assert_eq!(&*regions[1].text, "BAR");
    }

    #[test]
    fn test_adapter_normalizes_bgr_input() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let engine = RecordingEngine {
            seen: Arc::clone(&seen),
        };

        // A red pixel stored in BGR order.
        let bgr_red = RgbImage::from_pixel(1, 1, Rgb([0, 0, 255]));
        let image = LabelImage::new(bgr_red, ChannelOrder::Bgr);

        let adapter = RecognitionAdapter::new(Box::new(engine));
        adapter.recognize(&image).unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(*seen[0].get_pixel(0, 0), Rgb([255, 0, 0]));
    }

    #[test]
    fn test_adapter_rejects_out_of_range_confidence() {
        let engine = StubEngine::new(vec![detection("FOO", 1.5)]);
        let adapter = RecognitionAdapter::new(Box::new(engine));

        let image = LabelImage::new(RgbImage::new(4, 4), ChannelOrder::Rgb);
        let err = adapter.recognize(&image).unwrap_err();
        assert!(matches!(err, OcrError::InvalidRecognition { .. }));
    }

    #[test]
    fn test_adapter_rejects_non_finite_bounds() {
        let mut bad = detection("FOO", 0.9);
        bad.bounds.points[2].x = f32::NAN;

        let adapter = RecognitionAdapter::new(Box::new(StubEngine::new(vec![bad])));
        let image = LabelImage::new(RgbImage::new(4, 4), ChannelOrder::Rgb);

        let err = adapter.recognize(&image).unwrap_err();
        assert!(matches!(err, OcrError::InvalidRecognition { .. }));
    }

    #[test]
    fn test_adapter_propagates_engine_failure() {
        struct FailingEngine;
        impl TextRecognizer for FailingEngine {
            fn recognize(
                &self,
                _image: &RgbImage,
                _options: &RecognizerOptions,
            ) -> OcrResult<Vec<RawDetection>> {
                Err(OcrError::recognition(std::io::Error::other("model crashed")))
            }
        }

        let adapter = RecognitionAdapter::new(Box::new(FailingEngine));
        let image = LabelImage::new(RgbImage::new(4, 4), ChannelOrder::Rgb);

        let err = adapter.recognize(&image).unwrap_err();
        assert!(matches!(err, OcrError::Recognition(_)));
    }

    #[test]
    fn test_adapter_forwards_options() {
        struct OptionCheckingEngine;
        impl TextRecognizer for OptionCheckingEngine {
            fn recognize(
                &self,
                _image: &RgbImage,
                options: &RecognizerOptions,
            ) -> OcrResult<Vec<RawDetection>> {
                assert!(!options.group_paragraphs);
                Ok(vec![])
            }
        }

        let adapter = RecognitionAdapter::new(Box::new(OptionCheckingEngine));
        let image = LabelImage::new(RgbImage::new(4, 4), ChannelOrder::Rgb);
        assert!(adapter.recognize(&image).unwrap().is_empty());
    }
}
