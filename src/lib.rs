//! # Label OCR
//!
//! A Rust library that locates `_1_` identifier tokens on shipping label
//! images using optical character recognition.
//!
//! The pipeline is strictly linear per invocation:
//!
//! 1. **Load**: decode raw bytes into a pixel buffer
//! 2. **Preprocess**: grayscale, denoise, estimate and correct skew
//! 3. **Recognize**: run a black-box text recognition engine behind the
//!    [`TextRecognizer`](recognition::TextRecognizer) trait
//! 4. **Match**: scan recognized text for tokens containing `_1_`, with a
//!    fuzzy fallback for noisy recognition output
//! 5. **Overlay**: draw the best match's bounding quadrilateral onto a copy
//!    of the image
//!
//! No component retains state across invocations. The recognition engine
//! itself is out of scope; any concrete engine (a local model, a remote
//! service) plugs in by implementing [`TextRecognizer`](recognition::TextRecognizer).
//!
//! ## Modules
//!
//! * [`core`] - Error types and engine configuration
//! * [`processors`] - Geometry primitives and image preprocessing
//! * [`recognition`] - The recognition seam and its adapter
//! * [`pipeline`] - Pattern matching and pipeline orchestration
//! * [`utils`] - Image loading and overlay rendering
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use label_ocr::prelude::*;
//!
//! # struct MyEngine;
//! # impl label_ocr::recognition::TextRecognizer for MyEngine {
//! #     fn recognize(
//! #         &self,
//! #         _image: &image::RgbImage,
//! #         _options: &label_ocr::core::RecognizerOptions,
//! #     ) -> OcrResult<Vec<label_ocr::recognition::RawDetection>> { Ok(vec![]) }
//! # }
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = Box::new(MyEngine);
//! let ocr = LabelOcr::builder(engine).build();
//!
//! let bytes = std::fs::read("label.jpg")?;
//! let result = ocr.scan(&bytes)?;
//!
//! match result.best_match() {
//!     Some(m) => println!("best match: {} (conf {:.3})", m.token, m.confidence),
//!     None => println!("no match found"),
//! }
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod pipeline;
pub mod processors;
pub mod recognition;
pub mod utils;

/// Prelude module for convenient imports.
///
/// Bring the essentials into scope with a single use statement:
///
/// ```rust
/// use label_ocr::prelude::*;
/// ```
pub mod prelude {
    pub use crate::core::{EngineConfig, OcrError, OcrResult};
    pub use crate::pipeline::{LabelOcr, LabelOcrBuilder, LabelScanResult, TokenMatch};
    pub use crate::recognition::{TextRecognizer, TextRegion};
    pub use crate::utils::{decode_image, load_image};
}
