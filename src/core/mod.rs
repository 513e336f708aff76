//! Core error handling and configuration for the label OCR pipeline.

pub mod config;
pub mod errors;

pub use config::{EngineConfig, RecognizerOptions};
pub use errors::{OcrError, OcrResult};
