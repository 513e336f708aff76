//! Error types for the label OCR pipeline.
//!
//! This module defines the errors that can surface from a pipeline
//! invocation. The taxonomy deliberately separates "the input bytes are not
//! an image" ([`OcrError::Decode`]) from "the engine failed"
//! ([`OcrError::Recognition`]); the absence of a pattern match is never an
//! error and is communicated as an empty match list instead.

use thiserror::Error;

/// Convenient result alias for OCR operations.
pub type OcrResult<T> = Result<T, OcrError>;

/// Errors that can occur in the label OCR pipeline.
#[derive(Error, Debug)]
pub enum OcrError {
    /// The input bytes could not be decoded into an image.
    ///
    /// Surfaced immediately to the caller; retrying a static malformed
    /// input is pointless, so no retry logic exists anywhere downstream.
    #[error("image decode")]
    Decode(#[source] image::ImageError),

    /// The recognition engine failed while processing an image.
    ///
    /// Never folded into "zero regions": a failing engine must stay
    /// distinguishable from a legitimately blank image.
    #[error("recognition engine")]
    Recognition(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The recognition engine returned malformed output.
    #[error("invalid recognition output: {message}")]
    InvalidRecognition {
        /// A message describing what was malformed.
        message: String,
    },

    /// Error indicating invalid input.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// A message describing the invalid input.
        message: String,
    },

    /// Error indicating a configuration problem.
    #[error("configuration: {message}")]
    ConfigError {
        /// A message describing the configuration error.
        message: String,
    },

    /// IO error.
    #[error("io")]
    Io(#[from] std::io::Error),
}

impl OcrError {
    /// Creates a recognition error from any engine-side failure.
    pub fn recognition<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        OcrError::Recognition(Box::new(error))
    }

    /// Creates an error for malformed recognition output.
    pub fn invalid_recognition(message: impl Into<String>) -> Self {
        OcrError::InvalidRecognition {
            message: message.into(),
        }
    }

    /// Creates an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        OcrError::InvalidInput {
            message: message.into(),
        }
    }

    /// Creates a configuration error.
    pub fn config_error(message: impl Into<String>) -> Self {
        OcrError::ConfigError {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_is_distinct_from_recognition() {
        let decode = OcrError::Decode(image::ImageError::IoError(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "truncated",
        )));
        let recognition = OcrError::recognition(std::io::Error::other("engine crashed"));

        assert!(matches!(decode, OcrError::Decode(_)));
        assert!(matches!(recognition, OcrError::Recognition(_)));
    }

    #[test]
    fn test_constructor_messages() {
        let err = OcrError::invalid_recognition("confidence out of range");
        assert_eq!(
            err.to_string(),
            "invalid recognition output: confidence out of range"
        );

        let err = OcrError::config_error("empty language list");
        assert_eq!(err.to_string(), "configuration: empty language list");
    }
}
