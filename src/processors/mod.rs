//! Geometry primitives and image preprocessing for the label OCR pipeline.

pub mod geometry;
pub mod preprocess;

pub use geometry::{MinAreaRect, Point, Quad, min_area_rect};
pub use preprocess::{Preprocessed, preprocess};
