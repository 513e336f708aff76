//! Utility functions for image loading and overlay rendering.

pub mod image;
pub mod visualization;

pub use image::{ChannelOrder, LabelImage, decode_image, load_image, to_grayscale};
pub use visualization::{OverlayStyle, draw_match_overlay};

/// Initializes the tracing subscriber for logging.
///
/// Sets up the tracing subscriber with an environment filter and formatting
/// layer. Typically called once at the start of a host application.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();
}
