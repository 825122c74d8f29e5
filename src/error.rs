//! Error types for backdrop.

use std::io;
use thiserror::Error;

/// Result type alias for fallible backdrop operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors from the ambient parts of the crate: configuration files, frame
/// export and browser bindings.
///
/// Animations themselves never fail. A missing surface is reported as
/// `None` from [`EngineBuilder::attach`](crate::EngineBuilder::attach).
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Configuration could not be parsed or serialized
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// Frame export failed
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// A link or endpoint could not be parsed
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// A browser API call failed
    #[error("JavaScript error: {0}")]
    Js(String),
}
