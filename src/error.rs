//! Error types for trueno-hist operations.

use std::io;
use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while extracting binned data or rendering plots.
#[derive(Error, Debug)]
pub enum Error {
    /// The histogram source could not supply a required accessor, or reported
    /// an inconsistent bin count or binning.
    #[error("Invalid source: {0}")]
    InvalidSource(String),

    /// A flat buffer length disagrees with its declared dimensions.
    #[error("Malformed buffer: expected {expected} elements, found {actual}")]
    MalformedBuffer {
        /// Element count implied by the declared dimensions.
        expected: usize,
        /// Element count actually available.
        actual: usize,
    },

    /// A caller-supplied option has the wrong shape, length or range.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Data length mismatch between x and y arrays.
    #[error("Data length mismatch: x has {x_len} elements, y has {y_len} elements")]
    DataLengthMismatch {
        /// Length of x data.
        x_len: usize,
        /// Length of y data.
        y_len: usize,
    },

    /// Nothing drawable was provided where data is required.
    #[error("Empty data provided")]
    EmptyData,

    /// Invalid dimensions for a framebuffer or figure.
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Width value.
        width: u32,
        /// Height value.
        height: u32,
    },

    /// Scale domain error (e.g., log of non-positive value).
    #[error("Scale domain error: {0}")]
    ScaleDomain(String),

    /// Color parsing error.
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// A render-time computation failed.
    #[error("Rendering error: {0}")]
    Rendering(String),

    /// Configuration file could not be parsed.
    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] serde_yaml_ng::Error),

    /// I/O error (file operations, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// PNG encoding error.
    #[error("PNG encoding error: {0}")]
    PngEncoding(#[from] png::EncodingError),
}
