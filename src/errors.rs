// ABOUTME: Error types for the pptx2png application
// ABOUTME: Provides structured error handling for each stage of the conversion

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Source file not found: {0:?}")]
    SourceNotFound(PathBuf),

    #[error("Invalid source: {0}")]
    InvalidSource(String),

    #[error("Invalid {name}: {value}. {name} must be a positive integer.")]
    InvalidDimension { name: &'static str, value: i64 },

    #[error(
        "Output size {width}x{height} is too large. Each side must be at most {} pixels and the image at most {} pixels",
        crate::dimensions::MAX_SIDE,
        crate::dimensions::MAX_PIXELS
    )]
    OutputTooLarge { width: u32, height: u32 },

    #[error("Presentation error: {0}")]
    PresentationError(String),

    #[error("Failed to render slide {ordinal}: {message}")]
    RenderFailure { ordinal: usize, message: String },

    #[error("Failed to write slide {ordinal} to {path:?}: {source}")]
    WriteFailure {
        ordinal: usize,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create output directory {path:?}: {source}")]
    DestinationError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read file: {0}")]
    FileReadError(#[from] std::io::Error),

    #[error("Input validation error: {0}")]
    ValidationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl ConvertError {
    /// Attach a slide ordinal to an error raised while rasterizing that slide.
    pub fn into_render_failure(self, ordinal: usize) -> Self {
        match self {
            err @ ConvertError::RenderFailure { .. } => err,
            err => ConvertError::RenderFailure {
                ordinal,
                message: err.to_string(),
            },
        }
    }
}

// Implement conversion from zip errors
impl From<zip::result::ZipError> for ConvertError {
    fn from(err: zip::result::ZipError) -> Self {
        ConvertError::PresentationError(format!("ZIP operation failed: {}", err))
    }
}

impl From<quick_xml::Error> for ConvertError {
    fn from(err: quick_xml::Error) -> Self {
        ConvertError::PresentationError(format!("XML parsing failed: {}", err))
    }
}

impl From<image::ImageError> for ConvertError {
    fn from(err: image::ImageError) -> Self {
        ConvertError::PresentationError(format!("Image processing failed: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;
