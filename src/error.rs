use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SqueezeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image processing error: {0}")]
    ImageProcessing(#[from] image::ImageError),

    #[error("Encoder produced no output for {0}")]
    EmptyOutput(String),

    #[error("{0} encoder error: {1}")]
    Encoding(String, String),

    #[error("PNG optimization error: {0}")]
    PngOptimization(String),

    #[error("Invalid quality value: {0}. Must be between 1 and 100")]
    InvalidQuality(u8),

    #[error("Invalid image dimensions: {0}x{1}. Maximum allowed: {2}x{2}")]
    InvalidDimensions(u32, u32, u32),

    #[error("File too large: {0} bytes. Maximum allowed: {1} bytes")]
    FileTooLarge(u64, u64),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to create output directory: {0}")]
    DirectoryCreationFailed(PathBuf),

    #[error("No image files found in input path: {0}")]
    NoImageFilesFound(String),

    #[error("Walkdir error: {0}")]
    WalkdirError(#[from] walkdir::Error),

    #[error("Invalid glob pattern: {0}")]
    GlobPattern(#[from] glob::PatternError),

    #[error("Failed to save {0}: {1}")]
    SaveFailed(String, String),
}

pub type Result<T> = std::result::Result<T, SqueezeError>;
