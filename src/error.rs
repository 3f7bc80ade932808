//! Custom error types and result handling for conversion operations.
//!
//! Every fallible operation in this crate returns a [`Result<T>`], a type
//! alias for `std::result::Result<T, Error>`. Each conversion failure mode
//! is a distinct variant so the batch driver can report it without guessing.
use std::path::PathBuf;

/// Type alias for Results with conversion errors.
pub type Result<T> = std::result::Result<T, Error>;

/// Comprehensive error type for all conversion operations.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O errors from the standard library
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Batch configuration builder errors
    #[error(transparent)]
    Config(#[from] crate::batch::BatchConfigBuilderError),
    /// The source archive is missing, not a regular file, or not an ePub
    #[error("invalid source file '{0}': {1}")]
    InvalidSource(PathBuf, String),
    /// The source archive is not a valid zip container, or unpacking failed
    #[error("failed to extract '{0}': {1}")]
    Extraction(PathBuf, String),
    /// No content pages were found, or the page ordinals do not cover 1..=max
    #[error("page parsing failed: {0}")]
    PageParsing(String),
    /// An image referenced by a page document is absent at rename time
    #[error("image file not found: {0}")]
    ImageNotFound(PathBuf),
    /// The destination image set is empty, or writing the archive failed
    #[error("CBZ generation failed: {0}")]
    CbzGeneration(String),
    /// The destination directory cannot be created
    #[error("cannot create output directory '{0}': {1}")]
    InvalidOutputDirectory(PathBuf, String),
}
