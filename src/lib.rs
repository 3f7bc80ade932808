//! koxcbz - Kox.moe ePub to CBZ conversion library
//!
//! This crate converts the publisher's ePub-packaged comic archives into CBZ
//! (zip-of-images) archives. Each source ePub contains one HTML document per
//! page and an unordered set of image files; the converter recovers the
//! canonical reading order from the page-number metadata embedded in the
//! document titles, filters out watermark and ad pages, and re-emits the
//! images as a contiguous zero-padded sequence inside a new archive.
//!
//! # Getting Started
//!
//! Convert a single file with [`Converter`]:
//!
//! ```rust,no_run
//! use koxcbz::Converter;
//!
//! # fn main() -> koxcbz::error::Result<()> {
//! let output = Converter::new("book.epub")?.convert(None)?;
//! println!("wrote {:?}", output);
//! # Ok(())
//! # }
//! ```
//!
//! Or drive a whole batch, with wildcard selection and a worker pool:
//!
//! ```rust,no_run
//! use koxcbz::batch::{self, BatchConfig, NullReporter};
//!
//! # fn main() -> koxcbz::error::Result<()> {
//! let config = BatchConfig::builder()
//!     .pattern("book??.epub")
//!     .jobs(-1)
//!     .build()?;
//! let summary = batch::run_batch(&config, &NullReporter)?;
//! println!("{} converted, {} failed", summary.succeeded, summary.failed);
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod cbz;
pub mod converter;
pub mod error;
pub mod extractor;
pub mod order;
pub mod pages;
pub mod selector;
pub mod workspace;

pub use converter::Converter;
pub use extractor::SourceArchive;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::batch::{BatchConfig, BatchSummary, ConversionReport, ProgressReporter};
    pub use crate::converter::Converter;
    pub use crate::error::{Error, Result};
    pub use crate::extractor::SourceArchive;
    pub use crate::pages::{PageClassification, PageRecord};
    pub use crate::workspace::ScratchWorkspace;
    pub use std::path::{Path, PathBuf};
}
