//! The conversion pipeline: one source archive in, one CBZ out.

use std::path::{Path, PathBuf};

use crate::cbz;
use crate::error::Result;
use crate::extractor::{self, SourceArchive};
use crate::order;
use crate::pages;

/// Converts a single Kox.moe ePub archive to CBZ format.
///
/// The archive is extracted to a scratch workspace, page documents are
/// parsed to recover reading order, and the images are repackaged into a
/// CBZ next to the source (or under a caller-specified directory).
///
/// # Example
///
/// ```rust,no_run
/// use koxcbz::Converter;
///
/// # fn main() -> koxcbz::error::Result<()> {
/// let converter = Converter::new("path/to/book.epub")?;
/// let output = converter.convert(None)?;
/// println!("wrote {:?}", output);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Converter {
    source: SourceArchive,
}

impl Converter {
    /// Validates the source archive. Fails before any I/O side effects when
    /// the path is missing, not a regular file, or not an `.epub`.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            source: SourceArchive::new(path)?,
        })
    }

    pub fn source(&self) -> &SourceArchive {
        &self.source
    }

    /// Runs the full pipeline and returns the generated CBZ path.
    ///
    /// Each stage feeds the next: extraction, page parsing, order
    /// reconstruction, repackaging. The scratch workspace is dropped as the
    /// very last step, on the error paths as much as on success.
    pub fn convert(&self, destination: Option<&Path>) -> Result<PathBuf> {
        log::info!("Starting conversion: {:?}", self.source.path().file_name());

        let workspace = extractor::extract(&self.source)?;

        let records = pages::collect_page_records(&workspace.page_dir())?;
        let sequence = order::reconstruct(&records)?;
        log::info!("Found {} pages", sequence.len());

        let output = cbz::repackage(&workspace, &sequence, &self.source, destination)?;
        log::info!("CBZ generated: {:?}", output);

        Ok(output)
    }
}
