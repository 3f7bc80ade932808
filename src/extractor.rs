//! Source archive validation and extraction.
//!
//! The ePub container is treated as a plain zip archive: validation covers
//! only what is needed to get the page documents and images onto disk, not
//! ePub conformance.

use std::fs::File;
use std::path::{Path, PathBuf};

use zip::ZipArchive;

use crate::error::{Error, Result};
use crate::workspace::ScratchWorkspace;

/// File extension expected on source archives.
pub const EPUB_EXTENSION: &str = "epub";

/// A validated source archive path.
///
/// Validation happens once, before any I/O side effects; afterwards the
/// archive is only ever read.
#[derive(Debug, Clone)]
pub struct SourceArchive {
    path: PathBuf,
}

impl SourceArchive {
    /// Validates that `path` exists, is a regular file, and carries the
    /// `.epub` extension.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if !path.exists() {
            return Err(Error::InvalidSource(path, "file not found".to_string()));
        }
        if !path.is_file() {
            return Err(Error::InvalidSource(
                path,
                "path is not a regular file".to_string(),
            ));
        }
        if path.extension().and_then(|e| e.to_str()) != Some(EPUB_EXTENSION) {
            return Err(Error::InvalidSource(
                path,
                format!("file must have the .{} extension", EPUB_EXTENSION),
            ));
        }

        log::info!("Validated source archive: {:?}", path);
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The source file name without its extension, used as the output stem.
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// The directory containing the source archive.
    pub fn parent(&self) -> PathBuf {
        self.path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Unpacks the archive into a fresh scratch workspace, preserving the
/// container's internal directory structure.
///
/// The caller owns the returned workspace and with it the teardown of the
/// extracted tree.
pub fn extract(source: &SourceArchive) -> Result<ScratchWorkspace> {
    let workspace = ScratchWorkspace::create()?;

    let file = File::open(source.path())
        .map_err(|e| Error::Extraction(source.path().to_path_buf(), e.to_string()))?;
    let mut archive = ZipArchive::new(file).map_err(|e| {
        Error::Extraction(
            source.path().to_path_buf(),
            format!("invalid or corrupted ePub file: {}", e),
        )
    })?;
    archive
        .extract(workspace.root())
        .map_err(|e| Error::Extraction(source.path().to_path_buf(), e.to_string()))?;

    log::debug!("Extracted {:?} to {:?}", source.path(), workspace.root());
    Ok(workspace)
}
