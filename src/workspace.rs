//! Scratch workspace management for a single conversion.
//!
//! Each conversion extracts its source archive into an exclusively-owned
//! temporary directory. The workspace is created fresh per conversion and
//! removed when dropped, so teardown happens exactly once regardless of
//! which pipeline stage failed — and uniquely-named directories keep
//! parallel conversions from colliding.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::error::Result;

/// Directory inside the ePub container holding one HTML document per page.
pub const PAGE_DIR: &str = "html";
/// Directory inside the ePub container holding the image files.
pub const IMAGE_DIR: &str = "image";

/// An isolated extraction directory owned by exactly one conversion.
///
/// Dropping the workspace removes the directory tree. Pipeline stages borrow
/// paths from it; none of them take over its lifecycle.
#[derive(Debug)]
pub struct ScratchWorkspace {
    dir: TempDir,
}

impl ScratchWorkspace {
    /// Allocates a fresh, uniquely-named scratch directory.
    pub fn create() -> Result<Self> {
        let dir = TempDir::with_prefix("koxcbz-")?;
        log::debug!("Created scratch workspace: {:?}", dir.path());
        Ok(Self { dir })
    }

    /// Root of the extracted container tree.
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// The page-document subtree (`html/`).
    pub fn page_dir(&self) -> PathBuf {
        self.dir.path().join(PAGE_DIR)
    }

    /// The image subtree (`image/`).
    pub fn image_dir(&self) -> PathBuf {
        self.dir.path().join(IMAGE_DIR)
    }
}
