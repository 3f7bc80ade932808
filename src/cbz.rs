//! Repackaging of ordered images into the final CBZ archive.
//!
//! Runs after order reconstruction: prunes images whose pages were filtered
//! out, renames the survivors into a contiguous zero-padded sequence,
//! special-cases the cover image, and writes everything into a flat zip
//! container at the resolved output path.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use memmap2::MmapOptions;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{Error, Result};
use crate::extractor::SourceArchive;
use crate::workspace::ScratchWorkspace;

/// Well-known cover file name inside the container's image directory.
pub const COVER_IMAGE: &str = "cover.jpg";
/// Output name for the cover; sorts before page `001`.
pub const COVER_IMAGE_RENAMED: &str = "000.jpg";
/// Extension of the generated archive.
pub const CBZ_EXTENSION: &str = "cbz";

/// Moves the workspace images into reading order and writes the output
/// archive, returning its path.
///
/// Each step is a hard precondition for the next: prune, rename, cover
/// handling, output-path resolution, overwrite, archive write.
pub fn repackage(
    workspace: &ScratchWorkspace,
    sequence: &[String],
    source: &SourceArchive,
    destination: Option<&Path>,
) -> Result<PathBuf> {
    rename_images(workspace, sequence)?;
    handle_cover_image(workspace)?;

    let output_path = resolve_output_path(source, destination)?;
    write_archive(&workspace.image_dir(), &output_path)?;

    Ok(output_path)
}

/// Prunes unreferenced images, then renames the ordered sequence to
/// zero-padded stems (`001`, `002`, ...) inside the image directory.
fn rename_images(workspace: &ScratchWorkspace, sequence: &[String]) -> Result<()> {
    let page_dir = workspace.page_dir();
    let image_dir = workspace.image_dir();

    // Image references are relative to the page-document directory,
    // typically "../image/moe-xxxxx.jpg"; only the basename matters for
    // deciding which files survive the prune.
    let mut keep: HashSet<String> = sequence
        .iter()
        .filter_map(|reference| {
            Path::new(reference)
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
        })
        .collect();

    if image_dir.join(COVER_IMAGE).exists() {
        keep.insert(COVER_IMAGE.to_string());
    }

    let mut removed = 0usize;
    if image_dir.exists() {
        for entry in fs::read_dir(&image_dir)? {
            let path = entry?.path();
            let name = match path.file_name() {
                Some(name) => name.to_string_lossy().into_owned(),
                None => continue,
            };
            if path.is_file() && !keep.contains(&name) {
                fs::remove_file(&path)?;
                log::debug!("Removed non-manga image: {}", name);
                removed += 1;
            }
        }
    }
    if removed > 0 {
        log::info!("Removed {} non-manga image(s)", removed);
    }

    for (index, reference) in sequence.iter().enumerate() {
        let resolved = page_dir.join(reference);
        if !resolved.exists() {
            return Err(Error::ImageNotFound(resolved));
        }

        let renamed = match resolved.extension().and_then(|e| e.to_str()) {
            Some(ext) => format!("{:03}.{}", index + 1, ext),
            None => format!("{:03}", index + 1),
        };
        let target = image_dir.join(&renamed);
        fs::rename(&resolved, &target)?;
        log::debug!("Renamed: {:?} -> {}", resolved.file_name(), renamed);
    }

    Ok(())
}

/// Renames the cover image to its fixed output name when present.
fn handle_cover_image(workspace: &ScratchWorkspace) -> Result<()> {
    let cover = workspace.image_dir().join(COVER_IMAGE);
    if cover.exists() {
        let renamed = workspace.image_dir().join(COVER_IMAGE_RENAMED);
        fs::rename(&cover, &renamed)?;
        log::debug!("Renamed cover: {} -> {}", COVER_IMAGE, COVER_IMAGE_RENAMED);
    }
    Ok(())
}

/// Resolves the output archive path from the source stem and an optional
/// destination directory.
///
/// No destination means the source's own directory. A relative destination
/// is resolved against the source's directory; an absolute one is used
/// as-is. A given destination is created if absent.
pub fn resolve_output_path(
    source: &SourceArchive,
    destination: Option<&Path>,
) -> Result<PathBuf> {
    let output_dir = match destination {
        None => source.parent(),
        Some(dir) => {
            let resolved = if dir.is_absolute() {
                dir.to_path_buf()
            } else {
                source.parent().join(dir)
            };
            fs::create_dir_all(&resolved)
                .map_err(|e| Error::InvalidOutputDirectory(resolved.clone(), e.to_string()))?;
            resolved
        }
    };

    Ok(output_dir.join(format!("{}.{}", source.stem(), CBZ_EXTENSION)))
}

/// Archives every file of the image directory into a new zip container at
/// `output_path`, overwriting any pre-existing file there.
fn write_archive(image_dir: &Path, output_path: &Path) -> Result<()> {
    if output_path.exists() {
        fs::remove_file(output_path)
            .map_err(|e| Error::CbzGeneration(format!("cannot replace existing file: {}", e)))?;
        log::debug!("Removed existing file: {:?}", output_path);
    }

    if !image_dir.exists() {
        return Err(Error::CbzGeneration(format!(
            "no images found in {:?}",
            image_dir
        )));
    }

    let mut images: Vec<PathBuf> = fs::read_dir(image_dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    if images.is_empty() {
        return Err(Error::CbzGeneration(format!(
            "no images found in {:?}",
            image_dir
        )));
    }
    images.sort();

    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o755);

    let file = File::create(output_path)
        .map_err(|e| Error::CbzGeneration(format!("failed to create archive: {}", e)))?;
    let mut zip = ZipWriter::new(file);

    for image in &images {
        let name = match image.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => continue,
        };
        let image_file = File::open(image)
            .map_err(|e| Error::CbzGeneration(format!("failed to read '{}': {}", name, e)))?;
        let mmap = unsafe { MmapOptions::new().map(&image_file) }
            .map_err(|e| Error::CbzGeneration(format!("failed to map '{}': {}", name, e)))?;

        zip.start_file(name, options)
            .map_err(|e| Error::CbzGeneration(format!("failed to create archive: {}", e)))?;
        zip.write_all(&mmap[..])
            .map_err(|e| Error::CbzGeneration(format!("failed to create archive: {}", e)))?;
    }

    zip.finish()
        .map_err(|e| Error::CbzGeneration(format!("failed to create archive: {}", e)))?;

    Ok(())
}
