//! Common test utilities for the koxcbz crate.
//!
//! Provides unique per-test directories under `tests/tmp` and a fixture
//! builder that writes real ePub zip containers in the publisher's layout
//! (an `html/` document per page plus an `image/` subtree).

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use rand::{Rng, distributions::Alphanumeric};
use zip::ZipArchive;
use zip::write::SimpleFileOptions;

#[allow(dead_code)]
pub const TEST_TMP_DIR: &str = "tests/tmp";

/// Creates a clean, uniquely-named test directory under `tests/tmp`.
#[allow(dead_code)]
pub fn setup_test_dir(sub_path: &str) -> PathBuf {
    let rand_string: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(8)
        .map(char::from)
        .collect();
    let test_dir = PathBuf::from(TEST_TMP_DIR).join(format!("{}-{}", sub_path, rand_string));
    if test_dir.exists() {
        fs::remove_dir_all(&test_dir).unwrap();
    }
    fs::create_dir_all(&test_dir).unwrap();
    test_dir
}

/// Declarative builder for fixture ePub archives.
///
/// ```ignore
/// EpubFixture::with_pages(3).cover().watermark().write_to(&path);
/// ```
#[allow(dead_code)]
#[derive(Default)]
pub struct EpubFixture {
    pages: Vec<(u32, Option<String>)>,
    cover: bool,
    watermark: bool,
    stray_images: Vec<String>,
    skip_images: Vec<String>,
}

#[allow(dead_code)]
impl EpubFixture {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fixture with content pages 1..=n, each referencing `moe-NNNN.jpg`.
    pub fn with_pages(n: u32) -> Self {
        let mut fixture = Self::new();
        for ordinal in 1..=n {
            fixture = fixture.page(ordinal);
        }
        fixture
    }

    pub fn page(mut self, ordinal: u32) -> Self {
        self.pages
            .push((ordinal, Some(format!("moe-{:04}.jpg", ordinal))));
        self
    }

    /// A content page whose document carries no image reference.
    pub fn page_without_image(mut self, ordinal: u32) -> Self {
        self.pages.push((ordinal, None));
        self
    }

    pub fn cover(mut self) -> Self {
        self.cover = true;
        self
    }

    /// Adds a publisher watermark page: an image tag but no page-number title.
    pub fn watermark(mut self) -> Self {
        self.watermark = true;
        self
    }

    /// Adds an image file that no page document references.
    pub fn stray_image(mut self, name: &str) -> Self {
        self.stray_images.push(name.to_string());
        self
    }

    /// Referenced by its page document, but the image entry is not written.
    pub fn skip_image(mut self, name: &str) -> Self {
        self.skip_images.push(name.to_string());
        self
    }

    pub fn write_to(&self, path: &Path) {
        let file = File::create(path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        let options = SimpleFileOptions::default();

        for (ordinal, image) in &self.pages {
            let body = match image {
                Some(image) => format!(
                    "<html><head><title>第 {} 頁</title></head>\n\
                     <body><img src=\"../image/{}\"></body></html>",
                    ordinal, image
                ),
                None => format!(
                    "<html><head><title>第 {} 頁</title></head><body></body></html>",
                    ordinal
                ),
            };
            zip.start_file(format!("html/{}.html", ordinal), options)
                .unwrap();
            zip.write_all(body.as_bytes()).unwrap();

            if let Some(image) = image {
                if !self.skip_images.contains(image) {
                    zip.start_file(format!("image/{}", image), options).unwrap();
                    zip.write_all(fake_jpeg(*ordinal).as_slice()).unwrap();
                }
            }
        }

        if self.watermark {
            zip.start_file("html/kox.html", options).unwrap();
            zip.write_all(
                b"<html><head><title>Kox.moe - read manga online</title></head>\n\
                  <body><img src=\"../image/watermark.jpg\"></body></html>",
            )
            .unwrap();
            zip.start_file("image/watermark.jpg", options).unwrap();
            zip.write_all(fake_jpeg(9000).as_slice()).unwrap();
        }

        if self.cover {
            zip.start_file("image/cover.jpg", options).unwrap();
            zip.write_all(fake_jpeg(0).as_slice()).unwrap();
        }

        for stray in &self.stray_images {
            zip.start_file(format!("image/{}", stray), options).unwrap();
            zip.write_all(fake_jpeg(9001).as_slice()).unwrap();
        }

        zip.finish().unwrap();
    }
}

/// A few bytes that look vaguely like JPEG data; content is irrelevant to
/// the structural pipeline.
#[allow(dead_code)]
fn fake_jpeg(seed: u32) -> Vec<u8> {
    let mut data = vec![0xFF, 0xD8, 0xFF, 0xE0];
    data.extend_from_slice(seed.to_be_bytes().as_slice());
    data.extend_from_slice(b"fixture image payload");
    data
}

/// Writes a file that is not a valid zip container.
#[allow(dead_code)]
pub fn write_corrupt_epub(path: &Path) {
    fs::write(path, b"this is not a zip archive").unwrap();
}

/// Lists the entry names of a generated archive, sorted.
#[allow(dead_code)]
pub fn cbz_entries(path: &Path) -> Vec<String> {
    let file = File::open(path).unwrap();
    let archive = ZipArchive::new(file).unwrap();
    let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
    names.sort();
    names
}
