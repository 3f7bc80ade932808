//! Page-document parsing and content classification.
//!
//! Each page of the container is described by one HTML document. The
//! documents are scanned line by line rather than parsed structurally —
//! the publisher's markup is not always well-formed, and the two signals
//! we need (a page-number title and an image source) are line-local.
//!
//! A document whose title carries the page-number phrase `第 N 頁` is a
//! content page; anything else (site watermarks, promotional inserts) is
//! filtered out. The filter is an allow-list, not an error path.

use std::fs;
use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{Error, Result};

/// Extension of the per-page documents inside the container.
pub const PAGE_DOCUMENT_EXTENSION: &str = "html";

lazy_static! {
    /// Matches the bilingual page numbering in a title, e.g. `<title>第 3 頁</title>`.
    static ref PAGE_NUMBER_REGEX: Regex = Regex::new(r"<title>第\s*(\d+)\s*頁</title>").unwrap();
    /// Captures the `src` attribute of an image element.
    static ref IMAGE_SRC_REGEX: Regex = Regex::new(r#"<img\s+[^>]*src="([^"]+)""#).unwrap();
    /// Captures a full title for diagnostics on filtered pages.
    static ref TITLE_REGEX: Regex = Regex::new(r"<title>(.*?)</title>").unwrap();
}

/// One parsed content page: its reading-order ordinal and, when the
/// document carried one, the relative reference to its image file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRecord {
    pub ordinal: u32,
    pub image: Option<String>,
}

/// Outcome of classifying a single page document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageClassification {
    /// The title matched the page-number pattern.
    Content(PageRecord),
    /// The title did not match; typically a watermark or ad page.
    NonContent,
    /// The document could not be opened or read.
    Unreadable,
}

/// Classifies one page document by scanning its text for a page-number
/// title and an image source attribute.
///
/// The two signals are independent: a content page may lack an image
/// reference, and a watermark page may carry an image tag yet still be
/// classified [`PageClassification::NonContent`] because its title does
/// not match. Read failures are absorbed as [`PageClassification::Unreadable`]
/// so a single corrupt page never aborts a batch.
pub fn classify_page(document: &Path) -> PageClassification {
    let text = match fs::read_to_string(document) {
        Ok(text) => text,
        Err(e) => {
            log::warn!("Failed to parse {:?}: {}", document.file_name(), e);
            return PageClassification::Unreadable;
        }
    };

    let mut ordinal: Option<u32> = None;
    let mut image: Option<String> = None;
    let mut title: Option<String> = None;

    for line in text.lines() {
        if line.contains("<title>") {
            if let Some(captures) = TITLE_REGEX.captures(line) {
                title = Some(captures[1].to_string());
            }
            if let Some(captures) = PAGE_NUMBER_REGEX.captures(line) {
                ordinal = captures[1].parse().ok();
            }
        }
        if line.contains("<img") {
            if let Some(captures) = IMAGE_SRC_REGEX.captures(line) {
                image = Some(captures[1].to_string());
            }
        }
    }

    match ordinal {
        Some(ordinal) => PageClassification::Content(PageRecord { ordinal, image }),
        None => {
            if let Some(title) = title {
                log::debug!(
                    "Filtering out non-content page: {:?} (title: {})",
                    document.file_name(),
                    title
                );
            }
            PageClassification::NonContent
        }
    }
}

/// Scans the page-document directory and classifies every `.html` document,
/// returning the content records in discovery order.
///
/// Non-content and unreadable documents are counted and logged, never
/// raised. Fails with [`Error::PageParsing`] when the directory is missing
/// or contains no page documents at all.
pub fn collect_page_records(page_dir: &Path) -> Result<Vec<PageRecord>> {
    if !page_dir.exists() {
        return Err(Error::PageParsing(format!(
            "HTML directory not found: {:?}",
            page_dir
        )));
    }

    let mut documents: Vec<_> = fs::read_dir(page_dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path.extension().and_then(|e| e.to_str()) == Some(PAGE_DOCUMENT_EXTENSION)
        })
        .collect();
    documents.sort();

    if documents.is_empty() {
        return Err(Error::PageParsing(format!(
            "no HTML files found in: {:?}",
            page_dir
        )));
    }

    log::debug!("Parsing {} HTML files", documents.len());

    let mut records = Vec::new();
    let mut filtered = 0usize;
    for document in &documents {
        match classify_page(document) {
            PageClassification::Content(record) => {
                log::debug!("Page {}: {:?}", record.ordinal, record.image);
                records.push(record);
            }
            PageClassification::NonContent | PageClassification::Unreadable => filtered += 1,
        }
    }

    if filtered > 0 {
        log::info!("Filtered out {} non-content page(s)", filtered);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_doc(dir: &Path, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn content_page_yields_ordinal_and_image() {
        let dir = tempfile::tempdir().unwrap();
        let doc = write_doc(
            dir.path(),
            "3.html",
            "<html><head><title>第 3 頁</title></head>\n\
             <body><img src=\"../image/moe-abc123.jpg\"></body></html>",
        );

        assert_eq!(
            classify_page(&doc),
            PageClassification::Content(PageRecord {
                ordinal: 3,
                image: Some("../image/moe-abc123.jpg".to_string()),
            })
        );
    }

    #[test]
    fn page_number_without_spaces_still_matches() {
        let dir = tempfile::tempdir().unwrap();
        let doc = write_doc(
            dir.path(),
            "12.html",
            "<title>第12頁</title>\n<img src=\"../image/p12.png\">",
        );

        match classify_page(&doc) {
            PageClassification::Content(record) => assert_eq!(record.ordinal, 12),
            other => panic!("expected content page, got {:?}", other),
        }
    }

    #[test]
    fn watermark_page_with_image_is_non_content() {
        let dir = tempfile::tempdir().unwrap();
        let doc = write_doc(
            dir.path(),
            "ad.html",
            "<title>Kox.moe - best manga site</title>\n\
             <img src=\"../image/watermark.jpg\">",
        );

        assert_eq!(classify_page(&doc), PageClassification::NonContent);
    }

    #[test]
    fn content_page_without_image_keeps_null_reference() {
        let dir = tempfile::tempdir().unwrap();
        let doc = write_doc(dir.path(), "5.html", "<title>第 5 頁</title>");

        assert_eq!(
            classify_page(&doc),
            PageClassification::Content(PageRecord {
                ordinal: 5,
                image: None,
            })
        );
    }

    #[test]
    fn missing_document_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let doc = dir.path().join("gone.html");
        assert_eq!(classify_page(&doc), PageClassification::Unreadable);
    }

    #[test]
    fn collect_fails_on_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let result = collect_page_records(&dir.path().join("html"));
        assert!(matches!(result, Err(Error::PageParsing(_))));
    }

    #[test]
    fn collect_fails_on_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        let result = collect_page_records(dir.path());
        assert!(matches!(result, Err(Error::PageParsing(_))));
    }

    #[test]
    fn collect_skips_non_html_files() {
        let dir = tempfile::tempdir().unwrap();
        write_doc(
            dir.path(),
            "1.html",
            "<title>第 1 頁</title>\n<img src=\"../image/a.jpg\">",
        );
        write_doc(dir.path(), "styles.css", "body {}");

        let records = collect_page_records(dir.path()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].ordinal, 1);
    }
}
