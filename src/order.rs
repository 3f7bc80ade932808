//! Reading-order reconstruction from parsed page records.
//!
//! The container stores pages as an unordered set of documents; the only
//! ordering information is the ordinal parsed from each content page. This
//! module rebuilds the full sequence and refuses to proceed when the set of
//! observed ordinals does not cover 1..=max exactly.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::pages::PageRecord;

/// Aggregates content records into a complete, gap-free ordered sequence of
/// image references (index 0 is reading-order page 1).
///
/// Records lacking an image reference are treated as absent. On ordinal
/// collision the last record wins, matching the publisher tooling this
/// replaces; a duplicate can therefore mask a genuinely missing page when
/// it hides the gap from the coverage check.
///
/// Fails with [`Error::PageParsing`] when no usable content records exist
/// or when the distinct-ordinal count differs from the maximum ordinal.
pub fn reconstruct(records: &[PageRecord]) -> Result<Vec<String>> {
    let mut by_ordinal: HashMap<u32, &str> = HashMap::new();
    for record in records {
        if let Some(image) = record.image.as_deref() {
            by_ordinal.insert(record.ordinal, image);
        }
    }

    let Some(&largest) = by_ordinal.keys().max() else {
        return Err(Error::PageParsing(
            "no valid pages found in HTML files".to_string(),
        ));
    };
    if by_ordinal.len() as u32 != largest {
        return Err(Error::PageParsing(format!(
            "missing pages detected. Found {} pages, expected {}",
            by_ordinal.len(),
            largest
        )));
    }

    (1..=largest)
        .map(|ordinal| {
            by_ordinal
                .get(&ordinal)
                .map(|image| image.to_string())
                .ok_or_else(|| {
                    Error::PageParsing(format!("missing pages detected. No page {}", ordinal))
                })
        })
        .collect()
}
