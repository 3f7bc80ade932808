//! Batch file selection with wildcard expansion.
//!
//! Two independent wildcard grammars apply to the filename component of the
//! pattern, checked in precedence order:
//!
//! 1. `?` — numeric digit substitution: `book??.epub` probes `book00.epub`
//!    through `book99.epub` for existence. A dense bounded enumeration, not
//!    a directory glob.
//! 2. `*` — standard glob over the containing directory; bracket characters
//!    are neutralized to `*` since bracket expressions are not supported.
//!
//! Without wildcards the pattern is a literal path, included only when it
//! exists. A miss yields an empty selection, never an error.

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;

/// Wildcard character for numeric digit substitution.
const WILDCARD_QUESTION: char = '?';
/// Wildcard character for glob matching.
const WILDCARD_ASTERISK: char = '*';

/// Expands a user-supplied path pattern into the concrete list of source
/// archives to process. Enclosing quotes are stripped before interpretation.
pub fn select_files(pattern: &str) -> Vec<PathBuf> {
    let pattern = pattern.trim_matches('"');
    let path = Path::new(pattern);

    let name = match path.file_name().map(|n| n.to_string_lossy().into_owned()) {
        Some(name) => name,
        None => return existing_literal(path),
    };
    let parent = path.parent().unwrap_or_else(|| Path::new(""));

    if name.contains(WILDCARD_QUESTION) {
        probe_numeric(parent, &name)
    } else if name.contains(WILDCARD_ASTERISK) {
        glob_directory(parent, &name)
    } else {
        existing_literal(path)
    }
}

/// Probes every zero-padded numeric substitution of the `?` run, collecting
/// the paths that exist. The loop is unconditionally 10^N iterations.
fn probe_numeric(parent: &Path, name: &str) -> Vec<PathBuf> {
    let n = name.matches(WILDCARD_QUESTION).count();
    log::debug!("Processing '?' wildcard pattern with {} positions", n);

    let run: String = std::iter::repeat(WILDCARD_QUESTION).take(n).collect();
    let mut files = Vec::new();
    for i in 0..10u64.pow(n as u32) {
        let candidate = parent.join(name.replace(&run, &format!("{:0width$}", i, width = n)));
        if candidate.exists() {
            log::debug!("Found file: {:?}", candidate);
            files.push(candidate);
        }
    }
    files
}

/// Expands a `*` pattern against the containing directory listing. Bracket
/// characters are neutralized to `*` first, and results are name-sorted for
/// deterministic selection.
fn glob_directory(parent: &Path, name: &str) -> Vec<PathBuf> {
    log::debug!("Processing '*' wildcard pattern");

    let normalized = name.replace(['[', ']'], "*").replace("**", "*");
    let regex = glob_to_regex(&normalized);

    let scan_dir = if parent.as_os_str().is_empty() {
        Path::new(".")
    } else {
        parent
    };
    let entries = match fs::read_dir(scan_dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!("Cannot read directory {:?}: {}", scan_dir, e);
            return Vec::new();
        }
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| regex.is_match(&entry.file_name().to_string_lossy()))
        .map(|entry| parent.join(entry.file_name()))
        .collect();
    files.sort();

    log::debug!("Found {} files matching pattern", files.len());
    files
}

/// Translates a `*`-only glob into an anchored regex.
fn glob_to_regex(pattern: &str) -> Regex {
    let body: String = pattern
        .split(WILDCARD_ASTERISK)
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(".*");
    Regex::new(&format!("^{}$", body)).expect("escaped glob pattern is a valid regex")
}

fn existing_literal(path: &Path) -> Vec<PathBuf> {
    if path.exists() {
        vec![path.to_path_buf()]
    } else {
        log::warn!("File not found: {:?}", path);
        Vec::new()
    }
}
