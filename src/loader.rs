// 📂 File Loader - register file in, listings plus skip diagnostics out

use crate::listing::Listing;
use crate::parser::{LineParser, ParseFailure};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use thiserror::Error;

// ============================================================================
// LOAD ERRORS
// ============================================================================

/// File-level failures. Unlike per-line problems, these abort the load
/// and propagate to the caller.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("data file not found: {path}")]
    NotFound { path: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

// ============================================================================
// LOAD REPORT
// ============================================================================

/// A line that was read but produced no listing.
#[derive(Debug, Clone)]
pub struct SkippedLine {
    /// 1-based physical line number, blank lines included in the count.
    pub line_no: usize,
    /// The trimmed line content.
    pub content: String,
    pub reason: ParseFailure,
}

/// Outcome of one load: the listings in file order, and what got skipped.
#[derive(Debug)]
pub struct LoadReport {
    pub listings: Vec<Listing>,
    pub skipped: Vec<SkippedLine>,
}

// ============================================================================
// LOADING
// ============================================================================

/// Load listings from a register file.
///
/// A missing file is its own error variant so the caller can tell "wrong
/// path" from a genuine read failure. Everything below the file level is
/// non-fatal: see [`load_from_reader`].
pub fn load_file(path: &Path) -> Result<LoadReport, LoadError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => LoadError::NotFound {
            path: path.display().to_string(),
        },
        _ => LoadError::Io {
            path: path.display().to_string(),
            source: e,
        },
    })?;

    load_from_reader(BufReader::new(file)).map_err(|e| LoadError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

/// The I/O-free core of the load: parse lines from any buffered reader.
///
/// Blank lines are skipped silently. A line that fails to parse gets one
/// warning on stderr and an entry in the report, and the load carries on.
/// Listings come back in file order.
pub fn load_from_reader<R: BufRead>(reader: R) -> io::Result<LoadReport> {
    let parser = LineParser::new();
    let mut listings = Vec::new();
    let mut skipped = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match parser.parse_line(trimmed) {
            Ok(listing) => listings.push(listing),
            Err(reason) => {
                let line_no = idx + 1;
                eprintln!("⚠ Line {} skipped: {}", line_no, reason);
                skipped.push(SkippedLine {
                    line_no,
                    content: trimmed.to_string(),
                    reason,
                });
            }
        }
    }

    Ok(LoadReport { listings, skipped })
}

// ============================================================================
// SOURCE TRAIT
// ============================================================================

/// Anything that can produce a batch of listings.
///
/// The registry pulls from a source without caring whether the lines come
/// from a file on disk or a fixture in a test.
pub trait ListingSource {
    fn read(&self) -> Result<LoadReport, LoadError>;
}

/// The standard source: a UTF-8 text file, one record per line.
pub struct FileSource {
    path: std::path::PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        FileSource { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ListingSource for FileSource {
    fn read(&self) -> Result<LoadReport, LoadError> {
        load_file(&self.path)
    }
}

// ============================================================================
// TESTS
// ============================================================================
