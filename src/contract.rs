//! # contract: shared types for the combine pipeline
//!
//! This module holds the plain data and trait definitions every pipeline stage
//! agrees on: the declared shape of a category's source files, the per-file
//! diagnostics collected while merging, the fatal per-category failures, and
//! the [`OutputWriter`] seam used to persist combined documents.
//!
//! ## Error severities
//! - [`ErrorRecord`] is non-fatal. Records are accumulated while merging and
//!   reported as a batch; they never stop processing of later files or items.
//! - [`CombineFailure`] is fatal for one category. It aborts that category but
//!   never a batch run over other categories.
//!
//! ## Mocking & Testing
//! - [`OutputWriter`] is annotated for `mockall`, so tests can assert which
//!   destinations were written and simulate write failures.

use std::io;
use std::path::{Path, PathBuf};

#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;
use thiserror::Error;

/// Declared top-level shape of the JSON files in a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceShape {
    /// Each file holds a single item object.
    Object,
    /// Each file holds an array of item objects.
    Array,
}

impl SourceShape {
    pub fn from_array_flag(is_array_format: bool) -> Self {
        if is_array_format {
            SourceShape::Array
        } else {
            SourceShape::Object
        }
    }

    pub fn is_array(self) -> bool {
        matches!(self, SourceShape::Array)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SourceShape::Object => "object",
            SourceShape::Array => "array",
        }
    }
}

/// A non-fatal diagnostic tied to one source file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorRecord {
    #[error("{file}: Invalid JSON - {detail}")]
    InvalidJson { file: String, detail: String },

    #[error("{file}: Error reading file - {detail}")]
    Unreadable { file: String, detail: String },

    #[error("{file}: Missing 'id' field or invalid structure")]
    InvalidItem { file: String },

    #[error("{file}: Duplicate {kind} ID '{id}' (already loaded from {first_file})")]
    DuplicateId {
        file: String,
        /// Singular form of the category, e.g. `item` for `items`.
        kind: String,
        id: String,
        first_file: String,
    },
}

impl ErrorRecord {
    /// Name of the source file the diagnostic refers to.
    pub fn file(&self) -> &str {
        match self {
            ErrorRecord::InvalidJson { file, .. }
            | ErrorRecord::Unreadable { file, .. }
            | ErrorRecord::InvalidItem { file }
            | ErrorRecord::DuplicateId { file, .. } => file,
        }
    }
}

/// A fatal outcome for a single category run.
#[derive(Debug, Error)]
pub enum CombineFailure {
    #[error("{category} directory not found: {}", path.display())]
    DirectoryNotFound { category: String, path: PathBuf },

    #[error("could not list {category} directory {}: {source}", path.display())]
    DirectoryUnreadable {
        category: String,
        path: PathBuf,
        source: io::Error,
    },

    #[error("No {category} JSON files found in {}", path.display())]
    NoSourceFiles { category: String, path: PathBuf },

    #[error("No valid {category} to combine")]
    NoValidItems { category: String },

    #[error("could not serialize combined {category}: {source}")]
    Serialize {
        category: String,
        source: serde_json::Error,
    },

    #[error("writing output file {} failed: {source}", path.display())]
    WriteFailed { path: PathBuf, source: io::Error },
}

/// Destination for combined documents.
///
/// The filesystem implementation lives in [`crate::output::FsOutputWriter`];
/// tests substitute the generated `MockOutputWriter`.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
pub trait OutputWriter {
    /// Whether `dir` exists and may receive a copy of the output.
    fn dir_exists(&self, dir: &Path) -> bool;

    /// Write `contents` to `path`, replacing any previous file.
    /// Returns the number of bytes on disk after the write.
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<u64>;
}
