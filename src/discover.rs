//! Source file enumeration for one category directory.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::{CategorySpec, MANIFEST_FILENAME, SOURCE_EXTENSION};
use crate::contract::CombineFailure;

/// Lists the source files of `category` in `source_dir`, sorted by file name.
///
/// The category's own combined output and the manifest are never sources.
/// The returned order decides which file wins a duplicate id.
pub fn discover_sources(
    category: &CategorySpec,
    source_dir: &Path,
) -> Result<Vec<PathBuf>, CombineFailure> {
    if !source_dir.is_dir() {
        warn!(category = %category.name, path = %source_dir.display(), "Category directory not found");
        return Err(CombineFailure::DirectoryNotFound {
            category: category.name.clone(),
            path: source_dir.to_path_buf(),
        });
    }

    let output_filename = category.output_filename();
    let suffix = format!(".{SOURCE_EXTENSION}");

    let entries = fs::read_dir(source_dir).map_err(|e| CombineFailure::DirectoryUnreadable {
        category: category.name.clone(),
        path: source_dir.to_path_buf(),
        source: e,
    })?;

    let mut files = Vec::new();
    for entry_res in entries {
        let entry = match entry_res {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = ?e, path = %source_dir.display(), "Skipping unreadable directory entry");
                continue;
            }
        };
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();
        if !name.ends_with(&suffix) || !path.is_file() {
            continue;
        }
        if name == output_filename || name == MANIFEST_FILENAME {
            debug!(file = %name, "Skipping combined output or manifest");
            continue;
        }
        files.push(path);
    }

    if files.is_empty() {
        return Err(CombineFailure::NoSourceFiles {
            category: category.name.clone(),
            path: source_dir.to_path_buf(),
        });
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    info!(category = %category.name, count = files.len(), "Discovered source files");
    Ok(files)
}
