//! Persisting combined documents to the canonical and public locations.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

use crate::contract::{CombineFailure, OutputWriter};

/// Writes to the local filesystem, creating parent directories as needed.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsOutputWriter;

impl OutputWriter for FsOutputWriter {
    fn dir_exists(&self, dir: &Path) -> bool {
        dir.is_dir()
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<u64> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, contents)?;
        Ok(fs::metadata(path)?.len())
    }
}

/// Where a combined document ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenOutputs {
    pub primary: PathBuf,
    pub primary_bytes: u64,
    /// Set when the public directory existed and received a copy.
    pub public: Option<PathBuf>,
}

/// Writes `contents` to the canonical `primary` path.
pub fn write_primary<W: OutputWriter + ?Sized>(
    writer: &W,
    contents: &[u8],
    primary: &Path,
) -> Result<WrittenOutputs, CombineFailure> {
    let primary_bytes = writer.write(primary, contents).map_err(|e| {
        error!(error = ?e, path = %primary.display(), "Failed to write combined output");
        CombineFailure::WriteFailed {
            path: primary.to_path_buf(),
            source: e,
        }
    })?;
    info!(path = %primary.display(), bytes = primary_bytes, "Wrote combined output");

    Ok(WrittenOutputs {
        primary: primary.to_path_buf(),
        primary_bytes,
        public: None,
    })
}

/// Copies `contents` to `public_dir/<filename>` if that directory exists and
/// records the copy in `written`. A missing public directory is skipped silently.
///
/// Not atomic with the primary write; rerunning resynchronises them.
pub fn copy_to_public<W: OutputWriter + ?Sized>(
    writer: &W,
    contents: &[u8],
    public_dir: &Path,
    filename: &str,
    written: &mut WrittenOutputs,
) -> Result<(), CombineFailure> {
    if !writer.dir_exists(public_dir) {
        debug!(path = %public_dir.display(), "Public directory absent, skipping copy");
        return Ok(());
    }

    let public_path = public_dir.join(filename);
    writer.write(&public_path, contents).map_err(|e| {
        error!(error = ?e, path = %public_path.display(), "Failed to write public copy");
        CombineFailure::WriteFailed {
            path: public_path.clone(),
            source: e,
        }
    })?;
    info!(path = %public_path.display(), "Wrote public copy");

    written.public = Some(public_path);
    Ok(())
}
