//! File I/O primitives with consistent error handling.

use crate::error::{Error, Result};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Expand a leading `~` in a user-supplied path.
pub fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).to_string())
}

/// Read file contents with standardized error handling.
pub fn read_file(path: &Path, operation: &str) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| Error::internal_io(e.to_string(), Some(operation.to_string())))
}

/// Open the source of a run for buffered reading.
///
/// A missing file is reported as `source.not_found` rather than an I/O error,
/// before anything is created or written.
pub fn open_source(path: &Path) -> Result<BufReader<File>> {
    if !path.is_file() {
        return Err(Error::source_not_found(path.display().to_string()));
    }

    let file = File::open(path).map_err(|e| {
        Error::internal_io(e.to_string(), Some(format!("open {}", path.display())))
    })?;
    Ok(BufReader::new(file))
}

/// Create (or truncate) a destination file.
pub fn create_destination(path: &Path) -> Result<File> {
    File::create(path).map_err(|e| {
        Error::internal_io(e.to_string(), Some(format!("create {}", path.display())))
    })
}

/// Whether two paths name the same existing file. Hard links and symlinks
/// to one file count as the same file.
#[cfg(unix)]
pub fn same_file(a: &Path, b: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;

    match (fs::metadata(a), fs::metadata(b)) {
        (Ok(a), Ok(b)) => a.dev() == b.dev() && a.ino() == b.ino(),
        _ => false,
    }
}

#[cfg(not(unix))]
pub fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Follow symlinks to the file an in-place rewrite must replace.
pub fn resolve_target(path: &Path) -> Result<PathBuf> {
    fs::canonicalize(path).map_err(|e| {
        Error::internal_io(e.to_string(), Some(format!("resolve {}", path.display())))
    })
}

/// Temporary file in the same directory as `path`, so the final rename stays
/// on one filesystem.
pub fn temp_beside(path: &Path) -> Result<NamedTempFile> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    NamedTempFile::new_in(parent).map_err(|e| {
        Error::internal_io(
            e.to_string(),
            Some(format!("create temp file in {}", parent.display())),
        )
    })
}

/// Atomically move a finished temp file over `path`, keeping the
/// permissions `path` had.
pub fn persist(temp: NamedTempFile, path: &Path) -> Result<()> {
    if let Ok(metadata) = fs::metadata(path) {
        fs::set_permissions(temp.path(), metadata.permissions()).map_err(|e| {
            Error::internal_io(
                e.to_string(),
                Some(format!("copy permissions of {}", path.display())),
            )
        })?;
    }

    temp.persist(path).map_err(|e| {
        Error::internal_io(e.error.to_string(), Some(format!("replace {}", path.display())))
    })?;
    Ok(())
}
