//! # faf-helpers Filesystem I/O Operations
//!
//! File: lib/src/common/fs/io.rs
//!
//! ## Overview
//!
//! Small wrappers around `std::fs` used before reading or writing analysis
//! artifacts: an emptiness check that never fails, and directory creation for
//! files that are about to be written.
//!
//! ## Architecture
//!
//! - **`ensure_dir_exists`**: Creates a directory and any missing parents (`fs::create_dir_all`).
//!   If the path exists but is not a directory, an error is returned.
//! - **`create_dir_for_file`**: Calls `ensure_dir_exists` on the parent of a file path.
//!   Safe to repeat, and safe for independent processes creating disjoint trees.
//! - **`try_file_is_empty`** / **`file_is_empty`**: The first reports the size check as a
//!   `Result` with the failure classified as a `HelperError`; the second maps every
//!   failure (missing file, permission problem, broken symlink) to `false`.
//!
//! ## Usage
//!
//! ```rust
//! use faf_helpers::common::fs::io;
//!
//! # fn run_example() -> faf_helpers::Result<()> {
//! let report = std::env::temp_dir().join("faf_doc_example/reports/2024/summary.json");
//! let report = report.as_path();
//! io::create_dir_for_file(report)?;
//! assert!(report.parent().unwrap().is_dir());
//! assert!(!io::file_is_empty(report)); // does not exist yet
//! # Ok(())
//! # }
//! # run_example().unwrap();
//! ```
//!
use crate::core::error::{HelperError, Result}; // Custom error and Result alias
use anyhow::Context; // For adding context to errors
use std::fs; // Standard filesystem module
use std::path::Path; // Filesystem path type
use tracing::{debug, info, warn}; // Logging utilities

/// Ensures that a directory exists at the specified path.
///
/// If the path does not exist, this function creates the directory, including
/// any necessary parent directories (similar to `mkdir -p`).
///
/// # Arguments
///
/// * `path` - The directory that must exist afterwards.
///
/// # Returns
///
/// * `Result<()>` - `Ok(())` if the directory exists or was created.
///
/// # Errors
///
/// Returns an `Err` if:
/// - The path exists but is not a directory.
/// - Creating the directory fails (e.g., due to permissions).
pub fn ensure_dir_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        // create_dir_all tolerates another process creating the same tree concurrently.
        fs::create_dir_all(path)
            .map_err(|e| HelperError::from_io(e, path))
            .with_context(|| format!("Failed to create directory {:?}", path))?;
        info!("Created directory: {:?}", path);
    } else if !path.is_dir() {
        // Something else (a file, a socket) already occupies the path.
        anyhow::bail!(HelperError::Io {
            path: path.to_path_buf(),
            source: std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                "Path exists but is not a directory",
            ),
        });
    } else {
        debug!("Directory already exists: {:?}", path);
    }
    Ok(())
}

/// Creates every missing ancestor directory of `file_path`.
///
/// The file itself is not created. A bare file name (no parent component)
/// needs no directories and succeeds immediately.
///
/// # Arguments
///
/// * `file_path` - Path of a file that is about to be written.
///
/// # Errors
///
/// Returns an `Err` if the parent cannot be created or exists as a non-directory.
pub fn create_dir_for_file(file_path: &Path) -> Result<()> {
    match file_path.parent() {
        // `Path::new("a.txt").parent()` is `Some("")`, not `None`.
        Some(parent) if !parent.as_os_str().is_empty() => ensure_dir_exists(parent)
            .with_context(|| format!("Failed to create parent directory for {:?}", file_path)),
        _ => Ok(()),
    }
}

/// Reports whether `file_path` exists and has a size of zero bytes.
///
/// Symbolic links are followed, so a broken link fails with `NotFound`.
///
/// # Errors
///
/// Returns the metadata failure classified as a [`HelperError`].
pub fn try_file_is_empty(file_path: &Path) -> Result<bool> {
    let metadata = fs::metadata(file_path).map_err(|e| HelperError::from_io(e, file_path))?;
    Ok(metadata.len() == 0)
}

/// Returns `true` if the file at `file_path` has 0 bytes, `false` otherwise.
///
/// Never fails: missing files, permission problems and broken symbolic links
/// all count as "not empty".
///
/// # Arguments
///
/// * `file_path` - The file to check. Symbolic links are followed.
///
/// # Returns
///
/// * `bool` - `true` only for an existing, readable, zero-byte file.
pub fn file_is_empty(file_path: &Path) -> bool {
    match try_file_is_empty(file_path) {
        Ok(empty) => empty,
        Err(e) => {
            // Expected misses stay at debug level; anything else is worth a warning.
            match e.downcast_ref::<HelperError>() {
                Some(HelperError::NotFound { .. }) | Some(HelperError::PermissionDenied { .. }) => {
                    debug!("Treating {:?} as not empty: {}", file_path, e);
                }
                _ => warn!("Unexpected error while checking size of {:?}: {:#}", file_path, e),
            }
            false
        }
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_ensure_dir_exists_creates_new() -> Result<()> {
        let base_dir = tempdir()?;
        let new_dir = base_dir.path().join("new/subdir");
        assert!(!new_dir.exists());
        ensure_dir_exists(&new_dir)?;
        assert!(new_dir.is_dir());
        Ok(())
    }

    #[test]
    fn test_ensure_dir_exists_path_is_file() -> Result<()> {
        let base_dir = tempdir()?;
        let file_path = base_dir.path().join("a_file.txt");
        fs::write(&file_path, "hello")?;
        let result = ensure_dir_exists(&file_path);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Path exists but is not a directory"));
        Ok(())
    }

    #[test]
    fn test_create_dir_for_file_nested() -> Result<()> {
        let root = tempdir()?;
        for (out_file, out_folder) in [
            ("test.txt", ""),
            ("folder/test.txt", "folder"),
            ("folder/sub_folder/test.txt", "folder/sub_folder"),
        ] {
            create_dir_for_file(&root.path().join(out_file))?;
            let folder = root.path().join(out_folder);
            assert!(folder.is_dir(), "{:?} should be a directory", folder);
            assert!(!root.path().join(out_file).exists(), "file itself is not created");
        }
        Ok(())
    }

    #[test]
    fn test_create_dir_for_file_is_idempotent() -> Result<()> {
        let root = tempdir()?;
        let target = root.path().join("a/b/c/out.bin");
        create_dir_for_file(&target)?;
        create_dir_for_file(&target)?;
        assert!(root.path().join("a/b/c").is_dir());
        Ok(())
    }

    #[test]
    fn test_create_dir_for_bare_file_name() -> Result<()> {
        create_dir_for_file(Path::new("just_a_name.txt"))?;
        Ok(())
    }

    #[test]
    fn test_create_dir_for_file_parent_is_file() -> Result<()> {
        let root = tempdir()?;
        fs::write(root.path().join("blocker"), "x")?;
        assert!(create_dir_for_file(&root.path().join("blocker/out.txt")).is_err());
        Ok(())
    }

    #[test]
    fn test_file_is_empty() -> Result<()> {
        let dir = tempdir()?;
        let empty = dir.path().join("zero_byte");
        let full = dir.path().join("testfile1");
        fs::write(&empty, "")?;
        fs::write(&full, "hi")?;
        assert!(file_is_empty(&empty), "file is empty but stated differently");
        assert!(!file_is_empty(&full), "file not empty but stated differently");
        Ok(())
    }

    #[test]
    fn test_file_is_empty_missing() -> Result<()> {
        let dir = tempdir()?;
        let missing = dir.path().join("nope");
        assert!(!file_is_empty(&missing));
        let err = try_file_is_empty(&missing).unwrap_err();
        assert!(HelperError::is_not_found(&err));
        Ok(())
    }

    #[test]
    fn test_file_is_empty_invalid_path() {
        // An interior NUL byte is rejected by the OS layer with InvalidInput.
        let bad = Path::new("a\0b");
        assert!(!file_is_empty(bad));
        let err = try_file_is_empty(bad).unwrap_err();
        assert!(!HelperError::is_not_found(&err));
        assert!(matches!(
            err.downcast_ref::<HelperError>(),
            Some(HelperError::Io { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_file_is_empty_broken_link() -> Result<()> {
        let dir = tempdir()?;
        let link = dir.path().join("broken_link");
        std::os::unix::fs::symlink(dir.path().join("gone"), &link)?;
        assert!(!file_is_empty(&link), "Broken link is not empty");
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_file_is_empty_link_to_empty_file() -> Result<()> {
        let dir = tempdir()?;
        let target = dir.path().join("empty");
        fs::write(&target, "")?;
        let link = dir.path().join("link");
        std::os::unix::fs::symlink(&target, &link)?;
        assert!(file_is_empty(&link));
        Ok(())
    }
}
