//! # faf-helpers Path Resolution
//!
//! File: lib/src/common/fs/paths.rs
//!
//! ## Overview
//!
//! Well-known directory locations of the source tree and the string-level path
//! rewriting used when files are reported relative to an extraction root.
//!
//! ## Architecture
//!
//! - **Source tree locations**: `src_dir` is fixed at compile time from the crate's
//!   manifest directory, so it does not move when the process changes its working
//!   directory. `test_data_dir`, `bin_dir` and `template_dir` are fixed subpaths of it.
//! - **Absolute paths**: `absolute_path` anchors relative paths at a base directory,
//!   reading the current working directory at call time when no base is given.
//! - **Chroot**: `chroot_path` strips a literal string prefix and keeps the result
//!   rooted at `/`. The match is on characters, not path segments, so a base of
//!   `/foo` also strips from `/foobar/x` (yielding `/bar/x`).
//!
//! ## Usage
//!
//! ```rust
//! use faf_helpers::common::fs::paths;
//!
//! assert_eq!(paths::chroot_path("/foo/bar/com", "/foo"), "/bar/com");
//! assert_eq!(
//!     paths::chroot_path_excluding_extracted_dir("/tmp/x/faf_extracted/etc/passwd", "/tmp/x"),
//!     "/etc/passwd"
//! );
//! ```
//!
use crate::core::error::Result; // Result alias
use anyhow::Context; // For adding context to errors
use std::path::{Path, PathBuf}; // Filesystem path types

/// Name of the directory the extraction engine unpacks firmware into.
pub const EXTRACTED_DIR: &str = "/faf_extracted";

/// Returns the absolute path of the source tree this crate lives in.
pub fn src_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

/// Returns the absolute path of the test data directory.
pub fn test_data_dir() -> PathBuf {
    src_dir().join("test/data")
}

/// Returns the absolute path of the bin directory (holds the signature database).
pub fn bin_dir() -> PathBuf {
    src_dir().join("bin")
}

/// Returns the absolute path of the web interface template directory.
pub fn template_dir() -> PathBuf {
    src_dir().join("web_interface/templates")
}

/// Drops the last `/`-separated component of `dir_path`.
///
/// Works on the string only; `"/foo/bar/test"` becomes `"/foo/bar"` and a path
/// without any `/` becomes the empty string.
pub fn parent_dir(dir_path: &str) -> String {
    match dir_path.rfind('/') {
        Some(idx) => dir_path[..idx].to_string(),
        None => String::new(),
    }
}

/// Anchors `path` at `base_dir` unless it is already absolute.
///
/// When `base_dir` is `None`, the process's current working directory is read
/// at the time of the call.
///
/// # Arguments
///
/// * `path` - The path to anchor. Returned unchanged if it starts with `/`.
/// * `base_dir` - Directory to anchor at, or `None` for the current directory.
///
/// # Returns
///
/// * `Result<PathBuf>` - `base_dir.join(path)`, or `path` itself when absolute.
///
/// # Errors
///
/// Returns an `Err` only if `base_dir` is `None` and the current working
/// directory cannot be determined (e.g. it was deleted).
pub fn absolute_path(path: impl AsRef<Path>, base_dir: Option<&Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    if starts_with_separator(path) {
        return Ok(path.to_path_buf());
    }
    let base = match base_dir {
        Some(base) => base.to_path_buf(),
        // Read per call: the host may chdir between calls.
        None => std::env::current_dir().context("Failed to get current directory")?,
    };
    Ok(base.join(path))
}

/// Infallible form of [`absolute_path`] with an explicit base directory.
pub fn absolute_path_from(path: impl AsRef<Path>, base_dir: &Path) -> PathBuf {
    let path = path.as_ref();
    if starts_with_separator(path) {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

fn starts_with_separator(path: &Path) -> bool {
    path.to_string_lossy().starts_with('/')
}

/// Sets a new root for `absolute_path` by stripping the literal prefix `base_path`.
///
/// `chroot_path("/foo/bar/abc", "/foo/")` and `chroot_path("/foo/bar/abc", "/foo")`
/// both give `"/bar/abc"`. Paths not starting with `base_path` come back unchanged.
///
/// # Arguments
///
/// * `absolute_path` - The path to rewrite.
/// * `base_path` - The prefix to strip. Compared as a string, not per component.
///
/// # Returns
///
/// * `String` - The rewritten path, always starting with `/` when a prefix was stripped.
pub fn chroot_path(absolute_path: &str, base_path: &str) -> String {
    match absolute_path.strip_prefix(base_path) {
        // "/foo/" leaves "bar/abc"; "/foo" leaves "/bar/abc".
        Some(rest) if rest.starts_with('/') => rest.to_string(),
        Some(rest) => format!("/{rest}"),
        None => absolute_path.to_string(),
    }
}

/// Like [`chroot_path`], then also strips a leading [`EXTRACTED_DIR`].
pub fn chroot_path_excluding_extracted_dir(absolute_path: &str, base_path: &str) -> String {
    let tmp = chroot_path(absolute_path, base_path);
    chroot_path(&tmp, EXTRACTED_DIR)
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_dir() {
        assert_eq!(parent_dir("/foo/bar/test"), "/foo/bar");
        assert_eq!(parent_dir("/foo"), "");
        assert_eq!(parent_dir("foo"), "");
    }

    #[test]
    fn test_well_known_dirs_hang_off_src_dir() {
        let src = src_dir();
        assert!(src.is_absolute());
        assert_eq!(test_data_dir(), src.join("test").join("data"));
        assert_eq!(bin_dir(), src.join("bin"));
        assert_eq!(template_dir(), src.join("web_interface").join("templates"));
        assert!(bin_dir().to_string_lossy().ends_with("/bin"));
    }

    #[test]
    fn test_absolute_path_keeps_absolute() -> Result<()> {
        assert_eq!(absolute_path("/foo/bar", None)?, PathBuf::from("/foo/bar"));
        assert_eq!(
            absolute_path("/foo/bar", Some(Path::new("/the")))?,
            PathBuf::from("/foo/bar")
        );
        Ok(())
    }

    #[test]
    fn test_absolute_path_joins_relative() -> Result<()> {
        assert_eq!(
            absolute_path("foo/bar", Some(Path::new("/the")))?,
            PathBuf::from("/the/foo/bar")
        );
        assert_eq!(
            absolute_path_from("foo/bar", Path::new("/the")),
            PathBuf::from("/the/foo/bar")
        );
        Ok(())
    }

    #[test]
    fn test_absolute_path_defaults_to_cwd() -> Result<()> {
        let cwd = std::env::current_dir()?;
        assert_eq!(absolute_path("some/file", None)?, cwd.join("some/file"));
        Ok(())
    }

    #[test]
    fn test_chroot_path() {
        assert_eq!(chroot_path("/foo/bar/com", "/foo/"), "/bar/com", "simple case with /");
        assert_eq!(chroot_path("/foo/bar/com", "/foo"), "/bar/com", "simple case without /");
        assert_eq!(chroot_path("/foo/bar/com", "/bar"), "/foo/bar/com", "none matching root");
    }

    #[test]
    fn test_chroot_path_whole_path_is_base() {
        assert_eq!(chroot_path("/foo", "/foo"), "/");
    }

    /// The match is on the raw string, not on path components.
    #[test]
    fn test_chroot_path_is_string_prefix_match() {
        assert_eq!(chroot_path("/foobar/x", "/foo"), "/bar/x");
    }

    #[test]
    fn test_chroot_excluding_extracted_dir() {
        assert_eq!(
            chroot_path_excluding_extracted_dir("/foo/faf_extracted/bar/com", "/foo"),
            "/bar/com"
        );
        assert_eq!(
            chroot_path_excluding_extracted_dir("/foo/other/bar/com", "/foo"),
            "/other/bar/com"
        );
        assert_eq!(
            chroot_path_excluding_extracted_dir("/elsewhere/faf_extracted/x", "/foo"),
            "/elsewhere/faf_extracted/x"
        );
    }
}
