//! # faf-helpers Error Types
//!
//! File: lib/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error taxonomy shared by all helpers in the crate.
//! Most public helpers never hand these errors to their callers: they log the
//! failure and return a sentinel value instead. The `try_*` variants of those
//! helpers return them directly, which is what the sentinel-mapping boundaries
//! and the tests inspect.
//!
//! ## Architecture
//!
//! The error system consists of two main components:
//! - `HelperError`: A custom error enum using `thiserror` for specific failure kinds
//! - `Result<T>`: A type alias for `anyhow::Result<T>` for flexible error handling
//!
//! Filesystem failures are classified with [`HelperError::from_io`] so callers can
//! tell a missing target apart from a permission problem by downcasting:
//!
//! ```rust
//! use faf_helpers::core::error::HelperError;
//!
//! # fn check(result: faf_helpers::Result<()>) {
//! if let Err(e) = result {
//!     if matches!(e.downcast_ref::<HelperError>(), Some(HelperError::NotFound { .. })) {
//!         println!("target missing");
//!     }
//! }
//! # }
//! ```
//!
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Custom error type for the helper library.
#[derive(Error, Debug)]
pub enum HelperError {
    #[error("Path not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Permission denied: {}", path.display())]
    PermissionDenied { path: PathBuf },

    #[error("I/O failure on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("File type detection failed: {0}")]
    Detection(String),

    #[error("Archive command failed: {cmd}, Status: {status}, Output:\n{output}")]
    ArchiveFailure {
        cmd: String,
        status: String,
        output: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl HelperError {
    /// Classifies an `io::Error` raised while touching `path`.
    pub fn from_io(source: io::Error, path: &Path) -> Self {
        let path = path.to_path_buf();
        match source.kind() {
            io::ErrorKind::NotFound => HelperError::NotFound { path },
            io::ErrorKind::PermissionDenied => HelperError::PermissionDenied { path },
            _ => HelperError::Io { path, source },
        }
    }

    /// Returns `true` if `err` (or anything in its chain) reports a missing target.
    pub fn is_not_found(err: &anyhow::Error) -> bool {
        err.chain().any(|cause| {
            matches!(
                cause.downcast_ref::<HelperError>(),
                Some(HelperError::NotFound { .. })
            ) || cause
                .downcast_ref::<io::Error>()
                .is_some_and(|e| e.kind() == io::ErrorKind::NotFound)
        })
    }
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;
