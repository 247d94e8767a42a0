//! # faf-helpers File Type Detection (`common::filetype`)
//!
//! File: lib/src/common/filetype/mod.rs
//!
//! ## Overview
//!
//! Identifies files by content and reports a MIME token plus a human-readable
//! description. Firmware container formats that generic sniffers do not know
//! about are described by a custom signature database shipped in the bin
//! directory; everything else falls through to generic content detection.
//!
//! ## Architecture
//!
//! - **`SignatureMatcher`**: One signature tier. Answers a single query (`Mode::Mime` or
//!   `Mode::Full`) for a path or a byte buffer.
//! - **`signatures::CustomSignatures`**: Rules loaded from `bin/custommime.toml`.
//! - **`system::SystemMagic`**: Generic detection backed by the `tika-magic` crate.
//! - **`FileTypeDetector`**: Runs the tiers in order. Both queries go to a tier; if its
//!   MIME answer is `application/octet-stream` (no opinion), the next tier is asked.
//!
//! Detection never fails. Per query:
//! - a missing target yields `error/file-not-found` / `Error: File not in storage!`
//! - any other failure yields `application/octet-stream` / `data`
//!
//! and the failure is logged.
//!
//! Paths are inspected without following symbolic links. Links, directories,
//! special files and empty files are reported as `inode/*` types by every tier.
//!
//! ## Usage
//!
//! ```rust
//! use faf_helpers::common::filetype;
//!
//! let file_type = filetype::file_type_from_binary(b"hsqs\x00\x00\x00\x00");
//! assert_eq!(file_type.mime, "filesystem/squashfs");
//!
//! let missing = filetype::file_type_from_path("/none/existing/file");
//! assert_eq!(missing.mime, "error/file-not-found");
//! ```
//!
pub mod signatures;
pub mod system;

use crate::core::config::FileTypeConfig; // Database location and read limit
use crate::core::error::{HelperError, Result}; // Error classification for sentinel mapping
use serde::{Deserialize, Serialize}; // FileType travels in analysis results
use std::fs;
use std::io::Read;
use std::path::Path;
use std::sync::OnceLock; // Shared default detector
use tracing::{debug, error};

pub use signatures::CustomSignatures;
pub use system::SystemMagic;

/// MIME token meaning "no specific match".
pub const MIME_FALLBACK: &str = "application/octet-stream";
/// Description paired with [`MIME_FALLBACK`].
pub const FULL_FALLBACK: &str = "data";
/// MIME token reported when the target does not exist.
pub const MIME_NOT_FOUND: &str = "error/file-not-found";
/// Description paired with [`MIME_NOT_FOUND`].
pub const FULL_NOT_FOUND: &str = "Error: File not in storage!";

/// What a single signature query asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// A MIME token such as `application/zip`.
    Mime,
    /// A free-text description such as `Zip archive data`.
    Full,
}

impl Mode {
    /// Picks the answer matching this mode.
    pub fn select<'a>(self, mime: &'a str, full: &'a str) -> &'a str {
        match self {
            Mode::Mime => mime,
            Mode::Full => full,
        }
    }
}

/// The thing being identified.
#[derive(Debug, Clone, Copy)]
pub enum Input<'a> {
    Path(&'a Path),
    Bytes(&'a [u8]),
}

/// MIME token and description of a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileType {
    pub mime: String,
    pub full: String,
}

impl FileType {
    pub fn new(mime: impl Into<String>, full: impl Into<String>) -> Self {
        Self {
            mime: mime.into(),
            full: full.into(),
        }
    }

    /// The generic "no match" result.
    pub fn fallback() -> Self {
        Self::new(MIME_FALLBACK, FULL_FALLBACK)
    }

    /// `true` when the MIME token is the generic fallback.
    pub fn is_fallback(&self) -> bool {
        self.mime == MIME_FALLBACK
    }
}

/// A source of file-type signatures.
pub trait SignatureMatcher {
    /// Short name used in log messages.
    fn name(&self) -> &str;

    /// Answers `mode` for a non-empty byte buffer.
    fn identify_bytes(&self, data: &[u8], mode: Mode) -> Result<String>;

    /// Answers `mode` for `input`, reading at most `read_limit` bytes from a path.
    fn identify(&self, input: Input<'_>, mode: Mode, read_limit: usize) -> Result<String> {
        match input {
            Input::Bytes([]) => Ok(mode.select("application/x-empty", "empty").to_string()),
            Input::Bytes(data) => self.identify_bytes(data, mode),
            Input::Path(path) => {
                if let Some(answer) = inspect_inode(path, mode)? {
                    return Ok(answer);
                }
                let data = read_prefix(path, read_limit)?;
                if data.is_empty() {
                    return Ok(mode.select("inode/x-empty", "empty").to_string());
                }
                self.identify_bytes(&data, mode)
            }
        }
    }
}

/// Reports links, directories and special files without reading them.
fn inspect_inode(path: &Path, mode: Mode) -> Result<Option<String>> {
    let metadata = fs::symlink_metadata(path).map_err(|e| HelperError::from_io(e, path))?;
    let file_type = metadata.file_type();

    if file_type.is_symlink() {
        let answer = match mode {
            Mode::Mime => "inode/symlink".to_string(),
            Mode::Full => {
                let target = fs::read_link(path).map_err(|e| HelperError::from_io(e, path))?;
                format!("symbolic link to '{}'", target.display())
            }
        };
        return Ok(Some(answer));
    }
    if file_type.is_dir() {
        return Ok(Some(mode.select("inode/directory", "directory").to_string()));
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::FileTypeExt;
        let special = if file_type.is_fifo() {
            Some(("inode/fifo", "fifo (named pipe)"))
        } else if file_type.is_socket() {
            Some(("inode/socket", "socket"))
        } else if file_type.is_block_device() {
            Some(("inode/blockdevice", "block special"))
        } else if file_type.is_char_device() {
            Some(("inode/chardevice", "character special"))
        } else {
            None
        };
        if let Some((mime, full)) = special {
            return Ok(Some(mode.select(mime, full).to_string()));
        }
    }

    Ok(None)
}

fn read_prefix(path: &Path, read_limit: usize) -> Result<Vec<u8>> {
    let file = fs::File::open(path).map_err(|e| HelperError::from_io(e, path))?;
    let mut data = Vec::new();
    file.take(read_limit as u64)
        .read_to_end(&mut data)
        .map_err(|e| HelperError::from_io(e, path))?;
    Ok(data)
}

/// Two-tier file-type detection: custom signatures first, generic detection second.
pub struct FileTypeDetector {
    custom: CustomSignatures,
    system: SystemMagic,
    read_limit: usize,
}

impl Default for FileTypeDetector {
    fn default() -> Self {
        Self::from_config(&FileTypeConfig::default())
    }
}

impl FileTypeDetector {
    /// Builds a detector from configuration. A missing or broken signature
    /// database leaves the custom tier empty; it never fails construction.
    pub fn from_config(config: &FileTypeConfig) -> Self {
        Self::new(
            CustomSignatures::open(Path::new(&config.signature_database)),
            config.read_limit,
        )
    }

    pub fn new(custom: CustomSignatures, read_limit: usize) -> Self {
        Self {
            custom,
            system: SystemMagic,
            read_limit: read_limit.max(1),
        }
    }

    /// Identifies the file at `path`.
    pub fn detect_path(&self, path: &Path) -> FileType {
        self.detect(Input::Path(path))
    }

    /// Identifies a byte buffer.
    pub fn detect_binary(&self, data: &[u8]) -> FileType {
        self.detect(Input::Bytes(data))
    }

    /// Asks each tier in turn until one gives a specific MIME token.
    /// When none does, the last tier's answers are returned.
    pub fn detect(&self, input: Input<'_>) -> FileType {
        let tiers: [&dyn SignatureMatcher; 2] = [&self.custom, &self.system];
        self.detect_with(&tiers, input)
    }

    fn detect_with(&self, tiers: &[&dyn SignatureMatcher], input: Input<'_>) -> FileType {
        let mut result = FileType::fallback();
        for &matcher in tiers {
            result = FileType {
                mime: self.query(matcher, input, Mode::Mime),
                full: self.query(matcher, input, Mode::Full),
            };
            if !result.is_fallback() {
                break;
            }
            debug!("No specific match from {} signatures", matcher.name());
        }
        result
    }

    fn query(&self, matcher: &dyn SignatureMatcher, input: Input<'_>, mode: Mode) -> String {
        match matcher.identify(input, mode, self.read_limit) {
            Ok(answer) => answer,
            Err(e) if HelperError::is_not_found(&e) => {
                error!("File not found: {:#}", e);
                mode.select(MIME_NOT_FOUND, FULL_NOT_FOUND).to_string()
            }
            Err(e) => {
                error!(
                    "Could not determine file type ({} signatures): {:#}",
                    matcher.name(),
                    e
                );
                mode.select(MIME_FALLBACK, FULL_FALLBACK).to_string()
            }
        }
    }
}

/// The detector behind the free functions, built on first use.
///
/// The signature database is read once per process, so edits to
/// `bin/custommime.toml` made after the first query are not seen here. Callers
/// that need a different database (or a reload) should hold their own
/// [`FileTypeDetector`].
fn default_detector() -> &'static FileTypeDetector {
    static DETECTOR: OnceLock<FileTypeDetector> = OnceLock::new();
    DETECTOR.get_or_init(FileTypeDetector::default)
}

/// Returns the MIME type and description of the file at `file_path`.
///
/// Uses the custom signature database in the bin directory and falls back to
/// generic detection when it has no match.
///
/// # Arguments
///
/// * `file_path` - The file to identify. Symbolic links are reported, not followed.
///
/// # Returns
///
/// * `FileType` - Never fails; a missing file yields `error/file-not-found` /
///   `Error: File not in storage!` and any other failure yields the generic fallback.
pub fn file_type_from_path(file_path: impl AsRef<Path>) -> FileType {
    default_detector().detect_path(file_path.as_ref())
}

/// Works like [`file_type_from_path`] on an in-memory buffer.
pub fn file_type_from_binary(binary: &[u8]) -> FileType {
    default_detector().detect_binary(binary)
}
