//! # faf-helpers TAR Archive Operations (`common::archive::tar`)
//!
//! File: lib/src/common/archive/tar.rs
//!
//! ## Overview
//!
//! Packs the contents of a directory into a gzipped tarball (`.tar.gz`) on disk.
//! The platform uses it to bundle extraction results for download.
//!
//! ## Architecture
//!
//! - The parent directory of the output file is created first (`fs::io::create_dir_for_file`).
//! - The archive is produced by the external `tar` program, run through
//!   `common::process`: `tar -C <input_dir> -cvzf <output_file> .`. Entries are stored
//!   relative to `input_dir` (`./file`, `./sub/file`, ...).
//! - `try_compress_and_pack_folder` returns a `Result`; `compress_and_pack_folder` logs
//!   any failure, including the captured `tar` output, and returns `None`.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use faf_helpers::common::archive::tar;
//! use std::path::Path;
//!
//! let packed = tar::compress_and_pack_folder(
//!     Path::new("/tmp/extracted"),
//!     Path::new("/tmp/downloads/firmware.tar.gz"),
//! );
//! match packed {
//!     Some(path) => println!("archive written to {}", path.display()),
//!     None => println!("packing failed, see log"),
//! }
//! ```
//!
use crate::common::fs::{io, paths}; // Parent creation and path anchoring
use crate::common::process; // External command runner
use crate::core::config::ArchiveConfig; // Which archive program to run
use crate::core::error::{HelperError, Result}; // Custom error and Result alias
use anyhow::{bail, Context}; // Error propagation with context
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{error, info}; // Logging utilities

/// Creates `output_file` as a `.tar.gz` of everything inside `input_dir`.
///
/// Uses the default archive settings (the `tar` found on `PATH`).
/// Returns `Some(output_file)` on success and `None` on any failure; failures are
/// logged, never returned.
pub fn compress_and_pack_folder(input_dir: &Path, output_file: &Path) -> Option<PathBuf> {
    compress_and_pack_folder_with(&ArchiveConfig::default(), input_dir, output_file)
}

/// Like [`compress_and_pack_folder`] with explicit archive settings.
///
/// # Arguments
///
/// * `config` - Archive settings; `config.command` is the program run as `tar`.
/// * `input_dir` - Directory whose contents are packed.
/// * `output_file` - The `.tar.gz` to create. Missing parent directories are created.
pub fn compress_and_pack_folder_with(
    config: &ArchiveConfig,
    input_dir: &Path,
    output_file: &Path,
) -> Option<PathBuf> {
    match try_compress_and_pack_folder(config, input_dir, output_file) {
        Ok(path) => Some(path),
        Err(e) => {
            error!("Could not create tar.gz:\n{:#}", e);
            None
        }
    }
}

/// Creates `output_file` as a `.tar.gz` of everything inside `input_dir`.
///
/// # Returns
///
/// * `Result<PathBuf>` - `output_file` (as given) once the archive program exited with code 0.
///
/// # Errors
///
/// Returns an `Err` if:
/// - The parent directory of `output_file` cannot be created.
/// - `input_dir` does not exist (`HelperError::NotFound`) or is not a directory
///   (`HelperError::Io`). No archive is written in either case.
/// - The archive program cannot be started.
/// - The archive program exits non-zero (`HelperError::ArchiveFailure`, carrying its output).
pub fn try_compress_and_pack_folder(
    config: &ArchiveConfig,
    input_dir: &Path,
    output_file: &Path,
) -> Result<PathBuf> {
    io::create_dir_for_file(output_file)?;

    if !input_dir.exists() {
        bail!(HelperError::NotFound {
            path: input_dir.to_path_buf(),
        });
    }
    if !input_dir.is_dir() {
        bail!(HelperError::Io {
            path: input_dir.to_path_buf(),
            source: std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Input path exists but is not a directory",
            ),
        });
    }

    // tar resolves -f against its own cwd; anchor the output so -C cannot move it.
    let archive_path = paths::absolute_path(output_file, None)?;
    let args: [&OsStr; 5] = [
        OsStr::new("-C"),
        input_dir.as_os_str(),
        OsStr::new("-cvzf"),
        archive_path.as_os_str(),
        OsStr::new("."),
    ];
    let cmd_line = format!(
        "{} -C {} -cvzf {} .",
        config.command,
        input_dir.display(),
        archive_path.display()
    );

    let result = process::run_command_capture(&config.command, &args, None)
        .with_context(|| format!("Failed to run archive command: {}", cmd_line))?;

    if !result.success() {
        bail!(HelperError::ArchiveFailure {
            cmd: cmd_line,
            status: result.status_text(),
            output: result.output,
        });
    }

    info!("Packed {:?} into {:?}", input_dir, output_file);
    Ok(output_file.to_path_buf())
}
