//! # faf-helpers Common Utilities (`common`)
//!
//! File: lib/src/common/mod.rs
//!
//! ## Overview
//!
//! The helpers the analysis platform calls directly. Each submodule covers one
//! concern and none of them keep state between calls, so they can be used from
//! several threads or processes at once as long as the paths involved do not
//! overlap.
//!
//! - **`fs`**: Source tree locations, path rewriting, directory creation, emptiness check.
//! - **`filetype`**: Two-tier file-type detection (custom signatures, then generic).
//! - **`archive`**: Packing a directory into a `.tar.gz`.
//! - **`process`**: Running an external program and capturing its output.
//!

/// Utilities for handling archive files (tarballs).
pub mod archive;
/// File-type detection by content.
pub mod filetype;
/// Utilities for filesystem paths and operations.
pub mod fs;
/// Executing external programs and capturing their output.
pub mod process;
