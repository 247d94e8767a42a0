//! # faf-helpers Filesystem Utilities (`common::fs`)
//!
//! File: lib/src/common/fs/mod.rs
//!
//! ## Overview
//!
//! This module groups the filesystem helpers the analysis platform calls around
//! extraction: locating the source tree, rewriting paths relative to an
//! extraction root, and preparing or inspecting files on disk.
//!
//! ## Architecture
//!
//! Functionality is delegated to the following submodules:
//!
//! - **`paths`**: Source tree locations (`src_dir`, `bin_dir`, ...), `absolute_path`, and the
//!   string-prefix `chroot_path` family.
//! - **`io`**: `create_dir_for_file`, `ensure_dir_exists` and the `file_is_empty` check.
//!
//! ## Usage
//!
//! ```rust
//! use faf_helpers::common::fs::{io, paths};
//!
//! let sample = paths::test_data_dir().join("get_files_test/testfile1");
//! assert!(!io::file_is_empty(&sample));
//! ```
//!

/// Source tree locations and path rewriting.
pub mod paths;
/// Directory creation and the emptiness check.
pub mod io;
