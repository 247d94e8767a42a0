//! # faf-helpers
//!
//! File: lib/src/lib.rs
//!
//! ## Overview
//!
//! Filesystem path utilities and a file-type detection wrapper for a firmware
//! analysis platform.
//!
//! ## Architecture
//!
//! - `core`: Error types, configuration, logging setup.
//! - `common`: The helpers themselves (`fs`, `filetype`, `archive`, `process`).
//!
//! The most used entry points are re-exported at the crate root:
//!
//! ```rust
//! use faf_helpers::{chroot_path, file_is_empty, test_data_dir};
//!
//! assert_eq!(chroot_path("/foo/bar/com", "/foo/"), "/bar/com");
//! assert!(file_is_empty(&test_data_dir().join("zero_byte")));
//! ```
//!
pub mod common;
pub mod core;

pub use crate::common::archive::tar::compress_and_pack_folder;
pub use crate::common::filetype::{file_type_from_binary, file_type_from_path, FileType};
pub use crate::common::fs::io::{create_dir_for_file, file_is_empty};
pub use crate::common::fs::paths::{
    absolute_path, bin_dir, chroot_path, chroot_path_excluding_extracted_dir, src_dir,
    template_dir, test_data_dir,
};
pub use crate::core::error::{HelperError, Result};
