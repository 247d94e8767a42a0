//! # faf-helpers Archive Utilities Module (`common::archive`)
//!
//! File: lib/src/common/archive/mod.rs
//!
//! ## Overview
//!
//! Archive creation for analysis results. The only format produced today is a
//! gzipped tarball written to disk by the system `tar` program.
//!
//! ## Architecture
//!
//! - **`tar`**: `compress_and_pack_folder` and its `Result`-returning sibling.
//!

pub mod tar;
