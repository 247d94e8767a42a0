//! # faf-helpers Core Infrastructure
//!
//! File: lib/src/core/mod.rs
//!
//! ## Overview
//!
//! Infrastructure shared by every helper in `common`:
//! - `config`: Configuration loading, merging, and validation
//! - `error`: Error types and the crate-wide `Result` alias
//! - `logging`: Optional `tracing` subscriber setup for hosts
//!
pub mod config;
pub mod error;
pub mod logging;
