//! # faf-helpers Logging Setup
//!
//! File: lib/src/core/logging.rs
//!
//! ## Overview
//!
//! The helpers report every swallowed failure through `tracing`. A host that has
//! not installed a subscriber of its own can call [`init_logging`] to get the same
//! compact stderr output the rest of the platform tooling uses.
//!
//! Verbosity maps to a default filter level: `0` = warn, `1` = info, `2` = debug,
//! anything higher = trace. A `RUST_LOG` environment variable overrides it.
//!
use crate::core::error::Result;
use tracing_subscriber::{fmt, EnvFilter};

/// Maps a `-v` style count to a filter directive.
pub fn level_for_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Installs a global compact stderr subscriber.
///
/// # Errors
///
/// Returns an `Err` if a global subscriber has already been set.
pub fn init_logging(verbose: u8) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_for_verbosity(verbose)));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install log subscriber: {e}"))?;
    tracing::debug!("Logging initialised at verbosity {}", verbose);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for_verbosity() {
        assert_eq!(level_for_verbosity(0), "warn");
        assert_eq!(level_for_verbosity(1), "info");
        assert_eq!(level_for_verbosity(2), "debug");
        assert_eq!(level_for_verbosity(7), "trace");
    }

    #[test]
    fn test_init_logging_only_once() {
        // Only this test installs a subscriber in the unit test binary.
        assert!(init_logging(2).is_ok());
        assert!(init_logging(2).is_err());
    }
}
