//! # faf-helpers Process Execution Utilities (`common::process`)
//!
//! File: lib/src/common/process.rs
//!
//! ## Overview
//!
//! Runs an external program to completion and captures what it printed.
//! The archiver uses this to drive `tar`; the captured text is what ends up in
//! the log when the program fails.
//!
//! ## Architecture
//!
//! - **`run_command_capture`**: Executes `program` with `args` via `std::process::Command`,
//!   blocking until it exits. Standard output and standard error are captured and joined
//!   (stdout first) into a single string.
//! - No timeout is applied. Callers that need one must wrap the call themselves.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use faf_helpers::common::process;
//!
//! # fn run_example() -> faf_helpers::Result<()> {
//! let out = process::run_command_capture("tar", &["--version"], None)?;
//! if out.success() {
//!     println!("{}", out.output);
//! }
//! # Ok(())
//! # }
//! ```
//!
use crate::core::error::Result;
use anyhow::Context;
use std::ffi::OsStr;
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Exit information and combined output of a finished child process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` if the process was terminated by a signal.
    pub code: Option<i32>,
    /// Captured stdout followed by captured stderr, lossily decoded as UTF-8.
    pub output: String,
}

impl CommandOutput {
    /// `true` when the process exited with code 0.
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Human-readable exit status for diagnostics.
    pub fn status_text(&self) -> String {
        match self.code {
            Some(code) => format!("exit code {code}"),
            None => "terminated by signal".to_string(),
        }
    }
}

/// Runs `program` with `args` (optionally inside `cwd`) and captures its output.
///
/// # Errors
///
/// Returns an `Err` only if the process could not be started (e.g. the program is
/// not installed). A non-zero exit is *not* an error here; inspect
/// [`CommandOutput::code`].
pub fn run_command_capture<S: AsRef<OsStr>>(
    program: &str,
    args: &[S],
    cwd: Option<&Path>,
) -> Result<CommandOutput> {
    let mut command = Command::new(program);
    command.args(args);
    if let Some(dir) = cwd {
        command.current_dir(dir);
    }

    debug!("Running command: {:?}", command);
    let output = command
        .output()
        .with_context(|| format!("Failed to execute command '{}'", program))?;

    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));

    debug!(
        "Command '{}' finished with status={}, {} bytes of output",
        program,
        output.status,
        combined.len()
    );

    Ok(CommandOutput {
        code: output.status.code(),
        output: combined,
    })
}

// --- Unit Tests ---
#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_captures_stdout_and_stderr() -> Result<()> {
        let out = run_command_capture("sh", &["-c", "echo out; echo err >&2"], None)?;
        assert!(out.success());
        assert_eq!(out.output, "out\nerr\n");
        Ok(())
    }

    #[test]
    fn test_non_zero_exit_is_not_an_error() -> Result<()> {
        let out = run_command_capture("sh", &["-c", "exit 3"], None)?;
        assert!(!out.success());
        assert_eq!(out.code, Some(3));
        assert_eq!(out.status_text(), "exit code 3");
        Ok(())
    }

    #[test]
    fn test_runs_in_working_directory() -> Result<()> {
        let dir = tempfile::tempdir()?;
        std::fs::write(dir.path().join("marker"), "")?;
        let out = run_command_capture("ls", &["marker"], Some(dir.path()))?;
        assert!(out.success());
        assert!(out.output.contains("marker"));
        Ok(())
    }

    #[test]
    fn test_missing_program_is_an_error() {
        let result = run_command_capture::<&str>("faf-no-such-program-xyz", &[], None);
        assert!(result.is_err());
    }
}
