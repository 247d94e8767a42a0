//! # faf-helpers Configuration System
//!
//! File: lib/src/core/config.rs
//!
//! ## Overview
//!
//! Settings for the helpers that talk to something outside the process: the
//! signature database used by file-type detection and the program used to
//! build archives. Every setting has a default, so the free functions in
//! `common` work without any configuration file at all.
//!
//! ## Architecture
//!
//! Configuration sources (in order of precedence):
//! 1. Project-specific `.faf-helpers.toml` in the current directory or ancestors
//!    (the search stops at the first directory containing `.git`)
//! 2. User-specific `<config dir>/faf-helpers/config.toml` (via `directories`)
//! 3. Default values defined in the code
//!
//! After merging, `~` in paths is expanded (`shellexpand`) and the result is
//! validated.
//!
//! ## Examples
//!
//! ```toml
//! [file_type]
//! signature_database = "~/faf/custommime.toml"
//! read_limit = 65536
//!
//! [archive]
//! command = "/usr/bin/tar"
//! ```
//!
//! ```rust,no_run
//! use faf_helpers::core::config;
//! use faf_helpers::common::filetype::FileTypeDetector;
//!
//! # fn run() -> faf_helpers::Result<()> {
//! let cfg = config::load_config()?;
//! let detector = FileTypeDetector::from_config(&cfg.file_type);
//! # Ok(())
//! # }
//! ```
//!
use crate::common::fs::paths;
use crate::core::error::{HelperError, Result};
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

/// File name of the custom signature database inside the bin directory.
pub const CUSTOM_SIGNATURE_DB: &str = "custommime.toml";

/// Represents the main configuration structure, loaded from TOML files.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub file_type: FileTypeConfig,
    #[serde(default)]
    pub archive: ArchiveConfig,
}

/// Settings for file-type detection.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FileTypeConfig {
    /// Path of the custom signature database (can use ~). Will be expanded.
    #[serde(default = "default_signature_database")]
    pub signature_database: String,
    /// Maximum number of bytes read from a file for content sniffing.
    #[serde(default = "default_read_limit")]
    pub read_limit: usize,
}

impl Default for FileTypeConfig {
    fn default() -> Self {
        Self {
            signature_database: default_signature_database(),
            read_limit: default_read_limit(),
        }
    }
}

/// Settings for archive creation.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ArchiveConfig {
    /// Program invoked to build `.tar.gz` files.
    #[serde(default = "default_archive_command")]
    pub command: String,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            command: default_archive_command(),
        }
    }
}

fn default_signature_database() -> String {
    paths::bin_dir()
        .join(CUSTOM_SIGNATURE_DB)
        .to_string_lossy()
        .into_owned()
}
fn default_read_limit() -> usize {
    1024 * 1024
}
fn default_archive_command() -> String {
    "tar".to_string()
}

const PROJECT_CONFIG_FILENAME: &str = ".faf-helpers.toml";

/// Loads, merges, expands and validates the configuration.
///
/// # Errors
///
/// Returns an `Err` if a configuration file exists but cannot be read or parsed,
/// or if the merged configuration fails validation.
pub fn load_config() -> Result<Config> {
    let user_config = load_user_config()?;
    let project_config = load_project_config()?;
    let mut merged_config = merge_configs(user_config.unwrap_or_default(), project_config);
    expand_config_paths(&mut merged_config);
    validate_config(&merged_config).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", merged_config);
    Ok(merged_config)
}

fn load_user_config() -> Result<Option<Config>> {
    if let Some(proj_dirs) = ProjectDirs::from("org", "FAF", "faf-helpers") {
        let config_path = proj_dirs.config_dir().join("config.toml");
        if config_path.exists() {
            info!("Loading user configuration from: {}", config_path.display());
            load_config_from_path(&config_path).map(Some)
        } else {
            debug!(
                "User configuration file not found at {}",
                config_path.display()
            );
            Ok(None)
        }
    } else {
        warn!("Could not determine user config directory.");
        Ok(None)
    }
}

fn load_project_config() -> Result<Option<Config>> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    if let Some(project_config_path) = find_project_config_path(&current_dir) {
        info!(
            "Loading project configuration from: {}",
            project_config_path.display()
        );
        load_config_from_path(&project_config_path).map(Some)
    } else {
        debug!("No project configuration file ({PROJECT_CONFIG_FILENAME}) found.");
        Ok(None)
    }
}

/// Walks from `start` towards the root looking for `.faf-helpers.toml`.
fn find_project_config_path(start: &Path) -> Option<PathBuf> {
    for dir in start.ancestors() {
        let project_config = dir.join(PROJECT_CONFIG_FILENAME);
        if project_config.is_file() {
            return Some(project_config);
        }
        if dir.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                dir.display()
            );
            return None;
        }
    }
    None
}

/// Parses a single TOML configuration file.
pub fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .map_err(|e| HelperError::from_io(e, path))
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

/// Project values win over user values wherever they differ from the defaults.
fn merge_configs(user: Config, project: Option<Config>) -> Config {
    let project_cfg = match project {
        Some(p) => p,
        None => return user,
    };
    let defaults = Config::default();
    let mut merged = user;
    if project_cfg.file_type.signature_database != defaults.file_type.signature_database {
        merged.file_type.signature_database = project_cfg.file_type.signature_database;
    }
    if project_cfg.file_type.read_limit != defaults.file_type.read_limit {
        merged.file_type.read_limit = project_cfg.file_type.read_limit;
    }
    if project_cfg.archive.command != defaults.archive.command {
        merged.archive.command = project_cfg.archive.command;
    }
    merged
}

fn expand_config_paths(config: &mut Config) {
    config.file_type.signature_database =
        shellexpand::tilde(&config.file_type.signature_database).into_owned();
    debug!(
        "Expanded signature database path: {}",
        config.file_type.signature_database
    );
}

/// Checks a merged configuration for values the helpers cannot work with.
pub fn validate_config(config: &Config) -> Result<()> {
    debug!("Validating configuration...");
    if config.file_type.read_limit == 0 {
        return Err(anyhow!(HelperError::Config(
            "file_type.read_limit must be greater than zero".to_string()
        )));
    }
    if config.archive.command.trim().is_empty() {
        return Err(anyhow!(HelperError::Config(
            "archive.command cannot be empty".to_string()
        )));
    }
    let db = PathBuf::from(&config.file_type.signature_database);
    if db.is_dir() {
        return Err(anyhow!(HelperError::Config(format!(
            "Configured signature database '{}' is a directory.",
            db.display()
        ))));
    }
    if !db.exists() {
        // Detection still works without it, using only the generic signatures.
        warn!(
            "Configured signature database '{}' does not exist.",
            db.display()
        );
    }
    Ok(())
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_deserialize_basic_toml() {
        let toml_content = r#"
            [file_type]
            signature_database = "~/faf/custommime.toml"

            [archive]
            command = "/usr/bin/tar"
        "#;

        let config: Config = toml::from_str(toml_content).expect("Failed to parse TOML");

        assert_eq!(config.file_type.signature_database, "~/faf/custommime.toml");
        assert_eq!(config.file_type.read_limit, default_read_limit()); // Default
        assert_eq!(config.archive.command, "/usr/bin/tar");
    }

    #[test]
    fn test_empty_toml_gives_defaults() {
        let config: Config = toml::from_str("").expect("Failed to parse TOML");
        assert_eq!(config, Config::default());
        assert!(config
            .file_type
            .signature_database
            .ends_with("bin/custommime.toml"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: std::result::Result<Config, _> = toml::from_str("[archive]\nprogram = \"x\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_path_expansion() {
        let mut config = Config {
            file_type: FileTypeConfig {
                signature_database: "~/sigs.toml".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        expand_config_paths(&mut config);
        let expected = shellexpand::tilde("~/sigs.toml").into_owned();
        assert_eq!(config.file_type.signature_database, expected);
    }

    #[test]
    fn test_merge_prefers_project_values() {
        let user = Config {
            archive: ArchiveConfig {
                command: "gtar".into(),
            },
            ..Default::default()
        };
        let project = Config {
            file_type: FileTypeConfig {
                read_limit: 4096,
                ..Default::default()
            },
            ..Default::default()
        };
        let merged = merge_configs(user, Some(project));
        assert_eq!(merged.archive.command, "gtar"); // project left it at default
        assert_eq!(merged.file_type.read_limit, 4096);
    }

    #[test]
    fn test_find_project_config_path() -> Result<()> {
        let root = tempdir()?;
        let nested = root.path().join("a/b");
        fs::create_dir_all(&nested)?;
        fs::create_dir(root.path().join(".git"))?;
        assert_eq!(find_project_config_path(&nested), None);

        let cfg = root.path().join("a").join(PROJECT_CONFIG_FILENAME);
        fs::write(&cfg, "[archive]\ncommand = \"bsdtar\"\n")?;
        assert_eq!(find_project_config_path(&nested), Some(cfg.clone()));
        assert_eq!(load_config_from_path(&cfg)?.archive.command, "bsdtar");
        Ok(())
    }

    #[test]
    fn test_validate_config_valid() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_config_zero_read_limit() {
        let config = Config {
            file_type: FileTypeConfig {
                read_limit: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        let result = validate_config(&config);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("read_limit must be greater than zero"));
    }

    #[test]
    fn test_validate_config_database_is_dir() {
        let temp_dir = tempdir().unwrap();
        let config = Config {
            file_type: FileTypeConfig {
                signature_database: temp_dir.path().to_string_lossy().to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        let result = validate_config(&config);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("is a directory"));
    }

    #[test]
    fn test_load_config_from_missing_file() {
        let err = load_config_from_path(Path::new("/none/existing/config.toml")).unwrap_err();
        assert!(HelperError::is_not_found(&err));
    }
}
