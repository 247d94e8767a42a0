//! # faf-helpers Custom Signature Database
//!
//! File: lib/src/common/filetype/signatures.rs
//!
//! ## Overview
//!
//! Loads the firmware-specific signature rules from a TOML file (by default
//! `bin/custommime.toml`) and matches byte buffers against them.
//!
//! ## Format
//!
//! ```toml
//! [[signature]]
//! mime = "firmware/uboot"
//! description = "u-boot legacy uImage"
//! offset = 0            # optional, defaults to 0
//! hex = "27 05 19 56"   # or: text = "..."
//! ```
//!
//! Exactly one of `hex` and `text` must be given. Rules are tried in file
//! order and the first match wins. A buffer matching no rule gets the generic
//! `application/octet-stream` / `data` answer, which hands detection over to
//! the next tier.
//!
use super::{Mode, SignatureMatcher, FULL_FALLBACK, MIME_FALLBACK}; // Tier contract and "no opinion" answers
use crate::core::error::{HelperError, Result}; // Custom error and Result alias
use anyhow::{bail, Context}; // Error propagation with context
use serde::Deserialize; // Rule file parsing
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn}; // Logging utilities

/// One rule as written in the database file.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SignatureRule {
    pub mime: String,
    pub description: String,
    #[serde(default)]
    pub offset: usize,
    #[serde(default)]
    pub hex: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct SignatureFile {
    #[serde(default, rename = "signature")]
    signatures: Vec<SignatureRule>,
}

#[derive(Debug, Clone)]
struct CompiledRule {
    mime: String,
    description: String,
    offset: usize,
    pattern: Vec<u8>,
}

impl CompiledRule {
    fn matches(&self, data: &[u8]) -> bool {
        data.get(self.offset..)
            .is_some_and(|tail| tail.starts_with(&self.pattern))
    }
}

/// The custom signature tier.
#[derive(Debug, Clone)]
pub struct CustomSignatures {
    source: PathBuf,
    rules: Vec<CompiledRule>,
}

impl CustomSignatures {
    /// Loads `path`, logging and returning an empty database on any failure.
    pub fn open(path: &Path) -> Self {
        match Self::try_open(path) {
            Ok(db) => db,
            Err(e) => {
                warn!("Custom signature database unavailable: {:#}", e);
                Self::empty(path)
            }
        }
    }

    /// Loads and compiles the database at `path`.
    ///
    /// # Arguments
    ///
    /// * `path` - Location of the TOML rule file.
    ///
    /// # Returns
    ///
    /// * `Result<Self>` - The compiled rules, in file order.
    ///
    /// # Errors
    ///
    /// Returns an `Err` if the file cannot be read (a missing file is classified as
    /// `HelperError::NotFound`), is not valid TOML, or contains an invalid rule.
    pub fn try_open(path: &Path) -> Result<Self> {
        // Classify the I/O failure first so callers can tell "missing" from "broken".
        let content = fs::read_to_string(path)
            .map_err(|e| HelperError::from_io(e, path))
            .with_context(|| format!("Failed to read signature database {}", path.display()))?;
        Self::from_toml_str(&content, path)
    }

    /// Compiles rules from TOML text; `source` is only used in messages.
    ///
    /// # Errors
    ///
    /// Returns an `Err` naming the 1-based rule index if any rule has an empty
    /// `mime`, an empty pattern, bad hex, or not exactly one of `hex` / `text`.
    pub fn from_toml_str(content: &str, source: &Path) -> Result<Self> {
        let file: SignatureFile = toml::from_str(content)
            .with_context(|| format!("Failed to parse signature database {}", source.display()))?;
        let rules = file
            .signatures
            .into_iter()
            .enumerate()
            .map(|(idx, rule)| {
                compile(rule).with_context(|| {
                    format!("Invalid signature #{} in {}", idx + 1, source.display())
                })
            })
            .collect::<Result<Vec<_>>>()?;
        debug!(
            "Loaded {} custom signatures from {}",
            rules.len(),
            source.display()
        );
        Ok(Self {
            source: source.to_path_buf(),
            rules,
        })
    }

    /// A database with no rules.
    pub fn empty(source: &Path) -> Self {
        Self {
            source: source.to_path_buf(),
            rules: Vec::new(),
        }
    }

    /// Number of compiled rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The file the rules were loaded from (or were meant to be).
    pub fn source(&self) -> &Path {
        &self.source
    }

    fn find(&self, data: &[u8]) -> Option<&CompiledRule> {
        // First match wins, so rule order in the file is significant.
        self.rules.iter().find(|rule| rule.matches(data))
    }
}

impl SignatureMatcher for CustomSignatures {
    fn name(&self) -> &str {
        "custom"
    }

    fn identify_bytes(&self, data: &[u8], mode: Mode) -> Result<String> {
        let answer = match self.find(data) {
            Some(rule) => mode.select(&rule.mime, &rule.description),
            None => mode.select(MIME_FALLBACK, FULL_FALLBACK),
        };
        Ok(answer.to_string())
    }
}

fn compile(rule: SignatureRule) -> Result<CompiledRule> {
    if rule.mime.trim().is_empty() {
        bail!(HelperError::Detection("signature has an empty mime".into()));
    }
    // A rule must say exactly how its pattern is spelled.
    let pattern = match (&rule.hex, &rule.text) {
        (Some(hex), None) => decode_hex(hex)?,
        (None, Some(text)) => text.as_bytes().to_vec(),
        _ => bail!(HelperError::Detection(format!(
            "signature '{}' needs exactly one of `hex` or `text`",
            rule.mime
        ))),
    };
    if pattern.is_empty() {
        bail!(HelperError::Detection(format!(
            "signature '{}' has an empty pattern",
            rule.mime
        )));
    }
    Ok(CompiledRule {
        mime: rule.mime,
        description: rule.description,
        offset: rule.offset,
        pattern,
    })
}

/// Decodes hex digits, ignoring whitespace (`"27 05 19 56"`).
fn decode_hex(hex: &str) -> Result<Vec<u8>> {
    let digits: Vec<u8> = hex.bytes().filter(|b| !b.is_ascii_whitespace()).collect();
    if digits.len() % 2 != 0 {
        bail!(HelperError::Detection(format!(
            "odd number of hex digits in '{}'",
            hex
        )));
    }
    digits
        .chunks(2)
        .map(|pair| {
            std::str::from_utf8(pair)
                .ok()
                .and_then(|s| u8::from_str_radix(s, 16).ok())
                .ok_or_else(|| {
                    anyhow::anyhow!(HelperError::Detection(format!(
                        "invalid hex digits in '{}'",
                        hex
                    )))
                })
        })
        .collect()
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::fs::paths;

    const RULES: &str = r#"
        [[signature]]
        mime = "firmware/uboot"
        description = "u-boot legacy uImage"
        hex = "27 05 19 56"

        [[signature]]
        mime = "firmware/at-offset"
        description = "Marker at offset 4"
        offset = 4
        text = "MARK"
    "#;

    fn db() -> CustomSignatures {
        CustomSignatures::from_toml_str(RULES, Path::new("test")).unwrap()
    }

    #[test]
    fn test_rules_compiled_in_order() {
        let db = db();
        assert_eq!(db.len(), 2);
        assert!(!db.is_empty());
        assert_eq!(db.source(), Path::new("test"));
        assert_eq!(CustomSignatures::empty(Path::new("x")).len(), 0);
    }

    #[test]
    fn test_decode_hex() -> Result<()> {
        assert_eq!(decode_hex("27 05 19 56")?, vec![0x27, 0x05, 0x19, 0x56]);
        assert_eq!(decode_hex("aBcD")?, vec![0xab, 0xcd]);
        assert!(decode_hex("abc").is_err());
        assert!(decode_hex("zz").is_err());
        Ok(())
    }

    #[test]
    fn test_matches_at_offset_zero() -> Result<()> {
        let data = [0x27, 0x05, 0x19, 0x56, 0, 0, 0, 0];
        assert_eq!(db().identify_bytes(&data, Mode::Mime)?, "firmware/uboot");
        assert_eq!(db().identify_bytes(&data, Mode::Full)?, "u-boot legacy uImage");
        Ok(())
    }

    #[test]
    fn test_matches_at_offset() -> Result<()> {
        assert_eq!(db().identify_bytes(b"\0\0\0\0MARKrest", Mode::Mime)?, "firmware/at-offset");
        assert_eq!(db().identify_bytes(b"MARK", Mode::Mime)?, MIME_FALLBACK);
        // Shorter than offset + pattern.
        assert_eq!(db().identify_bytes(b"\0\0\0\0MA", Mode::Full)?, FULL_FALLBACK);
        Ok(())
    }

    #[test]
    fn test_rule_needs_exactly_one_pattern() {
        let both = r#"
            [[signature]]
            mime = "a/b"
            description = "x"
            hex = "00"
            text = "y"
        "#;
        assert!(CustomSignatures::from_toml_str(both, Path::new("t")).is_err());

        let none = r#"
            [[signature]]
            mime = "a/b"
            description = "x"
        "#;
        assert!(CustomSignatures::from_toml_str(none, Path::new("t")).is_err());
    }

    #[test]
    fn test_missing_database_is_empty() {
        let db = CustomSignatures::open(Path::new("/none/existing/custommime.toml"));
        assert!(db.is_empty());
        let err = CustomSignatures::try_open(Path::new("/none/existing/custommime.toml"))
            .unwrap_err();
        assert!(HelperError::is_not_found(&err));
    }

    #[test]
    fn test_bundled_database_loads() -> Result<()> {
        let db = CustomSignatures::try_open(&paths::bin_dir().join("custommime.toml"))?;
        assert!(!db.is_empty());
        assert!(db.source().ends_with("bin/custommime.toml"));
        Ok(())
    }
}
