//! # faf-helpers Generic Signature Tier
//!
//! File: lib/src/common/filetype/system.rs
//!
//! Generic content detection through `tika-magic`. The library only yields a
//! MIME token, so descriptions come from a small table of well-known formats
//! (refined with header fields where cheap to read). Unknown formats are
//! described by their MIME token.
//!
use super::{Mode, SignatureMatcher, FULL_FALLBACK, MIME_FALLBACK}; // Tier contract
use crate::core::error::Result; // Result alias

/// The system-default signature tier.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemMagic;

impl SignatureMatcher for SystemMagic {
    fn name(&self) -> &str {
        "system"
    }

    fn identify_bytes(&self, data: &[u8], mode: Mode) -> Result<String> {
        // tika-magic answers "application/octet-stream" when nothing matches.
        let mime = tika_magic::from_u8(data);
        Ok(match mode {
            Mode::Mime => mime.to_string(),
            Mode::Full => describe(mime, data),
        })
    }
}

/// Maps a MIME token to a libmagic-style description.
///
/// # Arguments
///
/// * `mime` - The token reported by `tika-magic`.
/// * `data` - The sniffed bytes, used to read version or class fields where cheap.
///
/// # Returns
///
/// * `String` - The description, or `mime` itself for formats not in the table.
fn describe(mime: &str, data: &[u8]) -> String {
    match mime {
        MIME_FALLBACK => FULL_FALLBACK.to_string(),
        // Bytes 4..6 of a local file header: "version needed to extract" (major*10 + minor).
        "application/zip" => match data.get(4..6) {
            Some(&[lo, hi]) => {
                let version = u16::from_le_bytes([lo, hi]);
                format!(
                    "Zip archive data, at least v{}.{} to extract",
                    version / 10,
                    version % 10
                )
            }
            _ => "Zip archive data".to_string(),
        },
        "application/gzip" | "application/x-gzip" => "gzip compressed data".to_string(),
        "application/x-bzip2" => "bzip2 compressed data".to_string(),
        "application/x-xz" => "XZ compressed data".to_string(),
        "application/x-7z-compressed" => "7-zip archive data".to_string(),
        "application/x-tar" => "POSIX tar archive".to_string(),
        "application/pdf" => "PDF document".to_string(),
        "image/png" => "PNG image data".to_string(),
        "image/jpeg" => "JPEG image data".to_string(),
        "image/gif" => "GIF image data".to_string(),
        "application/x-executable" | "application/x-sharedlib" | "application/x-elf" => {
            // EI_CLASS
            match data.get(4).copied() {
                Some(1) => "ELF 32-bit".to_string(),
                Some(2) => "ELF 64-bit".to_string(),
                _ => "ELF".to_string(),
            }
        }
        "text/plain" if data.is_ascii() => "ASCII text".to_string(),
        "text/plain" => "Unicode text".to_string(),
        other => other.to_string(),
    }
}
