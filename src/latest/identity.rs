//! Filename-derived collection identity and version ordering.
//!
//! Versioned spec files are named `<collection>-v<N>.yaml`. The collection
//! identity is the filename with that trailing suffix removed; the version
//! ordinal is every digit in the name run together. The ordinal scan is
//! deliberately permissive and inherits a known hazard: a digit anywhere
//! else in the name (say `payments2-v1.yaml`) pollutes the ordinal. Kept
//! as-is for compatibility with the filenames this tool has always seen.

use crate::Result;
use anyhow::{Context, bail};
use regex::Regex;

/// Collection identity: the filename with a trailing `-v<N>.yaml` suffix
/// stripped. Only the trailing suffix counts; version-like substrings
/// elsewhere in the name stay part of the identity.
pub fn collection_identity(file_name: &str) -> Result<String> {
    let re = Regex::new(r"-v\d+\.yaml$")?;
    Ok(re.replace(file_name, "").into_owned())
}

/// Version ordinal: every digit in the filename, run together and parsed.
/// Fails when the name carries no digits at all.
pub fn version_ordinal(file_name: &str) -> Result<u32> {
    let digits: String = file_name.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        bail!("no version digits in filename: {file_name}");
    }
    digits
        .parse()
        .with_context(|| format!("version digits do not fit an ordinal: {digits}"))
}
