//! Version descriptor: `MAJOR.MINOR.PATCH` followed by a free-form suffix
//!
//! Unlike semver the suffix is arbitrary (`1.4.0-beta`, `2.0.0rc1`, `1.0.0+win`),
//! but rendering a parsed version always gives back the exact input text.

use crate::core::error::{InputKind, MalformedInput, ReleaseError, ReleaseResult};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version {
  pub major: u64,
  pub minor: u64,
  pub patch: u64,
  /// Pre-release/build suffix, kept verbatim (may be empty)
  pub extra: String,
}

impl Version {
  pub fn new(major: u64, minor: u64, patch: u64, extra: impl Into<String>) -> Self {
    Self {
      major,
      minor,
      patch,
      extra: extra.into(),
    }
  }

  /// Parse `<int>.<int>.<int><suffix>`
  pub fn parse(text: &str) -> ReleaseResult<Self> {
    let malformed = |reason: &str| {
      ReleaseError::Malformed(MalformedInput {
        kind: InputKind::Version,
        input: text.to_string(),
        reason: reason.to_string(),
      })
    };

    let (major, rest) = text.split_once('.').ok_or_else(|| malformed("expected MAJOR.MINOR.PATCH"))?;
    let (minor, rest) = rest.split_once('.').ok_or_else(|| malformed("missing patch component"))?;

    let patch_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    let (patch, extra) = rest.split_at(patch_len);

    let major = parse_component(major).map_err(|reason| malformed(&format!("major {}", reason)))?;
    let minor = parse_component(minor).map_err(|reason| malformed(&format!("minor {}", reason)))?;
    let patch = parse_component(patch).map_err(|reason| malformed(&format!("patch {}", reason)))?;

    if extra.chars().any(char::is_control) {
      return Err(malformed("suffix contains control characters"));
    }

    Ok(Self::new(major, minor, patch, extra))
  }

  /// Name of the tag for this version (`v1.4.0-beta` for prefix `v`)
  pub fn tag_name(&self, prefix: &str) -> String {
    format!("{}{}", prefix, self)
  }
}

/// Parse one numeric component; leading zeros are rejected so rendering round-trips
fn parse_component(text: &str) -> Result<u64, String> {
  if text.is_empty() {
    return Err("component is empty".to_string());
  }
  if !text.bytes().all(|b| b.is_ascii_digit()) {
    return Err(format!("component '{}' is not a non-negative integer", text));
  }
  if text.len() > 1 && text.starts_with('0') {
    return Err(format!("component '{}' has a leading zero", text));
  }
  text
    .parse()
    .map_err(|_| format!("component '{}' is too large", text))
}

impl fmt::Display for Version {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}.{}.{}{}", self.major, self.minor, self.patch, self.extra)
  }
}

impl FromStr for Version {
  type Err = ReleaseError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Version::parse(s)
  }
}

impl Serialize for Version {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(self)
  }
}
