use super::ValidationError;
use crate::constants::SHORT_ID_LEN;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

lazy_static::lazy_static! {
    static ref COMPACT_ID_REGEX: Regex = Regex::new(r"(?i)[0-9a-f]{32}")
        .expect("Failed to compile compact ID regex - this is a bug in the code");
    static ref HYPHENATED_ID_REGEX: Regex = Regex::new(
        r"(?i)[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}"
    )
    .expect("Failed to compile hyphenated ID regex - this is a bug in the code");
}

/// NotionId - the canonical identifier of any Notion object.
///
/// Stored in the hyphenated 8-4-4-4-12 lowercase form, which is also what the
/// API accepts and returns, so equality and hashing work across inputs that
/// spelled the same identifier differently.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotionId(String);

impl NotionId {
    /// Parses a raw identifier or a URL that embeds one.
    ///
    /// Lookup order:
    /// 1. the first contiguous run of 32 hex digits, re-hyphenated;
    /// 2. an already hyphenated UUID-shaped substring;
    /// 3. the whole input, if it is nothing but 32 hex digits and hyphens
    ///    placed anywhere.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let cleaned = input.trim();

        if let Some(found) = COMPACT_ID_REGEX.find(cleaned) {
            return Ok(Self::from_compact(found.as_str()));
        }

        if let Some(found) = HYPHENATED_ID_REGEX.find(cleaned) {
            return Ok(NotionId(found.as_str().to_lowercase()));
        }

        let stripped: String = cleaned.chars().filter(|c| *c != '-').collect();
        if stripped.len() == 32 && stripped.chars().all(|c| c.is_ascii_hexdigit()) {
            return Ok(Self::from_compact(&stripped));
        }

        Err(ValidationError::InvalidId(format!(
            "Could not find a Notion ID in: {}",
            input
        )))
    }

    /// Re-hyphenates a validated 32-character hex string.
    fn from_compact(hex: &str) -> Self {
        let hex = hex.to_lowercase();
        NotionId(format!(
            "{}-{}-{}-{}-{}",
            &hex[0..8],
            &hex[8..12],
            &hex[12..16],
            &hex[16..20],
            &hex[20..32]
        ))
    }

    /// Returns the canonical hyphenated ID.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the ID without hyphens.
    pub fn compact(&self) -> String {
        self.0.replace('-', "")
    }

    /// Returns the leading hex characters used in output directory names.
    pub fn short(&self) -> &str {
        &self.0[..SHORT_ID_LEN]
    }
}

impl fmt::Display for NotionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for NotionId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NotionId::parse(s)
    }
}

impl Serialize for NotionId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for NotionId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NotionId::parse(&s).map_err(serde::de::Error::custom)
    }
}
