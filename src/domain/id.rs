//! Habit identifiers
//!
//! Format: `h-{7-char-hash}` (e.g., `h-7f2b4c1`)
//!
//! The hash is derived from the habit name + creation timestamp, so the same
//! name created twice gets two distinct IDs.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum IdError {
    #[error("Invalid habit ID format: expected 'h-{{7-char-hash}}', got '{0}'")]
    InvalidHabitId(String),
}

/// Generates a 7-character hash from name and timestamp
fn generate_hash(name: &str, timestamp: NaiveDateTime) -> String {
    let nanos = timestamp.and_utc().timestamp_nanos_opt().unwrap_or(0);
    let input = format!("{}{}", name, nanos);
    let hash = blake3::hash(input.as_bytes());
    let hex = hash.to_hex();
    hex[..7].to_string()
}

/// Opaque habit ID in the format `h-{7-char-hash}`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HabitId {
    hash: String,
}

impl HabitId {
    /// Creates a new habit ID from name and creation timestamp
    pub fn new(name: &str, created_at: NaiveDateTime) -> Self {
        Self {
            hash: generate_hash(name, created_at),
        }
    }

    /// Returns the hash portion of the ID
    pub fn hash(&self) -> &str {
        &self.hash
    }
}

impl fmt::Display for HabitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&format!("h-{}", self.hash))
    }
}

impl FromStr for HabitId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let Some(hash) = s.strip_prefix("h-") else {
            return Err(IdError::InvalidHabitId(s.to_string()));
        };

        if hash.len() != 7 || !hash.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(IdError::InvalidHabitId(s.to_string()));
        }

        Ok(Self {
            hash: hash.to_ascii_lowercase(),
        })
    }
}

impl TryFrom<String> for HabitId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HabitId> for String {
    fn from(id: HabitId) -> Self {
        id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 12)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    #[test]
    fn id_generation_is_unique_for_different_timestamps() {
        let t1 = ts();
        let t2 = t1 + chrono::Duration::nanoseconds(1);

        assert_ne!(HabitId::new("Read", t1), HabitId::new("Read", t2));
    }

    #[test]
    fn id_generation_is_stable() {
        assert_eq!(HabitId::new("Read", ts()), HabitId::new("Read", ts()));
    }

    #[test]
    fn id_format_is_correct() {
        let s = HabitId::new("Read", ts()).to_string();

        assert!(s.starts_with("h-"));
        assert_eq!(s.len(), 9); // "h-" + 7 chars
    }

    #[test]
    fn id_parses_correctly() {
        let original = HabitId::new("Read", ts());
        let parsed: HabitId = original.to_string().parse().unwrap();

        assert_eq!(original, parsed);
    }

    #[test]
    fn id_rejects_invalid_format() {
        assert!("invalid".parse::<HabitId>().is_err());
        assert!("h-short".parse::<HabitId>().is_err());
        assert!("h-toolonggg".parse::<HabitId>().is_err());
        assert!("h-gggggg1".parse::<HabitId>().is_err()); // 'g' is not hex
        assert!("a-1234567".parse::<HabitId>().is_err());
    }

    #[test]
    fn id_serde_roundtrip_uses_string_form() {
        let id = HabitId::new("Read", ts());
        let json = serde_json::to_string(&id).unwrap();

        assert_eq!(json, format!("\"{}\"", id));
    }
}
