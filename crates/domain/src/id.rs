//! Todo identifiers: 12 bytes rendered as 24 lowercase hexadecimal characters.
//!
//! Identifiers follow the `ObjectId` layout: a 4-byte big-endian creation
//! second, 5 random bytes and a 3-byte process-wide counter.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::time::Timestamp;

/// Number of raw bytes behind an identifier.
const ID_BYTES: usize = 12;

/// Length of the textual (hex) form.
pub const ID_LEN: usize = ID_BYTES * 2;

static COUNTER: AtomicU32 = AtomicU32::new(0);

/// Unique identifier for a [`TodoItem`](crate::todo::TodoItem).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TodoId(String);

impl TodoId {
    /// Generate a fresh identifier stamped with `created_at`.
    #[must_use]
    pub fn generate(created_at: Timestamp) -> Self {
        let mut bytes = [0_u8; ID_BYTES];
        let seconds = u32::try_from(created_at.timestamp()).unwrap_or_default();
        bytes[..4].copy_from_slice(&seconds.to_be_bytes());
        bytes[4..9].copy_from_slice(&uuid::Uuid::new_v4().as_bytes()[..5]);
        let count = COUNTER.fetch_add(1, Ordering::Relaxed);
        bytes[9..].copy_from_slice(&count.to_be_bytes()[1..]);
        Self(hex::encode(bytes))
    }

    /// Extract the identifier carried by the final segment of a request path.
    ///
    /// The whole segment after the last `/` must be a valid identifier;
    /// leading segments are not inspected.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidId`] when the final segment is not
    /// exactly 24 hexadecimal characters.
    pub fn from_path(path: &str) -> Result<Self, ValidationError> {
        let segment = path.rsplit_once('/').map_or(path, |(_, tail)| tail);
        segment.parse()
    }

    /// Borrow the lowercase hex form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TodoId {
    type Err = ValidationError;

    /// Accepts hex digits in either case and normalizes to lowercase.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != ID_LEN {
            return Err(ValidationError::InvalidId);
        }
        hex::decode(s).map_err(|_| ValidationError::InvalidId)?;
        Ok(Self(s.to_ascii_lowercase()))
    }
}

impl TryFrom<String> for TodoId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TodoId> for String {
    fn from(id: TodoId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time;

    const VALID: &str = "5ba1a7b3e138230b4c3d2f1a";

    #[test]
    fn should_generate_24_lowercase_hex_chars() {
        let id = TodoId::generate(time::now());
        assert_eq!(id.as_str().len(), ID_LEN);
        assert!(
            id.as_str()
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
        );
    }

    #[test]
    fn should_generate_unique_ids_within_the_same_second() {
        let now = time::now();
        let a = TodoId::generate(now);
        let b = TodoId::generate(now);
        assert_ne!(a, b);
        assert_eq!(a.as_str()[..8], b.as_str()[..8]);
    }

    #[test]
    fn should_embed_creation_second_in_prefix() {
        let ts = time::parse("2018-09-19 01:02:03").unwrap();
        let id = TodoId::generate(ts);
        let expected = format!("{:08x}", ts.timestamp());
        assert_eq!(&id.as_str()[..8], expected);
    }

    #[test]
    fn should_parse_valid_id() {
        let id: TodoId = VALID.parse().unwrap();
        assert_eq!(id.as_str(), VALID);
    }

    #[test]
    fn should_normalize_uppercase_to_lowercase() {
        let id: TodoId = VALID.to_ascii_uppercase().parse().unwrap();
        assert_eq!(id.as_str(), VALID);
    }

    #[test]
    fn should_reject_wrong_lengths_and_non_hex() {
        let too_long = format!("{VALID}0");
        for candidate in [
            "",
            "abc",
            &VALID[..23],
            too_long.as_str(),
            "5ba1a7b3e138230b4c3d2f1g",
            "(ba1a7b3e138230b4c3d2f1a",
            "5ba1a7b3e138230b4c3d2f-a",
        ] {
            assert!(
                matches!(
                    candidate.parse::<TodoId>(),
                    Err(ValidationError::InvalidId)
                ),
                "{candidate:?} should be rejected"
            );
        }
    }

    #[test]
    fn should_extract_id_from_final_path_segment() {
        let id = TodoId::from_path(&format!("/todo/{VALID}")).unwrap();
        assert_eq!(id.as_str(), VALID);
    }

    #[test]
    fn should_reject_path_where_id_is_only_a_suffix_of_the_segment() {
        let result = TodoId::from_path(&format!("/todo/xx{VALID}"));
        assert!(matches!(result, Err(ValidationError::InvalidId)));
    }

    #[test]
    fn should_reject_path_without_id() {
        assert!(TodoId::from_path("/todo").is_err());
        assert!(TodoId::from_path("/todo/").is_err());
    }

    #[test]
    fn should_roundtrip_through_serde_json() {
        let id: TodoId = VALID.parse().unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{VALID}\""));
        let parsed: TodoId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn should_fail_deserializing_invalid_id() {
        let result = serde_json::from_str::<TodoId>("\"nope\"");
        assert!(result.is_err());
    }
}
