//! Identifiers for entities owned by the claims backend
//!
//! The backend hands out opaque identifiers (`CLM-1`, `doc1`, `42`), so each
//! newtype wraps the raw string rather than a UUID. Numeric ids in JSON
//! payloads are accepted and normalised to their decimal string form.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Unsigned(u64),
    Signed(i64),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            RawId::Text(s) => s,
            RawId::Unsigned(n) => n.to_string(),
            RawId::Signed(n) => n.to_string(),
        }
    }
}

macro_rules! define_id {
    ($name:ident, $label:literal) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wraps a raw identifier issued by the backend
            pub fn new(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            /// Returns the raw identifier
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns a human-readable label for the entity kind
            pub fn label() -> &'static str {
                $label
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err(CoreError::invalid_identifier(format!(
                        "{} id must not be empty",
                        $label
                    )));
                }
                Ok(Self(trimmed.to_string()))
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                Self(raw.to_string())
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                Self(raw)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                RawId::deserialize(deserializer).map(|raw| Self(raw.into_string()))
            }
        }
    };
}

define_id!(ClaimId, "claim");
define_id!(DocumentId, "document");
define_id!(PolicyId, "policy");
define_id!(UserId, "user");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_raw_value() {
        let id = ClaimId::new("CLM-1");
        assert_eq!(id.to_string(), "CLM-1");
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let id: DocumentId = "  doc1 ".parse().unwrap();
        assert_eq!(id.as_str(), "doc1");
    }

    #[test]
    fn test_numeric_json_id() {
        let id: PolicyId = serde_json::from_str("42").unwrap();
        assert_eq!(id.as_str(), "42");
    }
}
