//! Strongly-typed identifiers issued by the CMMS API.
//!
//! The API owns identifier formats; the client only requires them to be
//! non-empty and free of surrounding whitespace. Numeric identifiers on the
//! wire are accepted and kept in their decimal form.

use core::str::FromStr;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ValidationError;

/// Identifier of an organization (the API's tenancy boundary).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct OrganizationId(String);

/// Identifier of a user account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct UserId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}

macro_rules! impl_string_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
                let value = value.into();
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    return Err(ValidationError::invalid_id(format!("{}: empty", $name)));
                }
                if trimmed.len() != value.len() {
                    return Ok(Self(trimmed.to_string()));
                }
                Ok(Self(value))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $t {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl<'de> Deserialize<'de> for $t {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let raw = RawId::deserialize(deserializer)?;
                Self::new(raw.into_string()).map_err(serde::de::Error::custom)
            }
        }

        impl AsRef<str> for $t {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

impl_string_newtype!(OrganizationId, "OrganizationId");
impl_string_newtype!(UserId, "UserId");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_identifiers() {
        assert!(OrganizationId::new("").is_err());
        assert!(UserId::new("   ").is_err());
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let id = OrganizationId::new(" org-42 ").unwrap();
        assert_eq!(id.as_str(), "org-42");
    }

    #[test]
    fn accepts_numeric_wire_ids() {
        let id: OrganizationId = serde_json::from_str("42").unwrap();
        assert_eq!(id.as_str(), "42");
        assert!(serde_json::from_str::<OrganizationId>("\"\"").is_err());
    }

    #[test]
    fn serializes_as_bare_string() {
        let id: UserId = "u-7".parse().unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"u-7\"");
    }
}
