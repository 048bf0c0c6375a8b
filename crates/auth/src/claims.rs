use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use cmms_core::{OrganizationId, UserId};

use crate::Role;

/// base64url that accepts payloads with or without `=` padding.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Claims carried in the middle segment of a session token.
///
/// The client never verifies the signature; claims only seed the identity
/// until (or alongside) the identity endpoint answers. Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TokenClaims {
    #[serde(default, deserialize_with = "lenient")]
    pub sub: Option<UserId>,
    #[serde(default, deserialize_with = "lenient")]
    pub role: Option<Role>,
    #[serde(default, deserialize_with = "lenient")]
    pub organization_id: Option<OrganizationId>,
    /// Expiry, seconds since the Unix epoch.
    #[serde(default, deserialize_with = "lenient")]
    pub exp: Option<i64>,
}

impl TokenClaims {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|secs| DateTime::from_timestamp(secs, 0))
    }

    /// True only when an expiry is present and not after `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().is_some_and(|exp| exp <= now)
    }
}

/// Decode the claims of a compact `header.payload.signature` token.
///
/// Returns `None` for anything that is not three segments with a base64url
/// JSON object in the middle. Never panics.
pub fn decode_claims(token: &str) -> Option<TokenClaims> {
    let mut parts = token.trim().split('.');
    let (Some(_header), Some(payload), Some(_signature), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        tracing::debug!("session token is not a three-part token");
        return None;
    };

    let bytes = match PAYLOAD_ENGINE.decode(payload) {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::debug!(error = %err, "session token payload is not base64url");
            return None;
        }
    };

    match serde_json::from_slice::<TokenClaims>(&bytes) {
        Ok(claims) => Some(claims),
        Err(err) => {
            tracing::debug!(error = %err, "session token payload is not a claims object");
            None
        }
    }
}

// A single malformed claim must not discard the others.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}
