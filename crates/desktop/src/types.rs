//! Wire types for the CMMS auth endpoints.

use std::fmt;

use serde::{Deserialize, Serialize};

use cmms_auth::{Identity, OrganizationSummary, Role};
use cmms_core::{OrganizationId, UserId, ValidationError, ValidationResult};

/// Body of `POST /auth/login`.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    email: String,
    password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> ValidationResult<Self> {
        let email = email.into().trim().to_string();
        let password = password.into();
        if email.is_empty() {
            return Err(ValidationError::Empty("email"));
        }
        if password.is_empty() {
            return Err(ValidationError::Empty("password"));
        }
        Ok(Self { email, password })
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Response of `POST /auth/login`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Response of `GET /auth/me`.
///
/// The backend has shipped a few spellings of the same fields; aliases cover
/// the ones the client has seen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MeResponse {
    #[serde(default, alias = "user_id")]
    pub id: Option<UserId>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, alias = "full_name")]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default, alias = "organization")]
    pub organization_id: Option<OrganizationId>,
    #[serde(default)]
    pub organizations: Vec<OrganizationSummary>,
}

impl MeResponse {
    pub fn into_identity(self) -> Identity {
        Identity {
            user_id: self.id,
            email: self.email,
            name: self.name,
            role: self.role,
            organization_id: self.organization_id,
            organizations: self.organizations,
        }
    }
}
