use serde::{Deserialize, Serialize};

use cmms_core::{OrganizationId, UserId};

use crate::claims::TokenClaims;
use crate::{Permission, PermissionSet, Role, permissions_for_role};

/// Organization the user belongs to, as listed by the identity endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationSummary {
    pub id: OrganizationId,
    #[serde(default)]
    pub name: Option<String>,
}

/// The authenticated user's runtime view, used for every authorization decision.
///
/// `role == None` means "not authenticated": every check on such an identity
/// denies. Identities are replaced wholesale, never edited field by field.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Identity {
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub organization_id: Option<OrganizationId>,
    #[serde(default)]
    pub organizations: Vec<OrganizationSummary>,
}

impl Identity {
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Identity carrying only a role, mostly useful for checks and tests.
    pub fn with_role(role: Role) -> Self {
        Self {
            role: Some(role),
            ..Self::default()
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.role.is_some()
    }

    /// Effective permissions (empty when unauthenticated).
    pub fn permissions(&self) -> PermissionSet {
        self.role.map(permissions_for_role).unwrap_or_default()
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        crate::has_permission(Some(self), permission)
    }

    pub fn has_role(&self, roles: &[Role]) -> bool {
        crate::has_role(Some(self), roles)
    }

    /// Fill role and organization from token claims where the fetched payload
    /// left them empty. Fetched values always win.
    #[must_use]
    pub fn merge_claims(mut self, claims: Option<&TokenClaims>) -> Self {
        let Some(claims) = claims else {
            return self;
        };
        if self.role.is_none() {
            self.role = claims.role;
        }
        if self.organization_id.is_none() {
            self.organization_id = claims.organization_id.clone();
        }
        if self.user_id.is_none() {
            self.user_id = claims.sub.clone();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_identity_holds_nothing() {
        let id = Identity::anonymous();
        assert!(!id.is_authenticated());
        assert!(id.permissions().is_empty());
    }

    #[test]
    fn deserializes_partial_payload() {
        let id: Identity = serde_json::from_str(
            r#"{"role":"manager","organization_id":12,"email":"m@example.com","extra":true}"#,
        )
        .unwrap();
        assert_eq!(id.role, Some(Role::Manager));
        assert_eq!(id.organization_id.unwrap().as_str(), "12");
        assert!(id.organizations.is_empty());
    }

    #[test]
    fn fetched_values_win_over_claims() {
        let claims = TokenClaims {
            role: Some(Role::Viewer),
            organization_id: Some(OrganizationId::new("from-token").unwrap()),
            ..TokenClaims::default()
        };
        let fetched = Identity {
            role: Some(Role::Manager),
            ..Identity::default()
        };
        let merged = fetched.merge_claims(Some(&claims));
        assert_eq!(merged.role, Some(Role::Manager));
        assert_eq!(merged.organization_id.unwrap().as_str(), "from-token");
    }

    #[test]
    fn claims_fill_missing_role() {
        let claims = TokenClaims {
            role: Some(Role::StaffEmployee),
            ..TokenClaims::default()
        };
        let merged = Identity::anonymous().merge_claims(Some(&claims));
        assert_eq!(merged.role, Some(Role::StaffEmployee));
    }
}
