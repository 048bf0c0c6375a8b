//! Permission evaluator.
//!
//! - No IO
//! - No panics
//! - Missing identity or missing role denies everything

use serde::Serialize;

use crate::{AccessRequirement, Identity, Permission, Role, permissions_for_role};

/// True iff the identity's role holds `permission`.
pub fn has_permission(identity: Option<&Identity>, permission: Permission) -> bool {
    match identity.and_then(|i| i.role) {
        Some(role) => permissions_for_role(role).contains(permission),
        None => false,
    }
}

/// True iff the identity's role holds at least one of `permissions`.
///
/// OR over the list, so an empty list yields `false`. Callers that model an
/// empty list as "no requirement" must short-circuit before calling this;
/// [`check_access`] does.
pub fn has_any_permission(identity: Option<&Identity>, permissions: &[Permission]) -> bool {
    match identity.and_then(|i| i.role) {
        Some(role) => permissions_for_role(role).contains_any(permissions),
        None => false,
    }
}

/// True iff the identity's role is one of `roles`.
pub fn has_role(identity: Option<&Identity>, roles: &[Role]) -> bool {
    match identity.and_then(|i| i.role) {
        Some(role) => roles.contains(&role),
        None => false,
    }
}

/// Why a requirement was not met.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AccessDenial {
    /// No identity, or an identity without a role.
    Unauthenticated,
    /// The role gate failed.
    Role {
        actual: Role,
        required: Vec<Role>,
    },
    /// The permission gate failed. Lists the requirement only, never the
    /// identity's other permissions.
    Permission { required: Vec<Permission> },
}

/// Evaluate a requirement: role gate first, then permission gate.
///
/// Both gates must pass when both are present; within each gate any listed
/// value suffices.
pub fn check_access(
    identity: Option<&Identity>,
    requirement: &AccessRequirement,
) -> Result<(), AccessDenial> {
    let Some(role) = identity.and_then(|i| i.role) else {
        return Err(AccessDenial::Unauthenticated);
    };

    if let Some(roles) = requirement.roles() {
        if !has_role(identity, roles) {
            return Err(AccessDenial::Role {
                actual: role,
                required: roles.to_vec(),
            });
        }
    }

    if let Some(permissions) = requirement.permissions() {
        if !has_any_permission(identity, permissions) {
            return Err(AccessDenial::Permission {
                required: permissions.to_vec(),
            });
        }
    }

    Ok(())
}

/// Convenience boolean form of [`check_access`].
pub fn is_satisfied(identity: Option<&Identity>, requirement: &AccessRequirement) -> bool {
    check_access(identity, requirement).is_ok()
}

/// Detailed explanation of an authorization decision.
///
/// Carries enough for a denial view or a debug log line: what was required,
/// what role was held, and which gate failed.
#[derive(Debug, Clone, Serialize)]
pub struct AccessExplanation {
    pub granted: bool,
    pub reason: String,
    pub held_role: Option<Role>,
    pub required_roles: Vec<Role>,
    pub required_permissions: Vec<Permission>,
    pub denial: Option<AccessDenial>,
}

/// Explain why a requirement is (or is not) satisfied by `identity`.
pub fn explain_access(
    identity: Option<&Identity>,
    requirement: &AccessRequirement,
) -> AccessExplanation {
    let held_role = identity.and_then(|i| i.role);
    let required_roles = requirement.roles().map(<[Role]>::to_vec).unwrap_or_default();
    let required_permissions = requirement
        .permissions()
        .map(<[Permission]>::to_vec)
        .unwrap_or_default();

    let (granted, reason, denial) = match check_access(identity, requirement) {
        Ok(()) if requirement.is_unrestricted() => {
            (true, "no requirement beyond sign-in".to_string(), None)
        }
        Ok(()) => (
            true,
            format!(
                "role '{}' satisfies the requirement",
                held_role.map(|r| r.as_str()).unwrap_or_default()
            ),
            None,
        ),
        Err(denial) => {
            let reason = match &denial {
                AccessDenial::Unauthenticated => "not signed in".to_string(),
                AccessDenial::Role { actual, required } => format!(
                    "role '{}' is not one of [{}]",
                    actual,
                    join(required)
                ),
                AccessDenial::Permission { required } => format!(
                    "requires one of [{}]",
                    join(required)
                ),
            };
            (false, reason, Some(denial))
        }
    };

    AccessExplanation {
        granted,
        reason,
        held_role,
        required_roles,
        required_permissions,
        denial,
    }
}

fn join<T: core::fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
