use std::sync::Arc;

use serde::Serialize;

use crate::{AccessRequirement, Identity, Permission, Role, check_access};

/// Lifecycle of the client session.
///
/// `Uninitialized -> Hydrating -> {Authenticated, Anonymous}`, and
/// `Authenticated -> Anonymous` on logout. Every check made outside
/// `Authenticated` denies.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", content = "identity", rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    Uninitialized,
    Hydrating,
    Authenticated(Arc<Identity>),
    Anonymous,
}

impl SessionState {
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            SessionState::Authenticated(identity) => Some(identity),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }

    /// True until the first hydration attempt has settled.
    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Uninitialized | SessionState::Hydrating)
    }

    pub fn role(&self) -> Option<Role> {
        self.identity().and_then(|i| i.role)
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        crate::has_permission(self.identity(), permission)
    }

    pub fn has_any_permission(&self, permissions: &[Permission]) -> bool {
        crate::has_any_permission(self.identity(), permissions)
    }

    pub fn has_role(&self, roles: &[Role]) -> bool {
        crate::has_role(self.identity(), roles)
    }

    pub fn allows(&self, requirement: &AccessRequirement) -> bool {
        check_access(self.identity(), requirement).is_ok()
    }

    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Uninitialized => "uninitialized",
            SessionState::Hydrating => "hydrating",
            SessionState::Authenticated(_) => "authenticated",
            SessionState::Anonymous => "anonymous",
        }
    }
}
