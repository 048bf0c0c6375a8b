//! Route guard: decides whether a navigable view may render.

use serde::Serialize;

use cmms_auth::{AccessDenial, AccessRequirement, Permission, Role, SessionState, check_access};

pub const DEFAULT_LOGIN_PATH: &str = "/login";

/// Result of guarding a route for the current session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum GuardOutcome {
    /// Session still hydrating; show a loading state, not the view.
    Loading,
    /// Not signed in. `return_to` is the path that was attempted.
    RedirectToLogin {
        login_path: String,
        return_to: Option<String>,
    },
    RoleDenied {
        actual: Role,
        required: Vec<Role>,
    },
    PermissionDenied {
        required: Vec<Permission>,
    },
    Allowed,
}

impl GuardOutcome {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardOutcome::Allowed)
    }

    /// Text for the denial view. Mentions only what this route requires.
    pub fn denial_message(&self) -> Option<String> {
        match self {
            GuardOutcome::RoleDenied { actual, required } => Some(format!(
                "Access denied. This page requires the role {}; you are signed in as {}. \
                 Contact your administrator if you need access.",
                join_or(required),
                actual
            )),
            GuardOutcome::PermissionDenied { required } => Some(format!(
                "Access denied. This page requires the permission {}. \
                 Contact your administrator if you need access.",
                join_or(required)
            )),
            _ => None,
        }
    }
}

/// What a guarded route resolves to: the view itself, or what to show instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Guarded<V> {
    Render(V),
    Blocked(GuardOutcome),
}

impl<V> Guarded<V> {
    pub fn into_view(self) -> Option<V> {
        match self {
            Guarded::Render(view) => Some(view),
            Guarded::Blocked(_) => None,
        }
    }
}

/// Guard wrapping a single navigable view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteGuard {
    requirement: AccessRequirement,
    login_path: String,
}

impl Default for RouteGuard {
    fn default() -> Self {
        Self::new(AccessRequirement::authenticated())
    }
}

impl RouteGuard {
    pub fn new(requirement: AccessRequirement) -> Self {
        Self {
            requirement,
            login_path: DEFAULT_LOGIN_PATH.to_string(),
        }
    }

    #[must_use]
    pub fn with_login_path(mut self, login_path: impl Into<String>) -> Self {
        self.login_path = login_path.into();
        self
    }

    pub fn requirement(&self) -> &AccessRequirement {
        &self.requirement
    }

    /// Evaluate the guard. Pure: the same state and path give the same outcome.
    ///
    /// Order: loading, authentication, role gate, permission gate.
    pub fn evaluate(&self, session: &SessionState, path: &str) -> GuardOutcome {
        if session.is_loading() {
            return GuardOutcome::Loading;
        }

        let outcome = match check_access(session.identity(), &self.requirement) {
            Ok(()) => GuardOutcome::Allowed,
            Err(AccessDenial::Unauthenticated) => GuardOutcome::RedirectToLogin {
                login_path: self.login_path.clone(),
                return_to: Some(path.to_string())
                    .filter(|p| !p.is_empty() && *p != self.login_path),
            },
            Err(AccessDenial::Role { actual, required }) => {
                GuardOutcome::RoleDenied { actual, required }
            }
            Err(AccessDenial::Permission { required }) => {
                GuardOutcome::PermissionDenied { required }
            }
        };

        if !outcome.is_allowed() {
            tracing::debug!(
                path,
                session = session.name(),
                ?outcome,
                "route guard blocked navigation"
            );
        }
        outcome
    }

    /// Render `view` only if the guard allows it. The closure is not called
    /// otherwise, so a blocked view is never constructed.
    pub fn render<V>(
        &self,
        session: &SessionState,
        path: &str,
        view: impl FnOnce() -> V,
    ) -> Guarded<V> {
        match self.evaluate(session, path) {
            GuardOutcome::Allowed => Guarded::Render(view()),
            blocked => Guarded::Blocked(blocked),
        }
    }
}

fn join_or<T: core::fmt::Display>(items: &[T]) -> String {
    let names: Vec<String> = items.iter().map(|i| format!("'{i}'")).collect();
    match names.split_last() {
        None => String::new(),
        Some((last, [])) => last.clone(),
        Some((last, rest)) => format!("{} or {}", rest.join(", "), last),
    }
}
