//! Static route table for the CMMS client.

use serde::Serialize;

use cmms_auth::{AccessRequirement, Permission, Role, SessionState};

use crate::guard::{DEFAULT_LOGIN_PATH, GuardOutcome, RouteGuard};

/// A navigable route and who may open it.
///
/// `requirement == None` marks a public route (login, password reset).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteDefinition {
    pub pattern: String,
    pub title: String,
    pub requirement: Option<AccessRequirement>,
}

impl RouteDefinition {
    pub fn public(pattern: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            title: title.into(),
            requirement: None,
        }
    }

    pub fn protected(
        pattern: impl Into<String>,
        title: impl Into<String>,
        requirement: AccessRequirement,
    ) -> Self {
        Self {
            pattern: pattern.into(),
            title: title.into(),
            requirement: Some(requirement),
        }
    }

    /// Match a path against the pattern. `:name` segments match any single
    /// non-empty segment; the query string and a trailing slash are ignored.
    pub fn matches(&self, path: &str) -> bool {
        let pattern = segments(&self.pattern);
        let path = segments(path);
        pattern.len() == path.len()
            && pattern
                .iter()
                .zip(&path)
                .all(|(p, s)| p.starts_with(':') || p == s)
    }

    fn specificity(&self) -> usize {
        segments(&self.pattern).iter().filter(|s| !s.starts_with(':')).count()
    }
}

fn segments(path: &str) -> Vec<&str> {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Route table with a guard per route.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<RouteDefinition>,
    login_path: String,
}

impl RouteTable {
    pub fn new(routes: Vec<RouteDefinition>) -> Self {
        Self {
            routes,
            login_path: DEFAULT_LOGIN_PATH.to_string(),
        }
    }

    #[must_use]
    pub fn with_login_path(mut self, login_path: impl Into<String>) -> Self {
        self.login_path = login_path.into();
        self
    }

    pub fn routes(&self) -> &[RouteDefinition] {
        &self.routes
    }

    /// Most specific matching route: the one with the most literal segments.
    pub fn resolve(&self, path: &str) -> Option<&RouteDefinition> {
        self.routes
            .iter()
            .filter(|r| r.matches(path))
            .max_by_key(|r| r.specificity())
    }

    /// Guard for `path`. Unknown paths require sign-in only; public routes
    /// have no guard.
    pub fn guard_for(&self, path: &str) -> Option<RouteGuard> {
        let requirement = match self.resolve(path) {
            Some(route) => route.requirement.clone()?,
            None => AccessRequirement::authenticated(),
        };
        Some(RouteGuard::new(requirement).with_login_path(self.login_path.clone()))
    }

    pub fn evaluate(&self, session: &SessionState, path: &str) -> GuardOutcome {
        match self.guard_for(path) {
            Some(guard) => guard.evaluate(session, path),
            None => GuardOutcome::Allowed,
        }
    }

    /// Routes of the CMMS client.
    pub fn cmms() -> Self {
        use Permission::*;

        let any_work_order_view = || {
            AccessRequirement::permission(vec![
                CanViewAllWorkOrders,
                CanViewAssignedWorkOrders,
                CanViewTeamWorkOrders,
            ])
        };
        let admins = vec![Role::OrgAdmin, Role::SuperAdmin];

        Self::new(vec![
            RouteDefinition::public("/login", "Sign in"),
            RouteDefinition::public("/forgot-password", "Reset password"),
            RouteDefinition::protected("/", "Dashboard", AccessRequirement::authenticated()),
            RouteDefinition::protected(
                "/profile",
                "My profile",
                AccessRequirement::authenticated(),
            ),
            RouteDefinition::protected("/work-orders", "Work orders", any_work_order_view()),
            RouteDefinition::protected(
                "/work-orders/new",
                "New work order",
                AccessRequirement::permission(CanCreateWorkOrders),
            ),
            RouteDefinition::protected("/work-orders/:id", "Work order", any_work_order_view()),
            RouteDefinition::protected(
                "/work-orders/:id/edit",
                "Edit work order",
                AccessRequirement::permission(CanEditWorkOrders),
            ),
            RouteDefinition::protected(
                "/assets",
                "Assets",
                AccessRequirement::permission(CanViewAssets),
            ),
            RouteDefinition::protected(
                "/assets/new",
                "New asset",
                AccessRequirement::permission(CanManageAssets),
            ),
            RouteDefinition::protected(
                "/assets/:id",
                "Asset",
                AccessRequirement::permission(CanViewAssets),
            ),
            RouteDefinition::protected(
                "/assets/:id/edit",
                "Edit asset",
                AccessRequirement::permission(CanManageAssets),
            ),
            RouteDefinition::protected(
                "/sites",
                "Sites",
                AccessRequirement::permission(CanViewSites),
            ),
            RouteDefinition::protected(
                "/sites/new",
                "New site",
                AccessRequirement::permission(CanManageSites),
            ),
            RouteDefinition::protected(
                "/sites/:id",
                "Site",
                AccessRequirement::permission(CanViewSites),
            ),
            RouteDefinition::protected(
                "/maintenance",
                "Maintenance schedules",
                AccessRequirement::permission(CanViewMaintenanceSchedules),
            ),
            RouteDefinition::protected(
                "/maintenance/new",
                "New maintenance schedule",
                AccessRequirement::permission(CanManageMaintenanceSchedules),
            ),
            RouteDefinition::protected(
                "/quotes",
                "Quotes",
                AccessRequirement::permission(CanViewQuotes),
            ),
            RouteDefinition::protected(
                "/quotes/new",
                "New quote",
                AccessRequirement::permission(CanCreateQuotes),
            ),
            RouteDefinition::protected(
                "/quotes/:id/approve",
                "Approve quote",
                AccessRequirement::permission(CanApproveQuotes),
            ),
            RouteDefinition::protected(
                "/attendance",
                "Attendance",
                AccessRequirement::permission(vec![
                    CanViewAttendance,
                    CanRecordAttendance,
                    CanManageAttendance,
                ]),
            ),
            RouteDefinition::protected(
                "/attendance/clock",
                "Clock in / out",
                AccessRequirement::role(Role::StaffEmployee).and_permission(CanRecordAttendance),
            ),
            RouteDefinition::protected(
                "/reports",
                "Reports",
                AccessRequirement::permission(CanViewReports),
            ),
            RouteDefinition::protected(
                "/users",
                "Users",
                AccessRequirement::role(admins.clone()).and_permission(CanManageUsers),
            ),
            RouteDefinition::protected(
                "/organization/settings",
                "Organization settings",
                AccessRequirement::role(admins).and_permission(CanManageOrganizationSettings),
            ),
            RouteDefinition::protected(
                "/organizations",
                "Organizations",
                AccessRequirement::role(Role::SuperAdmin),
            ),
        ])
    }
}
