//! Static role → permission mapping.
//!
//! The mapping is total over [`Role`]: every variant has an arm, and
//! [`Role::Unrecognized`] maps to the empty set so callers default to deny.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{Permission, PermissionSet, Role};

use Permission::*;

const MANAGER: &[Permission] = &[
    CanViewAllWorkOrders,
    CanViewTeamWorkOrders,
    CanCreateWorkOrders,
    CanEditWorkOrders,
    CanAssignWorkOrders,
    CanUpdateWorkOrderStatus,
    CanViewAssets,
    CanManageAssets,
    CanViewSites,
    CanViewMaintenanceSchedules,
    CanManageMaintenanceSchedules,
    CanViewQuotes,
    CanCreateQuotes,
    CanViewAttendance,
    CanRecordAttendance,
    CanManageAttendance,
    CanViewReports,
    CanExportReports,
];

const STAFF_EMPLOYEE: &[Permission] = &[
    CanViewAssignedWorkOrders,
    CanUpdateWorkOrderStatus,
    CanViewAssets,
    CanViewSites,
    CanViewMaintenanceSchedules,
    CanRecordAttendance,
];

const VIEWER: &[Permission] = &[
    CanViewAssets,
    CanViewSites,
    CanViewMaintenanceSchedules,
    CanViewReports,
];

/// Permissions held by `role`.
pub fn permissions_for_role(role: Role) -> PermissionSet {
    match role {
        Role::SuperAdmin => PermissionSet::all(),
        Role::OrgAdmin => PermissionSet::all().without(CanManageOrganizations),
        Role::Manager => PermissionSet::of(MANAGER),
        Role::StaffEmployee => PermissionSet::of(STAFF_EMPLOYEE),
        Role::Viewer => PermissionSet::of(VIEWER),
        Role::Unrecognized => PermissionSet::empty(),
    }
}

/// Canonical roles holding `permission`, in [`Role::CANONICAL`] order.
pub fn roles_granting(permission: Permission) -> Vec<Role> {
    Role::CANONICAL
        .into_iter()
        .filter(|r| permissions_for_role(*r).contains(permission))
        .collect()
}

/// Role definition with its granted permissions (for audit/display).
#[derive(Debug, Clone, Serialize)]
pub struct RoleDefinition {
    pub role: Role,
    pub description: &'static str,
    pub permissions: PermissionSet,
}

/// Permission definition (for audit/display).
#[derive(Debug, Clone, Serialize)]
pub struct PermissionDefinition {
    pub permission: Permission,
    pub category: &'static str,
    pub description: String,
    pub granted_to: Vec<Role>,
}

/// Complete view of the role/permission model, for admin screens and audits.
#[derive(Debug, Clone, Serialize)]
pub struct RbacRegistry {
    pub roles: Vec<RoleDefinition>,
    pub permissions: BTreeMap<Permission, PermissionDefinition>,
}

impl RbacRegistry {
    pub fn build() -> Self {
        let roles = Role::CANONICAL
            .into_iter()
            .map(|role| RoleDefinition {
                role,
                description: role_description(role),
                permissions: permissions_for_role(role),
            })
            .collect();

        let permissions = Permission::ALL
            .into_iter()
            .map(|permission| {
                (
                    permission,
                    PermissionDefinition {
                        permission,
                        category: permission.category(),
                        description: permission_description(permission),
                        granted_to: roles_granting(permission),
                    },
                )
            })
            .collect();

        Self { roles, permissions }
    }

    /// Permissions in a category (e.g. `"work_orders"`), in declaration order.
    pub fn permissions_in_category(&self, category: &str) -> Vec<Permission> {
        self.permissions
            .values()
            .filter(|d| d.category == category)
            .map(|d| d.permission)
            .collect()
    }
}

fn role_description(role: Role) -> &'static str {
    match role {
        Role::SuperAdmin => "Platform administrator across all organizations",
        Role::OrgAdmin => "Administrator of a single organization",
        Role::Manager => "Operations manager: plans, assigns and reviews maintenance work",
        Role::StaffEmployee => "Field staff: works assigned orders and records attendance",
        Role::Viewer => "Read-only access to assets, sites, schedules and reports",
        Role::Unrecognized => "Role not known to this client; holds no permissions",
    }
}

// "can_view_all_work_orders" -> "View all work orders"
fn permission_description(permission: Permission) -> String {
    let name = permission.as_str();
    let name = name.strip_prefix("can_").unwrap_or(name);
    let mut text = name.replace('_', " ");
    if let Some(first) = text.get(0..1) {
        let upper = first.to_uppercase();
        text.replace_range(0..1, &upper);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn viewer_holds_no_work_order_view_permission() {
        let viewer = permissions_for_role(Role::Viewer);
        assert!(!viewer.contains_any(&[
            CanViewAllWorkOrders,
            CanViewAssignedWorkOrders,
            CanViewTeamWorkOrders,
        ]));
    }

    #[test]
    fn unrecognized_role_holds_nothing() {
        assert!(permissions_for_role(Role::Unrecognized).is_empty());
    }

    #[test]
    fn roles_are_ordered_by_privilege() {
        let chain = [
            Role::Viewer,
            Role::Manager,
            Role::OrgAdmin,
            Role::SuperAdmin,
        ];
        for pair in chain.windows(2) {
            let lower = permissions_for_role(pair[0]);
            let higher = permissions_for_role(pair[1]);
            assert!(lower.is_subset(&higher), "{} ⊄ {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn only_superadmin_manages_organizations() {
        assert_eq!(roles_granting(CanManageOrganizations), vec![Role::SuperAdmin]);
    }

    #[test]
    fn registry_lists_every_permission_with_description() {
        let registry = RbacRegistry::build();
        assert_eq!(registry.roles.len(), Role::CANONICAL.len());
        assert_eq!(registry.permissions.len(), Permission::ALL.len());
        assert_eq!(
            registry.permissions[&CanViewAllWorkOrders].description,
            "View all work orders"
        );
        assert_eq!(registry.permissions_in_category("quotes").len(), 3);
    }

    proptest! {
        #[test]
        fn every_role_maps_into_the_global_set(idx in 0usize..Role::ALL.len()) {
            let role = Role::ALL[idx];
            let set = permissions_for_role(role);
            prop_assert!(set.is_subset(&PermissionSet::all()));
            prop_assert_eq!(set, permissions_for_role(role));
        }
    }
}
