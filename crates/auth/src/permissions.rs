use core::str::FromStr;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use cmms_core::ValidationError;

/// A single fine-grained capability in the CMMS client.
///
/// Wire form is the `snake_case` name (e.g. `"can_create_work_orders"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    // Work orders
    CanViewAllWorkOrders,
    CanViewTeamWorkOrders,
    CanViewAssignedWorkOrders,
    CanCreateWorkOrders,
    CanEditWorkOrders,
    CanDeleteWorkOrders,
    CanAssignWorkOrders,
    CanUpdateWorkOrderStatus,
    // Assets
    CanViewAssets,
    CanManageAssets,
    // Sites
    CanViewSites,
    CanManageSites,
    // Maintenance schedules
    CanViewMaintenanceSchedules,
    CanManageMaintenanceSchedules,
    // Quotes
    CanViewQuotes,
    CanCreateQuotes,
    CanApproveQuotes,
    // Attendance
    CanViewAttendance,
    CanRecordAttendance,
    CanManageAttendance,
    // Reports
    CanViewReports,
    CanExportReports,
    // Administration
    CanManageUsers,
    CanManageOrganizationSettings,
    CanManageOrganizations,
}

impl Permission {
    pub const ALL: [Permission; 25] = [
        Permission::CanViewAllWorkOrders,
        Permission::CanViewTeamWorkOrders,
        Permission::CanViewAssignedWorkOrders,
        Permission::CanCreateWorkOrders,
        Permission::CanEditWorkOrders,
        Permission::CanDeleteWorkOrders,
        Permission::CanAssignWorkOrders,
        Permission::CanUpdateWorkOrderStatus,
        Permission::CanViewAssets,
        Permission::CanManageAssets,
        Permission::CanViewSites,
        Permission::CanManageSites,
        Permission::CanViewMaintenanceSchedules,
        Permission::CanManageMaintenanceSchedules,
        Permission::CanViewQuotes,
        Permission::CanCreateQuotes,
        Permission::CanApproveQuotes,
        Permission::CanViewAttendance,
        Permission::CanRecordAttendance,
        Permission::CanManageAttendance,
        Permission::CanViewReports,
        Permission::CanExportReports,
        Permission::CanManageUsers,
        Permission::CanManageOrganizationSettings,
        Permission::CanManageOrganizations,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::CanViewAllWorkOrders => "can_view_all_work_orders",
            Permission::CanViewTeamWorkOrders => "can_view_team_work_orders",
            Permission::CanViewAssignedWorkOrders => "can_view_assigned_work_orders",
            Permission::CanCreateWorkOrders => "can_create_work_orders",
            Permission::CanEditWorkOrders => "can_edit_work_orders",
            Permission::CanDeleteWorkOrders => "can_delete_work_orders",
            Permission::CanAssignWorkOrders => "can_assign_work_orders",
            Permission::CanUpdateWorkOrderStatus => "can_update_work_order_status",
            Permission::CanViewAssets => "can_view_assets",
            Permission::CanManageAssets => "can_manage_assets",
            Permission::CanViewSites => "can_view_sites",
            Permission::CanManageSites => "can_manage_sites",
            Permission::CanViewMaintenanceSchedules => "can_view_maintenance_schedules",
            Permission::CanManageMaintenanceSchedules => "can_manage_maintenance_schedules",
            Permission::CanViewQuotes => "can_view_quotes",
            Permission::CanCreateQuotes => "can_create_quotes",
            Permission::CanApproveQuotes => "can_approve_quotes",
            Permission::CanViewAttendance => "can_view_attendance",
            Permission::CanRecordAttendance => "can_record_attendance",
            Permission::CanManageAttendance => "can_manage_attendance",
            Permission::CanViewReports => "can_view_reports",
            Permission::CanExportReports => "can_export_reports",
            Permission::CanManageUsers => "can_manage_users",
            Permission::CanManageOrganizationSettings => "can_manage_organization_settings",
            Permission::CanManageOrganizations => "can_manage_organizations",
        }
    }

    /// Functional area the permission belongs to, used for grouping in audit views.
    pub fn category(&self) -> &'static str {
        match self {
            Permission::CanViewAllWorkOrders
            | Permission::CanViewTeamWorkOrders
            | Permission::CanViewAssignedWorkOrders
            | Permission::CanCreateWorkOrders
            | Permission::CanEditWorkOrders
            | Permission::CanDeleteWorkOrders
            | Permission::CanAssignWorkOrders
            | Permission::CanUpdateWorkOrderStatus => "work_orders",
            Permission::CanViewAssets | Permission::CanManageAssets => "assets",
            Permission::CanViewSites | Permission::CanManageSites => "sites",
            Permission::CanViewMaintenanceSchedules | Permission::CanManageMaintenanceSchedules => {
                "maintenance"
            }
            Permission::CanViewQuotes
            | Permission::CanCreateQuotes
            | Permission::CanApproveQuotes => "quotes",
            Permission::CanViewAttendance
            | Permission::CanRecordAttendance
            | Permission::CanManageAttendance => "attendance",
            Permission::CanViewReports | Permission::CanExportReports => "reports",
            Permission::CanManageUsers
            | Permission::CanManageOrganizationSettings
            | Permission::CanManageOrganizations => "administration",
        }
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .into_iter()
            .find(|p| p.as_str() == s.trim())
            .ok_or_else(|| {
                ValidationError::invalid("permission", format!("unknown permission '{s}'"))
            })
    }
}

/// A set of permissions, iterated in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct PermissionSet(BTreeSet<Permission>);

impl PermissionSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn all() -> Self {
        Permission::ALL.into_iter().collect()
    }

    pub fn of(permissions: &[Permission]) -> Self {
        permissions.iter().copied().collect()
    }

    pub fn contains(&self, permission: Permission) -> bool {
        self.0.contains(&permission)
    }

    pub fn contains_any(&self, permissions: &[Permission]) -> bool {
        permissions.iter().any(|p| self.contains(*p))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_subset(&self, other: &PermissionSet) -> bool {
        self.0.is_subset(&other.0)
    }

    #[must_use]
    pub fn with(mut self, permission: Permission) -> Self {
        self.0.insert(permission);
        self
    }

    #[must_use]
    pub fn without(mut self, permission: Permission) -> Self {
        self.0.remove(&permission);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = Permission> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Serialize for PermissionSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_holds_every_permission_once() {
        assert_eq!(PermissionSet::all().len(), Permission::ALL.len());
        assert_eq!(PermissionSet::of(&[Permission::CanViewAssets; 3]).len(), 1);
    }

    #[test]
    fn wire_names_match_as_str() {
        for p in Permission::ALL {
            let json = serde_json::to_string(&p).unwrap();
            assert_eq!(json, format!("\"{}\"", p.as_str()));
            assert_eq!(p.as_str().parse::<Permission>().unwrap(), p);
        }
    }

    #[test]
    fn set_operations() {
        let set = PermissionSet::of(&[Permission::CanViewAssets, Permission::CanViewSites]);
        assert!(set.contains(Permission::CanViewAssets));
        assert!(!set.contains(Permission::CanManageAssets));
        assert!(set.contains_any(&[Permission::CanManageAssets, Permission::CanViewSites]));
        assert!(!set.contains_any(&[]));
        assert!(set.is_subset(&PermissionSet::all()));
        assert!(!PermissionSet::all().is_subset(&set));
        assert_eq!(set.without(Permission::CanViewSites).len(), 1);
    }

    #[test]
    fn iterates_in_declaration_order() {
        let set =
            PermissionSet::of(&[Permission::CanManageUsers, Permission::CanViewAllWorkOrders]);
        let order: Vec<_> = set.iter().collect();
        assert_eq!(order, vec![Permission::CanViewAllWorkOrders, Permission::CanManageUsers]);
        assert_eq!(
            serde_json::to_value(&set).unwrap(),
            serde_json::json!(["can_view_all_work_orders", "can_manage_users"])
        );
    }
}
