//! Per-action button visibility.

use serde::{Deserialize, Serialize};

use cmms_auth::{AccessRequirement, Identity, Permission, Role, is_satisfied};

/// A UI action whose button is shown or hidden by role/permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UiAction {
    CreateWorkOrder,
    EditWorkOrder,
    DeleteWorkOrder,
    AssignWorkOrder,
    UpdateWorkOrderStatus,
    CreateAsset,
    EditAsset,
    CreateSite,
    EditSite,
    CreateMaintenanceSchedule,
    CreateQuote,
    ApproveQuote,
    RecordAttendance,
    EditAttendance,
    ExportReport,
    InviteUser,
    EditOrganizationSettings,
    SwitchOrganization,
}

impl UiAction {
    pub const ALL: [UiAction; 18] = [
        UiAction::CreateWorkOrder,
        UiAction::EditWorkOrder,
        UiAction::DeleteWorkOrder,
        UiAction::AssignWorkOrder,
        UiAction::UpdateWorkOrderStatus,
        UiAction::CreateAsset,
        UiAction::EditAsset,
        UiAction::CreateSite,
        UiAction::EditSite,
        UiAction::CreateMaintenanceSchedule,
        UiAction::CreateQuote,
        UiAction::ApproveQuote,
        UiAction::RecordAttendance,
        UiAction::EditAttendance,
        UiAction::ExportReport,
        UiAction::InviteUser,
        UiAction::EditOrganizationSettings,
        UiAction::SwitchOrganization,
    ];

    pub fn requirement(&self) -> AccessRequirement {
        use Permission::*;

        match self {
            UiAction::CreateWorkOrder => AccessRequirement::permission(CanCreateWorkOrders),
            UiAction::EditWorkOrder => AccessRequirement::permission(CanEditWorkOrders),
            UiAction::DeleteWorkOrder => AccessRequirement::permission(CanDeleteWorkOrders),
            UiAction::AssignWorkOrder => AccessRequirement::permission(CanAssignWorkOrders),
            UiAction::UpdateWorkOrderStatus => {
                AccessRequirement::permission(vec![CanUpdateWorkOrderStatus, CanEditWorkOrders])
            }
            UiAction::CreateAsset | UiAction::EditAsset => {
                AccessRequirement::permission(CanManageAssets)
            }
            UiAction::CreateSite | UiAction::EditSite => {
                AccessRequirement::permission(CanManageSites)
            }
            UiAction::CreateMaintenanceSchedule => {
                AccessRequirement::permission(CanManageMaintenanceSchedules)
            }
            UiAction::CreateQuote => AccessRequirement::permission(CanCreateQuotes),
            UiAction::ApproveQuote => AccessRequirement::permission(CanApproveQuotes),
            UiAction::RecordAttendance => AccessRequirement::permission(CanRecordAttendance),
            UiAction::EditAttendance => AccessRequirement::permission(CanManageAttendance),
            UiAction::ExportReport => AccessRequirement::permission(CanExportReports),
            UiAction::InviteUser => AccessRequirement::role(vec![Role::OrgAdmin, Role::SuperAdmin])
                .and_permission(CanManageUsers),
            UiAction::EditOrganizationSettings => {
                AccessRequirement::permission(CanManageOrganizationSettings)
            }
            UiAction::SwitchOrganization => AccessRequirement::role(Role::SuperAdmin),
        }
    }
}

pub fn is_action_visible(identity: Option<&Identity>, action: UiAction) -> bool {
    is_satisfied(identity, &action.requirement())
}

/// The subset of `actions` visible to `identity`, in input order.
pub fn visible_actions(identity: Option<&Identity>, actions: &[UiAction]) -> Vec<UiAction> {
    actions
        .iter()
        .copied()
        .filter(|a| is_action_visible(identity, *a))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_sees_no_actions() {
        assert!(visible_actions(None, &UiAction::ALL).is_empty());
    }

    #[test]
    fn superadmin_sees_every_action() {
        let root = Identity::with_role(Role::SuperAdmin);
        assert_eq!(visible_actions(Some(&root), &UiAction::ALL), UiAction::ALL.to_vec());
    }

    #[test]
    fn staff_work_order_buttons() {
        let staff = Identity::with_role(Role::StaffEmployee);
        let shown = visible_actions(
            Some(&staff),
            &[
                UiAction::CreateWorkOrder,
                UiAction::UpdateWorkOrderStatus,
                UiAction::DeleteWorkOrder,
                UiAction::RecordAttendance,
            ],
        );
        assert_eq!(shown, vec![UiAction::UpdateWorkOrderStatus, UiAction::RecordAttendance]);
    }

    #[test]
    fn invite_user_needs_admin_role_and_permission() {
        let manager = Identity::with_role(Role::Manager);
        let org_admin = Identity::with_role(Role::OrgAdmin);
        assert!(!is_action_visible(Some(&manager), UiAction::InviteUser));
        assert!(is_action_visible(Some(&org_admin), UiAction::InviteUser));
    }

    #[test]
    fn only_superadmin_switches_organization() {
        for role in Role::ALL {
            let identity = Identity::with_role(role);
            let visible = is_action_visible(Some(&identity), UiAction::SwitchOrganization);
            assert_eq!(visible, role == Role::SuperAdmin);
        }
    }
}
