//! Default CMMS menu.

use cmms_auth::{Permission::*, Role};

use crate::menu::{MenuCatalog, NavSection, NavigationItem};

pub fn cmms_catalog() -> MenuCatalog {
    let admins = vec![Role::OrgAdmin, Role::SuperAdmin];

    let sections = vec![
        NavSection::new("main", "Overview", 0),
        NavSection::new("operations", "Operations", 10),
        NavSection::new("planning", "Planning", 20),
        NavSection::new("people", "People", 30),
        NavSection::new("insights", "Insights", 40),
        NavSection::new("administration", "Administration", 90).roles(admins.clone()),
        NavSection::new("platform", "Platform", 100).roles(Role::SuperAdmin),
    ];

    let items = vec![
        NavigationItem::new("dashboard", "Dashboard", "/", "main"),
        NavigationItem::new("work-orders", "Work orders", "/work-orders", "operations")
            .permissions(vec![
                CanViewAllWorkOrders,
                CanViewTeamWorkOrders,
                CanViewAssignedWorkOrders,
            ])
            .children(vec![
                NavigationItem::new(
                    "work-orders-all",
                    "All work orders",
                    "/work-orders?scope=all",
                    "operations",
                )
                .permissions(CanViewAllWorkOrders),
                NavigationItem::new(
                    "work-orders-team",
                    "Team work orders",
                    "/work-orders?scope=team",
                    "operations",
                )
                .permissions(CanViewTeamWorkOrders),
                NavigationItem::new(
                    "work-orders-mine",
                    "My work orders",
                    "/work-orders?scope=mine",
                    "operations",
                )
                .permissions(CanViewAssignedWorkOrders),
                NavigationItem::new(
                    "work-orders-new",
                    "New work order",
                    "/work-orders/new",
                    "operations",
                )
                .permissions(CanCreateWorkOrders),
            ]),
        NavigationItem::new("assets", "Assets", "/assets", "operations")
            .permissions(CanViewAssets)
            .children(vec![
                NavigationItem::new("assets-new", "Register asset", "/assets/new", "operations")
                    .permissions(CanManageAssets),
            ]),
        NavigationItem::new("sites", "Sites", "/sites", "operations")
            .permissions(CanViewSites)
            .children(vec![
                NavigationItem::new("sites-new", "Add site", "/sites/new", "operations")
                    .permissions(CanManageSites),
            ]),
        NavigationItem::new("maintenance", "Maintenance schedules", "/maintenance", "planning")
            .permissions(CanViewMaintenanceSchedules)
            .children(vec![
                NavigationItem::new(
                    "maintenance-new",
                    "New schedule",
                    "/maintenance/new",
                    "planning",
                )
                .permissions(CanManageMaintenanceSchedules),
            ]),
        NavigationItem::new("quotes", "Quotes", "/quotes", "planning")
            .permissions(CanViewQuotes)
            .children(vec![
                NavigationItem::new("quotes-new", "New quote", "/quotes/new", "planning")
                    .permissions(CanCreateQuotes),
            ]),
        NavigationItem::new("attendance", "Attendance", "/attendance", "people")
            .permissions(vec![CanViewAttendance, CanManageAttendance]),
        NavigationItem::new("clock-in", "Clock in / out", "/attendance/clock", "people")
            .roles(Role::StaffEmployee)
            .permissions(CanRecordAttendance),
        NavigationItem::new("reports", "Reports", "/reports", "insights")
            .permissions(CanViewReports),
        NavigationItem::new("users", "Users", "/users", "administration")
            .roles(admins.clone())
            .permissions(CanManageUsers),
        NavigationItem::new(
            "organization-settings",
            "Organization settings",
            "/organization/settings",
            "administration",
        )
        .roles(admins)
        .permissions(CanManageOrganizationSettings),
        NavigationItem::new("organizations", "Organizations", "/organizations", "platform")
            .roles(Role::SuperAdmin)
            .permissions(CanManageOrganizations),
    ];

    let shortcuts = vec![
        NavigationItem::new(
            "shortcut-new-work-order",
            "New work order",
            "/work-orders/new",
            "shortcuts",
        )
        .permissions(CanCreateWorkOrders),
        NavigationItem::new("shortcut-clock", "Clock in / out", "/attendance/clock", "shortcuts")
            .roles(Role::StaffEmployee)
            .permissions(CanRecordAttendance),
        NavigationItem::new("shortcut-new-quote", "New quote", "/quotes/new", "shortcuts")
            .permissions(CanCreateQuotes),
        NavigationItem::new("shortcut-reports", "Reports", "/reports", "shortcuts")
            .permissions(CanViewReports),
    ];

    MenuCatalog {
        sections,
        items,
        shortcuts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::build_menu;
    use crate::routes::RouteTable;
    use cmms_auth::{Identity, SessionState};
    use std::sync::Arc;

    fn walk<'a>(items: &'a [NavigationItem], out: &mut Vec<&'a NavigationItem>) {
        for item in items {
            out.push(item);
            if let Some(children) = &item.children {
                walk(children, out);
            }
        }
    }

    #[test]
    fn every_item_section_exists() {
        let catalog = cmms_catalog();
        let mut all = Vec::new();
        walk(&catalog.items, &mut all);
        for item in all {
            assert!(
                catalog.sections.iter().any(|s| s.id == item.section),
                "{} points at unknown section {}",
                item.id,
                item.section
            );
        }
    }

    /// A visible menu link must never lead to a page the guard would block.
    #[test]
    fn visible_links_are_reachable() {
        let catalog = cmms_catalog();
        let routes = RouteTable::cmms();
        for role in Role::ALL {
            let identity = Arc::new(Identity::with_role(role));
            let menu = build_menu(&catalog, Some(identity.as_ref()));
            let session = SessionState::Authenticated(identity);

            let mut links = Vec::new();
            for section in &menu.sections {
                walk(&section.items, &mut links);
            }
            walk(&menu.shortcuts, &mut links);

            for link in links {
                assert!(
                    routes.evaluate(&session, &link.href).is_allowed(),
                    "{} can see {} but cannot open it",
                    role,
                    link.href
                );
            }
        }
    }

    #[test]
    fn viewer_menu() {
        let viewer = Identity::with_role(Role::Viewer);
        let menu = build_menu(&cmms_catalog(), Some(&viewer));
        assert_eq!(
            menu.item_ids(),
            vec!["dashboard", "assets", "sites", "maintenance", "reports"]
        );
        let sections: Vec<_> = menu.sections.iter().map(|s| s.section.id.as_str()).collect();
        assert_eq!(sections, vec!["main", "operations", "planning", "people", "insights"]);
    }

    #[test]
    fn staff_sees_own_work_orders_and_clock() {
        let staff = Identity::with_role(Role::StaffEmployee);
        let menu = build_menu(&cmms_catalog(), Some(&staff));
        let ids = menu.item_ids();
        assert!(ids.contains(&"work-orders-mine"));
        assert!(!ids.contains(&"work-orders-all"));
        assert!(ids.contains(&"clock-in"));
        let shortcuts: Vec<_> = menu.shortcuts.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(shortcuts, vec!["shortcut-clock"]);
    }
}
