//! `cmms-navigation`
//!
//! **Responsibility:** route guarding, menu filtering and action visibility.
//!
//! Every decision here delegates to the evaluator in `cmms-auth`; this crate
//! only knows the shape of routes, menus and buttons.

pub mod actions;
pub mod catalog;
pub mod guard;
pub mod menu;
pub mod routes;

pub use actions::{UiAction, is_action_visible, visible_actions};
pub use catalog::cmms_catalog;
pub use guard::{DEFAULT_LOGIN_PATH, GuardOutcome, Guarded, RouteGuard};
pub use menu::{
    Menu, MenuCatalog, MenuSection, NavSection, NavigationItem, build_menu, filter,
    visible_sections,
};
pub use routes::{RouteDefinition, RouteTable};
