//! Navigation filter.
//!
//! Prunes the static menu tree to what an identity may see. Item visibility
//! follows the same rules as route guards (role gate AND permission gate, OR
//! within each). Sections are gated on their own `roles` list and sorted by
//! their explicit `order`; a section is never hidden or shown because of the
//! items inside it.

use serde::{Deserialize, Serialize};

use cmms_auth::{AccessRequirement, Identity, OneOrMany, Permission, Role, is_satisfied};

/// A node of the static navigation tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationItem {
    pub id: String,
    pub label: String,
    pub href: String,
    pub section: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_roles: Option<Vec<Role>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_permissions: Option<Vec<Permission>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<NavigationItem>>,
}

impl NavigationItem {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        href: impl Into<String>,
        section: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            href: href.into(),
            section: section.into(),
            required_roles: None,
            required_permissions: None,
            children: None,
        }
    }

    #[must_use]
    pub fn roles(mut self, roles: impl Into<OneOrMany<Role>>) -> Self {
        self.required_roles = Some(roles.into().into_vec());
        self
    }

    #[must_use]
    pub fn permissions(mut self, permissions: impl Into<OneOrMany<Permission>>) -> Self {
        self.required_permissions = Some(permissions.into().into_vec());
        self
    }

    #[must_use]
    pub fn children(mut self, children: Vec<NavigationItem>) -> Self {
        self.children = Some(children);
        self
    }

    pub fn requirement(&self) -> AccessRequirement {
        AccessRequirement::new(
            self.required_roles.clone().map(OneOrMany::Many),
            self.required_permissions.clone().map(OneOrMany::Many),
        )
    }

    pub fn is_visible_to(&self, identity: Option<&Identity>) -> bool {
        is_satisfied(identity, &self.requirement())
    }
}

/// Filter `tree` for `identity`, recursing into children of retained nodes.
///
/// A retained parent keeps its place even if all of its children are
/// filtered out. An anonymous identity sees nothing.
pub fn filter(tree: &[NavigationItem], identity: Option<&Identity>) -> Vec<NavigationItem> {
    tree.iter()
        .filter(|item| item.is_visible_to(identity))
        .map(|item| NavigationItem {
            children: item.children.as_deref().map(|children| filter(children, identity)),
            ..item.clone()
        })
        .collect()
}

/// A navigation group with its own role gate and fixed display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavSection {
    pub id: String,
    pub title: String,
    pub order: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<Role>>,
}

impl NavSection {
    pub fn new(id: impl Into<String>, title: impl Into<String>, order: u32) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            order,
            roles: None,
        }
    }

    #[must_use]
    pub fn roles(mut self, roles: impl Into<OneOrMany<Role>>) -> Self {
        self.roles = Some(roles.into().into_vec());
        self
    }

    pub fn is_visible_to(&self, identity: Option<&Identity>) -> bool {
        let requirement = AccessRequirement::new(self.roles.clone().map(OneOrMany::Many), None);
        is_satisfied(identity, &requirement)
    }
}

/// Sections visible to `identity`, sorted by `order` (ties keep input order).
pub fn visible_sections<'a>(
    sections: &'a [NavSection],
    identity: Option<&Identity>,
) -> Vec<&'a NavSection> {
    let mut visible: Vec<&NavSection> =
        sections.iter().filter(|s| s.is_visible_to(identity)).collect();
    visible.sort_by_key(|s| s.order);
    visible
}

/// The whole static menu: sections, their items, and quick-link shortcuts.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MenuCatalog {
    pub sections: Vec<NavSection>,
    pub items: Vec<NavigationItem>,
    #[serde(default)]
    pub shortcuts: Vec<NavigationItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuSection {
    #[serde(flatten)]
    pub section: NavSection,
    pub items: Vec<NavigationItem>,
}

/// A rendered menu for one identity.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Menu {
    pub sections: Vec<MenuSection>,
    pub shortcuts: Vec<NavigationItem>,
}

impl Menu {
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty() && self.shortcuts.is_empty()
    }

    /// Ids of every visible item, depth first. Shortcuts excluded.
    pub fn item_ids(&self) -> Vec<&str> {
        fn walk<'a>(items: &'a [NavigationItem], out: &mut Vec<&'a str>) {
            for item in items {
                out.push(&item.id);
                if let Some(children) = &item.children {
                    walk(children, out);
                }
            }
        }

        let mut out = Vec::new();
        for section in &self.sections {
            walk(&section.items, &mut out);
        }
        out
    }
}

/// Build the menu for `identity`: visible sections in order, each with its
/// filtered items; plus filtered shortcuts.
///
/// Visible sections are kept even when none of their items survive.
pub fn build_menu(catalog: &MenuCatalog, identity: Option<&Identity>) -> Menu {
    let items = filter(&catalog.items, identity);

    let sections = visible_sections(&catalog.sections, identity)
        .into_iter()
        .map(|section| MenuSection {
            section: section.clone(),
            items: items.iter().filter(|i| i.section == section.id).cloned().collect(),
        })
        .collect();

    Menu {
        sections,
        shortcuts: filter(&catalog.shortcuts, identity),
    }
}
