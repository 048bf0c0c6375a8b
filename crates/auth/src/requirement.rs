use serde::{Deserialize, Serialize};

use crate::{Permission, Role};

/// A value written either as a single item or as a list.
///
/// Route and menu configuration accept both shapes; everything past the
/// boundary works with the normalized `Vec` from [`OneOrMany::into_vec`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(v) => vec![v],
            OneOrMany::Many(v) => v,
        }
    }
}

impl<T> From<T> for OneOrMany<T> {
    fn from(value: T) -> Self {
        OneOrMany::One(value)
    }
}

impl<T> From<Vec<T>> for OneOrMany<T> {
    fn from(value: Vec<T>) -> Self {
        OneOrMany::Many(value)
    }
}

/// Normalized access requirement shared by route guards, menu items and actions.
///
/// - `roles`: the identity's role must be one of these (OR).
/// - `permissions`: the identity must hold at least one of these (OR).
/// - When both are set, both must pass (AND).
///
/// An absent or empty list is "no requirement" for that gate.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "RawAccessRequirement")]
pub struct AccessRequirement {
    #[serde(skip_serializing_if = "Option::is_none")]
    roles: Option<Vec<Role>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    permissions: Option<Vec<Permission>>,
}

impl AccessRequirement {
    /// Any authenticated identity.
    pub fn authenticated() -> Self {
        Self::default()
    }

    pub fn new(
        roles: Option<OneOrMany<Role>>,
        permissions: Option<OneOrMany<Permission>>,
    ) -> Self {
        Self {
            roles: normalize(roles),
            permissions: normalize(permissions),
        }
    }

    pub fn role(roles: impl Into<OneOrMany<Role>>) -> Self {
        Self::new(Some(roles.into()), None)
    }

    pub fn permission(permissions: impl Into<OneOrMany<Permission>>) -> Self {
        Self::new(None, Some(permissions.into()))
    }

    #[must_use]
    pub fn and_role(mut self, roles: impl Into<OneOrMany<Role>>) -> Self {
        self.roles = normalize(Some(roles.into()));
        self
    }

    #[must_use]
    pub fn and_permission(mut self, permissions: impl Into<OneOrMany<Permission>>) -> Self {
        self.permissions = normalize(Some(permissions.into()));
        self
    }

    pub fn roles(&self) -> Option<&[Role]> {
        self.roles.as_deref()
    }

    pub fn permissions(&self) -> Option<&[Permission]> {
        self.permissions.as_deref()
    }

    pub fn is_unrestricted(&self) -> bool {
        self.roles.is_none() && self.permissions.is_none()
    }
}

/// Configuration shape: each gate may be a single value or a list.
#[derive(Deserialize)]
struct RawAccessRequirement {
    #[serde(default)]
    roles: Option<OneOrMany<Role>>,
    #[serde(default)]
    permissions: Option<OneOrMany<Permission>>,
}

impl From<RawAccessRequirement> for AccessRequirement {
    fn from(raw: RawAccessRequirement) -> Self {
        Self::new(raw.roles, raw.permissions)
    }
}

fn normalize<T>(value: Option<OneOrMany<T>>) -> Option<Vec<T>> {
    value.map(OneOrMany::into_vec).filter(|v| !v.is_empty())
}
