use core::str::FromStr;

use serde::{Deserialize, Serialize};

use cmms_core::ValidationError;

/// Organizational role of an authenticated user.
///
/// This is the single canonical role vocabulary for the client. Wire values
/// outside it deserialize to [`Role::Unrecognized`], which holds no
/// permissions, so a role added server-side is denied until the client knows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[serde(rename = "superadmin")]
    SuperAdmin,
    #[serde(rename = "orgadmin")]
    OrgAdmin,
    Manager,
    StaffEmployee,
    Viewer,
    #[serde(other)]
    Unrecognized,
}

impl Role {
    /// Roles an account can actually be assigned.
    pub const CANONICAL: [Role; 5] = [
        Role::SuperAdmin,
        Role::OrgAdmin,
        Role::Manager,
        Role::StaffEmployee,
        Role::Viewer,
    ];

    /// Every value of the type, including [`Role::Unrecognized`].
    pub const ALL: [Role; 6] = [
        Role::SuperAdmin,
        Role::OrgAdmin,
        Role::Manager,
        Role::StaffEmployee,
        Role::Viewer,
        Role::Unrecognized,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "superadmin",
            Role::OrgAdmin => "orgadmin",
            Role::Manager => "manager",
            Role::StaffEmployee => "staff_employee",
            Role::Viewer => "viewer",
            Role::Unrecognized => "unrecognized",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    /// Accepts canonical names only. `"unrecognized"` is not a valid input.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::CANONICAL
            .into_iter()
            .find(|r| r.as_str() == s.trim())
            .ok_or_else(|| ValidationError::invalid("role", format!("unknown role '{s}'")))
    }
}
