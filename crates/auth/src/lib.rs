//! `cmms-auth`
//!
//! **Responsibility:** role-based access control for the CMMS client.
//!
//! Pure and IO-free: roles, permissions, the role → permission registry, the
//! evaluator, token claims decoding and the session state the rest of the
//! client reads. The CMMS API remains the real enforcement boundary; nothing
//! here is a security control.

pub mod authorize;
pub mod claims;
pub mod identity;
pub mod permissions;
pub mod registry;
pub mod requirement;
pub mod roles;
pub mod session;

pub use authorize::{
    AccessDenial, AccessExplanation, check_access, explain_access, has_any_permission,
    has_permission, has_role, is_satisfied,
};
pub use claims::{TokenClaims, decode_claims};
pub use identity::{Identity, OrganizationSummary};
pub use permissions::{Permission, PermissionSet};
pub use registry::{RbacRegistry, permissions_for_role, roles_granting};
pub use requirement::{AccessRequirement, OneOrMany};
pub use roles::Role;
pub use session::SessionState;
