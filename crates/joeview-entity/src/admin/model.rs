//! Admin user and role assignment models.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::role::AdminRole;

/// A caller who passed the admin role check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminUser {
    /// User ID from the identity provider.
    pub id: Uuid,
    /// Email address, when the identity provider has one.
    pub email: Option<String>,
    /// Assigned admin role.
    pub role: AdminRole,
}

/// A row of the role assignment table, as selected by the role lookup.
///
/// The role is kept as raw text; the authorizer decides whether it is one
/// of the recognised [`AdminRole`] values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminRoleRow {
    /// Stored role value.
    pub role: String,
}
