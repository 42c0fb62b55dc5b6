//! Admin role check against the role assignment table.

use std::fmt;
use std::sync::Arc;

use tracing::{error, info};

use joeview_core::error::AppError;
use joeview_core::result::AppResult;
use joeview_database::store::RoleStore;
use joeview_entity::admin::{AdminRole, AdminUser};

use crate::session::Caller;

/// Why a caller was not admitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenialReason {
    /// No session resolved.
    Unauthenticated,
    /// The user has no row in the role table.
    NoRoleAssignment,
    /// The stored role is not one of the recognised values.
    UnrecognizedRole(String),
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthenticated => write!(f, "unauthenticated"),
            Self::NoRoleAssignment => write!(f, "no role assignment"),
            Self::UnrecognizedRole(role) => write!(f, "unrecognized role '{role}'"),
        }
    }
}

/// Result of the admin check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminDecision {
    /// The caller holds a recognised admin role.
    Admitted(AdminUser),
    /// The caller may not use the admin API.
    Denied(DenialReason),
}

/// Decides whether a caller may use the admin API.
///
/// A failing role lookup is an error, distinct from a denial: it must not
/// be reported to the caller as "not authorised".
#[derive(Clone)]
pub struct AdminAuthorizer {
    roles: Arc<dyn RoleStore>,
}

impl fmt::Debug for AdminAuthorizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminAuthorizer").finish_non_exhaustive()
    }
}

impl AdminAuthorizer {
    /// Create an authorizer over the elevated role store.
    pub fn new(roles: Arc<dyn RoleStore>) -> Self {
        Self { roles }
    }

    /// Check the caller's admin role.
    pub async fn authorize(&self, caller: &Caller) -> AppResult<AdminDecision> {
        let Some(identity) = caller.identity() else {
            return Ok(deny(DenialReason::Unauthenticated));
        };

        let row = self.roles.find_role(identity.id).await.map_err(|e| {
            error!(
                user_id = %identity.id,
                error = %e,
                details = e.details_or_message(),
                "Admin role lookup failed"
            );
            AppError::internal("Failed to check admin role.")
                .with_details(e.details_or_message().to_string())
        })?;

        let Some(row) = row else {
            info!(user_id = %identity.id, "Admin access denied: no role assignment");
            return Ok(deny(DenialReason::NoRoleAssignment));
        };

        match row.role.parse::<AdminRole>() {
            Ok(role) => {
                info!(user_id = %identity.id, role = %role, "Admin access granted");
                Ok(AdminDecision::Admitted(AdminUser {
                    id: identity.id,
                    email: identity.email.clone(),
                    role,
                }))
            }
            Err(_) => {
                info!(user_id = %identity.id, role = %row.role, "Admin access denied: unrecognized role");
                Ok(deny(DenialReason::UnrecognizedRole(row.role)))
            }
        }
    }
}

fn deny(reason: DenialReason) -> AdminDecision {
    AdminDecision::Denied(reason)
}
