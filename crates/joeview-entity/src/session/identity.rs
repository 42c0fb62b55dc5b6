//! The caller resolved from a request's session.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of the caller for the duration of one request.
///
/// Deserializes directly from the identity provider's user object; all
/// other user attributes are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerIdentity {
    /// User ID.
    pub id: Uuid,
    /// Email address (absent for phone or anonymous sign-ins).
    #[serde(default)]
    pub email: Option<String>,
}
