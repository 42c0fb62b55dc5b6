//! Admin role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Roles recognised in the admin role table.
///
/// Any stored value outside this set denies access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    /// Platform owner.
    Owner,
    /// Customer support staff.
    Support,
    /// Read-only auditor.
    ReadOnly,
}

impl AdminRole {
    /// All recognised roles.
    pub const ALL: [AdminRole; 3] = [Self::Owner, Self::Support, Self::ReadOnly];

    /// Return the role as stored in the role table.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Support => "support",
            Self::ReadOnly => "read_only",
        }
    }
}

impl fmt::Display for AdminRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AdminRole {
    type Err = joeview_core::AppError;

    /// Matching is exact: stored values are compared byte for byte.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(Self::Owner),
            "support" => Ok(Self::Support),
            "read_only" => Ok(Self::ReadOnly),
            _ => Err(joeview_core::AppError::validation(format!(
                "Invalid admin role: '{s}'. Expected one of: owner, support, read_only"
            ))),
        }
    }
}
