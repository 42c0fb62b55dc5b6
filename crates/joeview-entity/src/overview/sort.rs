//! Sort keys accepted by the user list.

use serde::{Deserialize, Serialize};
use std::fmt;

use joeview_core::types::SortField;

/// Sort order for the user list. Exactly one applies per query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserSort {
    /// Most recently active first.
    #[default]
    LastActiveAtDesc,
    /// Least recently active first.
    LastActiveAtAsc,
    /// Highest credit balance first.
    CreditsDesc,
    /// Lowest credit balance first.
    CreditsAsc,
}

impl UserSort {
    /// Parse a `sort` query value; unknown or missing values use the default.
    pub fn from_param(raw: Option<&str>) -> Self {
        match raw {
            Some("last_active_at_asc") => Self::LastActiveAtAsc,
            Some("credits_desc") => Self::CreditsDesc,
            Some("credits_asc") => Self::CreditsAsc,
            _ => Self::LastActiveAtDesc,
        }
    }

    /// The query value naming this sort.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LastActiveAtDesc => "last_active_at_desc",
            Self::LastActiveAtAsc => "last_active_at_asc",
            Self::CreditsDesc => "credits_desc",
            Self::CreditsAsc => "credits_asc",
        }
    }

    /// Column and direction on the overview view.
    pub fn sort_field(&self) -> SortField {
        match self {
            Self::LastActiveAtDesc => SortField::desc("last_active_at"),
            Self::LastActiveAtAsc => SortField::asc("last_active_at"),
            Self::CreditsDesc => SortField::desc("credit_balance"),
            Self::CreditsAsc => SortField::asc("credit_balance"),
        }
    }
}

impl fmt::Display for UserSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
