//! User overview projection models.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

/// Columns selected from the overview view, in response order.
pub const OVERVIEW_COLUMNS: &[&str] = &[
    "user_id",
    "email",
    "display_name",
    "plan_id",
    "plan_name",
    "subscription_status",
    "credit_balance",
    "project_count",
    "job_count",
    "generation_count",
    "last_active_at",
];

/// A row of the precomputed user overview view, as the store returns it.
///
/// Numeric columns tolerate nulls, missing values and numeric strings;
/// all of them coerce to zero when no number can be read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserOverviewRow {
    /// User ID.
    pub user_id: Uuid,
    /// Email address.
    #[serde(default)]
    pub email: Option<String>,
    /// Display name.
    #[serde(default)]
    pub display_name: Option<String>,
    /// Current plan identifier.
    #[serde(default)]
    pub plan_id: Option<String>,
    /// Current plan name.
    #[serde(default)]
    pub plan_name: Option<String>,
    /// Subscription status (e.g. `active`, `past_due`).
    #[serde(default)]
    pub subscription_status: Option<String>,
    /// Remaining credits.
    #[serde(default, deserialize_with = "number_or_zero")]
    pub credit_balance: f64,
    /// Number of projects.
    #[serde(default, deserialize_with = "count_or_zero")]
    pub project_count: i64,
    /// Number of jobs.
    #[serde(default, deserialize_with = "count_or_zero")]
    pub job_count: i64,
    /// Number of generations.
    #[serde(default, deserialize_with = "count_or_zero")]
    pub generation_count: i64,
    /// Last activity time.
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub last_active_at: Option<DateTime<Utc>>,
}

/// User summary as exposed by the admin list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOverview {
    /// User ID.
    pub user_id: Uuid,
    /// Email address.
    pub email: Option<String>,
    /// Display name.
    pub display_name: Option<String>,
    /// Plan identifier.
    pub plan_id: Option<String>,
    /// Plan name.
    pub plan_name: Option<String>,
    /// Subscription status.
    pub subscription_status: Option<String>,
    /// Remaining credits.
    pub credit_balance: f64,
    /// Number of projects.
    pub project_count: i64,
    /// Number of jobs.
    pub job_count: i64,
    /// Number of generations.
    pub generation_count: i64,
    /// Last activity time.
    pub last_active_at: Option<DateTime<Utc>>,
}

impl From<UserOverviewRow> for UserOverview {
    fn from(row: UserOverviewRow) -> Self {
        Self {
            user_id: row.user_id,
            email: row.email,
            display_name: row.display_name,
            plan_id: row.plan_id,
            plan_name: row.plan_name,
            subscription_status: row.subscription_status,
            credit_balance: row.credit_balance,
            project_count: row.project_count,
            job_count: row.job_count,
            generation_count: row.generation_count,
            last_active_at: row.last_active_at,
        }
    }
}

/// Read a JSON number, or a string holding one; anything else is zero.
fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite())
}

fn number_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(as_f64(&value).unwrap_or(0.0))
}

fn count_or_zero<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let count = match &value {
        Value::Number(n) => n.as_i64().or_else(|| as_f64(&value).map(|f| f as i64)),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .ok()
            .or_else(|| as_f64(&value).map(|f| f as i64)),
        _ => None,
    };
    Ok(count.unwrap_or(0))
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match Value::deserialize(deserializer)? {
        Value::Null => return Ok(None),
        Value::String(raw) => raw,
        other => {
            warn!(value = %other, "Ignoring non-string last_active_at");
            return Ok(None);
        }
    };

    let parsed = parse_timestamp(&raw);
    if parsed.is_none() {
        // `infinity`, date-only values and the like must not fail the page.
        warn!(value = %raw, "Ignoring unparsable last_active_at");
    }
    Ok(parsed)
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }

    // Timestamps without a zone are stored in UTC.
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    // Postgres renders offsets as `+00`, which RFC 3339 does not allow.
    DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%#z")
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}
