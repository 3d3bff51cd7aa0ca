// ── Common building blocks shared across the entity model ──

use chrono::{DateTime, NaiveDate};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use pennywise_api::Collection;

use super::entity_id::EntityId;

/// Category assigned to transactions detached from a deleted goal or
/// budget category.
pub const OTHER_CATEGORY: &str = "Other";

/// Reserved category of transactions that feed a savings goal.
pub const GOAL_CATEGORY: &str = "Goal";

/// Category of the two legs of an account-to-account transfer.
pub const TRANSFER_CATEGORY: &str = "Transfer";

/// Fallback colours for spending categories without a budget entry.
pub const CATEGORY_PALETTE: [&str; 8] = [
    "#4F46E5", "#10B981", "#F59E0B", "#EF4444", "#6366F1", "#8B5CF6", "#EC4899", "#14B8A6",
];

/// Colours handed out to new goals in rotation.
pub const GOAL_PALETTE: [&str; 5] = ["#4F46E5", "#10B981", "#F59E0B", "#EF4444", "#8B5CF6"];

/// A record stored in one of the four remote collections.
pub trait Entity {
    /// Collection holding records of this kind.
    const COLLECTION: Collection;

    fn id(&self) -> &EntityId;
}

/// Accept a JSON string or number as a string.
pub(crate) fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!("expected string, got {other}"))),
    }
}

/// Accept either a plain `YYYY-MM-DD` date or a full RFC 3339 timestamp.
pub(crate) fn lenient_date<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<NaiveDate, D::Error> {
    let raw = String::deserialize(deserializer)?;
    if let Ok(date) = NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.date_naive())
        .map_err(|_| D::Error::custom(format!("invalid date: {raw}")))
}
