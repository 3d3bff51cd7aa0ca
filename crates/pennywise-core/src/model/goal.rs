// ── Savings goal ──

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use pennywise_api::Collection;

use super::common::{Entity, GOAL_PALETTE, lenient_date, lenient_string};
use super::entity_id::EntityId;

/// A savings target fed by expense transactions linked through `goal_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: EntityId,
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
    pub target: Decimal,
    #[serde(default)]
    pub current: Decimal,
    #[serde(deserialize_with = "lenient_date")]
    pub deadline: NaiveDate,
    #[serde(default)]
    pub color: String,
}

impl Goal {
    /// A new goal with nothing saved yet, coloured after the
    /// `existing_goals`-th palette entry.
    pub fn new(
        name: impl Into<String>,
        target: Decimal,
        deadline: NaiveDate,
        existing_goals: usize,
    ) -> Self {
        Self {
            id: EntityId::generate(),
            name: name.into(),
            target,
            current: Decimal::ZERO,
            deadline,
            color: palette_color(existing_goals).to_owned(),
        }
    }
}

/// Palette entry for the n-th goal, wrapping around.
pub fn palette_color(n: usize) -> &'static str {
    GOAL_PALETTE[n % GOAL_PALETTE.len()]
}

impl Entity for Goal {
    const COLLECTION: Collection = Collection::Goals;

    fn id(&self) -> &EntityId {
        &self.id
    }
}
