// ── Budget category ──

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use pennywise_api::Collection;

use super::common::{Entity, lenient_string};
use super::entity_id::EntityId;

/// A named spending category with a monthly limit.
///
/// Transactions reference a category by `name`, not by id. Renaming a
/// category does not rewrite existing transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetCategory {
    pub id: EntityId,
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
    pub limit: Decimal,
    #[serde(default)]
    pub color: String,
}

impl Entity for BudgetCategory {
    const COLLECTION: Collection = Collection::BudgetCategories;

    fn id(&self) -> &EntityId {
        &self.id
    }
}
