// ── Transaction domain types ──

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use pennywise_api::Collection;

use super::common::{Entity, GOAL_CATEGORY, OTHER_CATEGORY, lenient_date, lenient_string};
use super::entity_id::EntityId;

/// Direction of a money movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TransactionKind {
    Income,
    Expense,
}

/// A single money movement on one account.
///
/// `amount` is signed: negative for expenses, positive for income.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: EntityId,
    pub account_id: EntityId,
    pub amount: Decimal,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(default = "default_category", deserialize_with = "lenient_string")]
    pub category: String,
    #[serde(deserialize_with = "lenient_date")]
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal_id: Option<EntityId>,
}

fn default_category() -> String {
    OTHER_CATEGORY.into()
}

impl Transaction {
    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }
}

impl Entity for Transaction {
    const COLLECTION: Collection = Collection::Transactions;

    fn id(&self) -> &EntityId {
        &self.id
    }
}

// ── Drafts ──────────────────────────────────────────────────────────

/// User input for a new or edited transaction.
///
/// The amount is entered unsigned; [`TransactionDraft::build`] applies
/// the sign from the kind.
#[derive(Debug, Clone)]
pub struct TransactionDraft {
    pub account_id: EntityId,
    pub amount: Decimal,
    pub kind: TransactionKind,
    pub description: String,
    pub category: String,
    pub date: NaiveDate,
    pub goal_id: Option<EntityId>,
}

impl TransactionDraft {
    /// Materialize the draft under `id`, or a fresh id when `None`.
    ///
    /// Expenses are stored negative, income positive. The goal link only
    /// survives on the reserved goal category.
    pub fn build(self, id: Option<EntityId>) -> Transaction {
        let magnitude = self.amount.abs();
        let amount = match self.kind {
            TransactionKind::Expense => -magnitude,
            TransactionKind::Income => magnitude,
        };
        let goal_id = if self.category == GOAL_CATEGORY {
            self.goal_id
        } else {
            None
        };
        Transaction {
            id: id.unwrap_or_else(EntityId::generate),
            account_id: self.account_id,
            amount,
            description: self.description,
            category: self.category,
            date: self.date,
            kind: self.kind,
            goal_id,
        }
    }
}
