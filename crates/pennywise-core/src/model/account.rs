// ── Account domain types ──

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use pennywise_api::Collection;

use super::common::{Entity, lenient_string};
use super::entity_id::EntityId;

/// Kind of money container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AccountKind {
    Checking,
    Savings,
    Credit,
}

/// A money container owned by the user.
///
/// `balance` tracks the sum of the amounts of the account's transactions;
/// the reducer maintains it incrementally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: EntityId,
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
    pub balance: Decimal,
    #[serde(rename = "type")]
    pub kind: AccountKind,
    #[serde(default = "default_currency", deserialize_with = "lenient_string")]
    pub currency: String,
}

fn default_currency() -> String {
    "EUR".into()
}

impl Account {
    /// A new, empty account with a freshly generated id.
    pub fn open(name: impl Into<String>, kind: AccountKind, currency: impl Into<String>) -> Self {
        Self {
            id: EntityId::generate(),
            name: name.into(),
            balance: Decimal::ZERO,
            kind,
            currency: currency.into(),
        }
    }
}

impl Entity for Account {
    const COLLECTION: Collection = Collection::Accounts;

    fn id(&self) -> &EntityId {
        &self.id
    }
}
