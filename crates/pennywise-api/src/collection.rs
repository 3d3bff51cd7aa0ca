// ── Remote collection names ──
//
// The service stores one collection per entity kind. Wire names are
// camelCase and must not change: existing user data lives under them.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// A named collection on the document service.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum Collection {
    Accounts,
    Transactions,
    Goals,
    BudgetCategories,
}

impl Collection {
    /// All collections in load order.
    pub const ALL: [Self; 4] = [
        Self::Accounts,
        Self::Transactions,
        Self::Goals,
        Self::BudgetCategories,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accounts => "accounts",
            Self::Transactions => "transactions",
            Self::Goals => "goals",
            Self::BudgetCategories => "budgetCategories",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn wire_names_match_display() {
        for collection in Collection::iter() {
            assert_eq!(collection.to_string(), collection.as_str());
            assert_eq!(collection.as_ref(), collection.as_str());
        }
    }

    #[test]
    fn parses_camel_case_name() {
        let parsed: Collection = "budgetCategories".parse().unwrap();
        assert_eq!(parsed, Collection::BudgetCategories);
    }

    #[test]
    fn all_is_in_load_order() {
        let iterated: Vec<Collection> = Collection::iter().collect();
        assert_eq!(iterated, Collection::ALL.to_vec());
    }
}
