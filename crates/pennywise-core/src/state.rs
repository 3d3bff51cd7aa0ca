// ── Application snapshot ──
//
// The canonical in-memory state. Collections sit behind `Arc` so that a
// new snapshot shares every collection an action did not touch with its
// predecessor; `Arc::ptr_eq` then tells cheaply whether a collection
// changed.

use std::sync::Arc;

use serde::Serialize;

use crate::model::{Account, BudgetCategory, EntityId, Goal, OwnerId, Transaction};

/// Immutable snapshot of the whole application state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub accounts: Arc<Vec<Account>>,
    pub transactions: Arc<Vec<Transaction>>,
    pub goals: Arc<Vec<Goal>>,
    pub budget_categories: Arc<Vec<BudgetCategory>>,
    pub selected_account: Option<EntityId>,
    pub error: Option<String>,
    pub is_loading: bool,
    /// Whose data the collections hold. `None` until a reload applies.
    #[serde(skip)]
    pub loaded_for: Option<OwnerId>,
}

impl Default for AppState {
    /// The initial state: empty and loading until the first reload
    /// completes.
    fn default() -> Self {
        Self {
            accounts: Arc::default(),
            transactions: Arc::default(),
            goals: Arc::default(),
            budget_categories: Arc::default(),
            selected_account: None,
            error: None,
            is_loading: true,
            loaded_for: None,
        }
    }
}

impl AppState {
    pub fn account(&self, id: &EntityId) -> Option<&Account> {
        self.accounts.iter().find(|a| &a.id == id)
    }

    pub fn transaction(&self, id: &EntityId) -> Option<&Transaction> {
        self.transactions.iter().find(|t| &t.id == id)
    }

    pub fn goal(&self, id: &EntityId) -> Option<&Goal> {
        self.goals.iter().find(|g| &g.id == id)
    }

    pub fn budget_category(&self, id: &EntityId) -> Option<&BudgetCategory> {
        self.budget_categories.iter().find(|c| &c.id == id)
    }

    /// The account the selection pointer refers to, if it still exists.
    pub fn selected(&self) -> Option<&Account> {
        self.selected_account.as_ref().and_then(|id| self.account(id))
    }

    /// Whether the four persisted collections are the very same
    /// allocations as in `other`.
    pub fn same_collections(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.accounts, &other.accounts)
            && Arc::ptr_eq(&self.transactions, &other.transactions)
            && Arc::ptr_eq(&self.goals, &other.goals)
            && Arc::ptr_eq(&self.budget_categories, &other.budget_categories)
    }

    /// Cheap identity check used to suppress no-op notifications.
    pub(crate) fn same_as(&self, other: &Self) -> bool {
        self.same_collections(other)
            && self.selected_account == other.selected_account
            && self.error == other.error
            && self.is_loading == other.is_loading
            && self.loaded_for == other.loaded_for
    }
}
