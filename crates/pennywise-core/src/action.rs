// ── Reducer actions ──

use strum::IntoStaticStr;

use crate::model::{Account, BudgetCategory, EntityId, Goal, OwnerId, Transaction};

/// Every state transition the reducer understands.
#[derive(Debug, Clone, PartialEq, IntoStaticStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    // ── Transactions ─────────────────────────────────────────────────
    AddTransaction(Transaction),
    UpdateTransaction(Transaction),
    DeleteTransaction(EntityId),

    // ── Accounts ─────────────────────────────────────────────────────
    AddAccount(Account),
    DeleteAccount(EntityId),
    SelectAccount(Option<EntityId>),

    // ── Goals ────────────────────────────────────────────────────────
    AddGoal(Goal),
    UpdateGoal(Goal),
    DeleteGoal(EntityId),

    // ── Budget categories ────────────────────────────────────────────
    AddBudgetCategory(BudgetCategory),
    UpdateBudgetCategory(BudgetCategory),
    DeleteBudgetCategory(EntityId),

    // ── Lifecycle ────────────────────────────────────────────────────
    SetData(DataSnapshot),
    SetError(Option<String>),
    SetLoading(bool),
    ResetData,
}

impl Action {
    /// Stable name for logging.
    pub fn name(&self) -> &'static str {
        self.into()
    }
}

/// Result of a completed reload: the four collections plus the selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataSnapshot {
    pub accounts: Vec<Account>,
    pub transactions: Vec<Transaction>,
    pub goals: Vec<Goal>,
    pub budget_categories: Vec<BudgetCategory>,
    pub selected_account: Option<EntityId>,
    /// The user the collections were queried for.
    pub owner: Option<OwnerId>,
}
