// ── Reducer ──
//
// Pure `(state, action) -> state` transition function. Never mutates the
// input snapshot and never fails: actions that reference missing records
// degrade to no-ops for that part of the transition, and so do balance
// or goal adjustments that would overflow.

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::action::{Action, DataSnapshot};
use crate::model::{Entity, EntityId, OTHER_CATEGORY, Transaction};
use crate::state::AppState;

/// Compute the snapshot that follows `state` once `action` is applied.
pub fn reduce(state: &AppState, action: Action) -> AppState {
    match action {
        Action::AddTransaction(tx) => add_transaction(state, tx),
        Action::UpdateTransaction(tx) => update_transaction(state, tx),
        Action::DeleteTransaction(id) => delete_transaction(state, &id),

        Action::AddAccount(account) => {
            let mut next = state.clone();
            if next.selected_account.is_none() {
                next.selected_account = Some(account.id.clone());
            }
            next.accounts = appended(&state.accounts, account);
            next
        }
        Action::DeleteAccount(id) => delete_account(state, &id),
        Action::SelectAccount(id) => AppState {
            selected_account: id,
            ..state.clone()
        },

        Action::AddGoal(goal) => AppState {
            goals: appended(&state.goals, goal),
            ..state.clone()
        },
        Action::UpdateGoal(goal) => AppState {
            goals: replaced(&state.goals, goal),
            ..state.clone()
        },
        Action::DeleteGoal(id) => delete_goal(state, &id),

        Action::AddBudgetCategory(category) => AppState {
            budget_categories: appended(&state.budget_categories, category),
            ..state.clone()
        },
        Action::UpdateBudgetCategory(category) => AppState {
            budget_categories: replaced(&state.budget_categories, category),
            ..state.clone()
        },
        Action::DeleteBudgetCategory(id) => delete_budget_category(state, &id),

        Action::SetData(snapshot) => set_data(snapshot),
        Action::SetError(error) => AppState {
            error,
            is_loading: false,
            ..state.clone()
        },
        Action::SetLoading(is_loading) => AppState {
            is_loading,
            ..state.clone()
        },
        Action::ResetData => AppState::default(),
    }
}

// ── Transactions ─────────────────────────────────────────────────────

fn add_transaction(state: &AppState, tx: Transaction) -> AppState {
    let mut next = state.clone();
    next.accounts = modified(&state.accounts, &tx.account_id, |acc| {
        acc.balance = added(acc.balance, tx.amount);
    });
    if let Some(goal_id) = tx.goal_id.as_ref().filter(|_| tx.is_expense()) {
        next.goals = modified(&state.goals, goal_id, |goal| {
            goal.current = added(goal.current, tx.amount.abs());
        });
    }
    next.transactions = appended(&state.transactions, tx);
    next
}

/// Only the balance of the transaction's current account is adjusted.
/// Moving a transaction to another account leaves the old account's
/// balance untouched.
fn update_transaction(state: &AppState, tx: Transaction) -> AppState {
    let Some(old) = state.transaction(&tx.id) else {
        return state.clone();
    };

    let mut next = state.clone();
    if let Some(delta) = tx.amount.checked_sub(old.amount) {
        next.accounts = modified(&state.accounts, &tx.account_id, |acc| {
            acc.balance = added(acc.balance, delta);
        });
    }

    let mut goals = Arc::clone(&state.goals);
    if let Some(old_goal) = &old.goal_id {
        let removed = old.amount.abs();
        goals = modified(&goals, old_goal, |goal| {
            goal.current = subtracted(goal.current, removed);
        });
    }
    if let Some(new_goal) = &tx.goal_id {
        let amount = tx.amount.abs();
        goals = modified(&goals, new_goal, |goal| {
            goal.current = added(goal.current, amount);
        });
    }
    next.goals = goals;

    next.transactions = replaced(&state.transactions, tx);
    next
}

fn delete_transaction(state: &AppState, id: &EntityId) -> AppState {
    let Some(tx) = state.transaction(id) else {
        return state.clone();
    };

    let mut next = state.clone();
    next.accounts = modified(&state.accounts, &tx.account_id, |acc| {
        acc.balance = subtracted(acc.balance, tx.amount);
    });
    if let Some(goal_id) = &tx.goal_id {
        next.goals = modified(&state.goals, goal_id, |goal| {
            goal.current = subtracted(goal.current, tx.amount.abs());
        });
    }
    next.transactions = Arc::new(
        state
            .transactions
            .iter()
            .filter(|t| &t.id != id)
            .cloned()
            .collect(),
    );
    next
}

// ── Accounts ─────────────────────────────────────────────────────────

fn delete_account(state: &AppState, id: &EntityId) -> AppState {
    let mut next = state.clone();
    next.accounts = Arc::new(
        state
            .accounts
            .iter()
            .filter(|a| &a.id != id)
            .cloned()
            .collect(),
    );
    next.transactions = Arc::new(
        state
            .transactions
            .iter()
            .filter(|t| &t.account_id != id)
            .cloned()
            .collect(),
    );
    if state.selected_account.as_ref() == Some(id) {
        next.selected_account = next.accounts.first().map(|a| a.id.clone());
    }
    next
}

// ── Goals & categories ───────────────────────────────────────────────

fn delete_goal(state: &AppState, id: &EntityId) -> AppState {
    let mut next = state.clone();
    next.goals = Arc::new(state.goals.iter().filter(|g| &g.id != id).cloned().collect());
    next.transactions = Arc::new(
        state
            .transactions
            .iter()
            .map(|t| {
                if t.goal_id.as_ref() == Some(id) {
                    Transaction {
                        goal_id: None,
                        category: OTHER_CATEGORY.into(),
                        ..t.clone()
                    }
                } else {
                    t.clone()
                }
            })
            .collect(),
    );
    next
}

fn delete_budget_category(state: &AppState, id: &EntityId) -> AppState {
    let mut next = state.clone();
    let deleted_name = state.budget_category(id).map(|c| c.name.clone());
    next.budget_categories = Arc::new(
        state
            .budget_categories
            .iter()
            .filter(|c| &c.id != id)
            .cloned()
            .collect(),
    );
    // An unknown id reassigns nothing.
    if let Some(name) = deleted_name {
        next.transactions = Arc::new(
            state
                .transactions
                .iter()
                .map(|t| {
                    if t.category == name {
                        Transaction {
                            category: OTHER_CATEGORY.into(),
                            ..t.clone()
                        }
                    } else {
                        t.clone()
                    }
                })
                .collect(),
        );
    }
    next
}

// ── Lifecycle ────────────────────────────────────────────────────────

fn set_data(snapshot: DataSnapshot) -> AppState {
    AppState {
        accounts: Arc::new(snapshot.accounts),
        transactions: Arc::new(snapshot.transactions),
        goals: Arc::new(snapshot.goals),
        budget_categories: Arc::new(snapshot.budget_categories),
        selected_account: snapshot.selected_account,
        error: None,
        is_loading: false,
        loaded_for: snapshot.owner,
    }
}

// ── Arithmetic ───────────────────────────────────────────────────────

/// `value + delta`, or `value` itself when the sum is out of range.
fn added(value: Decimal, delta: Decimal) -> Decimal {
    value.checked_add(delta).unwrap_or(value)
}

/// `value - delta`, or `value` itself when the difference is out of range.
fn subtracted(value: Decimal, delta: Decimal) -> Decimal {
    value.checked_sub(delta).unwrap_or(value)
}

// ── Collection helpers ───────────────────────────────────────────────

fn appended<T: Clone>(items: &Arc<Vec<T>>, item: T) -> Arc<Vec<T>> {
    let mut next = Vec::with_capacity(items.len() + 1);
    next.extend(items.iter().cloned());
    next.push(item);
    Arc::new(next)
}

/// Replace the record with the same id; an unknown id leaves the
/// collection as it was.
fn replaced<T: Entity + Clone>(items: &Arc<Vec<T>>, item: T) -> Arc<Vec<T>> {
    let id = item.id().clone();
    modified(items, &id, move |slot| *slot = item)
}

/// Apply `f` to the record with `id`, sharing the original collection
/// when nothing matches.
fn modified<T: Entity + Clone>(
    items: &Arc<Vec<T>>,
    id: &EntityId,
    f: impl FnOnce(&mut T),
) -> Arc<Vec<T>> {
    let Some(index) = items.iter().position(|item| item.id() == id) else {
        return Arc::clone(items);
    };
    let mut next = items.as_ref().clone();
    if let Some(slot) = next.get_mut(index) {
        f(slot);
    }
    Arc::new(next)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{Account, AccountKind, BudgetCategory, Goal, TransactionKind};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    // ── Fixtures ──

    fn account(id: &str, balance: Decimal) -> Account {
        Account {
            id: id.into(),
            name: format!("Account {id}"),
            balance,
            kind: AccountKind::Checking,
            currency: "EUR".into(),
        }
    }

    fn tx(id: &str, account_id: &str, amount: Decimal, kind: TransactionKind) -> Transaction {
        Transaction {
            id: id.into(),
            account_id: account_id.into(),
            amount,
            description: String::new(),
            category: "Food".into(),
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            kind,
            goal_id: None,
        }
    }

    fn expense(id: &str, account_id: &str, amount: Decimal) -> Transaction {
        tx(id, account_id, amount, TransactionKind::Expense)
    }

    fn goal(id: &str, current: Decimal) -> Goal {
        Goal {
            id: id.into(),
            name: format!("Goal {id}"),
            target: dec!(1000),
            current,
            deadline: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            color: "#4F46E5".into(),
        }
    }

    fn category(id: &str, name: &str) -> BudgetCategory {
        BudgetCategory {
            id: id.into(),
            name: name.into(),
            limit: dec!(300),
            color: "#10B981".into(),
        }
    }

    fn loaded(accounts: Vec<Account>) -> AppState {
        let selected = accounts.first().map(|a| a.id.clone());
        reduce(
            &AppState::default(),
            Action::SetData(DataSnapshot {
                accounts,
                selected_account: selected,
                ..DataSnapshot::default()
            }),
        )
    }

    fn balance(state: &AppState, id: &str) -> Decimal {
        state.account(&id.into()).unwrap().balance
    }

    fn goal_current(state: &AppState, id: &str) -> Decimal {
        state.goal(&id.into()).unwrap().current
    }

    // ── Transactions ──

    #[test]
    fn add_expense_debits_account() {
        let state = loaded(vec![account("a1", dec!(1000))]);
        let next = reduce(&state, Action::AddTransaction(expense("t1", "a1", dec!(-50))));
        assert_eq!(balance(&next, "a1"), dec!(950));
        assert_eq!(next.transactions.len(), 1);
        assert_eq!(next.transactions[0].id.as_str(), "t1");
    }

    #[test]
    fn add_then_delete_restores_balance() {
        let state = loaded(vec![account("a1", dec!(1000))]);
        let added = reduce(&state, Action::AddTransaction(expense("t1", "a1", dec!(-50))));
        let removed = reduce(&added, Action::DeleteTransaction("t1".into()));
        assert_eq!(balance(&removed, "a1"), dec!(1000));
        assert!(removed.transactions.is_empty());
    }

    #[test]
    fn overflowing_income_leaves_balance_unchanged() {
        let state = loaded(vec![account("a1", Decimal::MAX)]);
        let next = reduce(
            &state,
            Action::AddTransaction(tx("t1", "a1", dec!(1), TransactionKind::Income)),
        );
        assert_eq!(balance(&next, "a1"), Decimal::MAX);
        assert_eq!(next.transactions.len(), 1);
    }

    #[test]
    fn overflowing_delete_leaves_balance_unchanged() {
        let state = reduce(
            &AppState::default(),
            Action::SetData(DataSnapshot {
                accounts: vec![account("a1", Decimal::MAX)],
                transactions: vec![expense("t1", "a1", dec!(-1))],
                ..DataSnapshot::default()
            }),
        );
        let next = reduce(&state, Action::DeleteTransaction("t1".into()));
        assert_eq!(balance(&next, "a1"), Decimal::MAX);
        assert!(next.transactions.is_empty());
    }

    #[test]
    fn out_of_range_update_delta_leaves_balance_unchanged() {
        let state = loaded(vec![account("a1", dec!(0))]);
        let state = reduce(&state, Action::AddTransaction(expense("t1", "a1", dec!(-1))));
        let next = reduce(
            &state,
            Action::UpdateTransaction(tx("t1", "a1", Decimal::MAX, TransactionKind::Income)),
        );
        assert_eq!(balance(&next, "a1"), dec!(-1));
        assert_eq!(next.transactions[0].amount, Decimal::MAX);
    }

    #[test]
    fn overflowing_goal_contribution_leaves_goal_unchanged() {
        let mut state = loaded(vec![account("a", dec!(0))]);
        state = reduce(&state, Action::AddGoal(goal("g", Decimal::MAX)));
        let mut t = expense("t1", "a", dec!(-5));
        t.goal_id = Some("g".into());
        let next = reduce(&state, Action::AddTransaction(t));
        assert_eq!(goal_current(&next, "g"), Decimal::MAX);
        assert_eq!(balance(&next, "a"), dec!(-5));
    }

    #[test]
    fn expense_income_then_delete_scenario() {
        let state = loaded(vec![account("a", dec!(100))]);
        let s1 = reduce(&state, Action::AddTransaction(expense("t1", "a", dec!(-30))));
        assert_eq!(balance(&s1, "a"), dec!(70));
        let s2 = reduce(
            &s1,
            Action::AddTransaction(tx("t2", "a", dec!(50), TransactionKind::Income)),
        );
        assert_eq!(balance(&s2, "a"), dec!(120));
        let s3 = reduce(&s2, Action::DeleteTransaction("t1".into()));
        assert_eq!(balance(&s3, "a"), dec!(150));
    }

    #[test]
    fn goal_contribution_is_undone_by_delete() {
        let mut state = loaded(vec![account("a", dec!(0))]);
        state = reduce(&state, Action::AddGoal(goal("g", dec!(0))));
        let mut t = expense("t1", "a", dec!(-200));
        t.goal_id = Some("g".into());
        let added = reduce(&state, Action::AddTransaction(t));
        assert_eq!(goal_current(&added, "g"), dec!(200));
        let removed = reduce(&added, Action::DeleteTransaction("t1".into()));
        assert_eq!(goal_current(&removed, "g"), dec!(0));
    }

    #[test]
    fn add_expense_with_goal_credits_goal() {
        let mut state = loaded(vec![account("a1", dec!(500))]);
        state = reduce(&state, Action::AddGoal(goal("g1", dec!(200))));
        let mut t = expense("t1", "a1", dec!(-100));
        t.goal_id = Some("g1".into());
        let next = reduce(&state, Action::AddTransaction(t));
        assert_eq!(goal_current(&next, "g1"), dec!(300));
        assert_eq!(balance(&next, "a1"), dec!(400));
    }

    #[test]
    fn add_income_with_goal_leaves_goal_alone() {
        let mut state = loaded(vec![account("a1", dec!(0))]);
        state = reduce(&state, Action::AddGoal(goal("g1", dec!(200))));
        let mut t = tx("t1", "a1", dec!(100), TransactionKind::Income);
        t.goal_id = Some("g1".into());
        let next = reduce(&state, Action::AddTransaction(t));
        assert_eq!(goal_current(&next, "g1"), dec!(200));
    }

    #[test]
    fn add_for_missing_account_only_appends() {
        let state = loaded(vec![account("a1", dec!(10))]);
        let next = reduce(&state, Action::AddTransaction(expense("t1", "ghost", dec!(-5))));
        assert_eq!(next.transactions.len(), 1);
        assert_eq!(next.accounts, state.accounts);
        assert!(Arc::ptr_eq(&next.accounts, &state.accounts));
    }

    #[test]
    fn update_applies_delta_to_account() {
        let state = loaded(vec![account("a1", dec!(1000))]);
        let state = reduce(&state, Action::AddTransaction(expense("t1", "a1", dec!(-50))));
        let next = reduce(&state, Action::UpdateTransaction(expense("t1", "a1", dec!(-80))));
        assert_eq!(balance(&next, "a1"), dec!(920));
        assert_eq!(next.transactions[0].amount, dec!(-80));
    }

    #[test]
    fn update_unknown_transaction_is_noop() {
        let state = loaded(vec![account("a1", dec!(1000))]);
        let next = reduce(&state, Action::UpdateTransaction(expense("nope", "a1", dec!(-1))));
        assert_eq!(next, state);
    }

    #[test]
    fn update_moving_accounts_leaves_old_balance_stale() {
        let state = loaded(vec![account("a1", dec!(1000)), account("a2", dec!(500))]);
        let state = reduce(&state, Action::AddTransaction(expense("t1", "a1", dec!(-50))));
        assert_eq!(balance(&state, "a1"), dec!(950));

        let next = reduce(&state, Action::UpdateTransaction(expense("t1", "a2", dec!(-50))));
        // Delta is zero and only the new account is touched.
        assert_eq!(balance(&next, "a1"), dec!(950));
        assert_eq!(balance(&next, "a2"), dec!(500));
    }

    #[test]
    fn update_same_goal_reapplies_both_sides() {
        let mut state = loaded(vec![account("a1", dec!(0))]);
        state = reduce(&state, Action::AddGoal(goal("g1", dec!(0))));
        let mut t = expense("t1", "a1", dec!(-100));
        t.goal_id = Some("g1".into());
        state = reduce(&state, Action::AddTransaction(t.clone()));
        assert_eq!(goal_current(&state, "g1"), dec!(100));

        t.amount = dec!(-150);
        let next = reduce(&state, Action::UpdateTransaction(t));
        assert_eq!(goal_current(&next, "g1"), dec!(150));
    }

    #[test]
    fn update_moves_goal_contribution() {
        let mut state = loaded(vec![account("a1", dec!(0))]);
        state = reduce(&state, Action::AddGoal(goal("g1", dec!(0))));
        state = reduce(&state, Action::AddGoal(goal("g2", dec!(0))));
        let mut t = expense("t1", "a1", dec!(-40));
        t.goal_id = Some("g1".into());
        state = reduce(&state, Action::AddTransaction(t.clone()));

        t.goal_id = Some("g2".into());
        let next = reduce(&state, Action::UpdateTransaction(t));
        assert_eq!(goal_current(&next, "g1"), dec!(0));
        assert_eq!(goal_current(&next, "g2"), dec!(40));
    }

    #[test]
    fn delete_unknown_transaction_is_noop() {
        let state = loaded(vec![account("a1", dec!(1))]);
        let next = reduce(&state, Action::DeleteTransaction("missing".into()));
        assert_eq!(next, state);
    }

    #[test]
    fn delete_goal_linked_transaction_debits_goal() {
        let mut state = loaded(vec![account("a1", dec!(0))]);
        state = reduce(&state, Action::AddGoal(goal("g1", dec!(0))));
        let mut t = expense("t1", "a1", dec!(-25));
        t.goal_id = Some("g1".into());
        state = reduce(&state, Action::AddTransaction(t));
        let next = reduce(&state, Action::DeleteTransaction("t1".into()));
        assert_eq!(goal_current(&next, "g1"), dec!(0));
        assert_eq!(balance(&next, "a1"), dec!(0));
    }

    // ── Accounts ──

    #[test]
    fn add_account_selects_when_nothing_selected() {
        let state = loaded(vec![]);
        assert_eq!(state.selected_account, None);
        let next = reduce(&state, Action::AddAccount(account("a1", dec!(0))));
        assert_eq!(next.selected_account, Some("a1".into()));

        let next = reduce(&next, Action::AddAccount(account("a2", dec!(0))));
        assert_eq!(next.selected_account, Some("a1".into()));
    }

    #[test]
    fn delete_selected_account_cascades_and_reselects() {
        let state = loaded(vec![account("a1", dec!(100)), account("a2", dec!(200))]);
        let state = reduce(&state, Action::AddTransaction(expense("t1", "a1", dec!(-10))));
        let state = reduce(&state, Action::AddTransaction(expense("t2", "a2", dec!(-20))));
        assert_eq!(state.selected_account, Some("a1".into()));

        let next = reduce(&state, Action::DeleteAccount("a1".into()));
        assert_eq!(next.accounts.len(), 1);
        assert!(next.transactions.iter().all(|t| t.account_id.as_str() != "a1"));
        assert_eq!(next.transactions.len(), 1);
        assert_eq!(next.selected_account, Some("a2".into()));
    }

    #[test]
    fn delete_last_account_clears_selection() {
        let state = loaded(vec![account("a1", dec!(0))]);
        let next = reduce(&state, Action::DeleteAccount("a1".into()));
        assert!(next.accounts.is_empty());
        assert_eq!(next.selected_account, None);
    }

    #[test]
    fn delete_unselected_account_keeps_selection() {
        let state = loaded(vec![account("a1", dec!(0)), account("a2", dec!(0))]);
        let next = reduce(&state, Action::DeleteAccount("a2".into()));
        assert_eq!(next.selected_account, Some("a1".into()));
    }

    #[test]
    fn select_account_does_not_check_existence() {
        let state = loaded(vec![account("a1", dec!(0))]);
        let next = reduce(&state, Action::SelectAccount(Some("ghost".into())));
        assert_eq!(next.selected_account, Some("ghost".into()));
        assert!(next.selected().is_none());
        let next = reduce(&next, Action::SelectAccount(None));
        assert_eq!(next.selected_account, None);
    }

    // ── Goals & categories ──

    #[test]
    fn update_goal_replaces_by_id() {
        let state = reduce(&loaded(vec![]), Action::AddGoal(goal("g1", dec!(0))));
        let mut renamed = goal("g1", dec!(0));
        renamed.name = "Holiday".into();
        let next = reduce(&state, Action::UpdateGoal(renamed));
        assert_eq!(next.goals.len(), 1);
        assert_eq!(next.goals[0].name, "Holiday");
    }

    #[test]
    fn update_unknown_goal_is_noop() {
        let state = reduce(&loaded(vec![]), Action::AddGoal(goal("g1", dec!(0))));
        let next = reduce(&state, Action::UpdateGoal(goal("g9", dec!(5))));
        assert_eq!(next, state);
    }

    #[test]
    fn delete_goal_detaches_transactions() {
        let mut state = loaded(vec![account("a1", dec!(0))]);
        state = reduce(&state, Action::AddGoal(goal("g1", dec!(0))));
        let mut t = expense("t1", "a1", dec!(-30));
        t.goal_id = Some("g1".into());
        t.category = "Goal".into();
        state = reduce(&state, Action::AddTransaction(t));
        state = reduce(&state, Action::AddTransaction(expense("t2", "a1", dec!(-5))));

        let next = reduce(&state, Action::DeleteGoal("g1".into()));
        assert!(next.goals.is_empty());
        let t1 = next.transaction(&"t1".into()).unwrap();
        assert_eq!(t1.goal_id, None);
        assert_eq!(t1.category, OTHER_CATEGORY);
        assert_eq!(next.transaction(&"t2".into()).unwrap().category, "Food");
        assert!(next.transactions.iter().all(|t| t.goal_id.is_none()));
    }

    #[test]
    fn delete_budget_category_reassigns_by_name() {
        let mut state = loaded(vec![account("a1", dec!(0))]);
        state = reduce(&state, Action::AddBudgetCategory(category("c1", "Food")));
        state = reduce(&state, Action::AddTransaction(expense("t1", "a1", dec!(-12))));
        let mut rent = expense("t2", "a1", dec!(-700));
        rent.category = "Rent".into();
        state = reduce(&state, Action::AddTransaction(rent));

        let next = reduce(&state, Action::DeleteBudgetCategory("c1".into()));
        assert!(next.budget_categories.is_empty());
        assert_eq!(next.transaction(&"t1".into()).unwrap().category, OTHER_CATEGORY);
        assert_eq!(next.transaction(&"t2".into()).unwrap().category, "Rent");
    }

    #[test]
    fn delete_unknown_budget_category_is_noop() {
        let state = reduce(&loaded(vec![]), Action::AddBudgetCategory(category("c1", "Food")));
        let next = reduce(&state, Action::DeleteBudgetCategory("c2".into()));
        assert_eq!(next, state);
    }

    #[test]
    fn update_budget_category_does_not_rename_transactions() {
        let mut state = loaded(vec![account("a1", dec!(0))]);
        state = reduce(&state, Action::AddBudgetCategory(category("c1", "Food")));
        state = reduce(&state, Action::AddTransaction(expense("t1", "a1", dec!(-12))));
        let next = reduce(
            &state,
            Action::UpdateBudgetCategory(category("c1", "Groceries")),
        );
        assert_eq!(next.budget_categories[0].name, "Groceries");
        assert_eq!(next.transactions[0].category, "Food");
    }

    // ── Lifecycle ──

    #[test]
    fn set_data_clears_error_and_loading() {
        let state = reduce(&AppState::default(), Action::SetError(Some("boom".into())));
        let next = reduce(
            &state,
            Action::SetData(DataSnapshot {
                accounts: vec![account("a1", dec!(3))],
                selected_account: Some("a1".into()),
                ..DataSnapshot::default()
            }),
        );
        assert_eq!(next.error, None);
        assert!(!next.is_loading);
        assert_eq!(next.selected_account, Some("a1".into()));
    }

    #[test]
    fn set_data_records_owner_until_reset() {
        let next = reduce(
            &AppState::default(),
            Action::SetData(DataSnapshot {
                owner: Some("u1".into()),
                ..DataSnapshot::default()
            }),
        );
        assert_eq!(next.loaded_for, Some("u1".into()));

        let next = reduce(&next, Action::AddAccount(account("a1", dec!(0))));
        assert_eq!(next.loaded_for, Some("u1".into()));

        let next = reduce(&next, Action::ResetData);
        assert_eq!(next.loaded_for, None);
    }

    #[test]
    fn set_data_is_idempotent() {
        let snapshot = DataSnapshot {
            accounts: vec![account("a1", dec!(3))],
            transactions: vec![expense("t1", "a1", dec!(-1))],
            goals: vec![goal("g1", dec!(0))],
            budget_categories: vec![category("c1", "Food")],
            selected_account: Some("a1".into()),
            owner: Some("u1".into()),
        };
        let once = reduce(&AppState::default(), Action::SetData(snapshot.clone()));
        let twice = reduce(&once, Action::SetData(snapshot));
        assert_eq!(once, twice);
    }

    #[test]
    fn set_error_clears_loading() {
        let state = reduce(&AppState::default(), Action::SetLoading(true));
        let next = reduce(&state, Action::SetError(Some("offline".into())));
        assert_eq!(next.error.as_deref(), Some("offline"));
        assert!(!next.is_loading);
    }

    #[test]
    fn reset_returns_initial_state() {
        let state = loaded(vec![account("a1", dec!(3))]);
        let next = reduce(&state, Action::ResetData);
        assert_eq!(next, AppState::default());
        assert!(next.is_loading);
    }

    #[test]
    fn input_snapshot_is_never_mutated() {
        let state = loaded(vec![account("a1", dec!(1000))]);
        let before = state.clone();
        let _ = reduce(&state, Action::AddTransaction(expense("t1", "a1", dec!(-50))));
        let _ = reduce(&state, Action::DeleteAccount("a1".into()));
        assert_eq!(state, before);
    }

    #[test]
    fn untouched_collections_are_shared() {
        let state = loaded(vec![account("a1", dec!(0))]);
        let next = reduce(&state, Action::AddGoal(goal("g1", dec!(0))));
        assert!(Arc::ptr_eq(&state.accounts, &next.accounts));
        assert!(Arc::ptr_eq(&state.transactions, &next.transactions));
        assert!(!Arc::ptr_eq(&state.goals, &next.goals));

        let selected = reduce(&next, Action::SelectAccount(None));
        assert!(selected.same_collections(&next));
    }

    #[test]
    fn balance_tracks_sum_of_transactions() {
        let mut state = loaded(vec![account("a1", dec!(0))]);
        let amounts = [dec!(-12.34), dec!(2500), dec!(-99.99), dec!(-0.01), dec!(15)];
        for (i, amount) in amounts.iter().enumerate() {
            let kind = if amount.is_sign_negative() {
                TransactionKind::Expense
            } else {
                TransactionKind::Income
            };
            state = reduce(
                &state,
                Action::AddTransaction(tx(&format!("t{i}"), "a1", *amount, kind)),
            );
        }
        state = reduce(&state, Action::DeleteTransaction("t1".into()));
        state = reduce(
            &state,
            Action::UpdateTransaction(expense("t2", "a1", dec!(-100))),
        );

        let sum: Decimal = state.transactions.iter().map(|t| t.amount).sum();
        assert_eq!(balance(&state, "a1"), sum);
        assert_eq!(sum, dec!(-97.35));
    }
}
