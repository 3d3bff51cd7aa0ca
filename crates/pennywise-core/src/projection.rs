// ── Read-only projections ──
//
// Derived views over a snapshot for dashboards and reports. None of
// these touch the store. Sums saturate at the edges of the decimal range.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::model::{CATEGORY_PALETTE, EntityId, Transaction};
use crate::state::AppState;

/// Headline figures across all accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub total_balance: Decimal,
    /// Sum of expense magnitudes (positive).
    pub total_expenses: Decimal,
    pub total_income: Decimal,
}

pub fn totals(state: &AppState) -> Totals {
    let total_balance = total(state.accounts.iter().map(|a| a.balance));
    let (expenses, income): (Vec<&Transaction>, Vec<&Transaction>) =
        state.transactions.iter().partition(|t| t.is_expense());
    Totals {
        total_balance,
        total_expenses: total(expenses.iter().map(|t| t.amount.abs())),
        total_income: total(income.iter().map(|t| t.amount)),
    }
}

/// Spending accumulated under one category name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySpending {
    pub category: String,
    pub spent: Decimal,
    pub color: String,
}

/// Expense magnitudes grouped by category, in order of first
/// appearance. The colour comes from the budget category of the same
/// name, else from the fallback palette by position.
pub fn spending_by_category(state: &AppState) -> Vec<CategorySpending> {
    let mut out: Vec<CategorySpending> = Vec::new();
    for tx in state.transactions.iter().filter(|t| t.is_expense()) {
        if let Some(entry) = out.iter_mut().find(|e| e.category == tx.category) {
            entry.spent = entry.spent.saturating_add(tx.amount.abs());
            continue;
        }
        let color = state
            .budget_categories
            .iter()
            .find(|c| c.name == tx.category)
            .map_or_else(
                || CATEGORY_PALETTE[out.len() % CATEGORY_PALETTE.len()].to_owned(),
                |c| c.color.clone(),
            );
        out.push(CategorySpending {
            category: tx.category.clone(),
            spent: tx.amount.abs(),
            color,
        });
    }
    out
}

/// How much of a budget category's limit has been spent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetUsage {
    pub id: EntityId,
    pub name: String,
    pub spent: Decimal,
    pub limit: Decimal,
    /// `spent / limit` as a percentage with one decimal; `None` for a
    /// zero limit.
    pub percent: Option<Decimal>,
    pub over_limit: bool,
    pub color: String,
}

/// Usage of every budget category, joined to expenses by name.
pub fn budget_usage(state: &AppState) -> Vec<BudgetUsage> {
    state
        .budget_categories
        .iter()
        .map(|category| {
            let spent = total(
                state
                    .transactions
                    .iter()
                    .filter(|t| t.is_expense() && t.category == category.name)
                    .map(|t| t.amount.abs()),
            );
            BudgetUsage {
                id: category.id.clone(),
                name: category.name.clone(),
                spent,
                limit: category.limit,
                percent: percent_of(spent, category.limit),
                over_limit: spent > category.limit,
                color: category.color.clone(),
            }
        })
        .collect()
}

/// Progress of a savings goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgress {
    pub id: EntityId,
    pub name: String,
    pub current: Decimal,
    pub target: Decimal,
    pub percent: Option<Decimal>,
    /// Days from `today` to the deadline; negative once it has passed.
    pub days_remaining: i64,
    pub reached: bool,
}

pub fn goal_progress(state: &AppState, today: NaiveDate) -> Vec<GoalProgress> {
    state
        .goals
        .iter()
        .map(|goal| GoalProgress {
            id: goal.id.clone(),
            name: goal.name.clone(),
            current: goal.current,
            target: goal.target,
            percent: percent_of(goal.current, goal.target),
            days_remaining: (goal.deadline - today).num_days(),
            reached: goal.current >= goal.target,
        })
        .collect()
}

/// Transactions of the selected account, in stored order.
pub fn selected_transactions(state: &AppState) -> Vec<&Transaction> {
    let Some(selected) = &state.selected_account else {
        return Vec::new();
    };
    state
        .transactions
        .iter()
        .filter(|t| &t.account_id == selected)
        .collect()
}

/// The first `limit` transactions of `account_id`, in stored order.
pub fn recent_transactions<'a>(
    state: &'a AppState,
    account_id: &EntityId,
    limit: usize,
) -> Vec<&'a Transaction> {
    state
        .transactions
        .iter()
        .filter(|t| &t.account_id == account_id)
        .take(limit)
        .collect()
}

fn total(amounts: impl Iterator<Item = Decimal>) -> Decimal {
    amounts.fold(Decimal::ZERO, Decimal::saturating_add)
}

/// `None` for a zero `whole` or a ratio too large to express.
fn percent_of(part: Decimal, whole: Decimal) -> Option<Decimal> {
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map(|percent| percent.round_dp(1))
}
