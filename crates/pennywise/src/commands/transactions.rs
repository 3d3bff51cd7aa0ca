//! Transaction command handlers.

use rust_decimal::Decimal;
use tabled::Tabled;

use pennywise_core::{
    Action, AppState, Collection, EntityId, GOAL_CATEGORY, Transaction, TransactionDraft,
    projection,
};

use crate::cli::{GlobalOpts, TransactionFields, TransactionsArgs, TransactionsCommand};
use crate::error::CliError;
use crate::output;
use crate::session::Session;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
pub(super) struct TransactionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Account")]
    account: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Description")]
    description: String,
}

impl TransactionRow {
    pub(super) fn new(t: &Transaction, color: bool) -> Self {
        let category = match &t.goal_id {
            Some(goal) => format!("{} ({goal})", t.category),
            None => t.category.clone(),
        };
        Self {
            id: t.id.to_string(),
            date: t.date.to_string(),
            account: t.account_id.to_string(),
            amount: output::money(t.amount, color),
            category,
            description: t.description.clone(),
        }
    }
}

// ── Validation ──────────────────────────────────────────────────────

fn check_amount(amount: Decimal) -> Result<(), CliError> {
    if amount.is_zero() {
        return Err(CliError::Validation {
            field: "amount".into(),
            reason: "must not be zero".into(),
        });
    }
    Ok(())
}

/// A goal link needs the goal category and an existing goal.
fn check_goal(state: &AppState, category: &str, goal: Option<&EntityId>) -> Result<(), CliError> {
    let Some(goal) = goal else {
        return Ok(());
    };
    if category != GOAL_CATEGORY {
        return Err(CliError::Validation {
            field: "goal".into(),
            reason: format!("a goal can only be linked with --category {GOAL_CATEGORY}"),
        });
    }
    if state.goal(goal).is_none() {
        return Err(util::not_found("goal", goal, "goals list"));
    }
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub async fn handle(
    session: &Session,
    args: TransactionsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color);

    match args.command {
        TransactionsCommand::List { account, all } => {
            let state = session.state()?;
            let rows: Vec<&Transaction> = if all {
                state.transactions.iter().collect()
            } else if let Some(account) = account {
                let id = util::require_account(&state, &account)?;
                state.transactions.iter().filter(|t| t.account_id == id).collect()
            } else {
                projection::selected_transactions(&state)
            };
            let out = output::render_list(
                &global.output,
                &rows,
                |t| TransactionRow::new(t, color),
                |t| t.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        TransactionsCommand::Create(TransactionFields {
            account,
            amount,
            kind,
            category,
            description,
            date,
            goal,
        }) => {
            check_amount(amount)?;
            let state = session.state()?;
            let account_id = util::default_account(&state, account.as_deref())?;
            let goal_id = goal.map(EntityId::new);
            check_goal(&state, &category, goal_id.as_ref())?;

            let tx = TransactionDraft {
                account_id,
                amount,
                kind: util::transaction_kind(kind),
                description,
                category,
                date: date.unwrap_or_else(util::today),
                goal_id,
            }
            .build(None);
            session.dispatch(Action::AddTransaction(tx.clone()))?;
            session.commit().await?;

            let out = output::render_single(
                &global.output,
                &tx,
                |t| t.id.to_string(),
                |t| t.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        TransactionsCommand::Update {
            id,
            account,
            amount,
            kind,
            category,
            description,
            date,
            goal,
        } => {
            let state = session.state()?;
            let id = EntityId::new(id);
            let existing = state
                .transaction(&id)
                .ok_or_else(|| util::not_found("transaction", &id, "transactions list --all"))?;

            let account_id = match account {
                Some(account) => util::require_account(&state, &account)?,
                None => existing.account_id.clone(),
            };
            let amount = amount.unwrap_or_else(|| existing.amount.abs());
            check_amount(amount)?;
            let category = category.unwrap_or_else(|| existing.category.clone());
            let goal_id = goal.map(EntityId::new).or_else(|| existing.goal_id.clone());
            if category == GOAL_CATEGORY {
                check_goal(&state, &category, goal_id.as_ref())?;
            }

            let tx = TransactionDraft {
                account_id,
                amount,
                kind: kind.map_or(existing.kind, util::transaction_kind),
                description: description.unwrap_or_else(|| existing.description.clone()),
                category,
                date: date.unwrap_or(existing.date),
                goal_id,
            }
            .build(Some(id));
            session.dispatch(Action::UpdateTransaction(tx))?;
            session.commit().await?;
            util::done("Transaction updated", global.quiet);
            Ok(())
        }

        TransactionsCommand::Delete { id } => {
            let state = session.state()?;
            let id = EntityId::new(id);
            if state.transaction(&id).is_none() {
                return Err(util::not_found("transaction", &id, "transactions list --all"));
            }
            if !util::confirm(&format!("Delete transaction '{id}'?"), global.yes)? {
                return Ok(());
            }
            session
                .sync()
                .delete_remote(Collection::Transactions, &id, Action::DeleteTransaction(id.clone()))
                .await?;
            session.commit().await?;
            util::done(&format!("Transaction '{id}' deleted"), global.quiet);
            Ok(())
        }
    }
}
