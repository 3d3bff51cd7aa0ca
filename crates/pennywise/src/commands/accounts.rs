//! Account command handlers.

use serde::Serialize;
use tabled::Tabled;

use pennywise_core::{
    Account, Action, EntityId, Transaction, Transfer, TransferRequest, projection,
};

use crate::cli::{AccountsArgs, AccountsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;
use crate::session::Session;

use super::transactions::TransactionRow;
use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct AccountRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Balance")]
    balance: String,
    #[tabled(rename = "Currency")]
    currency: String,
}

impl AccountRow {
    fn new(a: &Account, selected: Option<&EntityId>, color: bool) -> Self {
        let marker = if selected == Some(&a.id) { " *" } else { "" };
        Self {
            id: format!("{}{marker}", a.id),
            name: a.name.clone(),
            kind: a.kind.to_string(),
            balance: output::money(a.balance, color),
            currency: a.currency.clone(),
        }
    }
}

#[derive(Serialize)]
struct AccountDetail<'a> {
    #[serde(flatten)]
    account: &'a Account,
    recent: Vec<&'a Transaction>,
}

fn detail(d: &AccountDetail<'_>, color: bool) -> String {
    let a = d.account;
    let mut lines = vec![
        format!("ID:        {}", a.id),
        format!("Name:      {}", a.name),
        format!("Type:      {}", a.kind),
        format!("Balance:   {} {}", output::money(a.balance, color), a.currency),
    ];
    if d.recent.is_empty() {
        lines.push("Recent:    (no transactions)".into());
    } else {
        lines.push("Recent:".into());
        for tx in &d.recent {
            lines.push(format!(
                "  {}  {:>10}  {}  {}",
                tx.date,
                output::money(tx.amount, color),
                tx.category,
                tx.description
            ));
        }
    }
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    session: &Session,
    args: AccountsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color);

    match args.command {
        AccountsCommand::List => {
            let state = session.state()?;
            let selected = state.selected_account.as_ref();
            let out = output::render_list(
                &global.output,
                state.accounts.as_slice(),
                |a| AccountRow::new(a, selected, color),
                |a| a.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AccountsCommand::Get { id, recent } => {
            let state = session.state()?;
            let id = EntityId::new(id);
            let account = state
                .account(&id)
                .ok_or_else(|| util::not_found("account", &id, "accounts list"))?;
            let view = AccountDetail {
                account,
                recent: projection::recent_transactions(&state, &id, recent),
            };
            let out = output::render_single(
                &global.output,
                &view,
                |d| detail(d, color),
                |d| d.account.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AccountsCommand::Create {
            name,
            kind,
            currency,
        } => {
            if name.trim().is_empty() {
                return Err(CliError::Validation {
                    field: "name".into(),
                    reason: "must not be empty".into(),
                });
            }
            let currency = currency.unwrap_or_else(|| session.currency().to_owned());
            let account = Account::open(name.trim(), util::account_kind(kind), currency);
            session.dispatch(Action::AddAccount(account.clone()))?;
            session.commit().await?;

            let out = output::render_single(
                &global.output,
                &account,
                |a| a.id.to_string(),
                |a| a.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            util::done(&format!("Account '{}' created", account.name), global.quiet);
            Ok(())
        }

        AccountsCommand::Delete { id } => {
            let state = session.state()?;
            let id = util::require_account(&state, &id)?;
            let tx_count = state.transactions.iter().filter(|t| t.account_id == id).count();
            if !util::confirm(
                &format!("Delete account '{id}' and its {tx_count} transaction(s)?"),
                global.yes,
            )? {
                return Ok(());
            }
            session.sync().delete_account(&id).await?;
            session.commit().await?;
            util::done(&format!("Account '{id}' deleted"), global.quiet);
            Ok(())
        }

        AccountsCommand::Transfer {
            from,
            to,
            amount,
            description,
            date,
        } => {
            let state = session.state()?;
            let request = TransferRequest {
                from: EntityId::new(from),
                to: EntityId::new(to),
                amount,
                description,
                date: date.unwrap_or_else(util::today),
            };
            let transfer = Transfer::prepare(&state, &request)?;
            let legs = vec![transfer.withdrawal.clone(), transfer.deposit.clone()];
            for action in transfer.into_actions() {
                session.dispatch(action)?;
            }
            session.commit().await?;

            let out = output::render_list(
                &global.output,
                &legs,
                |t| TransactionRow::new(t, color),
                |t| t.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
