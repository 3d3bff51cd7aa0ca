//! Shared helpers for command handlers.

use chrono::{Local, NaiveDate};

use pennywise_core::{AccountKind, AppState, EntityId, TransactionKind};

use crate::cli::{AccountKindArg, TransactionKindArg};
use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::IsTerminal::is_terminal(&std::io::stdin()) {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Look up an account id in the snapshot.
pub fn require_account(state: &AppState, id: &str) -> Result<EntityId, CliError> {
    let id = EntityId::new(id);
    state
        .account(&id)
        .map(|a| a.id.clone())
        .ok_or_else(|| not_found("account", &id, "accounts list"))
}

/// The account to act on when none was given: the selected one.
pub fn default_account(state: &AppState, given: Option<&str>) -> Result<EntityId, CliError> {
    match given {
        Some(id) => require_account(state, id),
        None => state
            .selected_account
            .clone()
            .ok_or_else(|| CliError::Validation {
                field: "account".into(),
                reason: "no accounts yet. Create one with: pennywise accounts create --name <NAME>"
                    .into(),
            }),
    }
}

pub fn not_found(resource_type: &str, id: &EntityId, list_command: &str) -> CliError {
    CliError::NotFound {
        resource_type: resource_type.into(),
        identifier: id.to_string(),
        list_command: list_command.into(),
    }
}

pub fn account_kind(arg: AccountKindArg) -> AccountKind {
    match arg {
        AccountKindArg::Checking => AccountKind::Checking,
        AccountKindArg::Savings => AccountKind::Savings,
        AccountKindArg::Credit => AccountKind::Credit,
    }
}

pub fn transaction_kind(arg: TransactionKindArg) -> TransactionKind {
    match arg {
        TransactionKindArg::Income => TransactionKind::Income,
        TransactionKindArg::Expense => TransactionKind::Expense,
    }
}

/// Print a confirmation line to stderr unless quiet.
pub fn done(message: &str, quiet: bool) {
    if !quiet {
        eprintln!("✓ {message}");
    }
}
