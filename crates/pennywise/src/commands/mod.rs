//! Command dispatch: bridges CLI args -> session actions -> output formatting.

pub mod accounts;
pub mod budget;
pub mod config_cmd;
pub mod goals;
pub mod summary;
pub mod transactions;
pub mod util;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;
use crate::session::Session;

/// Dispatch a data command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    session: &Session,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Accounts(args) => accounts::handle(session, args, global).await,
        Command::Transactions(args) => transactions::handle(session, args, global).await,
        Command::Goals(args) => goals::handle(session, args, global).await,
        Command::Budget(args) => budget::handle(session, args, global).await,
        Command::Summary => summary::handle(session, global),
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
