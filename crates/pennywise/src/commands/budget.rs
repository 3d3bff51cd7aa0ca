//! Budget category command handlers.

use owo_colors::OwoColorize;
use rust_decimal::Decimal;
use tabled::Tabled;

use pennywise_core::projection::{self, BudgetUsage};
use pennywise_core::{Action, BudgetCategory, CATEGORY_PALETTE, Collection, EntityId};

use crate::cli::{BudgetArgs, BudgetCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;
use crate::session::Session;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct BudgetRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Category")]
    name: String,
    #[tabled(rename = "Spent")]
    spent: String,
    #[tabled(rename = "Limit")]
    limit: String,
    #[tabled(rename = "Used")]
    percent: String,
}

impl BudgetRow {
    fn new(u: &BudgetUsage, color: bool) -> Self {
        let percent = u.percent.map(|p| format!("{p}%")).unwrap_or_default();
        let percent = if color && u.over_limit {
            percent.red().bold().to_string()
        } else {
            percent
        };
        Self {
            id: u.id.to_string(),
            name: u.name.clone(),
            spent: format!("{:.2}", u.spent),
            limit: format!("{:.2}", u.limit),
            percent,
        }
    }
}

fn check_limit(limit: Decimal) -> Result<(), CliError> {
    if limit <= Decimal::ZERO {
        return Err(CliError::Validation {
            field: "limit".into(),
            reason: "must be greater than zero".into(),
        });
    }
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    session: &Session,
    args: BudgetArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color);

    match args.command {
        BudgetCommand::List => {
            let state = session.state()?;
            let usage = projection::budget_usage(&state);
            let out = output::render_list(
                &global.output,
                &usage,
                |u| BudgetRow::new(u, color),
                |u| u.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        BudgetCommand::Create {
            name,
            limit,
            color: hex,
        } => {
            check_limit(limit)?;
            let name = name.trim().to_owned();
            if name.is_empty() {
                return Err(CliError::Validation {
                    field: "name".into(),
                    reason: "must not be empty".into(),
                });
            }
            let state = session.state()?;
            let category = BudgetCategory {
                id: EntityId::generate(),
                name,
                limit,
                color: hex.unwrap_or_else(|| {
                    CATEGORY_PALETTE[state.budget_categories.len() % CATEGORY_PALETTE.len()]
                        .to_owned()
                }),
            };
            session.dispatch(Action::AddBudgetCategory(category.clone()))?;
            session.commit().await?;

            let out = output::render_single(
                &global.output,
                &category,
                |c| c.id.to_string(),
                |c| c.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        BudgetCommand::Update {
            id,
            name,
            limit,
            color: hex,
        } => {
            let state = session.state()?;
            let id = EntityId::new(id);
            let mut category = state
                .budget_category(&id)
                .cloned()
                .ok_or_else(|| util::not_found("budget category", &id, "budget list"))?;
            if let Some(limit) = limit {
                check_limit(limit)?;
                category.limit = limit;
            }
            if let Some(name) = name {
                category.name = name;
            }
            if let Some(hex) = hex {
                category.color = hex;
            }
            session.dispatch(Action::UpdateBudgetCategory(category))?;
            session.commit().await?;
            util::done(&format!("Budget category '{id}' updated"), global.quiet);
            Ok(())
        }

        BudgetCommand::Delete { id } => {
            let state = session.state()?;
            let id = EntityId::new(id);
            let Some(category) = state.budget_category(&id) else {
                return Err(util::not_found("budget category", &id, "budget list"));
            };
            if !util::confirm(
                &format!(
                    "Delete budget category '{}'? Its transactions move to Other.",
                    category.name
                ),
                global.yes,
            )? {
                return Ok(());
            }
            session
                .sync()
                .delete_remote(
                    Collection::BudgetCategories,
                    &id,
                    Action::DeleteBudgetCategory(id.clone()),
                )
                .await?;
            session.commit().await?;
            util::done(&format!("Budget category '{id}' deleted"), global.quiet);
            Ok(())
        }
    }
}
