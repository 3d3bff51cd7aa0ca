//! Dashboard summary: totals and spending per category.

use serde::Serialize;
use tabled::Tabled;

use pennywise_core::projection::{self, CategorySpending, Totals};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;
use crate::session::Session;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Summary {
    #[serde(flatten)]
    totals: Totals,
    spending: Vec<CategorySpending>,
}

#[derive(Tabled)]
struct SpendingRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Spent")]
    spent: String,
    #[tabled(rename = "Color")]
    color: String,
}

fn detail(s: &Summary, color: bool) -> String {
    let mut lines = vec![
        format!("Total balance:   {}", output::money(s.totals.total_balance, color)),
        format!("Total income:    {}", output::money(s.totals.total_income, color)),
        format!("Total expenses:  {}", output::money(-s.totals.total_expenses, color)),
    ];
    if !s.spending.is_empty() {
        let rows: Vec<SpendingRow> = s
            .spending
            .iter()
            .map(|c| SpendingRow {
                category: c.category.clone(),
                spent: format!("{:.2}", c.spent),
                color: c.color.clone(),
            })
            .collect();
        lines.push(String::new());
        lines.push(
            tabled::Table::new(rows)
                .with(tabled::settings::Style::rounded())
                .to_string(),
        );
    }
    lines.join("\n")
}

pub fn handle(session: &Session, global: &GlobalOpts) -> Result<(), CliError> {
    let state = session.state()?;
    let color = output::should_color(&global.color);
    let summary = Summary {
        totals: projection::totals(&state),
        spending: projection::spending_by_category(&state),
    };
    let out = output::render_single(
        &global.output,
        &summary,
        |s| detail(s, color),
        |s| {
            format!(
                "{}\n{}\n{}",
                s.totals.total_balance, s.totals.total_income, s.totals.total_expenses
            )
        },
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
