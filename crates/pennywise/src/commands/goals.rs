//! Savings goal command handlers.

use rust_decimal::Decimal;
use tabled::Tabled;

use pennywise_core::projection::{self, GoalProgress};
use pennywise_core::{Action, Collection, EntityId, Goal};

use crate::cli::{GlobalOpts, GoalsArgs, GoalsCommand};
use crate::error::CliError;
use crate::output;
use crate::session::Session;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct GoalRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Saved")]
    current: String,
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "Progress")]
    percent: String,
    #[tabled(rename = "Days left")]
    days: String,
}

impl From<&GoalProgress> for GoalRow {
    fn from(g: &GoalProgress) -> Self {
        let days = if g.reached {
            "reached".into()
        } else if g.days_remaining < 0 {
            "overdue".into()
        } else {
            g.days_remaining.to_string()
        };
        Self {
            id: g.id.to_string(),
            name: g.name.clone(),
            current: format!("{:.2}", g.current),
            target: format!("{:.2}", g.target),
            percent: g.percent.map(|p| format!("{p}%")).unwrap_or_default(),
            days,
        }
    }
}

fn check_target(target: Decimal) -> Result<(), CliError> {
    if target <= Decimal::ZERO {
        return Err(CliError::Validation {
            field: "target".into(),
            reason: "must be greater than zero".into(),
        });
    }
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    session: &Session,
    args: GoalsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        GoalsCommand::List => {
            let state = session.state()?;
            let progress = projection::goal_progress(&state, util::today());
            let out = output::render_list(
                &global.output,
                &progress,
                |g| GoalRow::from(g),
                |g| g.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        GoalsCommand::Create {
            name,
            target,
            deadline,
            color,
        } => {
            check_target(target)?;
            let state = session.state()?;
            let mut goal = Goal::new(name, target, deadline, state.goals.len());
            if let Some(color) = color {
                goal.color = color;
            }
            session.dispatch(Action::AddGoal(goal.clone()))?;
            session.commit().await?;

            let out = output::render_single(
                &global.output,
                &goal,
                |g| g.id.to_string(),
                |g| g.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        GoalsCommand::Update {
            id,
            name,
            target,
            deadline,
            color,
        } => {
            let state = session.state()?;
            let id = EntityId::new(id);
            let mut goal = state
                .goal(&id)
                .cloned()
                .ok_or_else(|| util::not_found("goal", &id, "goals list"))?;
            if let Some(target) = target {
                check_target(target)?;
                goal.target = target;
            }
            if let Some(name) = name {
                goal.name = name;
            }
            if let Some(deadline) = deadline {
                goal.deadline = deadline;
            }
            if let Some(color) = color {
                goal.color = color;
            }
            session.dispatch(Action::UpdateGoal(goal))?;
            session.commit().await?;
            util::done(&format!("Goal '{id}' updated"), global.quiet);
            Ok(())
        }

        GoalsCommand::Delete { id } => {
            let state = session.state()?;
            let id = EntityId::new(id);
            if state.goal(&id).is_none() {
                return Err(util::not_found("goal", &id, "goals list"));
            }
            let linked = state
                .transactions
                .iter()
                .filter(|t| t.goal_id.as_ref() == Some(&id))
                .count();
            if !util::confirm(
                &format!("Delete goal '{id}'? {linked} linked transaction(s) move to Other."),
                global.yes,
            )? {
                return Ok(());
            }
            session
                .sync()
                .delete_remote(Collection::Goals, &id, Action::DeleteGoal(id.clone()))
                .await?;
            session.commit().await?;
            util::done(&format!("Goal '{id}' deleted"), global.quiet);
            Ok(())
        }
    }
}
