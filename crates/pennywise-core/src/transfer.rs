// ── Account-to-account transfers ──

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::action::Action;
use crate::error::CoreError;
use crate::model::{EntityId, TRANSFER_CATEGORY, Transaction, TransactionKind};
use crate::state::AppState;

/// A request to move money between two of the user's accounts.
#[derive(Debug, Clone)]
pub struct TransferRequest {
    pub from: EntityId,
    pub to: EntityId,
    /// Amount to move; the sign is ignored.
    pub amount: Decimal,
    pub description: String,
    pub date: NaiveDate,
}

/// The two legs of a transfer: an expense on the source account and an
/// income on the destination.
#[derive(Debug, Clone, PartialEq)]
pub struct Transfer {
    pub withdrawal: Transaction,
    pub deposit: Transaction,
}

impl Transfer {
    /// Build both legs against the accounts in `state`.
    pub fn prepare(state: &AppState, request: &TransferRequest) -> Result<Self, CoreError> {
        if request.from == request.to {
            return Err(CoreError::ValidationFailed {
                message: "cannot transfer to the same account".into(),
            });
        }
        let amount = request.amount.abs();
        if amount.is_zero() {
            return Err(CoreError::ValidationFailed {
                message: "transfer amount must be greater than zero".into(),
            });
        }
        let from = state.account(&request.from).ok_or_else(|| CoreError::NotFound {
            entity_type: "account".into(),
            identifier: request.from.to_string(),
        })?;
        let to = state.account(&request.to).ok_or_else(|| CoreError::NotFound {
            entity_type: "account".into(),
            identifier: request.to.to_string(),
        })?;

        let stamp = Uuid::new_v4().simple();
        let describe = |direction: &str, other: &str| {
            if request.description.is_empty() {
                format!("Transfer {direction} {other}")
            } else {
                format!("Transfer {direction} {other} - {}", request.description)
            }
        };

        let withdrawal = Transaction {
            id: EntityId::new(format!("transfer-out-{stamp}")),
            account_id: from.id.clone(),
            amount: -amount,
            description: describe("to", &to.name),
            category: TRANSFER_CATEGORY.into(),
            date: request.date,
            kind: TransactionKind::Expense,
            goal_id: None,
        };
        let deposit = Transaction {
            id: EntityId::new(format!("transfer-in-{stamp}")),
            account_id: to.id.clone(),
            amount,
            description: describe("from", &from.name),
            category: TRANSFER_CATEGORY.into(),
            date: request.date,
            kind: TransactionKind::Income,
            goal_id: None,
        };
        Ok(Self {
            withdrawal,
            deposit,
        })
    }

    /// The actions that record this transfer, withdrawal first.
    pub fn into_actions(self) -> [Action; 2] {
        [
            Action::AddTransaction(self.withdrawal),
            Action::AddTransaction(self.deposit),
        ]
    }
}
