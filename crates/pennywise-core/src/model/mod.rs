// ── Domain model ──
//
// The four record kinds mirrored between the in-memory snapshot and the
// remote document collections.

mod account;
mod budget;
mod common;
mod entity_id;
mod goal;
mod transaction;

pub use account::{Account, AccountKind};
pub use budget::BudgetCategory;
pub use common::{
    CATEGORY_PALETTE, Entity, GOAL_CATEGORY, GOAL_PALETTE, OTHER_CATEGORY, TRANSFER_CATEGORY,
};
pub use entity_id::{EntityId, OwnerId};
pub use goal::{Goal, palette_color};
pub use transaction::{Transaction, TransactionDraft, TransactionKind};
