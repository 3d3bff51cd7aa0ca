//! State engine between `pennywise-api` and UI consumers (CLI).
//!
//! This crate owns the domain model, the state transitions, and the
//! remote mirroring for the pennywise workspace:
//!
//! - **[`reduce`]**: the pure `(state, action) -> state` function. Every
//!   change to the canonical [`AppState`] goes through it; it never fails
//!   and never mutates the previous snapshot.
//!
//! - **[`Store`]**: holds the current snapshot in a `tokio::sync::watch`
//!   channel and exposes the single [`dispatch`](Store::dispatch) entry
//!   point. Consumers hold a [`StoreHandle`], which fails loudly with
//!   [`CoreError::StoreUnavailable`] once the store is gone.
//!
//! - **[`SyncController`]**: reloads all four collections whenever the
//!   [`Identity`] changes and writes them back after a debounce period.
//!   Talks to the remote through the [`RemoteStore`] trait, implemented by
//!   `pennywise_api::DocumentClient` and by the in-process [`MemoryRemote`].
//!
//! - **[`AppContext`]**: wires the three together for one session.
//!
//! - **Domain model** ([`model`]): `Account`, `Transaction`, `Goal` and
//!   `BudgetCategory`, with money as `rust_decimal::Decimal`.
//!
//! - **Projections** ([`projection`]) and [`Transfer`]: read-only views
//!   and multi-transaction intents built on top of a snapshot.

pub mod action;
pub mod config;
pub mod context;
pub mod error;
pub mod identity;
pub mod model;
pub mod projection;
pub mod reducer;
pub mod state;
pub mod store;
pub mod stream;
pub mod sync;
pub mod transfer;

// ── Primary re-exports ──────────────────────────────────────────────
pub use action::{Action, DataSnapshot};
pub use config::SyncConfig;
pub use context::AppContext;
pub use error::CoreError;
pub use identity::Identity;
pub use reducer::reduce;
pub use state::AppState;
pub use store::{Store, StoreHandle};
pub use stream::{StateStream, StateWatchStream};
pub use sync::{MemoryRemote, PersistOutcome, ReloadOutcome, RemoteStore, SyncController};
pub use transfer::{Transfer, TransferRequest};

pub use model::{
    Account, AccountKind, BudgetCategory, CATEGORY_PALETTE, Entity, EntityId, GOAL_CATEGORY, Goal,
    OTHER_CATEGORY, OwnerId, TRANSFER_CATEGORY, Transaction, TransactionDraft, TransactionKind,
};

// Remote collection names are part of the public surface.
pub use pennywise_api::Collection;
