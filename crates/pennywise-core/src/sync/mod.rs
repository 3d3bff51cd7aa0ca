// ── Remote synchronization ──

mod controller;
pub mod document;
mod memory;
mod remote;

pub use controller::{PersistOutcome, ReloadOutcome, SyncController};
pub use memory::MemoryRemote;
pub use remote::RemoteStore;
