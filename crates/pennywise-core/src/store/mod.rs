// ── State container ──
//
// Owns the canonical snapshot and the single dispatch entry point.

mod app_store;
mod handle;

pub use app_store::Store;
pub use handle::StoreHandle;
