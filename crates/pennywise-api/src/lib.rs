//! Async client for the remote document collection service backing pennywise.
//!
//! The service stores one JSON document per entity in four named
//! [`Collection`]s and supports exactly three operations, all exposed on
//! [`DocumentClient`]:
//!
//! - merge-upsert of a document by id,
//! - equality-filtered scan of a collection,
//! - delete by id.
//!
//! Typed decoding, validation and owner stamping happen in `pennywise-core`.

pub mod client;
pub mod collection;
pub mod error;
pub mod models;
pub mod transport;

pub use client::DocumentClient;
pub use collection::Collection;
pub use error::Error;
pub use models::{Fields, RawDocument};
pub use transport::{TlsMode, TransportConfig};
