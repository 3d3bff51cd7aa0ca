// ── Wire payloads ──
//
// Raw shapes exchanged with the document service. Documents are untyped
// JSON objects here; `pennywise-core` validates and decodes them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A JSON object as stored by the service.
pub type Fields = Map<String, Value>;

/// One document returned by a collection query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDocument {
    /// Document key within its collection.
    pub id: String,
    /// Stored fields. `null` when the service returns an empty record.
    #[serde(default)]
    pub fields: Value,
}

/// Envelope for `GET /v1/{collection}` responses.
#[derive(Debug, Deserialize)]
pub(crate) struct QueryResponse {
    #[serde(default)]
    pub documents: Vec<RawDocument>,
}

/// Error body: `{"error": {"message": "..."}}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    pub error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub message: Option<String>,
}
