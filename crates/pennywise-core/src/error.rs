// ── Core error types ──
//
// Errors surfaced by pennywise-core. Consumers never see HTTP details
// directly; the `From<pennywise_api::Error>` impl translates transport
// failures into sync-level variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Session & context ────────────────────────────────────────────
    #[error("No authenticated user")]
    Unauthenticated,

    #[error("Store is no longer available: its context has been shut down")]
    StoreUnavailable,

    #[error("Signed-in user changed since the data was loaded")]
    OwnerChanged,

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Invalid data structure for {collection}/{id}")]
    InvalidDocument { collection: String, id: String },

    #[error("Entity not found: {entity_type} with id {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    #[error("Encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    // ── Remote errors (wrapped, not exposed raw) ─────────────────────
    #[error("Cannot reach document service at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Document service rejected credentials: {message}")]
    AuthenticationFailed { message: String },

    #[error("Document service timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Remote error: {message}")]
    Remote {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<pennywise_api::Error> for CoreError {
    fn from(err: pennywise_api::Error) -> Self {
        use pennywise_api::Error as Api;

        match err {
            Api::Unauthorized { message, .. } => CoreError::AuthenticationFailed { message },
            Api::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map(ToString::to_string)
                            .unwrap_or_else(|| "<unknown>".into()),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Remote {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            Api::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            Api::InvalidUrl(e) => CoreError::Config {
                message: format!("invalid document service URL: {e}"),
            },
            Api::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            Api::NotFound { path } => CoreError::NotFound {
                entity_type: "document".into(),
                identifier: path,
            },
            Api::Service { status, message } => CoreError::Remote {
                message,
                status: Some(status),
            },
            Api::Deserialization { message, .. } => CoreError::Remote {
                message: format!("unreadable response: {message}"),
                status: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_maps_to_authentication_failed() {
        let err: CoreError = pennywise_api::Error::Unauthorized {
            status: 401,
            message: "token expired".into(),
        }
        .into();
        assert!(matches!(err, CoreError::AuthenticationFailed { ref message } if message == "token expired"));
    }

    #[test]
    fn service_error_keeps_status() {
        let err: CoreError = pennywise_api::Error::Service {
            status: 503,
            message: "maintenance".into(),
        }
        .into();
        assert!(matches!(err, CoreError::Remote { status: Some(503), .. }));
    }

    #[test]
    fn unauthenticated_message() {
        assert_eq!(CoreError::Unauthenticated.to_string(), "No authenticated user");
    }
}
