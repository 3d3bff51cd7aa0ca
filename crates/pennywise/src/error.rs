//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use pennywise_config::ConfigError;
use pennywise_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const SYNC: i32 = 5;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the document service at {url}: {reason}")]
    #[diagnostic(
        code(pennywise::connection_failed),
        help(
            "Check that the service is running and accessible.\n\
             URL: {url}\n\
             Try: pennywise accounts list --insecure"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(pennywise::auth_failed),
        help("Verify your API token.\nRun: pennywise config set-token")
    )]
    AuthFailed { message: String },

    #[error("No user configured")]
    #[diagnostic(
        code(pennywise::no_user),
        help("Set one with --user, PENNYWISE_USER or: pennywise config set user <id>")
    )]
    NoUser,

    // ── Sync ─────────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(
        code(pennywise::load_failed),
        help("Run with -v to see the underlying error.")
    )]
    LoadFailed { message: String },

    #[error("{message}")]
    #[diagnostic(
        code(pennywise::save_failed),
        help(
            "Some changes may not have been written.\n\
             Run the command again; writes are idempotent."
        )
    )]
    SaveFailed { message: String },

    #[error("Remote error: {message}")]
    #[diagnostic(code(pennywise::remote))]
    Remote { message: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(pennywise::not_found),
        help("Run: pennywise {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(pennywise::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(pennywise::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: pennywise config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration file not found")]
    #[diagnostic(
        code(pennywise::no_config),
        help(
            "Create one with: pennywise config init\n\
             Expected at: {path}\n\
             Or try without a server: pennywise --offline ..."
        )
    )]
    NoConfig { path: String },

    #[error("{message}")]
    #[diagnostic(code(pennywise::config))]
    Config { message: String },

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(pennywise::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Timeout ──────────────────────────────────────────────────────
    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(pennywise::timeout),
        help("Increase timeout with --timeout or check service responsiveness.")
    )]
    Timeout { seconds: u64 },

    // ── Internal ─────────────────────────────────────────────────────
    #[error("Session closed unexpectedly")]
    #[diagnostic(code(pennywise::session_closed))]
    SessionClosed,

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Could not render output: {0}")]
    #[diagnostic(code(pennywise::render))]
    Render(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoUser => exit_code::AUTH,
            Self::NotFound { .. } | Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::LoadFailed { .. } | Self::SaveFailed { .. } | Self::Remote { .. } => {
                exit_code::SYNC
            }
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Unauthenticated => CliError::NoUser,

            CoreError::StoreUnavailable => CliError::SessionClosed,

            CoreError::OwnerChanged => CliError::SaveFailed {
                message: CoreError::OwnerChanged.to_string(),
            },

            CoreError::NotFound {
                entity_type,
                identifier,
            } => CliError::NotFound {
                list_command: list_command_for(&entity_type).into(),
                resource_type: entity_type,
                identifier,
            },

            CoreError::ValidationFailed { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed { url, reason },

            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },

            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },

            CoreError::Remote { message, status } => CliError::Remote {
                message: match status {
                    Some(code) => format!("{message} (HTTP {code})"),
                    None => message,
                },
            },

            CoreError::InvalidDocument { collection, id } => CliError::Remote {
                message: format!("could not encode {collection}/{id}"),
            },

            CoreError::Encoding(e) => CliError::Render(e.to_string()),

            CoreError::Config { message } => CliError::Config { message },

            CoreError::Internal(message) => CliError::Remote { message },
        }
    }
}

fn list_command_for(entity_type: &str) -> &'static str {
    match entity_type {
        "account" => "accounts list",
        "goal" => "goals list",
        "budget category" => "budget list",
        _ => "transactions list --all",
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::ProfileNotFound { name } => CliError::ProfileNotFound {
                name,
                available: "(see: pennywise config profiles)".into(),
            },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config {
                message: other.to_string(),
            },
        }
    }
}
