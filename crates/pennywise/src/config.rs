//! CLI configuration: thin wrapper around `pennywise_config`.
//!
//! Re-exports the shared types and adds resolution that respects
//! `GlobalOpts` flag overrides (--server, --user, --api-token, ...).

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use pennywise_api::TlsMode;
use pennywise_config::ServiceSettings;
use pennywise_core::{OwnerId, SyncConfig};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use pennywise_config::{
    Config, Defaults, Profile, config_path, load_config_or_default, save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .unwrap_or_else(|| config.active_profile_name().to_owned())
}

/// Everything a session needs: where to sync, as whom, and how.
pub struct SessionConfig {
    pub owner: OwnerId,
    /// `None` in offline mode.
    pub service: Option<ServiceSettings>,
    pub sync: SyncConfig,
    pub currency: String,
}

/// Build the session config from the config file, profile and CLI
/// overrides.
pub fn resolve_session(global: &GlobalOpts) -> Result<SessionConfig, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);
    let profile = cfg.profiles.get(&profile_name);
    let sync = pennywise_config::sync_config(profile, &cfg.defaults);
    let currency = cfg.defaults.currency.clone();

    if global.offline {
        let owner = global
            .user
            .as_deref()
            .or(profile.map(|p| p.user.as_str()))
            .filter(|u| !u.trim().is_empty())
            .unwrap_or("offline");
        return Ok(SessionConfig {
            owner: OwnerId::new(owner.trim()),
            service: None,
            sync,
            currency,
        });
    }

    let service = match profile {
        Some(profile) => resolve_profile(profile, &profile_name, &cfg.defaults, global)?,
        None => resolve_flags_only(&profile_name, &cfg.defaults, global)?,
    };

    Ok(SessionConfig {
        owner: service.owner.clone(),
        service: Some(service),
        sync,
        currency,
    })
}

/// Translate a `Profile` + global flags into `ServiceSettings`.
///
/// CLI flag overrides take priority over profile values.
fn resolve_profile(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
    global: &GlobalOpts,
) -> Result<ServiceSettings, CliError> {
    let mut merged = profile.clone();
    if let Some(ref server) = global.server {
        merged.server.clone_from(server);
    }
    if let Some(ref user) = global.user {
        merged.user.clone_from(user);
    }
    if global.insecure {
        merged.insecure = Some(true);
    }
    if global.timeout.is_some() {
        merged.timeout = global.timeout;
    }

    let mut settings = pennywise_config::profile_to_service_settings(&merged, profile_name, defaults)?;
    if let Some(ref token) = global.api_token {
        settings.transport.token = Some(SecretString::from(token.clone()));
    }
    Ok(settings)
}

/// No profile found: build from CLI flags / env vars alone.
fn resolve_flags_only(
    profile_name: &str,
    defaults: &Defaults,
    global: &GlobalOpts,
) -> Result<ServiceSettings, CliError> {
    let Some(server) = global.server.as_deref() else {
        return Err(if global.profile.is_some() {
            CliError::ProfileNotFound {
                name: profile_name.into(),
                available: "(see: pennywise config profiles)".into(),
            }
        } else {
            CliError::NoConfig {
                path: config_path().display().to_string(),
            }
        });
    };

    let base_url: Url = server.parse().map_err(|_| CliError::Validation {
        field: "server".into(),
        reason: format!("invalid URL: {server}"),
    })?;

    let owner = global
        .user
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or(CliError::NoUser)?;

    let tls = if global.insecure {
        TlsMode::DangerAcceptInvalid
    } else {
        TlsMode::System
    };

    Ok(ServiceSettings {
        base_url,
        owner: OwnerId::new(owner),
        transport: pennywise_api::TransportConfig {
            tls,
            timeout: Duration::from_secs(global.timeout.unwrap_or(defaults.timeout)),
            token: global.api_token.clone().map(SecretString::from),
        },
    })
}
