//! Configuration for the pennywise CLI.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext),
//! and translation into the runtime configs of `pennywise-api` and
//! `pennywise-core`. The CLI layers its `GlobalOpts` overrides on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use url::Url;

use pennywise_api::{TlsMode, TransportConfig};
use pennywise_core::{OwnerId, SyncConfig};

/// Keyring service name under which API tokens are stored.
pub const KEYRING_SERVICE: &str = "pennywise";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found")]
    ProfileNotFound { name: String },

    #[error("no API token configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named document-service profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Name of the profile to use when none is given explicitly.
    pub fn active_profile_name(&self) -> &str {
        self.default_profile.as_deref().unwrap_or("default")
    }

    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::ProfileNotFound { name: name.into() })
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Quiet period before changes are written back, in milliseconds.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Currency assigned to new accounts.
    #[serde(default = "default_currency")]
    pub currency: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
            debounce_ms: default_debounce_ms(),
            currency: default_currency(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_debounce_ms() -> u64 {
    1000
}
fn default_currency() -> String {
    "EUR".into()
}

/// A named document-service profile.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Document service base URL (e.g., "https://sync.example.com").
    pub server: String,

    /// Owner id the records are stored under.
    pub user: String,

    /// API token (plaintext, prefer keyring or env var).
    pub api_token: Option<String>,

    /// Environment variable name containing the API token.
    pub api_token_env: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Accept invalid TLS certificates.
    pub insecure: Option<bool>,

    /// Override timeout (seconds).
    pub timeout: Option<u64>,

    /// Override debounce (milliseconds).
    pub debounce_ms: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "pennywise", "pennywise").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("pennywise");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the Config from `path`, layered under `PENNYWISE_*` variables
/// (`PENNYWISE_DEFAULTS__OUTPUT=json` sets `defaults.output`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("PENNYWISE_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist or is
/// unreadable.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution (without CLI flags) ───────────────────────

fn keyring_entry(profile_name: &str) -> Option<keyring::Entry> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/api-token")).ok()
}

/// Resolve an API token from the credential chain (no CLI flag step).
///
/// Order: the profile's `api_token_env` variable, the system keyring,
/// then the plaintext `api_token`.
pub fn resolve_api_token(
    profile: &Profile,
    profile_name: &str,
) -> Result<SecretString, ConfigError> {
    resolve_api_token_with(profile, profile_name, |name| {
        keyring_entry(name).and_then(|e| e.get_password().ok())
    })
}

/// The credential chain with the keyring step supplied by the caller.
fn resolve_api_token_with(
    profile: &Profile,
    profile_name: &str,
    keyring_lookup: impl FnOnce(&str) -> Option<String>,
) -> Result<SecretString, ConfigError> {
    // 1. Profile's api_token_env → env var lookup
    if let Some(val) = profile
        .api_token_env
        .as_ref()
        .and_then(|name| std::env::var(name).ok())
    {
        return Ok(SecretString::from(val));
    }

    // 2. System keyring
    if let Some(secret) = keyring_lookup(profile_name) {
        return Ok(SecretString::from(secret));
    }

    // 3. Plaintext in config
    if let Some(ref token) = profile.api_token {
        return Ok(SecretString::from(token.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Store an API token in the system keyring for `profile_name`.
pub fn store_api_token(profile_name: &str, token: &str) -> Result<(), ConfigError> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/api-token"))
        .map_err(|e| ConfigError::Validation {
            field: "keyring".into(),
            reason: e.to_string(),
        })?;
    entry
        .set_password(token)
        .map_err(|e| ConfigError::Validation {
            field: "keyring".into(),
            reason: e.to_string(),
        })
}

// ── Translation to runtime configs ──────────────────────────────────

/// Everything needed to reach the document service for one profile.
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub base_url: Url,
    pub owner: OwnerId,
    pub transport: TransportConfig,
}

/// Build service settings from a profile, no CLI flag overrides.
///
/// A missing token is not an error: services without auth accept
/// anonymous requests.
pub fn profile_to_service_settings(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<ServiceSettings, ConfigError> {
    let token = match resolve_api_token(profile, profile_name) {
        Ok(token) => Some(token),
        Err(ConfigError::NoCredentials { .. }) => None,
        Err(e) => return Err(e),
    };
    service_settings(profile, defaults, token)
}

fn service_settings(
    profile: &Profile,
    defaults: &Defaults,
    token: Option<SecretString>,
) -> Result<ServiceSettings, ConfigError> {
    let base_url: Url = profile.server.parse().map_err(|_| ConfigError::Validation {
        field: "server".into(),
        reason: format!("invalid URL: {}", profile.server),
    })?;

    if profile.user.trim().is_empty() {
        return Err(ConfigError::Validation {
            field: "user".into(),
            reason: "must not be empty".into(),
        });
    }

    let tls = if profile.insecure.unwrap_or(false) {
        TlsMode::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsMode::CustomCa(ca_path.clone())
    } else {
        TlsMode::System
    };

    Ok(ServiceSettings {
        base_url,
        owner: OwnerId::new(profile.user.trim()),
        transport: TransportConfig {
            tls,
            timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)),
            token,
        },
    })
}

/// Sync tuning for a profile, falling back to the global defaults.
pub fn sync_config(profile: Option<&Profile>, defaults: &Defaults) -> SyncConfig {
    let debounce_ms = profile
        .and_then(|p| p.debounce_ms)
        .unwrap_or(defaults.debounce_ms);
    SyncConfig::default().with_debounce(Duration::from_millis(debounce_ms))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    const SAMPLE: &str = r#"
default_profile = "home"

[defaults]
output = "json"
debounce_ms = 250

[profiles.home]
server = "https://sync.example.com"
user = "alice"
api_token = "plain-token"
timeout = 5

[profiles.lab]
server = "not a url"
user = "bob"
"#;

    fn write_sample(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("config.toml");
        std::fs::write(&path, SAMPLE).unwrap();
        path
    }

    #[test]
    fn loads_profiles_and_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&write_sample(&dir)).unwrap();

        assert_eq!(cfg.active_profile_name(), "home");
        assert_eq!(cfg.defaults.output, "json");
        assert_eq!(cfg.defaults.debounce_ms, 250);
        // Unspecified defaults are filled in.
        assert_eq!(cfg.defaults.timeout, 30);
        assert_eq!(cfg.defaults.currency, "EUR");
        assert_eq!(cfg.profiles.len(), 2);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.active_profile_name(), "default");
        assert!(cfg.profiles.is_empty());
    }

    #[test]
    fn save_then_load_keeps_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "default".into(),
            Profile {
                server: "http://localhost:8080".into(),
                user: "u1".into(),
                ..Profile::default()
            },
        );
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.profile("default").unwrap().user, "u1");
    }

    #[test]
    fn unknown_profile_is_an_error() {
        let cfg = Config::default();
        assert!(matches!(
            cfg.profile("nope"),
            Err(ConfigError::ProfileNotFound { .. })
        ));
    }

    #[test]
    fn service_settings_from_profile() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&write_sample(&dir)).unwrap();
        let token = Some(SecretString::from("plain-token".to_owned()));
        let settings =
            service_settings(cfg.profile("home").unwrap(), &cfg.defaults, token).unwrap();

        assert_eq!(settings.base_url.as_str(), "https://sync.example.com/");
        assert_eq!(settings.owner.as_str(), "alice");
        assert_eq!(settings.transport.timeout, Duration::from_secs(5));
        assert!(matches!(settings.transport.tls, TlsMode::System));
        assert_eq!(
            settings.transport.token.as_ref().map(ExposeSecret::expose_secret),
            Some("plain-token")
        );
    }

    #[test]
    fn invalid_server_url_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&write_sample(&dir)).unwrap();
        let err = service_settings(cfg.profile("lab").unwrap(), &cfg.defaults, None).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "server"));
    }

    #[test]
    fn plaintext_token_is_the_last_resort() {
        let profile = Profile {
            api_token: Some("plain".into()),
            api_token_env: Some("PENNYWISE_TEST_UNSET_TOKEN_VAR".into()),
            ..Profile::default()
        };
        let token = resolve_api_token_with(&profile, "plaintext", |_| None).unwrap();
        assert_eq!(token.expose_secret(), "plain");
    }

    #[test]
    fn keyring_wins_over_plaintext() {
        let profile = Profile {
            api_token: Some("plain".into()),
            ..Profile::default()
        };
        let mut asked = None;
        let token = resolve_api_token_with(&profile, "home", |name| {
            asked = Some(name.to_owned());
            Some("from-keyring".into())
        })
        .unwrap();
        assert_eq!(token.expose_secret(), "from-keyring");
        assert_eq!(asked.as_deref(), Some("home"));
    }

    #[test]
    fn missing_token_is_reported_per_profile() {
        let err = resolve_api_token_with(&Profile::default(), "pennywise-test-empty", |_| None)
            .unwrap_err();
        assert!(matches!(err, ConfigError::NoCredentials { ref profile } if profile == "pennywise-test-empty"));
    }

    #[test]
    fn profile_debounce_overrides_default() {
        let defaults = Defaults::default();
        let profile = Profile {
            debounce_ms: Some(50),
            ..Profile::default()
        };
        assert_eq!(
            sync_config(Some(&profile), &defaults).debounce,
            Duration::from_millis(50)
        );
        assert_eq!(
            sync_config(None, &defaults).debounce,
            Duration::from_millis(1000)
        );
    }
}
