//! Configuration for the mesa CLI.
//!
//! TOML profiles on disk, `MESA_`-prefixed environment overrides, and
//! translation to `mesa_core::ClientConfig`. The CLI adds flag-aware
//! wrappers on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use mesa_core::{
    ClientConfig, CredentialBackend, DEFAULT_SERVER, DEFAULT_TOKEN_SLOT, Scope, TlsVerification,
};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found")]
    UnknownProfile { name: String },

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
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when `--profile` is not given.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named backend profiles.
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
    /// Name of the profile to use, given an optional override.
    pub fn profile_name<'a>(&'a self, requested: Option<&'a str>) -> &'a str {
        requested
            .or(self.default_profile.as_deref())
            .unwrap_or("default")
    }

    /// The named profile. A missing `default` profile resolves to the
    /// built-in local-backend profile so a fresh install works.
    pub fn profile(&self, name: &str) -> Result<Profile, ConfigError> {
        match self.profiles.get(name) {
            Some(p) => Ok(p.clone()),
            None if name == "default" => Ok(Profile::default()),
            None => Err(ConfigError::UnknownProfile { name: name.into() }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}

/// Where a profile keeps its session token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    #[default]
    Keyring,
    File,
    Memory,
}

/// A named backend profile.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Profile {
    /// Backend base URL (e.g. "http://127.0.0.1:8080").
    #[serde(default = "default_server")]
    pub server: String,

    #[serde(default)]
    pub credential_store: StoreKind,

    /// Keyring account name for the token.
    pub token_slot: Option<String>,

    /// Token file for the `file` store. Defaults to the data directory.
    pub token_file: Option<PathBuf>,

    /// Restaurant the collections are scoped to.
    pub restaurant_id: Option<String>,

    /// User embedded into reservations and reviews.
    pub user_id: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override the global insecure TLS setting.
    pub insecure: Option<bool>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            server: default_server(),
            credential_store: StoreKind::default(),
            token_slot: None,
            token_file: None,
            restaurant_id: None,
            user_id: None,
            ca_cert: None,
            insecure: None,
        }
    }
}

fn default_server() -> String {
    DEFAULT_SERVER.into()
}

impl Profile {
    /// Collection scope from the profile's restaurant and user ids.
    pub fn scope(&self) -> Scope {
        Scope {
            restaurant_id: self.restaurant_id.as_deref().map(Into::into),
            user_id: self.user_id.as_deref().map(Into::into),
        }
    }
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "mesa", "mesa")
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback(".config").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Directory for state files such as token files.
pub fn data_dir() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback(".local/share"),
        |dirs| dirs.data_dir().to_path_buf(),
    )
}

fn dirs_fallback(under_home: &str) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(under_home);
    p.push("mesa");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from `path` (missing file is fine), then apply `MESA_` env
/// overrides. Nested keys use a double underscore: `MESA_DEFAULTS__OUTPUT`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("MESA_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file is missing or broken.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Translation ─────────────────────────────────────────────────────

/// Keyring account a profile uses when `token_slot` is unset.
///
/// One slot per profile; `default` keeps the bare slot name.
pub fn default_token_slot(profile_name: &str) -> String {
    if profile_name == "default" {
        DEFAULT_TOKEN_SLOT.into()
    } else {
        format!("{profile_name}:{DEFAULT_TOKEN_SLOT}")
    }
}

/// Build a `ClientConfig` from a profile, no CLI flag overrides.
pub fn profile_to_client_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<ClientConfig, ConfigError> {
    let server: url::Url = profile
        .server
        .parse()
        .map_err(|e| ConfigError::Validation {
            field: "server".into(),
            reason: format!("invalid URL '{}': {e}", profile.server),
        })?;

    let credentials = match profile.credential_store {
        StoreKind::Keyring => CredentialBackend::Keyring {
            slot: profile
                .token_slot
                .clone()
                .unwrap_or_else(|| default_token_slot(profile_name)),
        },
        StoreKind::File => CredentialBackend::File {
            path: profile
                .token_file
                .clone()
                .unwrap_or_else(|| data_dir().join(format!("{profile_name}.token"))),
        },
        StoreKind::Memory => CredentialBackend::Memory,
    };

    let tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    Ok(ClientConfig {
        server,
        credentials,
        tls,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use mesa_core::ResourceId;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.default_profile.as_deref(), Some("default"));
        assert_eq!(cfg.defaults.output, "table");
        assert!(cfg.profiles.is_empty());
    }

    #[test]
    fn saved_profiles_load_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/config.toml");
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "staging".into(),
            Profile {
                server: "https://staging.example.com/api".into(),
                credential_store: StoreKind::File,
                restaurant_id: Some("12".into()),
                ..Profile::default()
            },
        );

        save_config_to(&cfg, &path).unwrap();
        let loaded = load_config_from(&path).unwrap();

        assert_eq!(loaded, cfg);
    }

    #[test]
    fn parses_hand_written_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
default_profile = "casa"

[profiles.casa]
server = "http://10.0.0.5:8080"
credential_store = "memory"
restaurant_id = "3"
user_id = "u-1"
"#,
        )
        .unwrap();

        let cfg = load_config_from(&path).unwrap();
        let profile = cfg.profile(cfg.profile_name(None)).unwrap();

        assert_eq!(profile.credential_store, StoreKind::Memory);
        assert_eq!(profile.scope().restaurant_id, Some(ResourceId::Numeric(3)));
        assert_eq!(profile.scope().user_id, Some(ResourceId::Text("u-1".into())));
    }

    #[test]
    fn default_profile_exists_without_config() {
        let cfg = Config::default();
        assert_eq!(cfg.profile("default").unwrap(), Profile::default());
        assert!(matches!(
            cfg.profile("nope"),
            Err(ConfigError::UnknownProfile { .. })
        ));
    }

    #[test]
    fn profile_translation_picks_store_and_tls() {
        let profile = Profile {
            token_slot: Some("token".into()),
            insecure: Some(true),
            ..Profile::default()
        };
        let client = profile_to_client_config(&profile, "default", &Defaults::default()).unwrap();

        assert_eq!(client.server.as_str(), "http://127.0.0.1:8080/");
        assert_eq!(
            client.credentials,
            CredentialBackend::Keyring {
                slot: "token".into()
            }
        );
        assert_eq!(client.tls, TlsVerification::DangerAcceptInvalid);
    }

    #[test]
    fn keyring_slot_is_per_profile() {
        let prod = Profile {
            server: "https://prod.example.com".into(),
            ..Profile::default()
        };
        let staging = Profile {
            server: "https://staging.example.com".into(),
            ..Profile::default()
        };
        let defaults = Defaults::default();

        let slot = |profile: &Profile, name: &str| {
            profile_to_client_config(profile, name, &defaults)
                .unwrap()
                .credentials
        };

        assert_eq!(
            slot(&prod, "prod"),
            CredentialBackend::Keyring {
                slot: "prod:userToken".into()
            }
        );
        assert_eq!(
            slot(&staging, "staging"),
            CredentialBackend::Keyring {
                slot: "staging:userToken".into()
            }
        );
        assert_eq!(
            slot(&Profile::default(), "default"),
            CredentialBackend::Keyring {
                slot: DEFAULT_TOKEN_SLOT.into()
            }
        );
    }

    #[test]
    fn file_store_defaults_to_data_dir() {
        let profile = Profile {
            credential_store: StoreKind::File,
            ..Profile::default()
        };
        let client = profile_to_client_config(&profile, "work", &Defaults::default()).unwrap();
        match client.credentials {
            CredentialBackend::File { path } => assert!(path.ends_with("work.token")),
            other => panic!("expected file backend, got {other:?}"),
        }
    }

    #[test]
    fn invalid_server_is_validation_error() {
        let profile = Profile {
            server: "not a url".into(),
            ..Profile::default()
        };
        let err = profile_to_client_config(&profile, "default", &Defaults::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "server"));
    }
}
