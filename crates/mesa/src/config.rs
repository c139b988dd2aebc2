//! CLI configuration: thin wrapper around `mesa_config` shared types.
//!
//! Re-exports the shared types and adds resolution that respects
//! `GlobalOpts` flag overrides (--server, --restaurant, --token-file, ...).

use mesa_core::{ClientConfig, CredentialBackend, ResourceId, Scope, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use mesa_config::{Config, Defaults, Profile, StoreKind, config_path, load_config, save_config};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.profile_name(global.profile.as_deref()).to_owned()
}

/// Look up the active profile, listing the alternatives when it is missing.
pub fn active_profile(global: &GlobalOpts, config: &Config) -> Result<(String, Profile), CliError> {
    let name = active_profile_name(global, config);
    match config.profile(&name) {
        Ok(profile) => Ok((name, profile)),
        Err(_) => Err(profile_not_found(config, name)),
    }
}

pub fn profile_not_found(config: &Config, name: String) -> CliError {
    let mut available: Vec<_> = config.profiles.keys().cloned().collect();
    available.sort();
    CliError::ProfileNotFound {
        name,
        available: if available.is_empty() {
            "(none)".into()
        } else {
            available.join(", ")
        },
    }
}

/// Translate a `Profile` + global flags into a `ClientConfig`.
///
/// CLI flag overrides take priority over profile values.
pub fn resolve_profile(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
    global: &GlobalOpts,
) -> Result<ClientConfig, CliError> {
    let mut profile = profile.clone();

    // 1. Server URL (flag > env > profile)
    if let Some(ref server) = global.server {
        profile.server.clone_from(server);
    }

    let mut config = mesa_config::profile_to_client_config(&profile, profile_name, defaults)?;

    // 2. Token file flag switches the store regardless of profile
    if let Some(ref path) = global.token_file {
        config.credentials = CredentialBackend::File { path: path.clone() };
    }

    // 3. TLS
    if global.insecure {
        config.tls = TlsVerification::DangerAcceptInvalid;
    }

    Ok(config)
}

/// Collection scope: flags over profile values.
pub fn resolve_scope(profile: &Profile, global: &GlobalOpts) -> Scope {
    let mut scope = profile.scope();
    if let Some(ref id) = global.restaurant {
        scope.restaurant_id = Some(ResourceId::from(id.as_str()));
    }
    if let Some(ref id) = global.user {
        scope.user_id = Some(ResourceId::from(id.as_str()));
    }
    scope
}
