//! Config subcommand handlers.

use std::collections::HashMap;

use dialoguer::{Input, Select};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Defaults, Profile, StoreKind};
use crate::error::CliError;
use crate::output;

use super::{collection, util::prompt_err};

const PROFILE_KEYS: &str =
    "server, credential_store, token_slot, token_file, restaurant_id, user_id, insecure, ca_cert";

// ── Helpers ─────────────────────────────────────────────────────────

fn format_config(cfg: &Config) -> String {
    toml::to_string_pretty(cfg).unwrap_or_else(|e| format!("# failed to render config: {e}"))
}

/// Optional free-text prompt; an empty answer means "not set".
fn prompt_optional(prompt: &str) -> Result<Option<String>, CliError> {
    let answer: String = Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()
        .map_err(prompt_err)?;
    let answer = answer.trim();
    Ok((!answer.is_empty()).then(|| answer.to_owned()))
}

fn parse_bool(field: &str, value: &str) -> Result<bool, CliError> {
    value.parse().map_err(|_| CliError::Validation {
        field: field.into(),
        reason: "must be 'true' or 'false'".into(),
    })
}

fn parse_store(value: &str) -> Result<StoreKind, CliError> {
    match value {
        "keyring" => Ok(StoreKind::Keyring),
        "file" => Ok(StoreKind::File),
        "memory" => Ok(StoreKind::Memory),
        _ => Err(CliError::Validation {
            field: "credential_store".into(),
            reason: "must be 'keyring', 'file', or 'memory'".into(),
        }),
    }
}

/// Apply `key = value` to a profile.
fn set_profile_value(profile: &mut Profile, key: &str, value: String) -> Result<(), CliError> {
    match key {
        "server" => {
            url::Url::parse(&value).map_err(|e| CliError::Validation {
                field: "server".into(),
                reason: format!("invalid URL '{value}': {e}"),
            })?;
            profile.server = value;
        }
        "credential_store" | "credential-store" => profile.credential_store = parse_store(&value)?,
        "token_slot" | "token-slot" => profile.token_slot = Some(value),
        "token_file" | "token-file" => profile.token_file = Some(value.into()),
        "restaurant_id" | "restaurant-id" | "restaurant" => profile.restaurant_id = Some(value),
        "user_id" | "user-id" | "user" => profile.user_id = Some(value),
        "insecure" => profile.insecure = Some(parse_bool("insecure", &value)?),
        "ca_cert" | "ca-cert" => profile.ca_cert = Some(value.into()),
        other => {
            return Err(CliError::Validation {
                field: other.into(),
                reason: format!("unknown config key '{other}'. Valid keys: {PROFILE_KEYS}"),
            });
        }
    }
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path();
            eprintln!("mesa configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            let server: String = Input::new()
                .with_prompt("Backend URL")
                .default(mesa_core::DEFAULT_SERVER.trim_end_matches('/').into())
                .interact_text()
                .map_err(prompt_err)?;

            let store_choices = &[
                "System keyring (recommended)",
                "Token file (headless machines)",
            ];
            let credential_store = match Select::new()
                .with_prompt("Where should the session token be kept?")
                .items(store_choices)
                .default(0)
                .interact()
                .map_err(prompt_err)?
            {
                0 => StoreKind::Keyring,
                _ => StoreKind::File,
            };

            let restaurant_id = prompt_optional("Restaurant ID (optional)")?;
            let user_id = prompt_optional("User ID (optional)")?;

            let mut profile = Profile {
                credential_store,
                restaurant_id,
                user_id,
                ..Profile::default()
            };
            set_profile_value(&mut profile, "server", server)?;

            let mut cfg = config::load_config()?;
            if cfg.profiles.is_empty() {
                cfg = Config {
                    default_profile: Some(profile_name.clone()),
                    defaults: Defaults::default(),
                    profiles: HashMap::new(),
                };
            }
            cfg.profiles.insert(profile_name.clone(), profile);

            let path = config::save_config(&cfg)?;

            collection::announce(global, &format!("Configuration written to {}", path.display()));
            eprintln!("  Profile: {profile_name}");
            eprintln!("\n  Sign in with: mesa --profile {profile_name} login <email>");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load_config()?;
            let out = output::render_single(&global.output, &cfg, format_config, |_| {
                "config".into()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            println!("{}", config::config_path().display());
            Ok(())
        }

        // ── Set <key> <value> ───────────────────────────────────────
        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config()?;
            let profile_name = config::active_profile_name(global, &cfg);

            let profile = cfg.profiles.entry(profile_name.clone()).or_default();
            set_profile_value(profile, &key, value)?;

            config::save_config(&cfg)?;
            collection::announce(global, &format!("Set {key} on profile '{profile_name}'"));
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = config::load_config()?;
            let default = cfg.default_profile.as_deref().unwrap_or("default");
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: mesa config init");
            } else {
                let mut names: Vec<_> = cfg.profiles.keys().collect();
                names.sort();
                for name in names {
                    let marker = if name == default { " *" } else { "" };
                    println!("{name}{marker}");
                }
            }
            Ok(())
        }

        // ── Use <name> ─────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config()?;

            if !cfg.profiles.contains_key(&name) {
                return Err(config::profile_not_found(&cfg, name));
            }

            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            collection::announce(global, &format!("Default profile set to '{name}'"));
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn set_profile_value_updates_known_keys() {
        let mut profile = Profile::default();
        set_profile_value(&mut profile, "restaurant-id", "12".into()).unwrap();
        set_profile_value(&mut profile, "credential_store", "file".into()).unwrap();
        set_profile_value(&mut profile, "insecure", "true".into()).unwrap();

        assert_eq!(profile.restaurant_id.as_deref(), Some("12"));
        assert_eq!(profile.credential_store, StoreKind::File);
        assert_eq!(profile.insecure, Some(true));
    }

    #[test]
    fn set_profile_value_rejects_bad_input() {
        let mut profile = Profile::default();
        assert!(set_profile_value(&mut profile, "server", "nope".into()).is_err());
        assert!(set_profile_value(&mut profile, "credential_store", "vault".into()).is_err());
        assert!(set_profile_value(&mut profile, "colour", "red".into()).is_err());
    }
}
