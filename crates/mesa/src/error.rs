//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use mesa_config::ConfigError;
use mesa_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the backend: {message}")]
    #[diagnostic(
        code(mesa::connection_failed),
        help(
            "Check that the backend is running and reachable.\n\
             Override the address with: mesa --server http://host:8080 status"
        )
    )]
    ConnectionFailed { message: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(mesa::auth_failed),
        help("Check the email and password, then run: mesa login <email>")
    )]
    AuthFailed { message: String },

    #[error("The backend rejected the session: {message}")]
    #[diagnostic(
        code(mesa::unauthorized),
        help("The stored token is missing or expired. Run: mesa login <email>")
    )]
    Unauthorized { message: String },

    #[error("Credential storage failed: {message}")]
    #[diagnostic(
        code(mesa::credential_store),
        help(
            "The system keyring may be locked or unavailable.\n\
             Use a token file instead: mesa --token-file <path> ..."
        )
    )]
    CredentialStore { message: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("Missing required {kind} fields: {fields}")]
    #[diagnostic(
        code(mesa::missing_fields),
        help("Run: mesa {kind}s create --help to see the available flags")
    )]
    MissingFields { kind: String, fields: String },

    #[error("The {kind} list is busy")]
    #[diagnostic(code(mesa::busy), help("Wait for the current operation and try again."))]
    Busy { kind: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("Backend error (HTTP {status}): {message}")]
    #[diagnostic(code(mesa::api_error))]
    ApiError { status: u16, message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(mesa::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(mesa::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: mesa config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(
        code(mesa::config),
        help("Inspect the file with: mesa config show")
    )]
    Config { message: String },

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(mesa::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::Unauthorized { .. } | Self::CredentialStore { .. } => {
                exit_code::AUTH
            }
            Self::ApiError { status: 404, .. } => exit_code::NOT_FOUND,
            Self::ApiError { status: 403, .. } => exit_code::PERMISSION,
            Self::ApiError { status: 409, .. } => exit_code::CONFLICT,
            Self::Validation { .. }
            | Self::MissingFields { .. }
            | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        if err.is_unauthorized() && !matches!(err, CoreError::AuthenticationFailed { .. }) {
            return CliError::Unauthorized {
                message: err.to_string(),
            };
        }

        match err {
            CoreError::InvalidInput { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::MissingField { kind, fields } => CliError::MissingFields {
                kind: kind.to_string(),
                fields: fields.join(", "),
            },

            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },

            CoreError::Busy { kind } => CliError::Busy {
                kind: kind.to_string(),
            },

            failed @ (CoreError::FetchFailed { .. } | CoreError::MutationFailed { .. }) => {
                let message = failed.to_string();
                match failed.status() {
                    Some(status) => CliError::ApiError { status, message },
                    None => CliError::ConnectionFailed { message },
                }
            }

            CoreError::Gateway { status, message } => CliError::ApiError { status, message },

            CoreError::Transport { message } => CliError::ConnectionFailed { message },

            CoreError::Credential { message } => CliError::CredentialStore { message },

            CoreError::Config { message } => CliError::Config { message },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::UnknownProfile { name } => CliError::ProfileNotFound {
                name,
                available: "(run: mesa config profiles)".into(),
            },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config {
                message: other.to_string(),
            },
        }
    }
}
