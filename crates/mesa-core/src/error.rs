// ── Core error types ──
//
// Operation-scoped failures the presentation layer renders. Raw HTTP
// and JSON failures from `mesa-api` are folded into these; every
// variant carries only strings so errors can sit inside published
// controller state and be cloned to every subscriber.

use std::fmt;

use thiserror::Error;

use crate::model::EntityKind;

/// Which collection mutation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Create,
    Delete,
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Create => "create",
            Self::Delete => "delete",
        })
    }
}

/// Unified error type for the core crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    // ── Local validation (no network attempted) ──────────────────────
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Missing required {kind} fields: {}", fields.join(", "))]
    MissingField {
        kind: EntityKind,
        fields: Vec<&'static str>,
    },

    // ── Session ──────────────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    // ── Collections ──────────────────────────────────────────────────
    #[error("Failed to fetch {}: {message}", kind.plural())]
    FetchFailed {
        kind: EntityKind,
        message: String,
        status: Option<u16>,
    },

    #[error("Failed to {action} {kind}: {message}")]
    MutationFailed {
        kind: EntityKind,
        action: Mutation,
        message: String,
        status: Option<u16>,
    },

    #[error("The {kind} list is busy; try again when it finishes loading")]
    Busy { kind: EntityKind },

    // ── Wrapped API failures ─────────────────────────────────────────
    #[error("Cannot reach backend: {message}")]
    Transport { message: String },

    #[error("Backend rejected request (HTTP {status}): {message}")]
    Gateway { status: u16, message: String },

    #[error("Credential storage failed: {message}")]
    Credential { message: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    pub(crate) fn fetch(kind: EntityKind, err: &mesa_api::Error) -> Self {
        Self::FetchFailed {
            kind,
            message: Self::cause(err),
            status: err.status(),
        }
    }

    pub(crate) fn mutation(kind: EntityKind, action: Mutation, err: &mesa_api::Error) -> Self {
        Self::MutationFailed {
            kind,
            action,
            message: Self::cause(err),
            status: err.status(),
        }
    }

    pub(crate) fn authentication(err: &mesa_api::Error) -> Self {
        Self::AuthenticationFailed {
            message: Self::cause(err),
        }
    }

    /// Short description of an API failure, without the variant prefix
    /// the wrapping variant already supplies.
    fn cause(err: &mesa_api::Error) -> String {
        match err {
            mesa_api::Error::Gateway {
                status, message, ..
            } => format!("HTTP {status}: {message}"),
            other => other.to_string(),
        }
    }

    /// HTTP status behind this failure, when the backend answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::FetchFailed { status, .. } | Self::MutationFailed { status, .. } => *status,
            Self::Gateway { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if the backend refused the session token.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Returns `true` for failures detected before any network call.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput { .. } | Self::MissingField { .. } | Self::Busy { .. }
        )
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<mesa_api::Error> for CoreError {
    fn from(err: mesa_api::Error) -> Self {
        match err {
            mesa_api::Error::Transport(ref e) => CoreError::Transport {
                message: e.to_string(),
            },
            mesa_api::Error::Tls(message) => CoreError::Transport {
                message: format!("TLS error: {message}"),
            },
            // A 2xx body we cannot read is as unusable as no response.
            mesa_api::Error::Deserialization { message, body: _ } => CoreError::Transport {
                message: format!("malformed response: {message}"),
            },
            mesa_api::Error::Gateway {
                status, message, ..
            } => CoreError::Gateway { status, message },
            mesa_api::Error::CredentialStore { message } => CoreError::Credential { message },
            mesa_api::Error::InvalidId { id } => CoreError::InvalidInput {
                message: format!("{id:?} is not a usable resource id"),
            },
            mesa_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway_error(status: u16) -> mesa_api::Error {
        mesa_api::Error::Gateway {
            status,
            message: "nope".into(),
            payload: None,
        }
    }

    #[test]
    fn missing_field_lists_every_field() {
        let err = CoreError::MissingField {
            kind: EntityKind::Promotion,
            fields: vec!["descripcion", "fechaFin"],
        };
        assert_eq!(
            err.to_string(),
            "Missing required promotion fields: descripcion, fechaFin"
        );
        assert!(err.is_local());
    }

    #[test]
    fn fetch_failure_keeps_status() {
        let err = CoreError::fetch(EntityKind::Reservation, &gateway_error(401));
        assert_eq!(
            err.to_string(),
            "Failed to fetch reservations: HTTP 401: nope"
        );
        assert!(err.is_unauthorized());
    }

    #[test]
    fn mutation_failure_names_action() {
        let err = CoreError::mutation(EntityKind::Location, Mutation::Delete, &gateway_error(500));
        assert_eq!(err.to_string(), "Failed to delete location: HTTP 500: nope");
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn deserialization_maps_to_transport() {
        let err = CoreError::from(mesa_api::Error::Deserialization {
            message: "expected value".into(),
            body: "<html>".into(),
        });
        assert!(matches!(err, CoreError::Transport { .. }));
    }

    #[test]
    fn credential_error_maps_through() {
        let err = CoreError::from(mesa_api::Error::CredentialStore {
            message: "locked".into(),
        });
        assert_eq!(
            err,
            CoreError::Credential {
                message: "locked".into()
            }
        );
    }
}
