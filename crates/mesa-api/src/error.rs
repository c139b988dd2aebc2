use thiserror::Error;

/// Top-level error type for the `mesa-api` crate.
///
/// Every failure the gateway or a credential backend can produce.
/// `mesa-core` maps these into the operation-scoped failures the
/// presentation layer renders.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// No response could be obtained (connection refused, DNS failure,
    /// body read interrupted, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A resource id that cannot address a single collection member.
    #[error("Invalid resource id: {id:?}")]
    InvalidId { id: String },

    /// TLS configuration or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Gateway ─────────────────────────────────────────────────────
    /// The backend answered with a non-2xx status.
    ///
    /// `payload` holds the parsed JSON error body when the server sent one.
    #[error("Backend rejected request (HTTP {status}): {message}")]
    Gateway {
        status: u16,
        message: String,
        payload: Option<serde_json::Value>,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    // ── Credential storage ──────────────────────────────────────────
    /// The credential backend could not be read or written.
    #[error("Credential store error: {message}")]
    CredentialStore { message: String },
}

impl Error {
    /// Returns `true` if the backend refused the stored credential.
    ///
    /// A 401 is the only signal that a session has become invalid.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Gateway { status: 401, .. })
    }

    /// Returns `true` if no HTTP response was obtained at all.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Tls(_))
    }

    /// HTTP status of a gateway failure, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Gateway { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub(crate) fn credential(err: impl std::fmt::Display) -> Self {
        Self::CredentialStore {
            message: err.to_string(),
        }
    }
}
