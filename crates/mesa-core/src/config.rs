// ── Runtime client configuration ──
//
// These types describe *how* to reach the backend and where the session
// token lives. They never touch disk: the CLI (via `mesa-config`) builds
// a `ClientConfig` and hands it in.

use std::path::PathBuf;

use url::Url;

use mesa_api::{DEFAULT_TOKEN_SLOT, TlsMode};

/// Backend address used when nothing else is configured.
pub const DEFAULT_SERVER: &str = "http://127.0.0.1:8080/";

/// Where the session token is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialBackend {
    /// OS secure storage, under the given slot name.
    Keyring { slot: String },
    /// A single owner-only token file.
    File { path: PathBuf },
    /// Process memory only; the session ends with the process.
    Memory,
}

impl Default for CredentialBackend {
    fn default() -> Self {
        Self::Keyring {
            slot: DEFAULT_TOKEN_SLOT.to_owned(),
        }
    }
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed development backends).
    DangerAcceptInvalid,
}

impl From<&TlsVerification> for TlsMode {
    fn from(tls: &TlsVerification) -> Self {
        match tls {
            TlsVerification::SystemDefaults => Self::System,
            TlsVerification::CustomCa(path) => Self::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => Self::DangerAcceptInvalid,
        }
    }
}

/// Everything needed to build a [`Client`](crate::Client).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend base URL; resource paths are joined beneath it.
    pub server: Url,
    pub credentials: CredentialBackend,
    pub tls: TlsVerification,
}

impl ClientConfig {
    pub fn new(server: Url) -> Self {
        Self {
            server,
            credentials: CredentialBackend::default(),
            tls: TlsVerification::default(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        let server = Url::parse(DEFAULT_SERVER).expect("default server URL is valid");
        Self::new(server)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_local_backend_with_keyring() {
        let config = ClientConfig::default();
        assert_eq!(config.server.as_str(), DEFAULT_SERVER);
        assert_eq!(
            config.credentials,
            CredentialBackend::Keyring {
                slot: "userToken".into()
            }
        );
        assert_eq!(config.tls, TlsVerification::SystemDefaults);
    }

    #[test]
    fn tls_verification_maps_to_transport_mode() {
        let mode = TlsMode::from(&TlsVerification::CustomCa("/etc/ca.pem".into()));
        assert!(matches!(mode, TlsMode::CustomCa(ref p) if p.to_str() == Some("/etc/ca.pem")));
    }
}
