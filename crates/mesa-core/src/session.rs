// ── Session controller ──
//
// Login, registration and logout. The only writer of the credential
// store; every other component just reads the token through the
// gateway. Session state is published on a `watch` channel so a
// presentation layer can route between signed-in and signed-out views.

use std::sync::Arc;

use mesa_api::{CredentialStore, ExposeSecret, Gateway, SecretString};
use serde::Serialize;
use serde_json::{Map, Value};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::CoreError;

const LOGIN_PATH: &str = "login";
const REGISTER_PATH: &str = "register";
const MIN_PASSWORD_CHARS: usize = 8;

// ── State ────────────────────────────────────────────────────────────

/// Whether a session token is currently stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Anonymous,
    Authenticated,
}

/// Published session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub status: SessionStatus,
    /// Failure of the most recent session operation, if any.
    pub error: Option<CoreError>,
}

/// Result of a successful registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterOutcome {
    /// The backend returned a token and the session is now signed in.
    Authenticated,
    /// Account created without a token; call `login` next.
    LoginRequired,
}

// ── Registration ─────────────────────────────────────────────────────

/// New-account details.
///
/// `username` and `extra` cover the backends that expect a handle or
/// additional profile fields alongside name, email and password.
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: SecretString,
    pub username: Option<String>,
    pub extra: Map<String, Value>,
}

impl Registration {
    pub fn new(name: impl Into<String>, email: impl Into<String>, password: SecretString) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password,
            username: None,
            extra: Map::new(),
        }
    }

    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RegisterBody<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<&'a str>,
    #[serde(flatten)]
    extra: &'a Map<String, Value>,
}

// ── Controller ───────────────────────────────────────────────────────

/// Login / register / logout against the backend's session endpoints.
pub struct SessionController {
    gateway: Arc<Gateway>,
    state: watch::Sender<SessionState>,
}

impl SessionController {
    /// Create a controller whose initial status reflects the store.
    pub fn new(gateway: Arc<Gateway>) -> Self {
        let status = read_status(gateway.credentials().as_ref());
        let (state, _) = watch::channel(SessionState {
            status,
            error: None,
        });
        Self { gateway, state }
    }

    /// Current status, re-read from the credential store.
    pub fn status(&self) -> SessionStatus {
        let status = read_status(self.gateway.credentials().as_ref());
        self.state.send_if_modified(|s| {
            let changed = s.status != status;
            s.status = status;
            changed
        });
        status
    }

    pub fn is_authenticated(&self) -> bool {
        self.status() == SessionStatus::Authenticated
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Exchange credentials for a token and store it.
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<(), CoreError> {
        let result = self.try_login(email, password).await;
        self.settle(result.as_ref().err(), SessionStatus::Authenticated);
        result
    }

    async fn try_login(&self, email: &str, password: &SecretString) -> Result<(), CoreError> {
        validate_credentials(email, password)?;

        let body = Credentials {
            email,
            password: password.expose_secret(),
        };
        let response: Value = self
            .gateway
            .post(LOGIN_PATH, &body)
            .await
            .map_err(|e| CoreError::authentication(&e))?;

        let token = extract_token(&response).ok_or_else(|| CoreError::AuthenticationFailed {
            message: "login response did not include a token".into(),
        })?;
        self.store_token(token)?;
        info!(email, "signed in");
        Ok(())
    }

    /// Create an account. Signs in directly when the backend returns a
    /// token with the new account.
    pub async fn register(&self, profile: &Registration) -> Result<RegisterOutcome, CoreError> {
        let result = self.try_register(profile).await;
        let next = match result {
            Ok(RegisterOutcome::Authenticated) => SessionStatus::Authenticated,
            _ => self.snapshot().status,
        };
        self.settle(result.as_ref().err(), next);
        result
    }

    async fn try_register(&self, profile: &Registration) -> Result<RegisterOutcome, CoreError> {
        if profile.name.trim().is_empty() {
            return Err(CoreError::InvalidInput {
                message: "name is required".into(),
            });
        }
        validate_credentials(&profile.email, &profile.password)?;

        let body = RegisterBody {
            name: profile.name.trim(),
            email: profile.email.trim(),
            password: profile.password.expose_secret(),
            username: profile.username.as_deref(),
            extra: &profile.extra,
        };
        let response: Value = self
            .gateway
            .post(REGISTER_PATH, &body)
            .await
            .map_err(|e| CoreError::authentication(&e))?;

        match extract_token(&response) {
            Some(token) => {
                self.store_token(token)?;
                info!(email = %profile.email, "registered and signed in");
                Ok(RegisterOutcome::Authenticated)
            }
            None => {
                info!(email = %profile.email, "registered; login required");
                Ok(RegisterOutcome::LoginRequired)
            }
        }
    }

    /// Forget the stored token. Always ends anonymous.
    pub fn logout(&self) -> SessionStatus {
        let error = match self.gateway.credentials().clear() {
            Ok(()) => {
                info!("signed out");
                None
            }
            Err(e) => {
                warn!(error = %e, "failed to clear stored token");
                Some(CoreError::from(e))
            }
        };
        self.state.send_replace(SessionState {
            status: SessionStatus::Anonymous,
            error,
        });
        SessionStatus::Anonymous
    }

    // ── Internals ────────────────────────────────────────────────────

    fn store_token(&self, token: &str) -> Result<(), CoreError> {
        self.gateway
            .credentials()
            .save(&SecretString::from(token.to_owned()))
            .map_err(CoreError::from)
    }

    /// Publish the outcome of a login or register attempt. A failure
    /// leaves the status as it was.
    fn settle(&self, error: Option<&CoreError>, on_success: SessionStatus) {
        self.state.send_modify(|s| match error {
            Some(err) => {
                debug!(%err, "session operation failed");
                s.error = Some(err.clone());
            }
            None => {
                s.status = on_success;
                s.error = None;
            }
        });
    }
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

// ── Helpers ──────────────────────────────────────────────────────────

fn read_status(store: &dyn CredentialStore) -> SessionStatus {
    match store.load() {
        Ok(Some(_)) => SessionStatus::Authenticated,
        Ok(None) => SessionStatus::Anonymous,
        Err(e) => {
            warn!(error = %e, "cannot read credential store; treating session as anonymous");
            SessionStatus::Anonymous
        }
    }
}

fn validate_credentials(email: &str, password: &SecretString) -> Result<(), CoreError> {
    if !email.contains('@') {
        return Err(CoreError::InvalidInput {
            message: "email must contain '@'".into(),
        });
    }
    if password.expose_secret().chars().count() < MIN_PASSWORD_CHARS {
        return Err(CoreError::InvalidInput {
            message: format!("password must be at least {MIN_PASSWORD_CHARS} characters"),
        });
    }
    Ok(())
}

fn extract_token(response: &Value) -> Option<&str> {
    response
        .get("token")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn secret(s: &str) -> SecretString {
        SecretString::from(s.to_owned())
    }

    #[test]
    fn email_without_at_is_rejected() {
        let err = validate_credentials("alice.example.com", &secret("longenough")).unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput { .. }));
    }

    #[test]
    fn short_password_is_rejected() {
        let err = validate_credentials("a@b.c", &secret("short")).unwrap_err();
        assert!(err.to_string().contains("at least 8"));
    }

    #[test]
    fn password_length_counts_characters() {
        // 8 characters, 16 bytes.
        assert!(validate_credentials("a@b.c", &secret("ññññññññ")).is_ok());
        assert!(validate_credentials("a@b.c", &secret("ñññññññ")).is_err());
    }

    #[test]
    fn token_extraction_ignores_blank_and_non_string() {
        assert_eq!(extract_token(&json!({ "token": "abc" })), Some("abc"));
        assert_eq!(extract_token(&json!({ "token": "" })), None);
        assert_eq!(extract_token(&json!({ "token": 12 })), None);
        assert_eq!(extract_token(&Value::Null), None);
    }

    #[test]
    fn register_body_flattens_extra_fields() {
        let profile = Registration::new("Ana", "ana@x.io", secret("password1"))
            .with_username("ana")
            .with_field("nombre", "Ana");
        let body = RegisterBody {
            name: &profile.name,
            email: &profile.email,
            password: profile.password.expose_secret(),
            username: profile.username.as_deref(),
            extra: &profile.extra,
        };
        assert_eq!(
            serde_json::to_value(body).unwrap(),
            json!({
                "name": "Ana",
                "email": "ana@x.io",
                "password": "password1",
                "username": "ana",
                "nombre": "Ana",
            })
        );
    }
}
