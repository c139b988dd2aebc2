// Authenticated request gateway
//
// The only place outbound HTTP is issued. Every request re-reads the
// credential store right before sending and, when a token is present,
// attaches it as `Authorization: Bearer <token>`. Resource-specific
// calls in `mesa-core` are thin wrappers over the verbs below.

use std::sync::Arc;

use reqwest::Method;
use reqwest::header::{AUTHORIZATION, HeaderValue};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::credential::CredentialStore;
use crate::error::Error;
use crate::transport::TransportConfig;

/// Async JSON client bound to one backend base URL.
///
/// Holds no per-call state: it can be shared behind an `Arc` by any
/// number of controllers and used concurrently.
pub struct Gateway {
    http: reqwest::Client,
    base_url: Url,
    credentials: Arc<dyn CredentialStore>,
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("base_url", &self.base_url.as_str())
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

impl Gateway {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a gateway with a fresh HTTP client from `transport`.
    pub fn new(
        base_url: &str,
        credentials: Arc<dyn CredentialStore>,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::from_reqwest(base_url, http, credentials)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn from_reqwest(
        base_url: &str,
        http: reqwest::Client,
        credentials: Arc<dyn CredentialStore>,
    ) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self {
            http,
            base_url,
            credentials,
        })
    }

    /// Ensure the base path ends with `/` so relative resource paths
    /// nest beneath any prefix (`https://host/api` -> `https://host/api/`).
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The credential store consulted on every call.
    pub fn credentials(&self) -> &Arc<dyn CredentialStore> {
        &self.credentials
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a resource path (`"reservas"`, `"/reservas/3"`) onto the base URL.
    pub fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// URL of one member of a collection: `{collection}/{id}`.
    ///
    /// `id` is pushed as a single percent-encoded segment, so `/`, `?`
    /// and `#` inside it never change the target.
    pub fn member_url(&self, collection: &str, id: &str) -> Result<Url, Error> {
        if id.is_empty() || id == "." || id == ".." {
            return Err(Error::InvalidId { id: id.to_owned() });
        }
        let mut url = self.url(collection)?;
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .push(id);
        Ok(url)
    }

    // ── Core request ─────────────────────────────────────────────────

    /// Issue one request and decode the JSON response.
    ///
    /// The credential store is read before the request is built; a
    /// missing token sends the request without an `Authorization` header.
    /// An empty success body decodes as JSON `null`.
    pub async fn request<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        query: &[(&str, String)],
    ) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized + Sync,
    {
        let url = self.url(path)?;
        self.send(method, url, body, query).await
    }

    async fn send<T, B>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
        query: &[(&str, String)],
    ) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized + Sync,
    {
        let token = self.credentials.load()?;
        debug!(authorized = token.is_some(), "{method} {url}");

        let mut builder = self.http.request(method, url);
        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(token) = token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                .map_err(|e| Error::CredentialStore {
                    message: format!("stored token is not a valid header value: {e}"),
                })?;
            value.set_sensitive(true);
            builder = builder.header(AUTHORIZATION, value);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let resp = builder.send().await?;
        Self::handle_response(resp).await
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        self.request(Method::GET, path, None::<&()>, &[]).await
    }

    pub async fn get_with_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        self.request(Method::GET, path, None::<&()>, params).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        self.request(Method::POST, path, Some(body), &[]).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        self.request(Method::DELETE, path, None::<&()>, &[]).await
    }

    /// DELETE `{collection}/{id}` with `id` escaped as one path segment.
    pub async fn delete_member<T: DeserializeOwned>(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<T, Error> {
        let url = self.member_url(collection, id)?;
        self.send(Method::DELETE, url, None::<&()>, &[]).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        if !status.is_success() {
            return Err(Self::parse_error(status, resp).await);
        }

        let body = resp.text().await?;
        let json = if body.trim().is_empty() {
            "null"
        } else {
            body.as_str()
        };
        serde_json::from_str(json).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body,
            }
        })
    }

    async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();
        let payload = serde_json::from_str::<serde_json::Value>(&raw).ok();

        let message = payload
            .as_ref()
            .and_then(|p| {
                ["message", "error", "detail"]
                    .iter()
                    .find_map(|key| p.get(key).and_then(serde_json::Value::as_str))
            })
            .map(str::to_owned)
            .or_else(|| (!raw.trim().is_empty()).then(|| raw.trim().to_owned()))
            .unwrap_or_else(|| status.to_string());

        debug!(status = status.as_u16(), "request rejected: {message}");

        Error::Gateway {
            status: status.as_u16(),
            message,
            payload,
        }
    }
}
