// ── Client facade ──
//
// Builds the shared gateway from a `ClientConfig` and vends controllers.
// Controllers share nothing but the gateway (immutable) and the
// credential store behind it.

use std::sync::Arc;

use mesa_api::{
    CredentialStore, FileStore, Gateway, KeyringStore, MemoryStore, TransportConfig,
};
use tracing::debug;

use crate::config::{ClientConfig, CredentialBackend};
use crate::error::CoreError;
use crate::model::{Event, Location, Promotion, Reservation, Resource, Review, Scope};
use crate::session::SessionController;
use crate::store::CollectionController;

/// Entry point for consumers.
///
/// Cheaply cloneable; every clone talks through the same gateway.
#[derive(Debug, Clone)]
pub struct Client {
    gateway: Arc<Gateway>,
}

impl Client {
    /// Build a client, opening the credential backend named in `config`.
    pub fn new(config: &ClientConfig) -> Result<Self, CoreError> {
        let store: Arc<dyn CredentialStore> = match &config.credentials {
            CredentialBackend::Keyring { slot } => Arc::new(KeyringStore::new(slot.clone())),
            CredentialBackend::File { path } => Arc::new(FileStore::new(path.clone())),
            CredentialBackend::Memory => Arc::new(MemoryStore::new()),
        };
        Self::with_store(config, store)
    }

    /// Build a client around an already-constructed credential store.
    pub fn with_store(
        config: &ClientConfig,
        store: Arc<dyn CredentialStore>,
    ) -> Result<Self, CoreError> {
        let transport = TransportConfig::new((&config.tls).into());
        let gateway = Gateway::new(config.server.as_str(), store, &transport)?;
        debug!(server = %gateway.base_url(), "client ready");
        Ok(Self::from_gateway(Arc::new(gateway)))
    }

    pub fn from_gateway(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &Arc<Gateway> {
        &self.gateway
    }

    pub fn session(&self) -> SessionController {
        SessionController::new(Arc::clone(&self.gateway))
    }

    /// A fresh, empty controller for `R` narrowed to `scope`.
    pub fn collection<R: Resource>(&self, scope: Scope) -> CollectionController<R> {
        CollectionController::new(Arc::clone(&self.gateway), scope)
    }

    // ── Per-kind shorthands ──────────────────────────────────────────

    pub fn reservations(&self, scope: Scope) -> CollectionController<Reservation> {
        self.collection(scope)
    }

    pub fn events(&self, scope: Scope) -> CollectionController<Event> {
        self.collection(scope)
    }

    pub fn promotions(&self, scope: Scope) -> CollectionController<Promotion> {
        self.collection(scope)
    }

    pub fn reviews(&self, scope: Scope) -> CollectionController<Review> {
        self.collection(scope)
    }

    pub fn locations(&self, scope: Scope) -> CollectionController<Location> {
        self.collection(scope)
    }
}
