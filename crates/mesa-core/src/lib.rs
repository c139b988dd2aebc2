//! Session and resource-collection controllers for the mesa restaurant
//! backend, sitting between `mesa-api` and presentation consumers (CLI).
//!
//! - **[`Client`]**: facade that builds the shared [`Gateway`](mesa_api::Gateway)
//!   from a [`ClientConfig`] and vends controllers.
//!
//! - **[`SessionController`]**: login, registration and logout. The only
//!   writer of the credential store. Publishes [`SessionState`] on a
//!   `tokio::sync::watch` channel.
//!
//! - **[`CollectionController<R>`]**: one generic fetch / create / delete /
//!   refresh lifecycle, instantiated per resource kind and scope. Publishes
//!   [`CollectionState<R>`]; [`CollectionStream<R>`] wraps the subscription
//!   with `current()` / `latest()` / `changed()` and a `Stream` adapter.
//!
//! - **Domain model** ([`model`]): reservations, events, promotions,
//!   reviews and locations, their create drafts, and the per-kind
//!   configuration ([`EntityKind`]) the controller is written against.

pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod session;
pub mod store;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use client::Client;
pub use config::{ClientConfig, CredentialBackend, DEFAULT_SERVER, TlsVerification};
pub use error::{CoreError, Mutation};
pub use session::{RegisterOutcome, Registration, SessionController, SessionState, SessionStatus};
pub use store::{CollectionController, CollectionState};
pub use stream::{CollectionStream, CollectionWatchStream};

pub use model::{
    Draft, EntityKind, Event, EventDraft, Location, LocationDraft, Promotion, PromotionDraft,
    RATING_RANGE, Reference, Removable, Reservation, ReservationDraft, Resource, ResourceId,
    Review, ReviewDraft, Scope,
};

pub use mesa_api::{DEFAULT_TOKEN_SLOT, ExposeSecret, SecretString};
