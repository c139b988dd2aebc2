// ── Domain model ──
//
// Wire-compatible resource types plus the per-kind configuration the
// collection controller is generic over.

pub mod event;
pub mod kind;
pub mod location;
pub mod promotion;
pub mod reservation;
pub mod resource_id;
pub mod review;

pub use event::{Event, EventDraft};
pub use kind::{Draft, EntityKind, Removable, Resource, Scope};
pub use location::{Location, LocationDraft};
pub use promotion::{Promotion, PromotionDraft};
pub use reservation::{Reservation, ReservationDraft};
pub use resource_id::{Reference, ResourceId};
pub use review::{RATING_RANGE, Review, ReviewDraft};
