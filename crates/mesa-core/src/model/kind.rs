// ── Per-kind configuration ──
//
// Everything that differs between the five resource collections lives
// here: endpoint path, required create fields, list scoping, and how a
// draft becomes a request body. The collection controller itself is
// written once against these traits.

use std::fmt::Debug;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use strum::{Display, EnumIter, EnumString};

use super::resource_id::{Reference, ResourceId};

// ── EntityKind ──────────────────────────────────────────────────────

/// The resource collections exposed by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum EntityKind {
    Reservation,
    Event,
    Promotion,
    Review,
    Location,
}

impl EntityKind {
    /// Collection path relative to the backend base URL.
    pub fn path(self) -> &'static str {
        match self {
            Self::Reservation => "reservas",
            Self::Event => "eventos",
            Self::Promotion => "promociones",
            Self::Review => "reseñas",
            Self::Location => "ubicaciones",
        }
    }

    /// Plural noun for messages ("Failed to fetch reservations").
    pub fn plural(self) -> &'static str {
        match self {
            Self::Reservation => "reservations",
            Self::Event => "events",
            Self::Promotion => "promotions",
            Self::Review => "reviews",
            Self::Location => "locations",
        }
    }

    /// Wire names of the fields a create request must carry.
    pub fn required_fields(self) -> &'static [&'static str] {
        match self {
            Self::Reservation => &["fechaHora", "estado"],
            Self::Event => &["nombre", "fecha", "capacidad"],
            Self::Promotion => &["descripcion", "fechaInicio", "fechaFin"],
            Self::Review => &["valoracion", "comentario"],
            Self::Location => &["direccion", "ciudad", "pais"],
        }
    }

    /// Whether list requests are narrowed by `?restaurantId=`.
    pub fn list_scoped_by_restaurant(self) -> bool {
        matches!(self, Self::Reservation | Self::Review)
    }

    /// Whether the backend exposes `DELETE /{path}/{id}`.
    pub fn supports_delete(self) -> bool {
        !matches!(self, Self::Review)
    }
}

// ── Scope ───────────────────────────────────────────────────────────

/// Identifiers narrowing a collection to one restaurant and/or user.
///
/// Embedded into create bodies as nested references and, for kinds that
/// support it, sent as the list query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope {
    pub restaurant_id: Option<ResourceId>,
    pub user_id: Option<ResourceId>,
}

impl Scope {
    pub fn restaurant(id: impl Into<ResourceId>) -> Self {
        Self {
            restaurant_id: Some(id.into()),
            user_id: None,
        }
    }

    pub fn with_user(mut self, id: impl Into<ResourceId>) -> Self {
        self.user_id = Some(id.into());
        self
    }

    pub fn restaurant_ref(&self) -> Option<Reference> {
        self.restaurant_id.clone().map(Reference::from)
    }

    pub fn user_ref(&self) -> Option<Reference> {
        self.user_id.clone().map(Reference::from)
    }

    /// Query parameters for a list request of `kind`.
    pub fn list_params(&self, kind: EntityKind) -> Vec<(&'static str, String)> {
        match (&self.restaurant_id, kind.list_scoped_by_restaurant()) {
            (Some(id), true) => vec![("restaurantId", id.to_string())],
            _ => Vec::new(),
        }
    }
}

// ── Resource / Draft traits ─────────────────────────────────────────

/// A backend entity that can be listed into a collection.
pub trait Resource:
    DeserializeOwned + Serialize + Clone + Debug + Send + Sync + 'static
{
    const KIND: EntityKind;

    /// The create-form counterpart of this resource.
    type Draft: Draft;

    fn id(&self) -> &ResourceId;
}

/// Marker for resources the backend lets clients delete.
pub trait Removable: Resource {}

/// User-entered fields for a create request.
pub trait Draft: Debug + Send + Sync {
    const KIND: EntityKind;

    /// Whether the required wire field `field` has a non-empty value.
    fn is_set(&self, field: &str) -> bool;

    /// Build the request body, embedding `scope` references.
    fn to_payload(&self, scope: &Scope) -> Value;

    /// Checks beyond presence (ranges, formats). Runs only when every
    /// required field is set.
    fn check(&self) -> Result<(), String> {
        Ok(())
    }

    /// Required fields that are still empty, in declaration order.
    fn missing_fields(&self) -> Vec<&'static str> {
        Self::KIND
            .required_fields()
            .iter()
            .copied()
            .filter(|f| !self.is_set(f))
            .collect()
    }
}

pub(crate) fn filled(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Insert `key: {id}` when the scope carries that reference.
pub(crate) fn insert_ref(body: &mut Map<String, Value>, key: &str, reference: Option<Reference>) {
    if let Some(r) = reference {
        body.insert(key.to_owned(), serde_json::json!(r));
    }
}
