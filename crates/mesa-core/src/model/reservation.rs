// ── Reservation domain type ──

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::kind::{Draft, EntityKind, Removable, Resource, Scope, filled, insert_ref};
use super::resource_id::{Reference, ResourceId};

/// A table booking at one restaurant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: ResourceId,
    /// Date and time as entered, e.g. `2024-01-01T10:00`.
    #[serde(rename = "fechaHora", default)]
    pub date_time: String,
    /// Free-form status (`CONFIRMED`, `PENDING`, ...).
    #[serde(rename = "estado", default)]
    pub status: String,
    #[serde(rename = "usuario", default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Reference>,
    #[serde(rename = "restaurante", default, skip_serializing_if = "Option::is_none")]
    pub restaurant: Option<Reference>,
}

impl Resource for Reservation {
    const KIND: EntityKind = EntityKind::Reservation;
    type Draft = ReservationDraft;

    fn id(&self) -> &ResourceId {
        &self.id
    }
}

impl Removable for Reservation {}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReservationDraft {
    pub date_time: String,
    pub status: String,
}

impl Draft for ReservationDraft {
    const KIND: EntityKind = EntityKind::Reservation;

    fn is_set(&self, field: &str) -> bool {
        match field {
            "fechaHora" => filled(&self.date_time),
            "estado" => filled(&self.status),
            _ => true,
        }
    }

    fn to_payload(&self, scope: &Scope) -> Value {
        let mut body = Map::new();
        insert_ref(&mut body, "usuario", scope.user_ref());
        insert_ref(&mut body, "restaurante", scope.restaurant_ref());
        body.insert("fechaHora".into(), Value::from(self.date_time.trim()));
        body.insert("estado".into(), Value::from(self.status.trim()));
        Value::Object(body)
    }
}
