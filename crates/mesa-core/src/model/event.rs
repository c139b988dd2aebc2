// ── Event domain type ──

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::kind::{Draft, EntityKind, Removable, Resource, Scope, filled, insert_ref};
use super::resource_id::{Reference, ResourceId};

/// A hosted event with limited capacity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: ResourceId,
    #[serde(rename = "nombre", default)]
    pub name: String,
    #[serde(rename = "fecha", default)]
    pub date: String,
    #[serde(rename = "capacidad", default)]
    pub capacity: Option<u32>,
    #[serde(rename = "restaurante", default, skip_serializing_if = "Option::is_none")]
    pub restaurant: Option<Reference>,
}

impl Resource for Event {
    const KIND: EntityKind = EntityKind::Event;
    type Draft = EventDraft;

    fn id(&self) -> &ResourceId {
        &self.id
    }
}

impl Removable for Event {}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventDraft {
    pub name: String,
    pub date: String,
    pub capacity: Option<u32>,
}

impl Draft for EventDraft {
    const KIND: EntityKind = EntityKind::Event;

    fn is_set(&self, field: &str) -> bool {
        match field {
            "nombre" => filled(&self.name),
            "fecha" => filled(&self.date),
            "capacidad" => self.capacity.is_some(),
            _ => true,
        }
    }

    fn to_payload(&self, scope: &Scope) -> Value {
        let mut body = Map::new();
        body.insert("nombre".into(), Value::from(self.name.trim()));
        body.insert("fecha".into(), Value::from(self.date.trim()));
        body.insert("capacidad".into(), Value::from(self.capacity));
        insert_ref(&mut body, "restaurante", scope.restaurant_ref());
        Value::Object(body)
    }
}
