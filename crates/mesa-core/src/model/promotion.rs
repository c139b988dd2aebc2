// ── Promotion domain type ──

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use super::kind::{Draft, EntityKind, Removable, Resource, Scope, filled};
use super::resource_id::{Reference, ResourceId};

/// A time-boxed offer, possibly shared by several restaurants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Promotion {
    pub id: ResourceId,
    #[serde(rename = "descripcion", default)]
    pub description: String,
    #[serde(rename = "fechaInicio", default)]
    pub starts_on: String,
    #[serde(rename = "fechaFin", default)]
    pub ends_on: String,
    #[serde(rename = "restaurantes", default, skip_serializing_if = "Vec::is_empty")]
    pub restaurants: Vec<Reference>,
}

impl Resource for Promotion {
    const KIND: EntityKind = EntityKind::Promotion;
    type Draft = PromotionDraft;

    fn id(&self) -> &ResourceId {
        &self.id
    }
}

impl Removable for Promotion {}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromotionDraft {
    pub description: String,
    pub starts_on: String,
    pub ends_on: String,
}

impl Draft for PromotionDraft {
    const KIND: EntityKind = EntityKind::Promotion;

    fn is_set(&self, field: &str) -> bool {
        match field {
            "descripcion" => filled(&self.description),
            "fechaInicio" => filled(&self.starts_on),
            "fechaFin" => filled(&self.ends_on),
            _ => true,
        }
    }

    // Promotions link to a list of restaurants rather than a single one.
    fn to_payload(&self, scope: &Scope) -> Value {
        let mut body = Map::new();
        body.insert("descripcion".into(), Value::from(self.description.trim()));
        body.insert("fechaInicio".into(), Value::from(self.starts_on.trim()));
        body.insert("fechaFin".into(), Value::from(self.ends_on.trim()));
        if let Some(r) = scope.restaurant_ref() {
            body.insert("restaurantes".into(), json!([r]));
        }
        Value::Object(body)
    }
}
