// ── Location domain type ──

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::kind::{Draft, EntityKind, Removable, Resource, Scope, filled, insert_ref};
use super::resource_id::{Reference, ResourceId};

/// A street address where a restaurant operates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: ResourceId,
    #[serde(rename = "direccion", default)]
    pub address: String,
    #[serde(rename = "ciudad", default)]
    pub city: String,
    #[serde(rename = "pais", default)]
    pub country: String,
    #[serde(rename = "restaurante", default, skip_serializing_if = "Option::is_none")]
    pub restaurant: Option<Reference>,
}

impl Resource for Location {
    const KIND: EntityKind = EntityKind::Location;
    type Draft = LocationDraft;

    fn id(&self) -> &ResourceId {
        &self.id
    }
}

impl Removable for Location {}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationDraft {
    pub address: String,
    pub city: String,
    pub country: String,
}

impl Draft for LocationDraft {
    const KIND: EntityKind = EntityKind::Location;

    fn is_set(&self, field: &str) -> bool {
        match field {
            "direccion" => filled(&self.address),
            "ciudad" => filled(&self.city),
            "pais" => filled(&self.country),
            _ => true,
        }
    }

    fn to_payload(&self, scope: &Scope) -> Value {
        let mut body = Map::new();
        body.insert("direccion".into(), Value::from(self.address.trim()));
        body.insert("ciudad".into(), Value::from(self.city.trim()));
        body.insert("pais".into(), Value::from(self.country.trim()));
        insert_ref(&mut body, "restaurante", scope.restaurant_ref());
        Value::Object(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn country_only_draft_reports_the_rest() {
        let draft = LocationDraft {
            country: "Chile".into(),
            ..LocationDraft::default()
        };
        assert_eq!(draft.missing_fields(), vec!["direccion", "ciudad"]);
    }
}
