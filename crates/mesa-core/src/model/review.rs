// ── Review domain type ──

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::kind::{Draft, EntityKind, Resource, Scope, filled, insert_ref};
use super::resource_id::{Reference, ResourceId};

/// Lowest and highest accepted star rating.
pub const RATING_RANGE: std::ops::RangeInclusive<u8> = 1..=5;

/// A diner's rating and comment. Reviews cannot be deleted by clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: ResourceId,
    #[serde(rename = "valoracion", default)]
    pub rating: Option<u8>,
    #[serde(rename = "comentario", default)]
    pub comment: String,
    #[serde(rename = "usuario", default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Reference>,
    #[serde(rename = "restaurante", default, skip_serializing_if = "Option::is_none")]
    pub restaurant: Option<Reference>,
}

impl Resource for Review {
    const KIND: EntityKind = EntityKind::Review;
    type Draft = ReviewDraft;

    fn id(&self) -> &ResourceId {
        &self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewDraft {
    pub rating: Option<u8>,
    pub comment: String,
}

impl Draft for ReviewDraft {
    const KIND: EntityKind = EntityKind::Review;

    fn is_set(&self, field: &str) -> bool {
        match field {
            "valoracion" => self.rating.is_some(),
            "comentario" => filled(&self.comment),
            _ => true,
        }
    }

    fn check(&self) -> Result<(), String> {
        match self.rating {
            Some(r) if !RATING_RANGE.contains(&r) => Err(format!(
                "rating must be between {} and {}, got {r}",
                RATING_RANGE.start(),
                RATING_RANGE.end()
            )),
            _ => Ok(()),
        }
    }

    fn to_payload(&self, scope: &Scope) -> Value {
        let mut body = Map::new();
        insert_ref(&mut body, "usuario", scope.user_ref());
        insert_ref(&mut body, "restaurante", scope.restaurant_ref());
        body.insert("valoracion".into(), Value::from(self.rating));
        body.insert("comentario".into(), Value::from(self.comment.trim()));
        Value::Object(body)
    }
}
