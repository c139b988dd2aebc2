// ── Core identity types ──
//
// ResourceId is the key every collection renders and deletes by.
// The backend assigns numeric ids today, but nothing in the client
// depends on that, so string ids round-trip untouched.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── ResourceId ──────────────────────────────────────────────────────

/// Server-assigned identifier for any backend resource.
///
/// Opaque and stable. Serialized exactly as received (number or string).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceId {
    Numeric(i64),
    Text(String),
}

impl ResourceId {
    pub fn as_numeric(&self) -> Option<i64> {
        match self {
            Self::Numeric(n) => Some(*n),
            Self::Text(_) => None,
        }
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl FromStr for ResourceId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl From<i64> for ResourceId {
    fn from(n: i64) -> Self {
        Self::Numeric(n)
    }
}

impl From<i32> for ResourceId {
    fn from(n: i32) -> Self {
        Self::Numeric(i64::from(n))
    }
}

impl From<String> for ResourceId {
    fn from(s: String) -> Self {
        // Only canonical integers; "007" and "+7" stay text.
        match s.parse::<i64>() {
            Ok(n) if n.to_string() == s => Self::Numeric(n),
            _ => Self::Text(s),
        }
    }
}

impl From<&str> for ResourceId {
    fn from(s: &str) -> Self {
        Self::from(s.to_owned())
    }
}

// ── Reference ───────────────────────────────────────────────────────

/// Nested `{ "id": … }` object the backend uses to link resources.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reference {
    pub id: ResourceId,
}

impl From<ResourceId> for Reference {
    fn from(id: ResourceId) -> Self {
        Self { id }
    }
}
