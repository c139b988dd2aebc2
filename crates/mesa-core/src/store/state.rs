// ── Published collection state ──

use std::sync::Arc;

use crate::error::CoreError;

/// What a presentation layer renders for one collection.
///
/// `items` is only ever replaced wholesale by a successful list fetch,
/// so a failed refresh leaves the previous list visible next to `error`.
#[derive(Debug, Clone)]
pub struct CollectionState<T> {
    pub items: Arc<Vec<T>>,
    pub loading: bool,
    pub error: Option<CoreError>,
}

impl<T> CollectionState<T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Human-readable error for display, if one is recorded.
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }
}

impl<T> Default for CollectionState<T> {
    fn default() -> Self {
        Self {
            items: Arc::new(Vec::new()),
            loading: false,
            error: None,
        }
    }
}
