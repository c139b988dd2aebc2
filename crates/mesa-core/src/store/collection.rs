// ── Generic resource collection controller ──
//
// One instance per (entity kind, scope). Loads the list, runs create /
// delete, and re-fetches after every successful mutation. State is
// broadcast through a `watch` channel so any number of views can render
// it; an async gate keeps at most one operation in flight.

use std::sync::Arc;

use mesa_api::Gateway;
use serde_json::Value;
use tokio::sync::{Mutex, watch};
use tracing::{debug, warn};

use super::state::CollectionState;
use crate::error::{CoreError, Mutation};
use crate::model::{Draft, Removable, Resource, ResourceId, Scope};
use crate::stream::CollectionStream;

/// Fetch/mutate/refresh lifecycle for one resource collection.
pub struct CollectionController<R: Resource> {
    gateway: Arc<Gateway>,
    scope: Scope,
    state: watch::Sender<CollectionState<R>>,
    /// Held for the whole of a refresh, create or delete.
    gate: Mutex<()>,
}

/// Marks the collection as loading until dropped.
///
/// Dropping clears `loading` even if the owning future is cancelled
/// mid-request.
struct Loading<'a, R> {
    state: &'a watch::Sender<CollectionState<R>>,
}

impl<'a, R> Loading<'a, R> {
    fn begin(state: &'a watch::Sender<CollectionState<R>>) -> Self {
        state.send_modify(|s| {
            s.loading = true;
            s.error = None;
        });
        Self { state }
    }
}

impl<R> Drop for Loading<'_, R> {
    fn drop(&mut self) {
        self.state.send_if_modified(|s| std::mem::replace(&mut s.loading, false));
    }
}

impl<R: Resource> CollectionController<R> {
    pub fn new(gateway: Arc<Gateway>, scope: Scope) -> Self {
        let (state, _) = watch::channel(CollectionState::default());
        Self {
            gateway,
            scope,
            state,
            gate: Mutex::new(()),
        }
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    // ── State access ─────────────────────────────────────────────────

    /// Current state (cheap: the item list is behind an `Arc`).
    pub fn snapshot(&self) -> CollectionState<R> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<CollectionState<R>> {
        self.state.subscribe()
    }

    pub fn stream(&self) -> CollectionStream<R> {
        CollectionStream::new(self.state.subscribe())
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    // ── Operations ───────────────────────────────────────────────────

    /// Reload the list from the backend.
    ///
    /// Waits for any operation already running on this controller, so
    /// two list replacements never race. On failure the previous items
    /// stay in place and the error is recorded.
    pub async fn refresh(&self) -> Result<(), CoreError> {
        let _turn = self.gate.lock().await;
        self.refresh_locked().await
    }

    /// Validate `draft`, POST it, then reload the list.
    ///
    /// Returns `Ok` once the backend accepted the create; a failure of
    /// the follow-up refresh is recorded in state as a fetch error.
    pub async fn create(&self, draft: &R::Draft) -> Result<(), CoreError> {
        if let Err(err) = Self::validate(draft) {
            debug!(kind = %R::KIND, %err, "create rejected locally");
            self.record_error(err.clone());
            return Err(err);
        }

        let Ok(_turn) = self.gate.try_lock() else {
            return Err(CoreError::Busy { kind: R::KIND });
        };

        let payload = draft.to_payload(&self.scope);
        let posted = {
            let _loading = Loading::begin(&self.state);
            self.gateway
                .post::<Value, _>(R::KIND.path(), &payload)
                .await
        };

        match posted {
            Ok(_) => {
                debug!(kind = %R::KIND, "created; refreshing");
                self.refresh_after_mutation().await;
                Ok(())
            }
            Err(e) => {
                let err = CoreError::mutation(R::KIND, Mutation::Create, &e);
                warn!(kind = %R::KIND, error = %e, "create failed");
                self.record_error(err.clone());
                Err(err)
            }
        }
    }

    fn validate(draft: &R::Draft) -> Result<(), CoreError> {
        let missing = draft.missing_fields();
        if !missing.is_empty() {
            return Err(CoreError::MissingField {
                kind: R::KIND,
                fields: missing,
            });
        }
        draft
            .check()
            .map_err(|message| CoreError::InvalidInput { message })
    }

    // ── Internals ────────────────────────────────────────────────────

    async fn refresh_locked(&self) -> Result<(), CoreError> {
        let _loading = Loading::begin(&self.state);
        let params = self.scope.list_params(R::KIND);

        match self
            .gateway
            .get_with_params::<Vec<R>>(R::KIND.path(), &params)
            .await
        {
            Ok(items) => {
                debug!(kind = %R::KIND, count = items.len(), "collection refreshed");
                self.state.send_modify(|s| {
                    s.items = Arc::new(items);
                    s.loading = false;
                    s.error = None;
                });
                Ok(())
            }
            Err(e) => {
                let err = CoreError::fetch(R::KIND, &e);
                warn!(kind = %R::KIND, error = %e, "refresh failed; keeping previous items");
                self.state.send_modify(|s| {
                    s.error = Some(err.clone());
                    s.loading = false;
                });
                Err(err)
            }
        }
    }

    async fn refresh_after_mutation(&self) {
        if let Err(err) = self.refresh_locked().await {
            debug!(kind = %R::KIND, %err, "post-mutation refresh failed");
        }
    }

    fn record_error(&self, err: CoreError) {
        self.state.send_modify(|s| s.error = Some(err));
    }
}

impl<R: Removable> CollectionController<R> {
    /// DELETE one item by id, then reload the list.
    ///
    /// On failure the local list is left exactly as it was.
    pub async fn delete(&self, id: &ResourceId) -> Result<(), CoreError> {
        let Ok(_turn) = self.gate.try_lock() else {
            return Err(CoreError::Busy { kind: R::KIND });
        };

        let deleted = {
            let _loading = Loading::begin(&self.state);
            self.gateway
                .delete_member::<Value>(R::KIND.path(), &id.to_string())
                .await
        };

        match deleted {
            Ok(_) => {
                debug!(kind = %R::KIND, %id, "deleted; refreshing");
                self.refresh_after_mutation().await;
                Ok(())
            }
            Err(e @ mesa_api::Error::InvalidId { .. }) => {
                let err = CoreError::from(e);
                self.record_error(err.clone());
                Err(err)
            }
            Err(e) => {
                let err = CoreError::mutation(R::KIND, Mutation::Delete, &e);
                warn!(kind = %R::KIND, %id, error = %e, "delete failed");
                self.record_error(err.clone());
                Err(err)
            }
        }
    }

    /// Delete the item at `index` in the current snapshot.
    pub async fn delete_at(&self, index: usize) -> Result<(), CoreError> {
        let id = self
            .state
            .borrow()
            .items
            .get(index)
            .map(|item| item.id().clone())
            .ok_or_else(|| CoreError::InvalidInput {
                message: format!("no {} at position {index}", R::KIND),
            })?;
        self.delete(&id).await
    }
}

impl<R: Resource> std::fmt::Debug for CollectionController<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectionController")
            .field("kind", &R::KIND)
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}
