// ── Reactive collection streams ──
//
// Subscription types for rendering a collection as it changes.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::model::Resource;
use crate::store::CollectionState;

/// A subscription to one collection controller's state.
///
/// Provides both point-in-time snapshot access and change notification
/// via [`changed`](Self::changed) or by converting into a `Stream`.
pub struct CollectionStream<R: Resource> {
    current: CollectionState<R>,
    receiver: watch::Receiver<CollectionState<R>>,
}

impl<R: Resource> CollectionStream<R> {
    pub(crate) fn new(receiver: watch::Receiver<CollectionState<R>>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// The snapshot captured at creation (or at the last `changed`).
    pub fn current(&self) -> &CollectionState<R> {
        &self.current
    }

    /// The latest published state.
    pub fn latest(&self) -> CollectionState<R> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next change. `None` once the controller is dropped.
    pub async fn changed(&mut self) -> Option<CollectionState<R>> {
        self.receiver.changed().await.ok()?;
        let snap = self.receiver.borrow_and_update().clone();
        self.current = snap.clone();
        Some(snap)
    }

    /// Convert into a `Stream`; the first item is the current state.
    pub fn into_stream(self) -> CollectionWatchStream<R> {
        CollectionWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter backed by a `watch::Receiver`.
pub struct CollectionWatchStream<R: Resource> {
    inner: WatchStream<CollectionState<R>>,
}

impl<R: Resource> Stream for CollectionWatchStream<R> {
    type Item = CollectionState<R>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
