// ── Collection store ──
//
// Per-kind controllers and the state they publish.

mod collection;
mod state;

pub use collection::CollectionController;
pub use state::CollectionState;
