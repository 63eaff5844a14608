// Catalog module.
// Turns paginated remote collections into locally cached, queryable ones.

pub mod event_types;
pub mod fetcher;
pub mod reconciler;

pub use event_types::EventTypeIndex;
pub use reconciler::CacheReconciler;
