// Cache reconciler.
// Decides per collection whether the local snapshot is usable or a live fetch is needed.

use std::fmt;
use std::time::Duration;

use serde::{Serialize, de::DeserializeOwned};

use crate::cache::LocalStore;
use crate::error::{BuddyError, Result};
use crate::tte::{Convention, ConventionEvent, ConventionEventType, Page, Session, Transport};

use super::fetcher::{Collection, PaginatedFetcher};

const EVENT_TYPE_KIND: &str = "event_type";

/// Where a collection came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Local snapshot, written `age` ago.
    Cache { age: Duration },
    /// Fetched from the remote API during this call.
    Live,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Cache { age } => write!(f, "cached {} ago", format_age(*age)),
            Source::Live => f.write_str("live"),
        }
    }
}

/// A collection plus where it came from.
#[derive(Debug, Clone)]
pub struct Fetched<T> {
    pub items: Vec<T>,
    pub source: Source,
}

impl<T> Fetched<T> {
    pub fn used_cache(&self) -> bool {
        matches!(self.source, Source::Cache { .. })
    }
}

/// Serves collections from the local store when possible, otherwise from the API.
pub struct CacheReconciler<'a, T: Transport + ?Sized> {
    store: &'a LocalStore,
    session: &'a Session,
    fetcher: PaginatedFetcher<'a, T>,
}

impl<'a, T: Transport + ?Sized> CacheReconciler<'a, T> {
    pub fn new(transport: &'a T, store: &'a LocalStore, session: &'a Session) -> Self {
        Self {
            store,
            session,
            fetcher: PaginatedFetcher::new(transport, store),
        }
    }

    /// Use the cached snapshot unless it is missing, empty, corrupt, or
    /// `force_refresh` is set; otherwise fetch every page live.
    pub async fn get_or_fetch<I>(&self, collection: &Collection, force_refresh: bool) -> Result<Fetched<I>>
    where
        I: Serialize + DeserializeOwned,
    {
        if force_refresh {
            tracing::info!(kind = collection.kind, id = %collection.id, "refresh forced");
        } else {
            match self.read_cached(collection) {
                Ok(cached) => return Ok(cached),
                Err(e) => {
                    tracing::debug!(kind = collection.kind, id = %collection.id, error = %e, "cache unusable");
                }
            }
        }

        let items = self.fetcher.fetch_all(collection, self.session).await?;
        Ok(Fetched {
            items,
            source: Source::Live,
        })
    }

    /// How long ago the snapshot for `collection` was written.
    pub fn age(&self, collection: &Collection) -> Result<Duration> {
        self.store.age(&collection.id, collection.kind, "json")
    }

    pub async fn conventions(&self, force_refresh: bool) -> Result<Fetched<Convention>> {
        self.get_or_fetch(&Collection::conventions(), force_refresh)
            .await
    }

    pub async fn events(&self, convention: &Convention, force_refresh: bool) -> Result<Fetched<ConventionEvent>> {
        self.get_or_fetch(&Collection::events(convention), force_refresh)
            .await
    }

    /// Look up an event type by its relationship URI.
    pub async fn event_type(&self, uri: &str, force_refresh: bool) -> Result<ConventionEventType> {
        if uri.is_empty() {
            return Err(BuddyError::Other("event has no type relationship".to_string()));
        }
        if !force_refresh {
            match self.store.read_json::<ConventionEventType>(uri, EVENT_TYPE_KIND) {
                Ok(cached) if !cached.name.is_empty() => return Ok(cached),
                Ok(_) => tracing::debug!(uri, "cached event type has no name"),
                Err(e) => tracing::debug!(uri, error = %e, "event type not cached"),
            }
        }
        self.fetcher
            .fetch_one(uri, EVENT_TYPE_KIND, uri, self.session)
            .await
    }

    fn read_cached<I: DeserializeOwned>(&self, collection: &Collection) -> Result<Fetched<I>> {
        let page: Page<I> = self.store.read_json(&collection.id, collection.kind)?;
        if page.items.is_empty() {
            return Err(BuddyError::Other(format!(
                "cached {} contained zero items",
                collection.kind
            )));
        }

        let age = self.age(collection)?;
        tracing::info!(
            kind = collection.kind,
            count = page.items.len(),
            age = %format_age(age),
            "cached copy found"
        );
        Ok(Fetched {
            items: page.items,
            source: Source::Cache { age },
        })
    }
}

/// Render a duration like `1h2m3s`.
pub fn format_age(age: Duration) -> String {
    let secs = age.as_secs();
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if h > 0 {
        format!("{h}h{m}m{s}s")
    } else if m > 0 {
        format!("{m}m{s}s")
    } else {
        format!("{s}s")
    }
}
