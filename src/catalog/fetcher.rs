// Paginated fetcher.
// Walks every page of a collection resource and snapshots the result locally.

use serde::{Serialize, de::DeserializeOwned};

use crate::cache::LocalStore;
use crate::error::Result;
use crate::tte::{Convention, Envelope, Page, Session, Transport};

/// Fixed page size agreed with the remote resource.
pub const ITEMS_PER_PAGE: u32 = 100;

/// A remote collection resource and the local key its snapshot is kept under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    /// API path, e.g. `/api/convention`.
    pub path: String,
    /// Local store namespace.
    pub kind: &'static str,
    /// Local store id within `kind`.
    pub id: String,
    pub include_relationships: bool,
}

impl Collection {
    /// All conventions visible to the session.
    pub fn conventions() -> Self {
        Self {
            path: "/api/convention".to_string(),
            kind: "conventions",
            id: "conventions".to_string(),
            include_relationships: false,
        }
    }

    /// Every event of one convention.
    pub fn events(convention: &Convention) -> Self {
        Self {
            path: format!("/api/convention/{}/events", convention.id),
            kind: "events",
            id: convention.view_uri.clone(),
            include_relationships: true,
        }
    }
}

/// Retrieves complete collections, one page at a time.
pub struct PaginatedFetcher<'a, T: Transport + ?Sized> {
    transport: &'a T,
    store: &'a LocalStore,
}

impl<'a, T: Transport + ?Sized> PaginatedFetcher<'a, T> {
    pub fn new(transport: &'a T, store: &'a LocalStore) -> Self {
        Self { transport, store }
    }

    /// Fetch every page of `collection` in page order and store the snapshot.
    ///
    /// Any failing page aborts the whole fetch; nothing is written in that case.
    pub async fn fetch_all<I>(&self, collection: &Collection, session: &Session) -> Result<Vec<I>>
    where
        I: Serialize + DeserializeOwned,
    {
        let first: Page<I> = self.fetch_page(collection, session, 1).await?;
        let mut items = first.items;

        if let Some(paging) = first.paging.filter(|p| p.total_pages > 0) {
            let start = paging.next_page_number.max(2);
            for page_number in start..=paging.total_pages {
                tracing::debug!(
                    path = %collection.path,
                    current = page_number,
                    last = paging.total_pages,
                    "getting pages"
                );
                let page: Page<I> = self.fetch_page(collection, session, page_number).await?;
                items.extend(page.items);
            }
        }

        let snapshot = Page {
            items,
            paging: None,
        };
        if let Err(e) = self
            .store
            .store_json(&collection.id, collection.kind, &snapshot)
        {
            tracing::warn!(kind = collection.kind, id = %collection.id, error = %e, "failed to cache collection");
        }

        tracing::info!(
            path = %collection.path,
            count = snapshot.items.len(),
            "fetched collection"
        );
        Ok(snapshot.items)
    }

    /// Fetch a single object resource (no paging) and store it under `kind`/`id`.
    pub async fn fetch_one<I>(&self, path: &str, kind: &str, id: &str, session: &Session) -> Result<I>
    where
        I: Serialize + DeserializeOwned + Default,
    {
        let params = [
            ("session_id", session.id.clone()),
            ("_include_relationships", "1".to_string()),
        ];
        let body = self.transport.get(path, &params).await?;
        let envelope: Envelope<I> = serde_json::from_str(&body)?;
        let item = envelope.into_result()?;

        if let Err(e) = self.store.store_json(id, kind, &item) {
            tracing::warn!(kind, id, error = %e, "failed to cache item");
        }
        Ok(item)
    }

    async fn fetch_page<I>(&self, collection: &Collection, session: &Session, page: u64) -> Result<Page<I>>
    where
        I: DeserializeOwned,
    {
        let mut params = vec![
            ("session_id", session.id.clone()),
            ("_page_number", page.to_string()),
            ("_items_per_page", ITEMS_PER_PAGE.to_string()),
        ];
        if collection.include_relationships {
            params.push(("_include_relationships", "1".to_string()));
        }

        let body = self.transport.get(&collection.path, &params).await?;
        let envelope: Envelope<Page<I>> = serde_json::from_str(&body)?;
        Ok(envelope.into_result()?)
    }
}
