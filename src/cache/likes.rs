// Liked events for one convention.
// Persisted wholesale as sorted, newline-joined view URIs.

use std::collections::BTreeSet;

use crate::error::Result;

use super::store::LocalStore;

const LIKED_KIND: &str = "liked";

/// User-curated set of event view URIs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LikedEvents {
    uris: BTreeSet<String>,
}

impl LikedEvents {
    /// Parse newline-separated URIs, ignoring blank lines.
    pub fn parse(text: &str) -> Self {
        let uris = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        Self { uris }
    }

    /// Serialize as sorted, newline-joined URIs.
    pub fn to_text(&self) -> String {
        self.uris.iter().cloned().collect::<Vec<_>>().join("\n")
    }

    /// Load the set for a convention; an absent file is an empty set.
    pub fn load(store: &LocalStore, convention_view_uri: &str) -> Result<Self> {
        let text = store.read_text(convention_view_uri, LIKED_KIND)?;
        Ok(text.map(|t| Self::parse(&t)).unwrap_or_default())
    }

    /// Rewrite the whole set for a convention.
    pub fn save(&self, store: &LocalStore, convention_view_uri: &str) -> Result<()> {
        tracing::debug!(
            convention = convention_view_uri,
            count = self.uris.len(),
            "saving liked events"
        );
        store.store_text(convention_view_uri, LIKED_KIND, &self.to_text())
    }

    pub fn contains(&self, view_uri: &str) -> bool {
        self.uris.contains(view_uri)
    }

    pub fn like(&mut self, view_uri: impl Into<String>) -> bool {
        self.uris.insert(view_uri.into())
    }

    pub fn unlike(&mut self, view_uri: &str) -> bool {
        self.uris.remove(view_uri)
    }

    /// Flip the marker; returns whether the event is now liked.
    pub fn toggle(&mut self, view_uri: &str) -> bool {
        if self.unlike(view_uri) {
            false
        } else {
            self.like(view_uri)
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.uris.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.uris.len()
    }

    pub fn is_empty(&self) -> bool {
        self.uris.is_empty()
    }
}
