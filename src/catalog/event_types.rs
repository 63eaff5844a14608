// Event type lookups for one pass over a convention's events.
// Memoizes each relationship URI so every type is resolved at most once.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::tte::{ConventionEvent, ConventionEventType, Transport};

use super::reconciler::CacheReconciler;

const UNKNOWN_TYPE: &str = "unknown";

/// Per-pass memo of event types keyed by relationship URI.
#[derive(Debug, Default)]
pub struct EventTypeIndex {
    by_uri: HashMap<String, ConventionEventType>,
    force_refresh: bool,
}

impl EventTypeIndex {
    pub fn new(force_refresh: bool) -> Self {
        Self {
            by_uri: HashMap::new(),
            force_refresh,
        }
    }

    /// Resolve a type URI, fetching it on first use.
    ///
    /// A failed lookup is logged and remembered as an unnamed placeholder.
    /// Events without a type relationship get the placeholder directly.
    pub async fn get_or_fetch_type<T: Transport + ?Sized>(
        &mut self,
        reconciler: &CacheReconciler<'_, T>,
        uri: &str,
    ) -> &ConventionEventType {
        if !self.by_uri.contains_key(uri) {
            let event_type = if uri.is_empty() {
                unknown_type()
            } else {
                match reconciler.event_type(uri, self.force_refresh).await {
                    Ok(event_type) => event_type,
                    Err(e) => {
                        tracing::error!(event_type_uri = uri, error = %e, "failed to get event type");
                        unknown_type()
                    }
                }
            };
            self.by_uri.insert(uri.to_string(), event_type);
        }
        &self.by_uri[uri]
    }

    /// Resolve every type referenced by `events` and count events per type name.
    pub async fn summarize<T: Transport + ?Sized>(
        &mut self,
        reconciler: &CacheReconciler<'_, T>,
        events: &[ConventionEvent],
    ) -> TypeSummary {
        let mut summary = TypeSummary::default();
        for event in events {
            let uri = event.relationships.kind.as_str();
            let name = self.get_or_fetch_type(reconciler, uri).await.name.clone();
            *summary.counts.entry(name.clone()).or_default() += 1;
            summary.uris_by_name.entry(name).or_default().insert(uri.to_string());
        }
        summary
    }

    /// Display name for a type URI already seen in this pass.
    pub fn name_of(&self, uri: &str) -> &str {
        self.by_uri
            .get(uri)
            .map(|t| t.name.as_str())
            .unwrap_or(UNKNOWN_TYPE)
    }

    /// Name lookup table for rendering.
    pub fn names_by_uri(&self) -> HashMap<String, String> {
        self.by_uri
            .iter()
            .map(|(uri, t)| (uri.clone(), t.name.clone()))
            .collect()
    }

    /// Every known URI whose type name matches `name`, ignoring case.
    pub fn uris_named(&self, name: &str) -> BTreeSet<String> {
        self.by_uri
            .iter()
            .filter(|(_, t)| t.name.eq_ignore_ascii_case(name))
            .map(|(uri, _)| uri.clone())
            .collect()
    }
}

fn unknown_type() -> ConventionEventType {
    ConventionEventType {
        name: UNKNOWN_TYPE.to_string(),
        ..Default::default()
    }
}

/// Event counts per type name, with the URIs that carry each name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeSummary {
    pub counts: BTreeMap<String, usize>,
    pub uris_by_name: BTreeMap<String, BTreeSet<String>>,
}

impl TypeSummary {
    /// One line per type name: count, name, and the URIs carrying it.
    pub fn lines(&self) -> Vec<String> {
        self.counts
            .iter()
            .map(|(name, count)| {
                let uris = self
                    .uris_by_name
                    .get(name)
                    .map(|uris| uris.iter().cloned().collect::<Vec<_>>().join(", "))
                    .unwrap_or_default();
                format!("{count:>5}  {name:<24} {uris}")
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::LocalStore;
    use crate::tte::testing::FakeTransport;
    use crate::tte::{EventRelationships, Session};
    use tempfile::TempDir;

    fn event(id: &str, type_uri: &str) -> ConventionEvent {
        ConventionEvent {
            id: id.to_string(),
            relationships: EventRelationships {
                kind: type_uri.to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_summarize_fetches_each_type_once() {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalStore::new(temp_dir.path());
        let transport = FakeTransport::new()
            .with_response(
                "/api/eventtype/BG",
                r#"{"result": {"id": "BG", "name": "Board Game"}, "error": null}"#,
            )
            .with_response(
                "/api/eventtype/RPG",
                r#"{"result": {"id": "RPG", "name": "RPG"}, "error": null}"#,
            );
        let session = Session::default();
        let reconciler = CacheReconciler::new(&transport, &store, &session);

        let events = vec![
            event("1", "/api/eventtype/BG"),
            event("2", "/api/eventtype/RPG"),
            event("3", "/api/eventtype/BG"),
        ];
        let mut index = EventTypeIndex::new(true);
        let summary = index.summarize(&reconciler, &events).await;

        assert_eq!(summary.counts["Board Game"], 2);
        assert_eq!(
            summary.lines(),
            vec![
                format!("    2  {:<24} /api/eventtype/BG", "Board Game"),
                format!("    1  {:<24} /api/eventtype/RPG", "RPG"),
            ]
        );
        assert_eq!(summary.counts["RPG"], 1);
        assert_eq!(transport.requests().len(), 2);
        assert_eq!(index.name_of("/api/eventtype/RPG"), "RPG");
        assert_eq!(
            index.uris_named("board game"),
            BTreeSet::from(["/api/eventtype/BG".to_string()])
        );
    }

    #[tokio::test]
    async fn test_failed_lookup_becomes_placeholder() {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalStore::new(temp_dir.path());
        let transport = FakeTransport::new();
        let session = Session::default();
        let reconciler = CacheReconciler::new(&transport, &store, &session);

        let mut index = EventTypeIndex::new(false);
        let summary = index
            .summarize(&reconciler, &[event("1", "/api/eventtype/gone"), event("2", "/api/eventtype/gone")])
            .await;

        assert_eq!(summary.counts[UNKNOWN_TYPE], 2);
        assert_eq!(transport.requests().len(), 1);
        assert_eq!(index.name_of("/api/eventtype/never-seen"), UNKNOWN_TYPE);
    }

    #[tokio::test]
    async fn test_missing_type_uri_skips_lookup() {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalStore::new(temp_dir.path());
        let transport = FakeTransport::new();
        let session = Session::default();
        let reconciler = CacheReconciler::new(&transport, &store, &session);

        let mut index = EventTypeIndex::new(false);
        let summary = index
            .summarize(&reconciler, &[event("1", ""), event("2", "")])
            .await;

        assert_eq!(summary.counts[UNKNOWN_TYPE], 2);
        assert!(transport.requests().is_empty());
        assert!(!temp_dir.path().join("event_type").exists());
    }
}
