// Event filter engine.
// Predicates are combined conjunctively; input order is preserved.

use std::collections::BTreeSet;

use clap::ValueEnum;

use crate::cache::LikedEvents;
use crate::tte::ConventionEvent;

/// Tri-state filter on the liked marker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LikedState {
    Liked,
    NotLiked,
    #[default]
    Either,
}

/// One field test applied to an event.
#[derive(Debug, Clone)]
pub enum EventPredicate<'a> {
    /// Case-insensitive substring of the name.
    NameContains(String),
    /// Case-insensitive equality with the id.
    IdEquals(String),
    /// Case-insensitive substring of the description or the long description.
    DescriptionContains(String),
    /// Case-insensitive substring of the hosting group custom field.
    HostingGroupContains(String),
    /// Event type URI is one of the selected keys.
    TypeIn(BTreeSet<String>),
    /// Liked marker, looked up by view URI.
    Liked(LikedState, &'a LikedEvents),
}

impl EventPredicate<'_> {
    pub fn matches(&self, event: &ConventionEvent) -> bool {
        match self {
            EventPredicate::NameContains(needle) => contains_ignore_case(&event.name, needle),
            EventPredicate::IdEquals(id) => event.id.to_lowercase() == id.to_lowercase(),
            EventPredicate::DescriptionContains(needle) => {
                contains_ignore_case(&event.description, needle)
                    || contains_ignore_case(&event.long_description, needle)
            }
            EventPredicate::HostingGroupContains(needle) => {
                contains_ignore_case(&event.custom_fields.hosting_group, needle)
            }
            EventPredicate::TypeIn(uris) => uris.contains(&event.relationships.kind),
            EventPredicate::Liked(state, likes) => {
                let liked = likes.contains(&event.view_uri);
                match state {
                    LikedState::Liked => liked,
                    LikedState::NotLiked => !liked,
                    LikedState::Either => true,
                }
            }
        }
    }
}

/// Keep the events that satisfy every predicate. No predicates keeps everything.
pub fn filter(events: Vec<ConventionEvent>, predicates: &[EventPredicate<'_>]) -> Vec<ConventionEvent> {
    if predicates.is_empty() {
        return events;
    }
    events
        .into_iter()
        .filter(|event| predicates.iter().all(|p| p.matches(event)))
        .collect()
}

/// User-supplied filter inputs. Empty inputs add no predicate.
#[derive(Debug, Clone, Default)]
pub struct FilterSpec {
    pub name: Option<String>,
    pub id: Option<String>,
    pub description: Option<String>,
    pub hosting_group: Option<String>,
    /// Selected event type URIs.
    pub types: BTreeSet<String>,
    pub liked: LikedState,
}

impl FilterSpec {
    pub fn predicates<'a>(&self, likes: &'a LikedEvents) -> Vec<EventPredicate<'a>> {
        let mut predicates = Vec::new();
        if let Some(name) = non_empty(&self.name) {
            predicates.push(EventPredicate::NameContains(name.to_string()));
        }
        if let Some(id) = non_empty(&self.id) {
            predicates.push(EventPredicate::IdEquals(id.to_string()));
        }
        if self.liked != LikedState::Either {
            predicates.push(EventPredicate::Liked(self.liked, likes));
        }
        if let Some(host) = non_empty(&self.hosting_group) {
            predicates.push(EventPredicate::HostingGroupContains(host.to_string()));
        }
        if let Some(description) = non_empty(&self.description) {
            predicates.push(EventPredicate::DescriptionContains(description.to_string()));
        }
        if !self.types.is_empty() {
            predicates.push(EventPredicate::TypeIn(self.types.clone()));
        }
        predicates
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
