// tabletop.events API response types.
// Defines the response envelope, paging metadata, and catalog records.

use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use thiserror::Error;

use crate::daytime::Daytime;

/// Domain error carried in a response envelope.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("[{code}]: ({data}) {message}")]
pub struct ApiError {
    #[serde(default, deserialize_with = "null_default")]
    pub code: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub data: String,
    #[serde(default, deserialize_with = "null_default")]
    pub message: String,
}

/// Every response: `{"result": ..., "error": ... | null}`.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub result: Option<T>,
    pub error: Option<ApiError>,
}

impl<T> Envelope<T> {
    /// Turn the envelope into its result, treating a non-null error as failure.
    pub fn into_result(self) -> Result<T, ApiError>
    where
        T: Default,
    {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.result.unwrap_or_default()),
        }
    }
}

/// One page of a collection resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
pub struct Page<T> {
    #[serde(default, deserialize_with = "null_default")]
    pub items: Vec<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paging: Option<Paging>,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            paging: None,
        }
    }
}

/// Paging metadata. The API sends some of these as strings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paging {
    #[serde(default, deserialize_with = "lenient_u64")]
    pub page_number: u64,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub next_page_number: u64,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub previous_page_number: u64,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub items_per_page: u64,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub total_items: u64,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub total_pages: u64,
}

/// Authenticated session handle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default, deserialize_with = "null_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_default")]
    pub user_id: String,
}

/// A convention (trade show, gathering) hosting many events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Convention {
    #[serde(deserialize_with = "null_default")]
    pub id: String,
    #[serde(deserialize_with = "null_default")]
    pub name: String,
    #[serde(deserialize_with = "null_default")]
    pub start_date: String,
    #[serde(deserialize_with = "null_default")]
    pub end_date: String,
    #[serde(deserialize_with = "null_default")]
    pub view_uri: String,
    #[serde(deserialize_with = "null_default")]
    pub website_uri: String,
    #[serde(deserialize_with = "null_default")]
    pub geolocation_id: String,
}

/// One schedulable session within a convention.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConventionEvent {
    #[serde(deserialize_with = "null_default")]
    pub id: String,
    #[serde(deserialize_with = "null_default")]
    pub name: String,
    #[serde(deserialize_with = "lenient_u64")]
    pub event_number: u64,
    #[serde(deserialize_with = "null_default")]
    pub startdaypart_name: Daytime,
    /// Minutes.
    #[serde(deserialize_with = "lenient_u64")]
    pub duration: u64,
    #[serde(deserialize_with = "null_default")]
    pub description: String,
    #[serde(deserialize_with = "null_default")]
    pub long_description: String,
    #[serde(deserialize_with = "null_default")]
    pub convention_id: String,
    #[serde(deserialize_with = "null_default")]
    pub view_uri: String,
    #[serde(deserialize_with = "null_default")]
    pub more_info_uri: String,
    #[serde(deserialize_with = "null_default")]
    pub room_name: String,
    #[serde(deserialize_with = "null_default")]
    pub space_name: String,
    #[serde(deserialize_with = "null_default")]
    pub age_range: String,
    #[serde(deserialize_with = "lenient_u64")]
    pub is_cancelled: u64,
    #[serde(deserialize_with = "lenient_custom_fields")]
    pub custom_fields: EventCustomFields,
    #[serde(rename = "_relationships", deserialize_with = "null_default")]
    pub relationships: EventRelationships,
}

/// Convention-defined fields attached to every event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventCustomFields {
    #[serde(rename = "Publisher", deserialize_with = "lenient_string")]
    pub publisher: String,
    #[serde(rename = "HostingGroup", deserialize_with = "lenient_string")]
    pub hosting_group: String,
    #[serde(rename = "GM", deserialize_with = "lenient_string")]
    pub game_master: String,
    #[serde(rename = "SubCategory", deserialize_with = "lenient_string")]
    pub sub_category: String,
    #[serde(rename = "Complexity", deserialize_with = "lenient_string")]
    pub complexity: String,
    #[serde(rename = "Edition", deserialize_with = "lenient_string")]
    pub edition: String,
    #[serde(rename = "RulesTaught", deserialize_with = "lenient_string")]
    pub rules_taught: String,
    #[serde(rename = "PlayerExp", deserialize_with = "lenient_string")]
    pub player_experience: String,
    #[serde(rename = "Tournament?", deserialize_with = "lenient_string")]
    pub tournament: String,
    #[serde(rename = "TournamentStyle", deserialize_with = "lenient_string")]
    pub tournament_style: String,
    #[serde(rename = "TournamentStage", deserialize_with = "lenient_string")]
    pub tournament_stage: String,
}

/// Relationship URIs of an event. `kind` points at its event type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventRelationships {
    #[serde(rename = "type", deserialize_with = "null_default")]
    pub kind: String,
    #[serde(rename = "self", deserialize_with = "null_default")]
    pub this: String,
    #[serde(deserialize_with = "null_default")]
    pub convention: String,
    #[serde(deserialize_with = "null_default")]
    pub room: String,
    #[serde(deserialize_with = "null_default")]
    pub hosts: String,
    #[serde(deserialize_with = "null_default")]
    pub startdaypart: String,
}

/// Category assigned to events, with its custom field schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConventionEventType {
    #[serde(deserialize_with = "null_default")]
    pub id: String,
    #[serde(deserialize_with = "null_default")]
    pub name: String,
    #[serde(deserialize_with = "null_default")]
    pub description: String,
    #[serde(deserialize_with = "null_default")]
    pub custom_fields: Vec<CustomField>,
}

/// Schema entry for one custom field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomField {
    #[serde(deserialize_with = "null_default")]
    pub name: String,
    #[serde(deserialize_with = "null_default")]
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: CustomFieldType,
    #[serde(deserialize_with = "lenient_u64")]
    pub required: u64,
    #[serde(deserialize_with = "lenient_u64")]
    pub sequence_number: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomFieldType {
    Select,
    #[default]
    Text,
    Textarea,
    #[serde(other)]
    Unknown,
}

/// Deserialize `null` as the type's default.
fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accept numbers, numeric strings, or null.
fn lenient_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Number(n) => n.as_u64().unwrap_or_default(),
        serde_json::Value::String(s) => s.trim().parse().unwrap_or_default(),
        serde_json::Value::Bool(b) => u64::from(b),
        _ => 0,
    })
}

/// Accept strings or scalars; anything else becomes empty.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => s,
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

/// The API sends `[]` instead of `{}` for events with no custom fields.
fn lenient_custom_fields<'de, D>(deserializer: D) -> Result<EventCustomFields, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        value @ serde_json::Value::Object(_) => {
            serde_json::from_value(value).map_err(serde::de::Error::custom)
        }
        _ => Ok(EventCustomFields::default()),
    }
}
