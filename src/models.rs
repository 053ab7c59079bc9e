//! Frontend Models
//!
//! Data structures exchanged with the items API.

use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::DraftError;

/// Shown in place of a field the backend has not populated yet
pub const MISSING_VALUE: &str = "—";

/// One form submission (matches backend)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    #[serde(default, deserialize_with = "opaque_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
}

/// Backend timestamps arrive either as epoch milliseconds or as text
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Timestamp {
    Millis(i64),
    Text(String),
}

/// Any JSON value is accepted: fractional milliseconds are truncated and
/// other shapes are kept as their raw JSON text.
impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(text) => Timestamp::Text(text),
            Value::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(ms), _) => Timestamp::Millis(ms),
                (None, Some(ms)) if ms.is_finite() && ms.abs() < i64::MAX as f64 => Timestamp::Millis(ms as i64),
                _ => Timestamp::Text(n.to_string()),
            },
            other => Timestamp::Text(other.to_string()),
        })
    }
}

impl Timestamp {
    /// Render as `YYYY-MM-DD HH:MM:SS` in the given zone.
    /// Unparseable text is returned as-is.
    pub fn format_in<Tz: TimeZone>(&self, tz: &Tz) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        let parsed = match self {
            Timestamp::Millis(ms) => DateTime::from_timestamp_millis(*ms).map(|dt| dt.fixed_offset()),
            Timestamp::Text(text) => DateTime::parse_from_rfc3339(text).ok(),
        };
        match (parsed, self) {
            (Some(dt), _) => dt.with_timezone(tz).format("%Y-%m-%d %H:%M:%S").to_string(),
            (None, Timestamp::Text(text)) => text.clone(),
            (None, Timestamp::Millis(ms)) => ms.to_string(),
        }
    }
}

/// Local date-time, or the placeholder when absent
pub fn format_timestamp(timestamp: Option<&Timestamp>) -> String {
    timestamp
        .map(|ts| ts.format_in(&Local))
        .unwrap_or_else(|| MISSING_VALUE.to_string())
}

/// Accept string or numeric ids; both are treated as opaque strings
fn opaque_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Normalise a list response: arrays become items, anything else is empty.
/// Elements that are not items are dropped.
pub fn items_from_json(body: Value) -> Vec<Item> {
    match body {
        Value::Array(values) => values
            .into_iter()
            .filter_map(|value| match serde_json::from_value::<Item>(value) {
                Ok(item) => Some(item),
                Err(e) => {
                    log::warn!("skipping malformed item in list response: {}", e);
                    None
                }
            })
            .collect(),
        other => {
            log::warn!("list response is not an array ({}), treating as empty", json_kind(&other));
            Vec::new()
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// In-progress form buffer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub name: String,
    pub email: String,
}

impl Draft {
    pub fn from_item(item: &Item) -> Self {
        Self { name: item.name.clone(), email: item.email.clone() }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.email.is_empty()
    }

    /// Required fields plus a loose `local@domain` email shape
    pub fn validate(&self) -> Result<(), DraftError> {
        if self.name.trim().is_empty() {
            return Err(DraftError::MissingName);
        }
        let email = self.email.trim();
        if email.is_empty() {
            return Err(DraftError::MissingEmail);
        }
        match email.split_once('@') {
            Some((local, domain))
                if !local.is_empty()
                    && !domain.is_empty()
                    && !domain.contains('@')
                    && !email.contains(char::is_whitespace) =>
            {
                Ok(())
            }
            _ => Err(DraftError::MalformedEmail),
        }
    }
}

/// Body of the upsert request; `id` present only for updates
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub email: String,
}

impl ItemPayload {
    pub fn new(draft: &Draft, edit_target: Option<&str>) -> Self {
        Self {
            id: edit_target.map(str::to_string),
            name: draft.name.clone(),
            email: draft.email.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    #[test]
    fn test_items_from_array() {
        let items = items_from_json(json!([
            {"id": "1", "name": "Ada", "email": "ada@example.com", "createdAt": "2024-05-01T10:00:00Z"},
            {"id": 2, "name": "Bob", "email": "bob@example.com"}
        ]));
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id.as_deref(), Some("1"));
        assert_eq!(items[1].id.as_deref(), Some("2"));
        assert_eq!(items[1].created_at, None);
    }

    #[test]
    fn test_non_array_is_empty() {
        assert!(items_from_json(json!({"items": []})).is_empty());
        assert!(items_from_json(Value::Null).is_empty());
    }

    #[test]
    fn test_malformed_element_is_skipped() {
        let items = items_from_json(json!([42, {"id": "a", "name": "Ann", "email": "ann@example.com"}]));
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Ann");
    }

    #[test]
    fn test_unusual_timestamps_keep_the_item() {
        let items = items_from_json(json!([
            {"id": "1", "name": "Ada", "email": "a@b.c", "createdAt": 1714557600000.0},
            {"id": "2", "name": "Bob", "email": "b@b.c", "createdAt": true, "updatedAt": null}
        ]));
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].created_at, Some(Timestamp::Millis(1_714_557_600_000)));
        assert_eq!(items[0].created_at.as_ref().unwrap().format_in(&Utc), "2024-05-01 10:00:00");
        assert_eq!(items[1].created_at, Some(Timestamp::Text("true".to_string())));
        assert_eq!(items[1].updated_at, None);
    }

    #[test]
    fn test_timestamp_formats() {
        let text = Timestamp::Text("2024-05-01T10:00:00Z".to_string());
        assert_eq!(text.format_in(&Utc), "2024-05-01 10:00:00");

        let millis = Timestamp::Millis(1_714_557_600_000);
        assert_eq!(millis.format_in(&Utc), "2024-05-01 10:00:00");

        let junk = Timestamp::Text("yesterday".to_string());
        assert_eq!(junk.format_in(&Utc), "yesterday");
    }

    #[test]
    fn test_missing_timestamp_placeholder() {
        assert_eq!(format_timestamp(None), MISSING_VALUE);
    }

    #[test]
    fn test_payload_omits_id_when_creating() {
        let draft = Draft { name: "Ada".to_string(), email: "ada@example.com".to_string() };
        let create = serde_json::to_value(ItemPayload::new(&draft, None)).unwrap();
        assert_eq!(create, json!({"name": "Ada", "email": "ada@example.com"}));

        let update = serde_json::to_value(ItemPayload::new(&draft, Some("X"))).unwrap();
        assert_eq!(update, json!({"id": "X", "name": "Ada", "email": "ada@example.com"}));
    }

    #[test]
    fn test_draft_validation() {
        let mut draft = Draft::default();
        assert_eq!(draft.validate(), Err(DraftError::MissingName));
        draft.name = "Ada".to_string();
        assert_eq!(draft.validate(), Err(DraftError::MissingEmail));
        draft.email = "not-an-email".to_string();
        assert_eq!(draft.validate(), Err(DraftError::MalformedEmail));
        draft.email = "a@b@c".to_string();
        assert_eq!(draft.validate(), Err(DraftError::MalformedEmail));
        draft.email = "ada@example.com".to_string();
        assert_eq!(draft.validate(), Ok(()));
    }
}
