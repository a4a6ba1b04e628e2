//! Customer interaction events and the JSON log they are appended to.
//!
//! The log lives in a single `json` metafield. It is decoded leniently:
//! entries are kept as raw JSON so events written by older clients survive a
//! rewrite untouched, and a bare object is promoted to a one-element log.

use std::cmp::Ordering;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::id::CustomerId;

/// Kind of tracked interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    AddToCart,
    WishlistAdd,
    WishlistRemove,
}

/// One interaction event as stored in the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionEvent {
    pub event_type: EventType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_id: Option<String>,
    /// Always serialized, `null` for anonymous visitors.
    #[serde(default)]
    pub customer_id: Option<CustomerId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visitor_id: Option<String>,
    /// ISO-8601 with millisecond precision, UTC.
    pub timestamp: String,
}

impl InteractionEvent {
    /// Create an event stamped at `at`.
    #[must_use]
    pub fn new(event_type: EventType, at: DateTime<Utc>) -> Self {
        Self {
            event_type,
            product_id: None,
            variant_id: None,
            customer_id: None,
            visitor_id: None,
            timestamp: at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// The stored value could not be parsed as JSON.
#[derive(Debug, Error)]
#[error("stored interaction log is not valid JSON: {0}")]
pub struct LogDecodeError(#[from] serde_json::Error);

/// Decoded interaction log for one owner, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InteractionLog {
    entries: Vec<Value>,
}

impl InteractionLog {
    /// Decode a stored field value.
    ///
    /// A non-array value is wrapped into a one-element log.
    ///
    /// # Errors
    ///
    /// Returns [`LogDecodeError`] if `raw` is not valid JSON.
    pub fn decode(raw: &str) -> Result<Self, LogDecodeError> {
        let entries = match serde_json::from_str::<Value>(raw)? {
            Value::Array(entries) => entries,
            single => vec![single],
        };
        Ok(Self { entries })
    }

    /// Append an event at the end of the log.
    ///
    /// # Errors
    ///
    /// Returns an error if the event cannot be converted to JSON.
    pub fn push(&mut self, event: &InteractionEvent) -> Result<(), serde_json::Error> {
        self.entries.push(serde_json::to_value(event)?);
        Ok(())
    }

    /// Encode the full log as a JSON array string.
    #[must_use]
    pub fn encode(&self) -> String {
        Value::Array(self.entries.clone()).to_string()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[Value] {
        &self.entries
    }

    /// Entries sorted by `timestamp`, newest first.
    ///
    /// The sort is stable. Entries without a parseable timestamp go last.
    #[must_use]
    pub fn into_newest_first(self) -> Vec<Value> {
        let mut keyed: Vec<(Option<DateTime<Utc>>, Value)> = self
            .entries
            .into_iter()
            .map(|entry| (entry_timestamp(&entry), entry))
            .collect();

        keyed.sort_by(|(a, _), (b, _)| match (a, b) {
            (Some(a), Some(b)) => b.cmp(a),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });

        keyed.into_iter().map(|(_, entry)| entry).collect()
    }
}

fn entry_timestamp(entry: &Value) -> Option<DateTime<Utc>> {
    let raw = entry.get("timestamp")?.as_str()?;
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|at| at.with_timezone(&Utc))
}
