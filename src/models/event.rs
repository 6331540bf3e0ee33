//! Event model and trait implementations.
//!
//! Severity, type, and details travel inside a wire-side `annotations`
//! map; the custom serde impls below explode them onto flat fields.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::client::ApiTransport;
use crate::error::{Result, VantageError};
use crate::rest::RestCall;
use crate::search::{Search, SearchCondition, TimeRange};
use crate::traits::{Create, Delete, Update};

const EVENT_PATH: &str = "event";

/// A single Vantage event, such as a deploy or an alert transition.
#[derive(Debug, Clone, Default)]
pub struct Event {
    /// Name given to the event.
    pub name: String,

    /// Server-assigned ID of an existing event.
    pub id: Option<String>,

    /// Start time, epoch millis. Zero means "now" at creation.
    pub start_time: i64,

    /// End time, epoch millis.
    pub end_time: i64,

    /// Tags associated with the event.
    pub tags: Vec<String>,

    /// Severity category: INFO, WARN, SEVERE or UNCLASSIFIED.
    pub severity: String,

    /// Event type, e.g. "Alert" or "Deploy".
    pub event_type: String,

    /// Description of the event.
    pub details: String,

    /// If true, the event is a point in time rather than a window.
    pub instantaneous: bool,
}

#[derive(Serialize, Deserialize, Default)]
struct EventWire {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(rename = "startTime")]
    start_time: i64,
    #[serde(rename = "endTime")]
    end_time: i64,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    annotations: BTreeMap<String, String>,
    #[serde(rename = "isEphemeral", default)]
    is_ephemeral: bool,
}

impl Serialize for Event {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        let mut annotations = BTreeMap::new();
        annotations.insert("severity".to_string(), self.severity.clone());
        annotations.insert("type".to_string(), self.event_type.clone());
        annotations.insert("details".to_string(), self.details.clone());

        EventWire {
            name: self.name.clone(),
            id: self.id.clone(),
            start_time: self.start_time,
            end_time: self.end_time,
            tags: self.tags.clone(),
            annotations,
            is_ephemeral: self.instantaneous,
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Event {
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> core::result::Result<Self, D::Error> {
        let mut wire = EventWire::deserialize(deserializer)?;
        Ok(Event {
            name: wire.name,
            id: wire.id,
            start_time: wire.start_time,
            end_time: wire.end_time,
            tags: wire.tags,
            severity: wire.annotations.remove("severity").unwrap_or_default(),
            event_type: wire.annotations.remove("type").unwrap_or_default(),
            details: wire.annotations.remove("details").unwrap_or_default(),
            instantaneous: wire.is_ephemeral,
        })
    }
}

impl Event {
    /// Return the first page of events matching the given conditions within
    /// the time range. For more than 100 results drive [`Search`] directly.
    pub async fn find(
        client: &dyn ApiTransport,
        filter: &[SearchCondition],
        time_range: Option<TimeRange>,
    ) -> Result<Vec<Event>> {
        let mut search = Search::new("event").conditions(filter);
        if let Some(range) = time_range {
            search = search.time_range(range);
        }
        search.execute_page(client).await?.items()
    }

    /// Find the event with the given server-assigned ID.
    pub async fn find_by_id(client: &dyn ApiTransport, id: &str) -> Result<Event> {
        let found = Self::find(client, &[SearchCondition::exact("id", id)], None).await?;
        found.into_iter().next().ok_or_else(|| {
            VantageError::InvalidInput(format!("no event found with id {id}"))
        })
    }

    /// Close this event now.
    pub async fn close(client: &dyn ApiTransport, event: &Event) -> Result<Event> {
        let id = require_id(event)?;
        RestCall::post(format!("{EVENT_PATH}/{id}/close"))
            .payload(event)?
            .fetch(client)
            .await
    }
}

#[async_trait]
impl Create for Event {
    type Draft = Event;

    /// An unset start time defaults to now; instantaneous events get a
    /// one-millisecond duration.
    async fn create(client: &dyn ApiTransport, draft: &Event) -> Result<Self> {
        let mut event = draft.clone();
        if event.start_time == 0 {
            event.start_time = Utc::now().timestamp() * 1000;
        }
        if event.instantaneous {
            event.end_time = event.start_time + 1;
        }
        RestCall::post(EVENT_PATH)
            .payload(&event)?
            .fetch(client)
            .await
    }
}

#[async_trait]
impl Update for Event {
    async fn update(client: &dyn ApiTransport, entity: &Self) -> Result<Self> {
        let id = require_id(entity)?;
        RestCall::put(format!("{EVENT_PATH}/{id}"))
            .payload(entity)?
            .fetch(client)
            .await
    }
}

#[async_trait]
impl Delete for Event {
    async fn delete(client: &dyn ApiTransport, id: &str) -> Result<()> {
        if id.is_empty() {
            return Err(VantageError::InvalidInput(
                "event id must be specified".to_string(),
            ));
        }
        RestCall::delete(format!("{EVENT_PATH}/{id}")).send(client).await
    }
}

fn require_id(event: &Event) -> Result<&str> {
    event
        .id
        .as_deref()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| VantageError::InvalidInput("event id field is not set".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_annotations_explode() {
        let event = Event {
            name: "deploy".to_string(),
            start_time: 1000,
            end_time: 2000,
            severity: "INFO".to_string(),
            event_type: "Deploy".to_string(),
            details: "rolled out v2".to_string(),
            ..Default::default()
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(
            json["annotations"],
            serde_json::json!({
                "severity": "INFO",
                "type": "Deploy",
                "details": "rolled out v2"
            })
        );

        let back: Event = serde_json::from_value(json).unwrap();
        assert_eq!(back.severity, "INFO");
        assert_eq!(back.event_type, "Deploy");
        assert_eq!(back.details, "rolled out v2");
    }

    #[test]
    fn test_instantaneous_is_ephemeral_on_wire() {
        let event = Event {
            name: "blip".to_string(),
            instantaneous: true,
            ..Default::default()
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["isEphemeral"], serde_json::json!(true));
    }
}
