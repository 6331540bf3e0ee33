//! Dashboard model and trait implementations.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::client::ApiTransport;
use crate::error::{Result, VantageError};
use crate::models::tags;
use crate::rest::RestCall;
use crate::traits::{Create, Delete, Find, Get, Update};

const DASHBOARD_PATH: &str = "dashboard";

/// A single Vantage dashboard: sections of rows of charts, plus parameters
/// consumable in chart queries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Dashboard {
    /// Name given to the dashboard.
    pub name: String,

    /// URL identifier of the dashboard; doubles as its ID.
    pub id: String,

    /// Tags applied to the dashboard.
    #[serde(with = "tags")]
    pub tags: Vec<String>,

    /// Human description.
    pub description: String,

    /// Relative URL to access the dashboard on a cluster.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub url: String,

    /// The sections that split up the dashboard.
    pub sections: Vec<Section>,

    /// Variables usable within chart queries.
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub parameter_details: HashMap<String, ParameterDetail>,
}

/// A dashboard variable consumable in queries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParameterDetail {
    /// Display name of the variable.
    pub label: String,
    /// Default key into `values_to_readable_strings`.
    pub default_value: String,
    /// Whether the variable is hidden from viewers.
    pub hide_from_view: bool,
    pub parameter_type: String,
    pub values_to_readable_strings: HashMap<String, String>,
}

/// A titled group of rows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Section {
    pub name: String,
    pub rows: Vec<Row>,
}

/// A row of charts within a section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Row {
    pub name: String,
    pub charts: Vec<Chart>,
}

/// A single chart.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Chart {
    pub name: String,
    pub description: String,
    pub sources: Vec<ChartSource>,
    /// Units for the y axis.
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub units: String,
}

/// One query feeding a chart.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChartSource {
    pub name: String,
    pub query: String,
}

#[async_trait]
impl Get for Dashboard {
    async fn get(client: &dyn ApiTransport, id: &str) -> Result<Self> {
        if id.is_empty() {
            return Err(VantageError::InvalidInput(
                "dashboard id must be specified".to_string(),
            ));
        }
        RestCall::get(format!("{DASHBOARD_PATH}/{id}")).fetch(client).await
    }
}

#[async_trait]
impl Create for Dashboard {
    type Draft = Dashboard;

    async fn create(client: &dyn ApiTransport, draft: &Dashboard) -> Result<Self> {
        if draft.name.is_empty() || draft.id.is_empty() {
            return Err(VantageError::InvalidInput(
                "dashboard name and id must be specified".to_string(),
            ));
        }
        RestCall::post(DASHBOARD_PATH)
            .payload(draft)?
            .fetch(client)
            .await
    }
}

#[async_trait]
impl Update for Dashboard {
    async fn update(client: &dyn ApiTransport, entity: &Self) -> Result<Self> {
        if entity.id.is_empty() {
            return Err(VantageError::InvalidInput(
                "dashboard id must be specified".to_string(),
            ));
        }
        RestCall::put(format!("{DASHBOARD_PATH}/{}", entity.id))
            .payload(entity)?
            .fetch(client)
            .await
    }
}

#[async_trait]
impl Delete for Dashboard {
    async fn delete(client: &dyn ApiTransport, id: &str) -> Result<()> {
        if id.is_empty() {
            return Err(VantageError::InvalidInput(
                "dashboard id must be specified".to_string(),
            ));
        }
        RestCall::delete(format!("{DASHBOARD_PATH}/{id}")).send(client).await
    }
}

impl Find for Dashboard {
    const SEARCH_TYPE: &'static str = "dashboard";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_shape_round_trip() {
        let dashboard = Dashboard {
            name: "Service health".to_string(),
            id: "service-health".to_string(),
            tags: vec!["prod".to_string()],
            sections: vec![Section {
                name: "Latency".to_string(),
                rows: vec![Row {
                    name: "p99".to_string(),
                    charts: vec![Chart {
                        name: "p99 latency".to_string(),
                        sources: vec![ChartSource {
                            name: "p99".to_string(),
                            query: "percentile(99, ts(app.latency))".to_string(),
                        }],
                        ..Default::default()
                    }],
                }],
            }],
            ..Default::default()
        };

        let json = serde_json::to_value(&dashboard).unwrap();
        assert_eq!(json["tags"], serde_json::json!({"customerTags": ["prod"]}));

        let back: Dashboard = serde_json::from_value(json).unwrap();
        assert_eq!(back.sections[0].rows[0].charts[0].sources[0].name, "p99");
        assert_eq!(back.tags, vec!["prod"]);
    }
}
