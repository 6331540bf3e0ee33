//! Alert model and trait implementations.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::client::ApiTransport;
use crate::error::{Result, VantageError};
use crate::models::tags;
use crate::rest::RestCall;
use crate::traits::{Create, Delete, Find, Get, Update};

/// Alert type for multi-threshold alerts.
pub const ALERT_TYPE_THRESHOLD: &str = "THRESHOLD";
/// Alert type for single-condition alerts.
pub const ALERT_TYPE_CLASSIC: &str = "CLASSIC";

const ALERT_PATH: &str = "alert";

/// A single Vantage alert.
///
/// Classic alerts carry one `condition`/`severity`/`target`; threshold
/// alerts map severities to conditions and targets via the plural fields.
/// On the wire tags sit under a `{"customerTags": [...]}` wrapper, exposed
/// here as a flat list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Alert {
    /// Name given to the alert.
    pub name: String,

    /// Server-assigned ID of an existing alert.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Either [`ALERT_TYPE_CLASSIC`] or [`ALERT_TYPE_THRESHOLD`].
    #[serde(skip_serializing_if = "String::is_empty")]
    pub alert_type: String,

    /// Extra information about the alert.
    #[serde(rename = "additionalInformation")]
    pub additional_info: String,

    /// Comma-separated notification targets (classic alerts).
    #[serde(skip_serializing_if = "String::is_empty")]
    pub target: String,

    /// Per-severity targets (threshold alerts). Valid keys are `severe`,
    /// `smoke`, `warn`, `info`.
    pub targets: HashMap<String, String>,

    /// The condition under which the alert fires (classic alerts).
    pub condition: String,

    /// Per-severity conditions (threshold alerts).
    pub conditions: HashMap<String, String>,

    /// Query used to chart this alert in the UI.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub display_expression: String,

    /// Minutes the condition must hold before the alert fires.
    pub minutes: u32,

    /// Minutes the condition must be un-met before the alert resolves.
    #[serde(skip_serializing_if = "is_zero")]
    pub resolve_after_minutes: u32,

    /// Minutes between re-sent notifications while firing.
    pub notification_resend_frequency_minutes: u32,

    /// Severity of a classic alert: SEVERE, SMOKE, WARN or INFO.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub severity: String,

    /// Severities applicable to a threshold alert.
    pub severity_list: Vec<String>,

    /// Current status of the alert.
    pub status: Vec<String>,

    /// Tags applied to the alert.
    #[serde(with = "tags")]
    pub tags: Vec<String>,

    /// Sources currently failing this alert.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failing_host_label_pairs: Vec<SourceLabelPair>,

    /// Sources in maintenance for this alert.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub in_maintenance_host_label_pairs: Vec<SourceLabelPair>,
}

/// A source and the number of series firing on it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceLabelPair {
    pub host: String,
    pub firing: i64,
}

fn is_zero(n: &u32) -> bool {
    *n == 0
}

#[async_trait]
impl Get for Alert {
    async fn get(client: &dyn ApiTransport, id: &str) -> Result<Self> {
        if id.is_empty() {
            return Err(VantageError::InvalidInput(
                "alert id must be specified".to_string(),
            ));
        }
        RestCall::get(format!("{ALERT_PATH}/{id}")).fetch(client).await
    }
}

#[async_trait]
impl Create for Alert {
    type Draft = Alert;

    async fn create(client: &dyn ApiTransport, draft: &Alert) -> Result<Self> {
        if draft.name.is_empty() {
            return Err(VantageError::InvalidInput(
                "alert name must be specified".to_string(),
            ));
        }
        RestCall::post(ALERT_PATH)
            .payload(draft)?
            .fetch(client)
            .await
    }
}

#[async_trait]
impl Update for Alert {
    async fn update(client: &dyn ApiTransport, entity: &Self) -> Result<Self> {
        let id = require_id(entity)?;
        RestCall::put(format!("{ALERT_PATH}/{id}"))
            .payload(entity)?
            .fetch(client)
            .await
    }
}

#[async_trait]
impl Delete for Alert {
    async fn delete(client: &dyn ApiTransport, id: &str) -> Result<()> {
        if id.is_empty() {
            return Err(VantageError::InvalidInput(
                "alert id must be specified".to_string(),
            ));
        }
        RestCall::delete(format!("{ALERT_PATH}/{id}")).send(client).await
    }
}

impl Find for Alert {
    const SEARCH_TYPE: &'static str = "alert";
}

fn require_id(alert: &Alert) -> Result<&str> {
    alert
        .id
        .as_deref()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| VantageError::InvalidInput("alert id field is not set".to_string()))
}
