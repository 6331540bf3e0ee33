//! Derived metric model and trait implementations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::client::ApiTransport;
use crate::error::{Result, VantageError};
use crate::models::tags as wf_tags;
use crate::rest::RestCall;
use crate::traits::{Create, Delete, Find, Get, Update};

const DERIVED_METRIC_PATH: &str = "derivedmetrics";

/// A registered query whose result is continuously written back as a new
/// metric.
///
/// The CRUD endpoints for derived metrics return the entity without the
/// usual `response` envelope, so the trait impls decode in direct mode.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DerivedMetric {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,

    /// The query to evaluate.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub query: String,

    /// How many of the last minutes to process per evaluation.
    #[serde(skip_serializing_if = "is_zero")]
    pub minutes: u32,

    #[serde(skip_serializing_if = "Vec::is_empty", with = "wf_tags")]
    pub tags: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub status: Vec<String>,

    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub in_trash: bool,

    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub query_failing: bool,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub last_error_message: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub additional_information: String,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hosts_used: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub metrics_used: Vec<String>,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub create_user_id: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub update_user_id: String,

    #[serde(skip_serializing_if = "is_zero64")]
    pub created_epoch_millis: u64,

    #[serde(skip_serializing_if = "is_zero64")]
    pub updated_epoch_millis: u64,

    #[serde(skip_serializing_if = "is_zero")]
    pub process_rate_minutes: u32,

    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub include_obsolete_metrics: bool,

    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub deleted: bool,
}

fn is_zero(n: &u32) -> bool {
    *n == 0
}
fn is_zero64(n: &u64) -> bool {
    *n == 0
}

#[async_trait]
impl Get for DerivedMetric {
    async fn get(client: &dyn ApiTransport, id: &str) -> Result<Self> {
        if id.is_empty() {
            return Err(VantageError::InvalidInput(
                "derived metric id must be specified".to_string(),
            ));
        }
        RestCall::get(format!("{DERIVED_METRIC_PATH}/{id}"))
            .direct()
            .fetch(client)
            .await
    }
}

#[async_trait]
impl Create for DerivedMetric {
    type Draft = DerivedMetric;

    async fn create(client: &dyn ApiTransport, draft: &DerivedMetric) -> Result<Self> {
        if draft.name.is_empty() || draft.query.is_empty() || draft.minutes == 0 {
            return Err(VantageError::InvalidInput(
                "name, query, and minutes must be specified to create a derived metric"
                    .to_string(),
            ));
        }
        RestCall::post(DERIVED_METRIC_PATH)
            .payload(draft)?
            .direct()
            .fetch(client)
            .await
    }
}

#[async_trait]
impl Update for DerivedMetric {
    async fn update(client: &dyn ApiTransport, entity: &Self) -> Result<Self> {
        let id = entity
            .id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                VantageError::InvalidInput("derived metric id must be specified".to_string())
            })?;
        RestCall::put(format!("{DERIVED_METRIC_PATH}/{id}"))
            .payload(entity)?
            .direct()
            .fetch(client)
            .await
    }
}

#[async_trait]
impl Delete for DerivedMetric {
    async fn delete(client: &dyn ApiTransport, id: &str) -> Result<()> {
        if id.is_empty() {
            return Err(VantageError::InvalidInput(
                "derived metric id must be specified".to_string(),
            ));
        }
        RestCall::delete(format!("{DERIVED_METRIC_PATH}/{id}"))
            .send(client)
            .await
    }
}

impl Find for DerivedMetric {
    const SEARCH_TYPE: &'static str = "derivedmetric";
}
