//! Ingestion policy model and trait implementations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::client::ApiTransport;
use crate::error::{Result, VantageError};
use crate::rest::RestCall;
use crate::traits::{Create, Delete, Find, Get, Update};

const INGESTION_POLICY_PATH: &str = "usage/ingestionpolicy";

/// An ingestion policy grouping accounts for usage accounting.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IngestionPolicy {
    /// Server-assigned ID of an existing policy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Name of the policy.
    pub name: String,

    /// Human readable description.
    pub description: String,

    /// Number of user accounts attached to this policy.
    pub user_account_count: i32,

    /// Number of service accounts attached to this policy.
    pub service_account_count: i32,
}

#[async_trait]
impl Get for IngestionPolicy {
    async fn get(client: &dyn ApiTransport, id: &str) -> Result<Self> {
        if id.is_empty() {
            return Err(VantageError::InvalidInput(
                "ingestion policy id must be specified".to_string(),
            ));
        }
        RestCall::get(format!("{INGESTION_POLICY_PATH}/{id}"))
            .fetch(client)
            .await
    }
}

#[async_trait]
impl Create for IngestionPolicy {
    type Draft = IngestionPolicy;

    async fn create(client: &dyn ApiTransport, draft: &IngestionPolicy) -> Result<Self> {
        if draft.name.is_empty() {
            return Err(VantageError::InvalidInput(
                "ingestion policy name must be specified".to_string(),
            ));
        }
        RestCall::post(INGESTION_POLICY_PATH)
            .payload(draft)?
            .fetch(client)
            .await
    }
}

#[async_trait]
impl Update for IngestionPolicy {
    async fn update(client: &dyn ApiTransport, entity: &Self) -> Result<Self> {
        let id = entity
            .id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                VantageError::InvalidInput("ingestion policy id field is not set".to_string())
            })?;
        RestCall::put(format!("{INGESTION_POLICY_PATH}/{id}"))
            .payload(entity)?
            .fetch(client)
            .await
    }
}

#[async_trait]
impl Delete for IngestionPolicy {
    async fn delete(client: &dyn ApiTransport, id: &str) -> Result<()> {
        if id.is_empty() {
            return Err(VantageError::InvalidInput(
                "ingestion policy id must be specified".to_string(),
            ));
        }
        RestCall::delete(format!("{INGESTION_POLICY_PATH}/{id}"))
            .send(client)
            .await
    }
}

impl Find for IngestionPolicy {
    const SEARCH_TYPE: &'static str = "ingestionpolicy";
}
