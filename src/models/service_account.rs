//! Service account model and trait implementations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::client::ApiTransport;
use crate::error::{Result, VantageError};
use crate::models::{IngestionPolicy, Role, Token, UserGroup};
use crate::rest::RestCall;
use crate::traits::{Create, Delete, Find, Get, Update};

const SERVICE_ACCOUNT_PATH: &str = "account/serviceaccount";

/// A machine account that authenticates with API tokens rather than a
/// user login. Roles, groups, tokens and the ingestion policy come back
/// from the service as embedded objects.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceAccount {
    /// Account identifier, conventionally prefixed with `sa::`.
    #[serde(rename = "identifier")]
    pub id: String,

    /// Human readable description.
    pub description: String,

    /// Permissions granted directly to the account.
    #[serde(rename = "groups")]
    pub permissions: Vec<String>,

    /// Whether the account may authenticate.
    pub active: bool,

    /// Roles assigned to the account.
    pub roles: Vec<Role>,

    /// Groups the account belongs to.
    pub user_groups: Vec<UserGroup>,

    /// API tokens issued to the account.
    pub tokens: Vec<Token>,

    /// Ingestion policy the account is attached to.
    pub ingestion_policy: IngestionPolicy,
}

impl ServiceAccount {
    /// IDs of the tokens issued to this account.
    pub fn token_ids(&self) -> Vec<String> {
        self.tokens.iter().map(|t| t.id.clone()).collect()
    }

    /// IDs of the roles assigned to this account.
    pub fn role_ids(&self) -> Vec<String> {
        self.roles.iter().map(|r| r.id.clone()).collect()
    }

    /// IDs of the groups this account belongs to.
    pub fn user_group_ids(&self) -> Vec<String> {
        self.user_groups
            .iter()
            .filter_map(|g| g.id.clone())
            .collect()
    }

    /// ID of the attached ingestion policy, empty if none.
    pub fn ingestion_policy_id(&self) -> String {
        self.ingestion_policy.id.clone().unwrap_or_default()
    }

    /// Allow the account to authenticate again.
    pub async fn activate(client: &dyn ApiTransport, id: &str) -> Result<ServiceAccount> {
        Self::set_active(client, id, "activate").await
    }

    /// Stop the account from authenticating without deleting it.
    pub async fn deactivate(client: &dyn ApiTransport, id: &str) -> Result<ServiceAccount> {
        Self::set_active(client, id, "deactivate").await
    }

    async fn set_active(
        client: &dyn ApiTransport,
        id: &str,
        op: &str,
    ) -> Result<ServiceAccount> {
        if id.is_empty() {
            return Err(VantageError::InvalidInput(
                "service account id must be specified".to_string(),
            ));
        }
        RestCall::post(format!("{SERVICE_ACCOUNT_PATH}/{id}/{op}"))
            .fetch(client)
            .await
    }

    /// Returns the configurable options currently set on this account,
    /// with embedded objects flattened to their IDs. Use this to build
    /// an update.
    pub fn options(&self) -> ServiceAccountOptions {
        ServiceAccountOptions {
            id: self.id.clone(),
            active: self.active,
            tokens: Vec::new(),
            description: self.description.clone(),
            permissions: self.permissions.clone(),
            roles: self.role_ids(),
            user_groups: self.user_group_ids(),
            ingestion_policy_id: self.ingestion_policy_id(),
        }
    }
}

/// Options for creating or updating a [`ServiceAccount`]. Roles, groups
/// and the ingestion policy are referenced by ID here.
///
/// `tokens` must always be present and empty on the wire; the service
/// rejects requests where the field is missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceAccountOptions {
    /// Required. Account identifier.
    #[serde(rename = "identifier")]
    pub id: String,

    /// Required. Whether the account may authenticate.
    pub active: bool,

    /// Leave empty; token issuance goes through [`Token`](crate::models::Token).
    pub tokens: Vec<String>,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(rename = "groups", skip_serializing_if = "Vec::is_empty")]
    pub permissions: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub user_groups: Vec<String>,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub ingestion_policy_id: String,
}

impl ServiceAccountOptions {
    fn conformed(&self) -> ServiceAccountOptions {
        let mut copy = self.clone();
        copy.tokens = Vec::new();
        copy
    }
}

#[async_trait]
impl Get for ServiceAccount {
    async fn get(client: &dyn ApiTransport, id: &str) -> Result<Self> {
        if id.is_empty() {
            return Err(VantageError::InvalidInput(
                "service account id must be specified".to_string(),
            ));
        }
        RestCall::get(format!("{SERVICE_ACCOUNT_PATH}/{id}"))
            .fetch(client)
            .await
    }
}

#[async_trait]
impl Create for ServiceAccount {
    type Draft = ServiceAccountOptions;

    async fn create(
        client: &dyn ApiTransport,
        draft: &ServiceAccountOptions,
    ) -> Result<Self> {
        if draft.id.is_empty() {
            return Err(VantageError::InvalidInput(
                "service account identifier must be specified".to_string(),
            ));
        }
        RestCall::post(SERVICE_ACCOUNT_PATH)
            .payload(&draft.conformed())?
            .fetch(client)
            .await
    }
}

#[async_trait]
impl Update for ServiceAccount {
    async fn update(client: &dyn ApiTransport, entity: &Self) -> Result<Self> {
        let options = entity.options();
        if options.id.is_empty() {
            return Err(VantageError::InvalidInput(
                "service account identifier must be specified".to_string(),
            ));
        }
        RestCall::put(format!("{SERVICE_ACCOUNT_PATH}/{}", options.id))
            .payload(&options.conformed())?
            .fetch(client)
            .await
    }
}

#[async_trait]
impl Delete for ServiceAccount {
    // Deletion goes through the generic account endpoint, not the
    // serviceaccount one.
    async fn delete(client: &dyn ApiTransport, id: &str) -> Result<()> {
        if id.is_empty() {
            return Err(VantageError::InvalidInput(
                "service account id must be specified".to_string(),
            ));
        }
        RestCall::delete(format!("account/{id}")).send(client).await
    }
}

impl Find for ServiceAccount {
    const SEARCH_TYPE: &'static str = "serviceaccount";
}
