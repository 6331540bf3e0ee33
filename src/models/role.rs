//! Role model and trait implementations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::client::ApiTransport;
use crate::error::{Result, VantageError};
use crate::models::UserGroup;
use crate::rest::RestCall;
use crate::traits::{Create, Delete, Find, Get, Update};

const ROLE_PATH: &str = "role";

/// A role bundling permissions for assignment to accounts and groups.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Role {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,

    pub name: String,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub permissions: Vec<String>,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub customer: String,

    #[serde(skip_serializing_if = "is_zero")]
    pub created_epoch_millis: u64,

    #[serde(skip_serializing_if = "is_zero")]
    pub last_updated_ms: u64,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub last_updated_account_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_linked_groups: Option<Vec<UserGroup>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_linked_accounts: Option<Vec<String>>,

    #[serde(skip_serializing_if = "is_zero")]
    pub linked_groups_count: u64,

    #[serde(skip_serializing_if = "is_zero")]
    pub linked_accounts_count: u64,
}

fn is_zero(n: &u64) -> bool {
    *n == 0
}

impl Role {
    /// Assign this role to the given accounts or groups.
    pub async fn add_assignees(
        client: &dyn ApiTransport,
        id: &str,
        assignees: &[String],
    ) -> Result<Role> {
        Self::modify_assignees(client, id, assignees, "addAssignees").await
    }

    /// Remove this role from the given accounts or groups.
    pub async fn remove_assignees(
        client: &dyn ApiTransport,
        id: &str,
        assignees: &[String],
    ) -> Result<Role> {
        Self::modify_assignees(client, id, assignees, "removeAssignees").await
    }

    async fn modify_assignees(
        client: &dyn ApiTransport,
        id: &str,
        assignees: &[String],
        op: &str,
    ) -> Result<Role> {
        if id.is_empty() {
            return Err(VantageError::InvalidInput(
                "role id must be specified".to_string(),
            ));
        }
        RestCall::post(format!("{ROLE_PATH}/{id}/{op}"))
            .payload(assignees)?
            .fetch(client)
            .await
    }

    /// Grant a single permission to every role in `role_ids`.
    pub async fn grant_permission(
        client: &dyn ApiTransport,
        permission: &str,
        role_ids: &[String],
    ) -> Result<()> {
        Self::modify_permission(client, "grant", permission, role_ids).await
    }

    /// Revoke a single permission from every role in `role_ids`.
    pub async fn revoke_permission(
        client: &dyn ApiTransport,
        permission: &str,
        role_ids: &[String],
    ) -> Result<()> {
        Self::modify_permission(client, "revoke", permission, role_ids).await
    }

    async fn modify_permission(
        client: &dyn ApiTransport,
        op: &str,
        permission: &str,
        role_ids: &[String],
    ) -> Result<()> {
        if role_ids.is_empty() {
            return Err(VantageError::InvalidInput(
                "must specify at least one role to modify".to_string(),
            ));
        }
        if role_ids.iter().any(|id| id.is_empty()) {
            return Err(VantageError::InvalidInput(
                "role id must be specified".to_string(),
            ));
        }
        RestCall::post(format!("{ROLE_PATH}/{op}/{permission}"))
            .payload(role_ids)?
            .send(client)
            .await
    }
}

#[async_trait]
impl Get for Role {
    async fn get(client: &dyn ApiTransport, id: &str) -> Result<Self> {
        if id.is_empty() {
            return Err(VantageError::InvalidInput(
                "role id must be specified".to_string(),
            ));
        }
        RestCall::get(format!("{ROLE_PATH}/{id}")).fetch(client).await
    }
}

#[async_trait]
impl Create for Role {
    type Draft = Role;

    async fn create(client: &dyn ApiTransport, draft: &Role) -> Result<Self> {
        if draft.name.is_empty() {
            return Err(VantageError::InvalidInput(
                "name must be specified while creating a role".to_string(),
            ));
        }
        RestCall::post(ROLE_PATH).payload(draft)?.fetch(client).await
    }
}

#[async_trait]
impl Update for Role {
    async fn update(client: &dyn ApiTransport, entity: &Self) -> Result<Self> {
        if entity.id.is_empty() {
            return Err(VantageError::InvalidInput(
                "role id must be specified".to_string(),
            ));
        }
        RestCall::put(format!("{ROLE_PATH}/{}", entity.id))
            .payload(entity)?
            .fetch(client)
            .await
    }
}

#[async_trait]
impl Delete for Role {
    async fn delete(client: &dyn ApiTransport, id: &str) -> Result<()> {
        if id.is_empty() {
            return Err(VantageError::InvalidInput(
                "role id must be specified".to_string(),
            ));
        }
        RestCall::delete(format!("{ROLE_PATH}/{id}")).send(client).await
    }
}

impl Find for Role {
    const SEARCH_TYPE: &'static str = "role";
}
