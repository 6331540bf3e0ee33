//! User group model and trait implementations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::client::ApiTransport;
use crate::error::{Result, VantageError};
use crate::rest::RestCall;
use crate::traits::{Create, Delete, Find, Get, Update};

const USER_GROUP_PATH: &str = "usergroup";

/// A group of users sharing a set of permissions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserGroup {
    /// Unique ID for the user group.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Name of the user group.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,

    /// Permissions assigned to the group.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub permissions: Vec<String>,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub customer: String,

    /// Identifiers of the group's members.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub users: Vec<String>,

    /// Total number of members.
    #[serde(skip_serializing_if = "is_zero")]
    pub user_count: u64,

    /// Which properties of the group are editable.
    pub properties: UserGroupProperties,

    /// Description of the group's purpose.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(skip_serializing_if = "is_zero")]
    pub created_epoch_millis: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserGroupProperties {
    pub name_editable: bool,
    pub permissions_editable: bool,
    pub users_editable: bool,
}

fn is_zero(n: &u64) -> bool {
    *n == 0
}

impl UserGroup {
    /// Add the given users to the group.
    pub async fn add_users(
        client: &dyn ApiTransport,
        id: &str,
        users: &[String],
    ) -> Result<()> {
        Self::update_members(client, id, users, "addUsers").await
    }

    /// Remove the given users from the group.
    pub async fn remove_users(
        client: &dyn ApiTransport,
        id: &str,
        users: &[String],
    ) -> Result<()> {
        Self::update_members(client, id, users, "removeUsers").await
    }

    async fn update_members(
        client: &dyn ApiTransport,
        id: &str,
        users: &[String],
        op: &str,
    ) -> Result<()> {
        if id.is_empty() {
            return Err(VantageError::InvalidInput(
                "usergroup id must be specified".to_string(),
            ));
        }
        RestCall::post(format!("{USER_GROUP_PATH}/{id}/{op}"))
            .payload(users)?
            .send(client)
            .await
    }
}

#[async_trait]
impl Get for UserGroup {
    async fn get(client: &dyn ApiTransport, id: &str) -> Result<Self> {
        if id.is_empty() {
            return Err(VantageError::InvalidInput(
                "usergroup id must be specified".to_string(),
            ));
        }
        RestCall::get(format!("{USER_GROUP_PATH}/{id}")).fetch(client).await
    }
}

#[async_trait]
impl Create for UserGroup {
    type Draft = UserGroup;

    async fn create(client: &dyn ApiTransport, draft: &UserGroup) -> Result<Self> {
        if draft.name.is_empty() {
            return Err(VantageError::InvalidInput(
                "name must be specified when creating a usergroup".to_string(),
            ));
        }
        if draft.permissions.is_empty() {
            return Err(VantageError::InvalidInput(
                "permissions must be specified when creating a usergroup".to_string(),
            ));
        }
        RestCall::post(USER_GROUP_PATH)
            .payload(draft)?
            .fetch(client)
            .await
    }
}

#[async_trait]
impl Update for UserGroup {
    /// Does not change the group's members; use [`UserGroup::add_users`]
    /// and [`UserGroup::remove_users`] for that.
    async fn update(client: &dyn ApiTransport, entity: &Self) -> Result<Self> {
        let id = entity
            .id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                VantageError::InvalidInput("usergroup id must be specified".to_string())
            })?;
        RestCall::put(format!("{USER_GROUP_PATH}/{id}"))
            .payload(entity)?
            .fetch(client)
            .await
    }
}

#[async_trait]
impl Delete for UserGroup {
    async fn delete(client: &dyn ApiTransport, id: &str) -> Result<()> {
        if id.is_empty() {
            return Err(VantageError::InvalidInput(
                "usergroup id must be specified".to_string(),
            ));
        }
        RestCall::delete(format!("{USER_GROUP_PATH}/{id}")).send(client).await
    }
}

impl Find for UserGroup {
    const SEARCH_TYPE: &'static str = "usergroup";
}
