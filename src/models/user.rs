//! User model and trait implementations.

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::client::ApiTransport;
use crate::error::{Result, VantageError};
use crate::models::UserGroup;
use crate::rest::RestCall;
use crate::traits::{Delete, Find, Get, Update};

const USER_PATH: &str = "user";

// Permission names grantable to users and service accounts.
pub const AGENT_MANAGEMENT: &str = "agent_management";
pub const ALERTS_MANAGEMENT: &str = "alerts_management";
pub const BATCH_QUERY_PRIORITY: &str = "batch_query_priority";
pub const DASHBOARD_MANAGEMENT: &str = "dashboard_management";
pub const DERIVED_METRICS_MANAGEMENT: &str = "derived_metrics_management";
pub const DIRECT_INGESTION: &str = "ingestion";
pub const EMBEDDED_CHARTS_MANAGEMENT: &str = "embedded_charts";
pub const EVENTS_MANAGEMENT: &str = "events_management";
pub const EXTERNAL_LINKS_MANAGEMENT: &str = "external_links_management";
pub const HOST_TAG_MANAGEMENT: &str = "host_tag_management";
pub const INTEGRATIONS_MANAGEMENT: &str = "application_management";
pub const METRICS_MANAGEMENT: &str = "metrics_management";
pub const USER_MANAGEMENT: &str = "user_management";

/// Payload for creating a new user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewUserRequest {
    /// Only a new user is addressed by `emailAddress`; thereafter the email
    /// is the user's `identifier`.
    #[serde(rename = "emailAddress")]
    pub email_address: String,

    /// Permissions granted to this user.
    #[serde(rename = "groups", default, skip_serializing_if = "Vec::is_empty")]
    pub permissions: Vec<String>,

    /// Groups this user belongs to.
    #[serde(rename = "userGroups", default, skip_serializing_if = "UserGroupList::is_empty")]
    pub groups: UserGroupList,
}

/// A Vantage user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct User {
    /// The email identifier for the user.
    #[serde(rename = "identifier")]
    pub id: Option<String>,

    /// The customer the user is a member of.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub customer: String,

    /// Last successful login, epoch millis.
    #[serde(rename = "lastSuccessfulLogin", default)]
    pub last_successful_login: u64,

    /// Permissions granted to this user.
    #[serde(rename = "groups", default, skip_serializing_if = "Vec::is_empty")]
    pub permissions: Vec<String>,

    /// Groups this user belongs to.
    #[serde(rename = "userGroups", default, skip_serializing_if = "UserGroupList::is_empty")]
    pub groups: UserGroupList,

    /// Set during an update to change the user's password.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub credential: String,
}

/// User-group memberships as the user endpoints exchange them.
///
/// The API sends full group objects back (or bare id strings from the search
/// endpoint) but only accepts id strings, so this wrapper deserializes
/// either shape and serializes ids only.
#[derive(Debug, Clone, Default)]
pub struct UserGroupList(pub Vec<UserGroup>);

impl UserGroupList {
    /// True if no group memberships are held.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The ids of the held groups, skipping any without one.
    pub fn ids(&self) -> Vec<&str> {
        self.0
            .iter()
            .filter_map(|group| group.id.as_deref())
            .filter(|id| !id.is_empty())
            .collect()
    }
}

impl Serialize for UserGroupList {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        self.ids().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for UserGroupList {
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> core::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Ids(Vec<String>),
            Full(Vec<UserGroup>),
        }

        let groups = match Wire::deserialize(deserializer)? {
            Wire::Ids(ids) => ids
                .into_iter()
                .map(|id| UserGroup {
                    id: Some(id),
                    ..Default::default()
                })
                .collect(),
            Wire::Full(groups) => groups,
        };
        Ok(UserGroupList(groups))
    }
}

impl User {
    /// Create a new user. Does not support setting a credential.
    ///
    /// `send_email` controls whether the platform mails the new user an
    /// activation link; it travels as a query parameter, not in the body.
    /// If successful the returned user carries the server-assigned
    /// identifier.
    pub async fn create(
        client: &dyn ApiTransport,
        new_user: &NewUserRequest,
        send_email: bool,
    ) -> Result<User> {
        if new_user.email_address.is_empty() {
            return Err(VantageError::InvalidInput(
                "a valid email address must be specified".to_string(),
            ));
        }
        RestCall::post(USER_PATH)
            .param("sendEmail", send_email.to_string())
            .payload(new_user)?
            .fetch(client)
            .await
    }

    /// Delete this user and clear its identifier so a second delete is not
    /// attempted with a stale id.
    pub async fn delete_and_clear(&mut self, client: &dyn ApiTransport) -> Result<()> {
        let id = self
            .id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                VantageError::InvalidInput("user id field is not set".to_string())
            })?;
        RestCall::delete(format!("{USER_PATH}/{id}")).send(client).await?;
        self.id = Some(String::new());
        Ok(())
    }
}

#[async_trait]
impl Get for User {
    /// The user endpoint returns the user directly, not under the usual
    /// `response` envelope.
    async fn get(client: &dyn ApiTransport, id: &str) -> Result<Self> {
        if id.is_empty() {
            return Err(VantageError::InvalidInput(
                "user id must be specified".to_string(),
            ));
        }
        RestCall::get(format!("{USER_PATH}/{id}"))
            .direct()
            .fetch(client)
            .await
    }
}

#[async_trait]
impl Update for User {
    /// Supports changing the credential. The identifier field must be set.
    async fn update(client: &dyn ApiTransport, entity: &Self) -> Result<Self> {
        let id = entity
            .id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                VantageError::InvalidInput("user id field is not set".to_string())
            })?;
        RestCall::put(format!("{USER_PATH}/{id}"))
            .payload(entity)?
            .fetch(client)
            .await
    }
}

#[async_trait]
impl Delete for User {
    async fn delete(client: &dyn ApiTransport, id: &str) -> Result<()> {
        if id.is_empty() {
            return Err(VantageError::InvalidInput(
                "user id must be specified".to_string(),
            ));
        }
        RestCall::delete(format!("{USER_PATH}/{id}")).send(client).await
    }
}

impl Find for User {
    /// Groups returned on users from a search are id-only.
    const SEARCH_TYPE: &'static str = "user";
}
