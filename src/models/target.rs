//! Notification target model and trait implementations.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::client::ApiTransport;
use crate::error::{Result, VantageError};
use crate::rest::RestCall;
use crate::traits::{Create, Delete, Find, Get, Update};

const TARGET_PATH: &str = "notificant";

/// A notification target for routing alert notifications.
///
/// Targets can be email, webhook, or PagerDuty targets; `method` selects
/// which, and the method-specific fields apply accordingly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Target {
    /// Description of the target.
    pub description: String,

    /// Server-assigned ID of an existing target.
    pub id: Option<String>,

    /// Mustache template for the notification body.
    pub template: String,

    /// Title (name) of the target.
    pub title: String,

    /// EMAIL, WEBHOOK or PAGERDUTY.
    pub method: String,

    /// Routing rules this target notifies.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub routes: Vec<AlertRoute>,

    /// Comma-separated email addresses, a webhook URL, or a PagerDuty key.
    pub recipient: String,

    /// Subject for EMAIL targets.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub email_subject: String,

    /// Adds HTML boilerplate when mailing HTML templates. EMAIL targets only.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_html_content: bool,

    /// Content type for WEBHOOK posts, e.g. `application/json`.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub content_type: String,

    /// Custom HTTP headers sent with WEBHOOK posts.
    #[serde(
        rename = "customHttpHeaders",
        skip_serializing_if = "HashMap::is_empty"
    )]
    pub custom_headers: HashMap<String, String>,

    /// Alert states that trigger this notification, e.g. ALERT_OPENED.
    pub triggers: Vec<String>,
}

/// A single routing rule on a [`Target`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AlertRoute {
    /// EMAIL, PAGERDUTY or WEBHOOK.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub method: String,

    /// The endpoint for this route.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub target: String,

    /// Space-delimited `tag=value` filter, e.g. `env prod`.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub filter: String,
}

#[async_trait]
impl Get for Target {
    async fn get(client: &dyn ApiTransport, id: &str) -> Result<Self> {
        if id.is_empty() {
            return Err(VantageError::InvalidInput(
                "target id must be specified".to_string(),
            ));
        }
        RestCall::get(format!("{TARGET_PATH}/{id}")).fetch(client).await
    }
}

#[async_trait]
impl Create for Target {
    type Draft = Target;

    async fn create(client: &dyn ApiTransport, draft: &Target) -> Result<Self> {
        if draft.title.is_empty() || draft.method.is_empty() {
            return Err(VantageError::InvalidInput(
                "target title and method must be specified".to_string(),
            ));
        }
        RestCall::post(TARGET_PATH).payload(draft)?.fetch(client).await
    }
}

#[async_trait]
impl Update for Target {
    async fn update(client: &dyn ApiTransport, entity: &Self) -> Result<Self> {
        let id = entity
            .id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                VantageError::InvalidInput("target id field is not set".to_string())
            })?;
        RestCall::put(format!("{TARGET_PATH}/{id}"))
            .payload(entity)?
            .fetch(client)
            .await
    }
}

#[async_trait]
impl Delete for Target {
    async fn delete(client: &dyn ApiTransport, id: &str) -> Result<()> {
        if id.is_empty() {
            return Err(VantageError::InvalidInput(
                "target id must be specified".to_string(),
            ));
        }
        RestCall::delete(format!("{TARGET_PATH}/{id}")).send(client).await
    }
}

impl Find for Target {
    const SEARCH_TYPE: &'static str = "notificant";
}
