//! External link model and trait implementations.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::client::ApiTransport;
use crate::error::{Result, VantageError};
use crate::rest::RestCall;
use crate::traits::{Create, Delete, Find, Get, Update};

const EXTERNAL_LINK_PATH: &str = "extlink";

/// An external link bound to chart points, used to jump out to other
/// systems with point metadata filled into a URL template.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExternalLink {
    /// Server-assigned ID of an existing link.
    pub id: Option<String>,

    /// Name of the link.
    pub name: String,

    /// Human readable description.
    pub description: String,

    /// Creator of the link.
    #[serde(skip_serializing)]
    pub creator_id: String,

    /// Last updater of the link.
    #[serde(skip_serializing)]
    pub updater_id: String,

    #[serde(skip_serializing)]
    pub created_epoch_millis: i64,

    #[serde(skip_serializing)]
    pub updated_epoch_millis: i64,

    /// Mustache URL template, e.g. `https://example.com/{{source}}`.
    pub template: String,

    /// Link applies only to metrics matching this regex.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub metric_filter_regex: String,

    /// Link applies only to sources matching this regex.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub source_filter_regex: String,

    /// Link applies only to points whose tag values match these regexes,
    /// keyed by point tag name.
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub point_tag_filter_regexes: HashMap<String, String>,
}

#[async_trait]
impl Get for ExternalLink {
    async fn get(client: &dyn ApiTransport, id: &str) -> Result<Self> {
        if id.is_empty() {
            return Err(VantageError::InvalidInput(
                "external link id must be specified".to_string(),
            ));
        }
        RestCall::get(format!("{EXTERNAL_LINK_PATH}/{id}"))
            .fetch(client)
            .await
    }
}

#[async_trait]
impl Create for ExternalLink {
    type Draft = ExternalLink;

    async fn create(client: &dyn ApiTransport, draft: &ExternalLink) -> Result<Self> {
        if draft.name.is_empty() || draft.description.is_empty() || draft.template.is_empty() {
            return Err(VantageError::InvalidInput(
                "external link name, description and template must be specified".to_string(),
            ));
        }
        RestCall::post(EXTERNAL_LINK_PATH)
            .payload(draft)?
            .fetch(client)
            .await
    }
}

#[async_trait]
impl Update for ExternalLink {
    // The service accepts link updates as POST to the item path, not PUT.
    async fn update(client: &dyn ApiTransport, entity: &Self) -> Result<Self> {
        let id = entity
            .id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                VantageError::InvalidInput("external link id field is not set".to_string())
            })?;
        RestCall::post(format!("{EXTERNAL_LINK_PATH}/{id}"))
            .payload(entity)?
            .fetch(client)
            .await
    }
}

#[async_trait]
impl Delete for ExternalLink {
    async fn delete(client: &dyn ApiTransport, id: &str) -> Result<()> {
        if id.is_empty() {
            return Err(VantageError::InvalidInput(
                "external link id must be specified".to_string(),
            ));
        }
        RestCall::delete(format!("{EXTERNAL_LINK_PATH}/{id}"))
            .send(client)
            .await
    }
}

impl Find for ExternalLink {
    const SEARCH_TYPE: &'static str = "extlink";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_only_fields_skipped_on_serialize() {
        let link = ExternalLink {
            id: Some("abc".to_string()),
            name: "jump".to_string(),
            description: "to logs".to_string(),
            creator_id: "someone@example.com".to_string(),
            created_epoch_millis: 17,
            template: "https://example.com/{{source}}".to_string(),
            ..Default::default()
        };
        let value = serde_json::to_value(&link).unwrap();
        assert!(value.get("creatorId").is_none());
        assert!(value.get("createdEpochMillis").is_none());
        assert_eq!(value["template"], "https://example.com/{{source}}");
    }
}
