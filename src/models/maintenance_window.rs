//! Maintenance window model and trait implementations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::client::ApiTransport;
use crate::error::{Result, VantageError};
use crate::rest::RestCall;
use crate::traits::{Create, Delete, Find, Get, Update};

const MAINTENANCE_WINDOW_PATH: &str = "maintenancewindow";

/// A maintenance window suppressing alert notifications for matching
/// sources over a time interval.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MaintenanceWindow {
    /// Server-assigned ID.
    pub id: String,

    /// ONGOING, PENDING or ENDED.
    pub running_state: String,

    pub sort_attr: i32,

    /// Reason for the window.
    pub reason: String,

    pub customer_id: String,

    /// Alert tags the window applies to.
    pub relevant_customer_tags: Vec<String>,

    /// Title of the window.
    pub title: String,

    pub start_time_in_seconds: i64,

    pub end_time_in_seconds: i64,

    /// Source tags the window applies to.
    pub relevant_host_tags: Vec<String>,

    /// Source names the window applies to.
    pub relevant_host_names: Vec<String>,

    pub creator_id: String,

    pub updater_id: String,

    pub created_epoch_millis: i64,

    pub updated_epoch_millis: i64,

    /// Whether sources must match all of `relevant_host_tags` rather
    /// than any.
    pub relevant_host_tags_anded: bool,

    pub host_tag_group_host_names_group_anded: bool,

    pub event_name: String,
}

impl MaintenanceWindow {
    /// Returns the configurable options currently set on this window,
    /// suitable for editing and passing back to [`Update`].
    pub fn options(&self) -> MaintenanceWindowOptions {
        MaintenanceWindowOptions {
            reason: self.reason.clone(),
            title: self.title.clone(),
            start_time_in_seconds: self.start_time_in_seconds,
            end_time_in_seconds: self.end_time_in_seconds,
            relevant_customer_tags: self.relevant_customer_tags.clone(),
            relevant_host_tags: self.relevant_host_tags.clone(),
            relevant_host_names: self.relevant_host_names.clone(),
            relevant_host_tags_anded: self.relevant_host_tags_anded,
            host_tag_group_host_names_group_anded: self.host_tag_group_host_names_group_anded,
        }
    }

    /// Updates the window with `id` according to `options` and returns
    /// the updated window.
    pub async fn update_by_id(
        client: &dyn ApiTransport,
        id: &str,
        options: &MaintenanceWindowOptions,
    ) -> Result<Self> {
        if id.is_empty() {
            return Err(VantageError::InvalidInput(
                "maintenance window id must be specified".to_string(),
            ));
        }
        RestCall::put(format!("{MAINTENANCE_WINDOW_PATH}/{id}"))
            .payload(options)?
            .fetch(client)
            .await
    }
}

/// The configurable subset of a [`MaintenanceWindow`].
///
/// `relevant_customer_tags` is always serialized, even when empty; the
/// service rejects updates where the field is missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MaintenanceWindowOptions {
    /// Required. Reason for the window.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub reason: String,

    /// Required. Title of the window.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,

    /// Required. Start time in epoch seconds.
    #[serde(skip_serializing_if = "is_zero64")]
    pub start_time_in_seconds: i64,

    /// Required. End time in epoch seconds.
    #[serde(skip_serializing_if = "is_zero64")]
    pub end_time_in_seconds: i64,

    pub relevant_customer_tags: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub relevant_host_tags: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub relevant_host_names: Vec<String>,

    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub relevant_host_tags_anded: bool,

    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub host_tag_group_host_names_group_anded: bool,
}

fn is_zero64(v: &i64) -> bool {
    *v == 0
}

#[async_trait]
impl Get for MaintenanceWindow {
    async fn get(client: &dyn ApiTransport, id: &str) -> Result<Self> {
        if id.is_empty() {
            return Err(VantageError::InvalidInput(
                "maintenance window id must be specified".to_string(),
            ));
        }
        RestCall::get(format!("{MAINTENANCE_WINDOW_PATH}/{id}"))
            .fetch(client)
            .await
    }
}

#[async_trait]
impl Create for MaintenanceWindow {
    type Draft = MaintenanceWindowOptions;

    async fn create(
        client: &dyn ApiTransport,
        draft: &MaintenanceWindowOptions,
    ) -> Result<Self> {
        RestCall::post(MAINTENANCE_WINDOW_PATH)
            .payload(draft)?
            .fetch(client)
            .await
    }
}

#[async_trait]
impl Update for MaintenanceWindow {
    async fn update(client: &dyn ApiTransport, entity: &Self) -> Result<Self> {
        Self::update_by_id(client, &entity.id, &entity.options()).await
    }
}

#[async_trait]
impl Delete for MaintenanceWindow {
    async fn delete(client: &dyn ApiTransport, id: &str) -> Result<()> {
        if id.is_empty() {
            return Err(VantageError::InvalidInput(
                "maintenance window id must be specified".to_string(),
            ));
        }
        RestCall::delete(format!("{MAINTENANCE_WINDOW_PATH}/{id}"))
            .send(client)
            .await
    }
}

impl Find for MaintenanceWindow {
    const SEARCH_TYPE: &'static str = "maintenancewindow";
}
