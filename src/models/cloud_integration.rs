//! Cloud integration model and trait implementations.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::client::ApiTransport;
use crate::error::{Result, VantageError};
use crate::models::Event;
use crate::rest::RestCall;
use crate::traits::{Create, Delete, Find, Get, Update};

const CLOUD_INTEGRATION_PATH: &str = "cloudintegration";

/// A configured ingestion source pulling metrics from an external cloud
/// service. Exactly one of the per-service configuration fields is set,
/// matching the `service` discriminator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CloudIntegration {
    /// Server-assigned ID of an existing integration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Human-readable name of the integration.
    pub name: String,

    /// Which cloud service this integration pulls from, e.g. `CLOUDWATCH`.
    pub service: String,

    /// Save even if the service reports validation problems.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub force_save: bool,

    /// Whether the integration sits in the trash.
    #[serde(skip_serializing)]
    pub in_trash: bool,

    /// Creator of the integration.
    #[serde(skip_serializing)]
    pub creator_id: String,

    /// Last updater of the integration.
    #[serde(skip_serializing)]
    pub updater_id: String,

    /// Point tags added to every point ingested through this integration.
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub additional_tags: HashMap<String, String>,

    /// Refresh rate in minutes.
    #[serde(skip_serializing_if = "is_zero")]
    pub service_refresh_rate_in_mins: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloud_watch: Option<CloudWatchConfiguration>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloud_trail: Option<CloudTrailConfiguration>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ec2: Option<Ec2Configuration>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub gcp: Option<GcpConfiguration>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub gcp_billing: Option<GcpBillingConfiguration>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_relic: Option<NewRelicConfiguration>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_dynamics: Option<AppDynamicsConfiguration>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub azure: Option<AzureConfiguration>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub azure_activity_log: Option<AzureActivityLogConfiguration>,

    /// True when the service's credentials failed to authenticate.
    #[serde(skip_serializing)]
    pub disabled: bool,

    /// Error event from the last failed collection run, if any.
    #[serde(skip_serializing)]
    pub last_error_event: Option<Event>,

    #[serde(skip_serializing)]
    pub last_error_ms: i64,

    /// Time the integration last received a data point, epoch millis.
    #[serde(skip_serializing)]
    pub last_received_data_point_ms: i64,

    /// Points ingested on the last collection run.
    #[serde(skip_serializing)]
    pub last_metric_count: i64,

    #[serde(skip_serializing)]
    pub last_processor_id: String,

    #[serde(skip_serializing)]
    pub last_processing_timestamp: i64,

    #[serde(skip_serializing)]
    pub created_epoch_millis: i64,

    #[serde(skip_serializing)]
    pub updated_epoch_millis: i64,

    #[serde(skip_serializing)]
    pub deleted: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CloudWatchConfiguration {
    /// Only metric names matching this regex (case-insensitively) are
    /// ingested.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub metric_filter_regex: String,

    /// Namespaces to query.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub namespaces: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_credentials: Option<AwsBaseCredentials>,

    /// Instances whose tags match any of these pairs are ingested.
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub instance_selection_tags: HashMap<String, String>,

    /// Volumes whose tags match any of these pairs are ingested.
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub volume_selection_tags: HashMap<String, String>,

    /// Only tag keys matching this regex are carried as point tags.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub point_tag_filter_regex: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CloudTrailConfiguration {
    /// Region of the bucket holding the trail logs.
    pub region: String,

    /// Name of the bucket holding the trail logs.
    pub bucket_name: String,

    /// Common prefix, if any, on the log files.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub prefix: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_credentials: Option<AwsBaseCredentials>,

    /// Rule filtering which log events become system events.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub filter_rule: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Ec2Configuration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_credentials: Option<AwsBaseCredentials>,

    /// Instance tags tried in order as the `source` of a series; falls back
    /// to the instance id when none is present.
    pub host_name_tags: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GcpConfiguration {
    /// The GCP project id.
    pub project_id: String,

    /// Service-account key in GCP's JSON format. Must grant at least
    /// Monitoring Viewer.
    pub gcp_json_key: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub metric_filter_regex: String,

    /// GCP services to pull metrics from.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub categories_to_fetch: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GcpBillingConfiguration {
    /// The GCP project id.
    pub project_id: String,

    /// GCP API key.
    pub gcp_api_key: String,

    /// Service-account key in GCP's JSON format.
    pub gcp_json_key: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewRelicConfiguration {
    /// New Relic REST API key.
    pub api_key: String,

    /// Only applications matching this regex are collected.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub app_filter_regex: String,

    /// Only hosts matching this regex are collected.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub host_filter_regex: String,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub new_relic_metric_filters: Vec<NewRelicMetricFilter>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewRelicMetricFilter {
    pub app_name: String,
    pub metric_filter_regex: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppDynamicsConfiguration {
    /// Combination of user name and account name.
    pub user_name: String,

    /// Name of the SaaS controller.
    pub controller_name: String,

    pub encrypted_password: String,

    /// Only applications matching these regexes are ingested.
    pub app_filter_regex: Vec<String>,

    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub enable_rollup: bool,

    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub enable_error_metrics: bool,

    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub enable_business_trx_metrics: bool,

    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub enable_backend_metrics: bool,

    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub enable_overall_perf_metrics: bool,

    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub enable_individual_node_metrics: bool,

    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub enable_app_infra_metrics: bool,

    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub enable_service_endpoint_metrics: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AzureConfiguration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_credentials: Option<AzureBaseCredentials>,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub metric_filter_regex: String,

    /// Azure services to pull metrics from.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub category_filter: Vec<String>,

    /// Resource groups to pull metrics from.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub resource_group_filter: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AzureActivityLogConfiguration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_credentials: Option<AzureBaseCredentials>,

    /// Activity log categories to pull events for.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub category_filter: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AwsBaseCredentials {
    /// Role ARN granting read access to the account.
    pub role_arn: String,

    /// External id corresponding to the role ARN.
    pub external_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AzureBaseCredentials {
    pub client_id: String,

    /// Client secret. Pass `saved_secret` to keep the stored one on update.
    pub client_secret: String,

    pub tenant: String,
}

impl CloudIntegration {
    /// Delete the integration, optionally bypassing the trash so it cannot
    /// be restored.
    pub async fn delete_with_options(
        client: &dyn ApiTransport,
        id: &str,
        skip_trash: bool,
    ) -> Result<()> {
        if id.is_empty() {
            return Err(VantageError::InvalidInput(
                "cloud integration id must be specified".to_string(),
            ));
        }
        RestCall::delete(format!("{CLOUD_INTEGRATION_PATH}/{id}"))
            .param("skipTrash", skip_trash.to_string())
            .send(client)
            .await
    }

    /// Create an AWS external id for use in IAM role trust policies.
    pub async fn create_aws_external_id(client: &dyn ApiTransport) -> Result<String> {
        RestCall::post(format!("{CLOUD_INTEGRATION_PATH}/awsExternalId"))
            .fetch(client)
            .await
    }

    /// Delete a previously created AWS external id.
    pub async fn delete_aws_external_id(client: &dyn ApiTransport, external_id: &str) -> Result<()> {
        RestCall::delete(format!("{CLOUD_INTEGRATION_PATH}/awsExternalId/{external_id}"))
            .send(client)
            .await
    }

    /// Check that an AWS external id is known to the service.
    pub async fn verify_aws_external_id(client: &dyn ApiTransport, external_id: &str) -> Result<()> {
        RestCall::get(format!("{CLOUD_INTEGRATION_PATH}/awsExternalId/{external_id}"))
            .send(client)
            .await
    }
}

#[async_trait]
impl Get for CloudIntegration {
    async fn get(client: &dyn ApiTransport, id: &str) -> Result<Self> {
        if id.is_empty() {
            return Err(VantageError::InvalidInput(
                "cloud integration id must be specified".to_string(),
            ));
        }
        RestCall::get(format!("{CLOUD_INTEGRATION_PATH}/{id}"))
            .fetch(client)
            .await
    }
}

#[async_trait]
impl Create for CloudIntegration {
    type Draft = CloudIntegration;

    async fn create(client: &dyn ApiTransport, draft: &CloudIntegration) -> Result<Self> {
        if draft.name.is_empty() || draft.service.is_empty() {
            return Err(VantageError::InvalidInput(
                "cloud integration name and service must be specified".to_string(),
            ));
        }
        RestCall::post(CLOUD_INTEGRATION_PATH)
            .payload(draft)?
            .fetch(client)
            .await
    }
}

#[async_trait]
impl Update for CloudIntegration {
    async fn update(client: &dyn ApiTransport, entity: &Self) -> Result<Self> {
        let id = entity
            .id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                VantageError::InvalidInput("cloud integration id field is not set".to_string())
            })?;
        RestCall::put(format!("{CLOUD_INTEGRATION_PATH}/{id}"))
            .payload(entity)?
            .fetch(client)
            .await
    }
}

#[async_trait]
impl Delete for CloudIntegration {
    async fn delete(client: &dyn ApiTransport, id: &str) -> Result<()> {
        Self::delete_with_options(client, id, false).await
    }
}

impl Find for CloudIntegration {
    const SEARCH_TYPE: &'static str = "cloudintegration";
}

fn is_zero(v: &u32) -> bool {
    *v == 0
}
