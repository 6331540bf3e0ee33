//! Global metrics policy model and operations.
//!
//! The metrics policy is a singleton per customer domain, so it does not
//! fit the id-keyed operation traits; get and update are inherent methods.

use serde::{Deserialize, Serialize};

use crate::client::ApiTransport;
use crate::error::Result;
use crate::models::Role;
use crate::rest::RestCall;

const METRICS_POLICY_PATH: &str = "metricspolicy";

/// The domain-wide policy restricting which accounts may see which metric
/// prefixes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MetricsPolicy {
    /// Rules evaluated in order; the first matching rule wins.
    pub policy_rules: Vec<PolicyRule>,

    /// The customer domain the policy belongs to.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub customer: String,

    /// Last updater of the policy.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub updater_id: String,

    #[serde(skip_serializing_if = "is_zero")]
    pub updated_epoch_millis: i64,
}

/// One rule of a [`MetricsPolicy`], as read back from the service with
/// accounts and groups expanded.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PolicyRule {
    /// Name of the rule.
    pub name: String,

    /// Description of the rule.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,

    /// Metric prefixes the rule applies to.
    pub prefixes: Vec<String>,

    /// `ALLOW` or `BLOCK`.
    pub access_type: String,

    /// Accounts the rule applies to.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub accounts: Vec<PolicyUser>,

    /// User groups the rule applies to.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub user_groups: Vec<PolicyUserGroup>,

    /// Roles the rule applies to.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<Role>,

    /// Point tags further scoping the rule.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<PolicyTag>,

    /// Whether all tags must match, rather than any.
    pub tags_anded: bool,
}

/// Replacement policy sent on update. Rules reference accounts, groups, and
/// roles by id only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MetricsPolicyUpdate {
    pub policy_rules: Vec<PolicyRuleUpdate>,
}

/// One rule of a [`MetricsPolicyUpdate`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PolicyRuleUpdate {
    pub name: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,

    pub prefixes: Vec<String>,

    pub access_type: String,

    /// Account ids the rule applies to.
    #[serde(rename = "accounts", skip_serializing_if = "Vec::is_empty")]
    pub account_ids: Vec<String>,

    /// User group ids the rule applies to.
    #[serde(rename = "userGroups", skip_serializing_if = "Vec::is_empty")]
    pub user_group_ids: Vec<String>,

    /// Role ids the rule applies to.
    #[serde(rename = "roles", skip_serializing_if = "Vec::is_empty")]
    pub role_ids: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<PolicyTag>,

    pub tags_anded: bool,
}

/// A point tag scoping a policy rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyTag {
    pub key: String,
    pub value: String,
}

/// An account referenced by a policy rule.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PolicyUser {
    pub id: String,
    pub name: String,
}

/// A user group referenced by a policy rule.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PolicyUserGroup {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl MetricsPolicy {
    /// Fetch the current policy.
    pub async fn get(client: &dyn ApiTransport) -> Result<Self> {
        RestCall::get(METRICS_POLICY_PATH).fetch(client).await
    }

    /// Replace the policy's rules wholesale and return the resulting policy.
    pub async fn update(client: &dyn ApiTransport, rules: &MetricsPolicyUpdate) -> Result<Self> {
        RestCall::put(METRICS_POLICY_PATH)
            .payload(rules)?
            .fetch(client)
            .await
    }
}

fn is_zero(v: &i64) -> bool {
    *v == 0
}
