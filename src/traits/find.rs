//! Find trait for searching collections of entities.

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::client::ApiTransport;
use crate::error::Result;
use crate::search::{Search, SearchCondition};

/// Search for entities through the generic search API.
///
/// The default methods drive [`Search`] to exhaustion, fetching pages until
/// the server reports no more items. Implementors only declare their search
/// type name.
///
/// # Example
///
/// ```ignore
/// use vantageapi::{Alert, Find, SearchCondition, VantageClient};
///
/// let client = VantageClient::from_env()?;
///
/// // All alerts
/// let all = Alert::find(&client, &[]).await?;
///
/// // Only snoozed ones
/// let snoozed = Alert::find(
///     &client,
///     &[SearchCondition::exact("status", "SNOOZED")],
/// ).await?;
/// ```
#[async_trait]
pub trait Find: DeserializeOwned + Send + Sized {
    /// The entity type name used on the search endpoint
    /// (`search/{SEARCH_TYPE}`).
    const SEARCH_TYPE: &'static str;

    /// Return all entities matching the given conditions, across all pages.
    /// An empty filter matches everything.
    async fn find(client: &dyn ApiTransport, filter: &[SearchCondition]) -> Result<Vec<Self>> {
        Search::new(Self::SEARCH_TYPE)
            .conditions(filter)
            .find_all(client)
            .await
    }

    /// Like [`Find::find`], but searches the trash
    /// (`search/{SEARCH_TYPE}/deleted`).
    async fn find_deleted(
        client: &dyn ApiTransport,
        filter: &[SearchCondition],
    ) -> Result<Vec<Self>> {
        Search::new(Self::SEARCH_TYPE)
            .conditions(filter)
            .deleted(true)
            .find_all(client)
            .await
    }
}
