//! Get trait for fetching single entities.

use async_trait::async_trait;

use crate::client::ApiTransport;
use crate::error::Result;

/// Fetch a single entity by ID.
///
/// # Example
///
/// ```ignore
/// use vantageapi::{Alert, Get, VantageClient};
///
/// let client = VantageClient::from_env()?;
/// let alert = Alert::get(&client, "1572902922829").await?;
/// ```
#[async_trait]
pub trait Get: Sized {
    /// Fetch the entity with the given ID.
    ///
    /// # Errors
    ///
    /// Fails with an error whose [`crate::VantageError::is_not_found`] is
    /// true if no such entity exists.
    async fn get(client: &dyn ApiTransport, id: &str) -> Result<Self>;
}
