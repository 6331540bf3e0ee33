//! Delete trait for removing entities.

use async_trait::async_trait;

use crate::client::ApiTransport;
use crate::error::Result;

/// Delete an entity by ID.
#[async_trait]
pub trait Delete: Sized {
    /// Delete the entity with the given ID.
    async fn delete(client: &dyn ApiTransport, id: &str) -> Result<()>;
}
