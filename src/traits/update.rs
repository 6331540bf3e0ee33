//! Update trait for modifying entities.

use async_trait::async_trait;

use crate::client::ApiTransport;
use crate::error::Result;

/// Update an existing entity in place on the server.
///
/// The entity's id field must be set; implementations reject an unset id
/// before building a request.
#[async_trait]
pub trait Update: Sized {
    /// Send the entity's current state and return the server's view of the
    /// updated entity.
    async fn update(client: &dyn ApiTransport, entity: &Self) -> Result<Self>;
}
