//! Create trait for registering new entities.

use async_trait::async_trait;

use crate::client::ApiTransport;
use crate::error::Result;

/// Create a new entity from a draft value.
///
/// For most entities the draft is the entity type itself with the id left
/// unset; some use a dedicated options struct (e.g. maintenance windows).
/// Required-field validation happens before any request is built, so a
/// rejected draft never reaches the network.
#[async_trait]
pub trait Create: Sized {
    /// The value describing what to create.
    type Draft: Send + Sync + ?Sized;

    /// Create the entity and return it as the server stored it, with the
    /// server-assigned id populated.
    async fn create(client: &dyn ApiTransport, draft: &Self::Draft) -> Result<Self>;
}
