//! Service account API token model and operations.

use serde::{Deserialize, Serialize};

use crate::client::ApiTransport;
use crate::error::{Result, VantageError};
use crate::rest::RestCall;

const TOKEN_PATH: &str = "apitoken/serviceaccount";

/// An API token issued to a service account.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Token {
    #[serde(rename = "tokenID", skip_serializing_if = "String::is_empty")]
    pub id: String,

    #[serde(rename = "tokenName", skip_serializing_if = "String::is_empty")]
    pub name: String,
}

impl Token {
    /// Issues a new token named `name` for the given service account.
    /// The service responds with the full token list for the account,
    /// including the new one.
    pub async fn create(
        client: &dyn ApiTransport,
        service_account_id: &str,
        name: &str,
    ) -> Result<Vec<Token>> {
        if service_account_id.is_empty() {
            return Err(VantageError::InvalidInput(
                "service account id must be specified".to_string(),
            ));
        }
        let draft = Token {
            id: String::new(),
            name: name.to_string(),
        };
        RestCall::post(format!("{TOKEN_PATH}/{service_account_id}"))
            .payload(&draft)?
            .fetch(client)
            .await
    }

    /// Renames this token and returns the updated token.
    pub async fn update(
        &self,
        client: &dyn ApiTransport,
        service_account_id: &str,
    ) -> Result<Token> {
        if service_account_id.is_empty() || self.id.is_empty() {
            return Err(VantageError::InvalidInput(
                "service account id and token id must be specified".to_string(),
            ));
        }
        RestCall::put(format!("{TOKEN_PATH}/{service_account_id}/{}", self.id))
            .payload(self)?
            .fetch(client)
            .await
    }

    /// Revokes the token with `token_id` on the given service account.
    pub async fn delete(
        client: &dyn ApiTransport,
        service_account_id: &str,
        token_id: &str,
    ) -> Result<()> {
        if service_account_id.is_empty() || token_id.is_empty() {
            return Err(VantageError::InvalidInput(
                "service account id and token id must be specified".to_string(),
            ));
        }
        RestCall::delete(format!("{TOKEN_PATH}/{service_account_id}/{token_id}"))
            .send(client)
            .await
    }
}
