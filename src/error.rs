//! Error types for Vantage API operations.

use thiserror::Error;

/// Errors that can occur during Vantage API operations.
///
/// The variants map one-to-one onto the failure points of a call: building
/// the request, putting it on the wire, the server rejecting it, or the
/// response not matching the expected shape. Nothing in the engine wraps
/// these further, so callers can match on the variant to decide what to do.
#[derive(Debug, Error)]
pub enum VantageError {
    /// Configuration is missing or incomplete.
    #[error("Vantage configuration required: {0}")]
    ConfigMissing(String),

    /// The request could not be constructed (bad path or header value).
    #[error("failed to build request: {0}")]
    RequestBuild(String),

    /// Network-level failure (DNS, connect, TLS, I/O). Never retried by the
    /// client itself.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Socket-level failure while writing metrics.
    #[error("metric write failed: {0}")]
    Io(#[from] std::io::Error),

    /// The server returned a non-success status. The response body is
    /// preserved verbatim in `message` for diagnostics.
    #[error("server returned {status}: {message}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Response body text, verbatim.
        message: String,
    },

    /// The request payload could not be serialized to JSON.
    #[error("failed to serialize payload: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The response body did not match the expected shape. Carries an
    /// excerpt of the body to make schema mismatches debuggable.
    #[error("failed to decode response: {source} (body: {excerpt})")]
    Decode {
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
        /// A bounded excerpt of the offending body.
        excerpt: String,
    },

    /// A required field was not set on an entity operation. Raised before
    /// any request is built.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl VantageError {
    /// The HTTP status code carried by this error, if any.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            VantageError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if this error is a server-side 404, i.e. the resource
    /// does not exist.
    pub fn is_not_found(&self) -> bool {
        self.http_status() == Some(404)
    }
}

/// Result type alias for Vantage operations.
pub type Result<T> = core::result::Result<T, VantageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_predicate() {
        let err = VantageError::Server {
            status: 404,
            message: "no such alert".to_string(),
        };
        assert!(err.is_not_found());
        assert_eq!(err.http_status(), Some(404));

        let err = VantageError::Server {
            status: 500,
            message: "boom".to_string(),
        };
        assert!(!err.is_not_found());

        let err = VantageError::InvalidInput("id must be specified".to_string());
        assert!(!err.is_not_found());
        assert_eq!(err.http_status(), None);
    }

    #[test]
    fn test_server_error_preserves_body() {
        let err = VantageError::Server {
            status: 400,
            message: "{\"error\":\"bad condition\"}".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("400"));
        assert!(text.contains("bad condition"));
    }
}
