//! Generic REST call execution.
//!
//! Every entity operation in this crate is a one-line composition over
//! [`RestCall`]: declare the method and path, attach an optional payload and
//! query parameters, pick the decode mode, and execute. The request/response
//! plumbing (header handling, retry, envelope unwrapping) lives here and in
//! [`crate::client`], once.

use std::collections::BTreeMap;

use bytes::Bytes;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::client::ApiTransport;
use crate::error::{Result, VantageError};

/// Maximum number of body bytes quoted in a [`VantageError::Decode`].
const EXCERPT_LEN: usize = 240;

/// How the response body relates to the caller's expected type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResponseMode {
    /// The payload sits under a `{"response": ...}` envelope. The default.
    Wrapped,
    /// The body is the payload itself.
    Direct,
}

/// Most API responses nest the interesting payload under a `response` key,
/// with status metadata as siblings. Decoding through this wrapper discards
/// the siblings and yields the payload.
#[derive(Deserialize)]
struct Envelope<T> {
    response: T,
}

/// A single REST call against the Vantage API, configured declaratively.
///
/// # Example
///
/// ```ignore
/// let alert: Alert = RestCall::get(format!("alert/{id}"))
///     .fetch(client)
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct RestCall {
    method: Method,
    path: String,
    params: BTreeMap<String, String>,
    body: Option<Bytes>,
    mode: ResponseMode,
}

impl RestCall {
    /// Start configuring a call with the given method and relative path.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            params: BTreeMap::new(),
            body: None,
            mode: ResponseMode::Wrapped,
        }
    }

    /// A GET call.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// A POST call.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// A PUT call.
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// A DELETE call.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Use `payload`, marshalled to JSON, as the request body.
    ///
    /// Marshalling happens now, so the bytes sent on the wire (and replayed
    /// on retry) are fixed at registration time.
    ///
    /// # Errors
    ///
    /// Returns [`VantageError::Serialization`] if the payload cannot be
    /// marshalled.
    pub fn payload<P: Serialize + ?Sized>(mut self, payload: &P) -> Result<Self> {
        let body = serde_json::to_vec(payload).map_err(VantageError::Serialization)?;
        self.body = Some(Bytes::from(body));
        Ok(self)
    }

    /// Attach query parameters to the call.
    ///
    /// The map is copied at registration time; mutating the caller's map
    /// afterwards does not alter this call.
    #[must_use]
    pub fn query_params(mut self, params: &BTreeMap<String, String>) -> Self {
        self.params.extend(params.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    /// Attach a single query parameter.
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Decode the response directly, without unwrapping the `response`
    /// envelope.
    #[must_use]
    pub fn direct(mut self) -> Self {
        self.mode = ResponseMode::Direct;
        self
    }

    /// Execute the call and discard the response body.
    pub async fn send(self, client: &dyn ApiTransport) -> Result<()> {
        self.execute(client).await?;
        Ok(())
    }

    /// Execute the call and decode the response into a fresh `T`.
    pub async fn fetch<T: DeserializeOwned>(self, client: &dyn ApiTransport) -> Result<T> {
        let mode = self.mode;
        let body = self.execute(client).await?;
        decode_body(&body, mode)
    }

    /// Execute the call and overwrite `dest` with the decoded response.
    ///
    /// `dest` is reset wholesale: the decoded value replaces it by
    /// assignment, so no nested collections from a prior use of the same
    /// destination survive into the result.
    pub async fn fetch_into<T: DeserializeOwned>(
        self,
        client: &dyn ApiTransport,
        dest: &mut T,
    ) -> Result<()> {
        *dest = self.fetch(client).await?;
        Ok(())
    }

    async fn execute(self, client: &dyn ApiTransport) -> Result<Bytes> {
        let RestCall {
            method,
            path,
            params,
            body,
            ..
        } = self;
        let params = if params.is_empty() { None } else { Some(&params) };
        let request = client.build_request(method, &path, params, body)?;
        client.execute(request).await
    }
}

/// Decode a response body into `T`, unwrapping the `response` envelope in
/// wrapped mode. Errors are [`VantageError::Decode`] with a body excerpt;
/// they are contract violations and are never retried.
fn decode_body<T: DeserializeOwned>(body: &[u8], mode: ResponseMode) -> Result<T> {
    let result = match mode {
        ResponseMode::Wrapped => {
            serde_json::from_slice::<Envelope<T>>(body).map(|envelope| envelope.response)
        }
        ResponseMode::Direct => serde_json::from_slice::<T>(body),
    };
    result.map_err(|source| VantageError::Decode {
        source,
        excerpt: excerpt(body),
    })
}

/// The leading bytes of `body` as text, truncated to [`EXCERPT_LEN`] on a
/// char boundary. Used wherever a decode error quotes the offending body.
pub(crate) fn excerpt(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let mut end = text.len().min(EXCERPT_LEN);
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    text[..end].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, Clone, PartialEq, Deserialize)]
    struct Point {
        x: i64,
        y: i64,
    }

    #[test]
    fn test_wrapped_decode() {
        let body = br#"{"status":{"result":"OK","code":200},"response":{"x":42,"y":63}}"#;
        let point: Point = decode_body(body, ResponseMode::Wrapped).unwrap();
        assert_eq!(point, Point { x: 42, y: 63 });
    }

    #[test]
    fn test_direct_decode() {
        let body = br#"{"x":42,"y":63}"#;
        let point: Point = decode_body(body, ResponseMode::Direct).unwrap();
        assert_eq!(point, Point { x: 42, y: 63 });
    }

    #[test]
    fn test_decode_error_carries_excerpt() {
        let body = br#"{"response": "not a point"}"#;
        let err = decode_body::<Point>(body, ResponseMode::Wrapped).unwrap_err();
        match err {
            VantageError::Decode { excerpt, .. } => assert!(excerpt.contains("not a point")),
            other => panic!("expected decode error, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_overwrites_destination() {
        #[derive(Debug, Default, Deserialize, PartialEq)]
        struct Sample {
            primes: Vec<u64>,
        }

        // A destination carrying residue from a previous use must come out
        // holding exactly the decoded contents, nothing merged, and the
        // original it was copied from must stay untouched.
        let original = Sample {
            primes: vec![0, 1, 2, 3, 4],
        };
        let mut copy = Sample {
            primes: original.primes.clone(),
        };
        assert_eq!(copy.primes, original.primes);

        copy = decode_body(br#"{"response":{"primes":[2,3,5]}}"#, ResponseMode::Wrapped).unwrap();
        assert_eq!(copy.primes, vec![2, 3, 5]);
        assert_eq!(original.primes, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_query_params_defensive_copy() {
        let mut params = BTreeMap::new();
        params.insert("sendEmail".to_string(), "true".to_string());

        let call = RestCall::post("user").query_params(&params);

        params.insert("sendEmail".to_string(), "false".to_string());
        params.insert("extra".to_string(), "1".to_string());

        assert_eq!(call.params.get("sendEmail").map(String::as_str), Some("true"));
        assert!(!call.params.contains_key("extra"));
    }

    #[test]
    fn test_payload_marshalled_at_registration() {
        use serde::Serialize;

        #[derive(Serialize)]
        struct Body {
            x: i64,
            y: i64,
        }

        let call = RestCall::post("test/thing")
            .payload(&Body { x: 3, y: 5 })
            .unwrap();
        assert_eq!(call.body.as_deref(), Some(&br#"{"x":3,"y":5}"#[..]));
    }

    #[test]
    fn test_excerpt_is_bounded() {
        let long = vec![b'a'; 10_000];
        assert_eq!(excerpt(&long).len(), EXCERPT_LEN);
    }
}
