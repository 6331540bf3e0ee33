//! End-to-end tests for the request/response engine against a mock server.

use std::time::Duration;

use vantageapi::{Alert, Config, Get, RestCall, RetryPolicy, VantageClient, VantageError};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(server: &MockServer) -> VantageClient {
    VantageClient::new(&Config {
        address: server.uri(),
        token: "test-token".to_string(),
        ..Default::default()
    })
    .unwrap()
}

fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        retryable_status: 406,
        max_retries: 2,
        max_retry_duration: Duration::from_millis(1),
    }
}

#[tokio::test]
async fn get_sends_auth_and_accept_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/alert/1234"))
        .and(header("Authorization", "Bearer test-token"))
        .and(header("Accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": {"result": "OK", "code": 200},
            "response": {"name": "High CPU", "id": "1234"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let alert = Alert::get(&client, "1234").await.unwrap();
    assert_eq!(alert.name, "High CPU");
    assert_eq!(alert.id.as_deref(), Some("1234"));
}

#[tokio::test]
async fn all_success_statuses_accepted() {
    for status in [200u16, 201, 202, 203, 204] {
        let mock_server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/api/v2/alert/1234"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server);
        let result = RestCall::delete("alert/1234").send(&client).await;
        assert!(result.is_ok(), "status {status} should succeed");
    }
}

#[tokio::test]
async fn non_success_statuses_fail_without_retry() {
    for status in [205u16, 400, 404, 500] {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v2/alert/1234"))
            .respond_with(ResponseTemplate::new(status).set_body_string("nope"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server).with_retry_policy(fast_retry());
        let err = Alert::get(&client, "1234").await.unwrap_err();
        match err {
            VantageError::Server {
                status: got,
                message,
            } => {
                assert_eq!(got, status);
                assert_eq!(message, "nope");
            }
            other => panic!("expected Server error, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn retryable_status_retried_until_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/alert/1234"))
        .respond_with(ResponseTemplate::new(406))
        .up_to_n_times(2)
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v2/alert/1234"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "response": {"name": "High CPU", "id": "1234"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server).with_retry_policy(fast_retry());
    let alert = Alert::get(&client, "1234").await.unwrap();
    assert_eq!(alert.name, "High CPU");
}

#[tokio::test]
async fn retry_attempts_bounded() {
    let mock_server = MockServer::start().await;

    // max_retries=2 means one initial send plus two retries.
    Mock::given(method("GET"))
        .and(path("/api/v2/alert/1234"))
        .respond_with(ResponseTemplate::new(406))
        .expect(3)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server).with_retry_policy(fast_retry());
    let err = Alert::get(&client, "1234").await.unwrap_err();
    assert_eq!(err.http_status(), Some(406));
}

#[tokio::test]
async fn retried_request_replays_identical_body() {
    let mock_server = MockServer::start().await;
    let payload = serde_json::json!({"name": "High CPU", "minutes": 5});

    Mock::given(method("POST"))
        .and(path("/api/v2/alert"))
        .and(body_json(&payload))
        .respond_with(ResponseTemplate::new(406))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v2/alert"))
        .and(body_json(&payload))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "response": {"name": "High CPU", "id": "1234"}
        })))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server).with_retry_policy(fast_retry());
    let created: Alert = RestCall::post("alert")
        .payload(&payload)
        .unwrap()
        .fetch(&client)
        .await
        .unwrap();
    assert_eq!(created.id.as_deref(), Some("1234"));

    // Both sends must carry byte-identical bodies.
    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].body, requests[1].body);
}

#[tokio::test]
async fn connection_failure_surfaces_as_transport_error() {
    // Bind then drop a listener so the port is known to be closed.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = VantageClient::new(&Config {
        address: format!("http://{addr}"),
        token: "test-token".to_string(),
        ..Default::default()
    })
    .unwrap();

    let err = Alert::get(&client, "1234").await.unwrap_err();
    assert!(
        matches!(err, VantageError::Transport(_)),
        "expected Transport error, got {err:?}"
    );
}

#[tokio::test]
async fn transport_failures_not_retried() {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    // A server that hangs up on every connection without answering.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let accepts = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&accepts);
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            counter.fetch_add(1, Ordering::SeqCst);
            drop(stream);
        }
    });

    let client = VantageClient::new(&Config {
        address: format!("http://{addr}"),
        token: "test-token".to_string(),
        ..Default::default()
    })
    .unwrap()
    .with_retry_policy(fast_retry());

    let err = Alert::get(&client, "1234").await.unwrap_err();
    assert!(
        matches!(err, VantageError::Transport(_)),
        "expected Transport error, got {err:?}"
    );
    // Only the backpressure status is retried; a dead connection means
    // exactly one send.
    assert_eq!(accepts.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn fetch_into_overwrites_destination() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/alert/1234"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": {"result": "OK", "code": 200},
            "response": {
                "name": "High CPU",
                "id": "1234",
                "tags": {"customerTags": ["prod"]}
            }
        })))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let mut dest = Alert {
        name: "stale".to_string(),
        tags: vec!["old-a".to_string(), "old-b".to_string()],
        severity_list: vec!["SEVERE".to_string()],
        ..Default::default()
    };
    RestCall::get("alert/1234")
        .fetch_into(&client, &mut dest)
        .await
        .unwrap();

    // The decoded value replaces the destination wholesale; nothing from
    // its previous contents survives.
    assert_eq!(dest.name, "High CPU");
    assert_eq!(dest.id.as_deref(), Some("1234"));
    assert_eq!(dest.tags, vec!["prod"]);
    assert!(dest.severity_list.is_empty());
}

#[tokio::test]
async fn not_found_is_detectable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/alert/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let err = Alert::get(&client, "missing").await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.http_status(), Some(404));
}

#[tokio::test]
async fn direct_mode_skips_envelope() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/alert/1234"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "raw", "id": "1234"
        })))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let alert: Alert = RestCall::get("alert/1234")
        .direct()
        .fetch(&client)
        .await
        .unwrap();
    assert_eq!(alert.name, "raw");
}
