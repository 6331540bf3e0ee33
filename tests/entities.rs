//! Entity-level wire behavior tests against a mock server.

use vantageapi::{
    Alert, CloudIntegration, CloudWatchConfiguration, Config, Create, Event, Get,
    MetricsPolicy, MetricsPolicyUpdate, NewUserRequest, PolicyRuleUpdate, User, UserGroup,
    VantageClient, VantageError,
};
use wiremock::matchers::{body_json, body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(server: &MockServer) -> VantageClient {
    VantageClient::new(&Config {
        address: server.uri(),
        token: "test-token".to_string(),
        ..Default::default()
    })
    .unwrap()
}

#[tokio::test]
async fn user_create_sends_email_flag_as_query_param() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v2/user"))
        .and(query_param("sendEmail", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "response": {
                "identifier": "someone@example.com",
                "customer": "acme",
                "groups": ["user_management"]
            }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let draft = NewUserRequest {
        email_address: "someone@example.com".to_string(),
        permissions: vec!["user_management".to_string()],
        ..Default::default()
    };
    let user = User::create(&client, &draft, true).await.unwrap();
    assert_eq!(user.id.as_deref(), Some("someone@example.com"));
    assert_eq!(user.customer, "acme");
}

#[tokio::test]
async fn user_create_rejects_missing_email_without_any_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v2/user"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let err = User::create(&client, &NewUserRequest::default(), false)
        .await
        .unwrap_err();
    assert!(matches!(err, VantageError::InvalidInput(_)));
}

#[tokio::test]
async fn user_get_decodes_unwrapped_response() {
    let mock_server = MockServer::start().await;

    // The user endpoint returns the entity bare, with no envelope.
    Mock::given(method("GET"))
        .and(path("/api/v2/user/someone@example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "identifier": "someone@example.com",
            "customer": "acme",
            "userGroups": ["group-1", "group-2"]
        })))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let user = User::get(&client, "someone@example.com").await.unwrap();
    assert_eq!(user.groups.ids(), vec!["group-1", "group-2"]);
}

#[tokio::test]
async fn user_delete_and_clear_resets_identifier() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/v2/user/someone@example.com"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let mut user = User {
        id: Some("someone@example.com".to_string()),
        ..Default::default()
    };
    user.delete_and_clear(&client).await.unwrap();
    assert_eq!(user.id.as_deref(), Some(""));

    // A second delete fails locally; the id is gone.
    let err = user.delete_and_clear(&client).await.unwrap_err();
    assert!(matches!(err, VantageError::InvalidInput(_)));
}

#[tokio::test]
async fn alert_tags_travel_under_customer_tags() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v2/alert"))
        .and(body_partial_json(serde_json::json!({
            "name": "High CPU",
            "alertType": "CLASSIC",
            "condition": "ts(cpu.load) > 4",
            "displayExpression": "ts(cpu.load)",
            "minutes": 5,
            "severity": "WARN",
            "tags": {"customerTags": ["prod", "infra"]}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "response": {
                "name": "High CPU",
                "id": "1234",
                "tags": {"customerTags": ["prod", "infra"]}
            }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let draft = Alert {
        name: "High CPU".to_string(),
        alert_type: "CLASSIC".to_string(),
        condition: "ts(cpu.load) > 4".to_string(),
        display_expression: "ts(cpu.load)".to_string(),
        minutes: 5,
        severity: "WARN".to_string(),
        tags: vec!["prod".to_string(), "infra".to_string()],
        ..Default::default()
    };
    let created = Alert::create(&client, &draft).await.unwrap();
    assert_eq!(created.id.as_deref(), Some("1234"));
    assert_eq!(created.tags, vec!["prod", "infra"]);
}

#[tokio::test]
async fn event_details_travel_as_annotations() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v2/event"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "response": {
                "name": "deploy",
                "id": "ev-1",
                "startTime": 1_700_000_000_000i64,
                "endTime": 1_700_000_000_001i64,
                "annotations": {
                    "severity": "info",
                    "type": "deploy",
                    "details": "v1.2.3 rollout"
                },
                "isEphemeral": true
            }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let draft = Event {
        name: "deploy".to_string(),
        severity: "info".to_string(),
        event_type: "deploy".to_string(),
        details: "v1.2.3 rollout".to_string(),
        instantaneous: true,
        start_time: 1_700_000_000_000,
        ..Default::default()
    };
    let created = Event::create(&client, &draft).await.unwrap();
    assert_eq!(created.severity, "info");
    assert_eq!(created.event_type, "deploy");
    assert_eq!(created.details, "v1.2.3 rollout");
    assert!(created.instantaneous);
    assert_eq!(created.end_time, created.start_time + 1);

    // The wire body must carry the annotations map, not flat fields.
    let requests = mock_server.received_requests().await.unwrap();
    let sent: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(sent["annotations"]["severity"], "info");
    assert!(sent.get("severity").is_none());
}

#[tokio::test]
async fn cloud_integration_create_and_trashless_delete() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v2/cloudintegration"))
        .and(body_partial_json(serde_json::json!({
            "name": "prod cloudwatch",
            "service": "CLOUDWATCH",
            "cloudWatch": {"namespaces": ["AWS/EC2"]}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "response": {
                "id": "cw-1",
                "name": "prod cloudwatch",
                "service": "CLOUDWATCH"
            }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/api/v2/cloudintegration/cw-1"))
        .and(query_param("skipTrash", "true"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let draft = CloudIntegration {
        name: "prod cloudwatch".to_string(),
        service: "CLOUDWATCH".to_string(),
        cloud_watch: Some(CloudWatchConfiguration {
            namespaces: vec!["AWS/EC2".to_string()],
            ..Default::default()
        }),
        ..Default::default()
    };
    let created = CloudIntegration::create(&client, &draft).await.unwrap();
    assert_eq!(created.id.as_deref(), Some("cw-1"));

    CloudIntegration::delete_with_options(&client, "cw-1", true)
        .await
        .unwrap();
}

#[tokio::test]
async fn cloud_integration_create_requires_service() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v2/cloudintegration"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let draft = CloudIntegration {
        name: "half configured".to_string(),
        ..Default::default()
    };
    let err = CloudIntegration::create(&client, &draft).await.unwrap_err();
    assert!(matches!(err, VantageError::InvalidInput(_)));
}

#[tokio::test]
async fn metrics_policy_is_a_singleton_resource() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/metricspolicy"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "response": {
                "customer": "acme",
                "policyRules": [{
                    "name": "Allow All Metrics",
                    "prefixes": ["*"],
                    "accessType": "ALLOW",
                    "userGroups": [{"id": "group-1", "name": "Everyone"}],
                    "tagsAnded": false
                }]
            }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Updates PUT the id-keyed rule list to the same path, no item id.
    Mock::given(method("PUT"))
        .and(path("/api/v2/metricspolicy"))
        .and(body_partial_json(serde_json::json!({
            "policyRules": [{
                "name": "block internal",
                "prefixes": ["internal."],
                "accessType": "BLOCK",
                "userGroups": ["group-1"]
            }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "response": {
                "customer": "acme",
                "policyRules": [{
                    "name": "block internal",
                    "prefixes": ["internal."],
                    "accessType": "BLOCK",
                    "userGroups": [{"id": "group-1", "name": "Everyone"}],
                    "tagsAnded": false
                }]
            }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let policy = MetricsPolicy::get(&client).await.unwrap();
    assert_eq!(policy.policy_rules[0].name, "Allow All Metrics");

    let update = MetricsPolicyUpdate {
        policy_rules: vec![PolicyRuleUpdate {
            name: "block internal".to_string(),
            prefixes: vec!["internal.".to_string()],
            access_type: "BLOCK".to_string(),
            user_group_ids: vec!["group-1".to_string()],
            ..Default::default()
        }],
    };
    let updated = MetricsPolicy::update(&client, &update).await.unwrap();
    assert_eq!(updated.policy_rules[0].access_type, "BLOCK");
}

#[tokio::test]
async fn user_group_membership_ops_post_to_subpaths() {
    let mock_server = MockServer::start().await;
    let users = vec!["a@example.com".to_string(), "b@example.com".to_string()];

    Mock::given(method("POST"))
        .and(path("/api/v2/usergroup/group-1/addUsers"))
        .and(body_json(serde_json::json!(["a@example.com", "b@example.com"])))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    UserGroup::add_users(&client, "group-1", &users).await.unwrap();
}
