use std::time::Duration;

use mockito::Matcher;
use serde_json::json;

use finguard_core::api::{
    AdviceRequest, DecisionError, PolicyDecider, ResourceRequest, ResponseContentRequest,
};
use finguard_core::config::PermitDecisionConfig;
use finguard_plugins::decision::PermitDecider;

fn decider(url: &str, timeout_ms: u64) -> PermitDecider {
    PermitDecider::new(&PermitDecisionConfig {
        pdp_url: url.to_string(),
        api_key: "permit_key_test".to_string(),
        timeout_ms,
        tenant: "default".to_string(),
    })
    .unwrap()
}

#[tokio::test]
async fn posts_typed_request_with_bearer_token() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/allowed")
        .match_header("authorization", "Bearer permit_key_test")
        .match_body(Matcher::Json(json!({
            "user": {"key": "user@example.com"},
            "action": "receive",
            "resource": {
                "type": "financial_advice",
                "attributes": {"is_ai_generated": true},
                "tenant": "default"
            },
            "context": {}
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"allow": true}"#)
        .create_async()
        .await;

    let request = AdviceRequest {
        is_ai_generated: true,
    };
    let allowed = decider(&server.url(), 2_000)
        .check("user@example.com", AdviceRequest::ACTION, &request.to_resource())
        .await
        .unwrap();

    assert!(allowed);
    mock.assert_async().await;
}

#[tokio::test]
async fn false_is_an_answer_not_an_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/allowed")
        .with_status(200)
        .with_body(r#"{"allow": false, "debug": {}}"#)
        .create_async()
        .await;

    let request = ResponseContentRequest {
        contains_advice: true,
    };
    let allowed = decider(&server.url(), 2_000)
        .check("u", ResponseContentRequest::ACTION, &request.to_resource())
        .await
        .unwrap();
    assert!(!allowed);
}

#[tokio::test]
async fn rejected_credentials_map_to_unauthorized() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/allowed")
        .with_status(401)
        .create_async()
        .await;

    let err = decider(&server.url(), 2_000)
        .check("u", "receive", &AdviceRequest { is_ai_generated: false }.to_resource())
        .await
        .unwrap_err();
    assert!(matches!(err, DecisionError::Unauthorized));
}

#[tokio::test]
async fn server_errors_keep_status_and_body() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/allowed")
        .with_status(503)
        .with_body("pdp warming up")
        .create_async()
        .await;

    let err = decider(&server.url(), 2_000)
        .check("u", "receive", &AdviceRequest { is_ai_generated: true }.to_resource())
        .await
        .unwrap_err();
    match err {
        DecisionError::HttpStatus {
            status,
            body_snippet,
        } => {
            assert_eq!(status, 503);
            assert_eq!(body_snippet, "pdp warming up");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/allowed")
        .with_status(200)
        .with_body(r#"{"allowed": "yes"}"#)
        .create_async()
        .await;

    let err = decider(&server.url(), 2_000)
        .check("u", "receive", &AdviceRequest { is_ai_generated: true }.to_resource())
        .await
        .unwrap_err();
    assert!(matches!(err, DecisionError::Decode(_)));
}

#[tokio::test]
async fn silent_service_times_out() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((sock, _)) = listener.accept().await {
            held.push(sock);
        }
    });

    let err = decider(&format!("http://{addr}"), 100)
        .check("u", "receive", &AdviceRequest { is_ai_generated: true }.to_resource())
        .await
        .unwrap_err();
    assert!(matches!(err, DecisionError::Timeout { timeout_ms: 100 }));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn refused_connection_is_a_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    tokio::time::sleep(Duration::from_millis(10)).await;

    let err = decider(&format!("http://{addr}"), 2_000)
        .check("u", "receive", &AdviceRequest { is_ai_generated: true }.to_resource())
        .await
        .unwrap_err();
    assert!(matches!(err, DecisionError::Transport(_)));
}
