use std::sync::Arc;

use mockito::Matcher;
use serde_json::json;

use finguard_core::api::{AdminError, PolicyAdmin, PolicyModel, ProvisionStage, Provisioner};
use finguard_core::config::AdminConfig;
use finguard_plugins::provision::PermitAdmin;

const SCHEMA: &str = "/v2/schema/proj/dev";

fn admin(url: &str) -> PermitAdmin {
    PermitAdmin::new(&AdminConfig {
        api_url: url.to_string(),
        api_key: "permit_key_admin".to_string(),
        project: "proj".to_string(),
        environment: "dev".to_string(),
        timeout_ms: 2_000,
    })
    .unwrap()
}

#[tokio::test]
async fn role_is_sent_with_flattened_permissions() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", format!("{SCHEMA}/roles").as_str())
        .match_header("authorization", "Bearer permit_key_admin")
        .match_body(Matcher::PartialJson(json!({
            "key": "premium_user",
            "name": "premium_user",
            "permissions": [
                "financial_advice:receive",
                "financial_document:read",
                "portfolio:update",
                "portfolio:read",
                "portfolio:analyze"
            ]
        })))
        .with_status(201)
        .create_async()
        .await;

    let model = PolicyModel::financial_advisor();
    let premium = model
        .roles
        .iter()
        .find(|r| r.key() == "premium_user")
        .unwrap();
    admin(&server.url()).create_role(premium).await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn condition_set_uses_wire_condition_shape() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", format!("{SCHEMA}/condition_sets").as_str())
        .match_body(Matcher::PartialJson(json!({
            "key": "finance_advice",
            "type": "resourceset",
            "resource_id": "financial_advice",
            "conditions": {"allOf": [{"resource.is_ai_generated": {"equals": true}}]}
        })))
        .with_status(201)
        .create_async()
        .await;

    let model = PolicyModel::financial_advisor();
    let set = model.condition_set("finance_advice").unwrap();
    admin(&server.url()).create_condition_set(set).await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn conflict_maps_to_conflict_and_rerun_succeeds() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", Matcher::Regex(r"^/v2/(schema|facts)/proj/dev/.+$".to_string()))
        .with_status(409)
        .with_body(r#"{"error_code":"DUPLICATE_ENTITY"}"#)
        .expect_at_least(1)
        .create_async()
        .await;

    let a = admin(&server.url());
    let model = PolicyModel::financial_advisor();
    let err = a.create_resource(&model.resources[0]).await.unwrap_err();
    assert!(matches!(err, AdminError::Conflict { ref key } if key == "financial_advice"));

    let validated = model.validate().unwrap();
    let summary = Provisioner::new(Arc::new(a)).apply(&validated).await.unwrap();
    assert_eq!(summary.created, 0);
    assert!(summary.already_present > 0);
}

#[tokio::test]
async fn rejection_aborts_with_stage_and_item() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", format!("{SCHEMA}/resources").as_str())
        .with_status(201)
        .create_async()
        .await;
    server
        .mock("POST", format!("{SCHEMA}/resources/__user/attributes").as_str())
        .with_status(422)
        .with_body("invalid attribute type")
        .create_async()
        .await;

    let validated = PolicyModel::financial_advisor().validate().unwrap();
    let err = Provisioner::new(Arc::new(admin(&server.url())))
        .apply(&validated)
        .await
        .unwrap_err();

    assert_eq!(err.stage, ProvisionStage::UserAttributes);
    assert_eq!(err.item_key, "clearance_level");
    assert!(matches!(err.cause, AdminError::Rejected { ref reason } if reason.contains("422")));
}

#[test]
fn missing_key_is_refused_up_front() {
    let cfg = AdminConfig::default();
    assert!(PermitAdmin::new(&cfg).is_err());
}
