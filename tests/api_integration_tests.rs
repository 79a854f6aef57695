//! Integration Tests for API Endpoints
//!
//! Full request/response cycle through the router for each endpoint.

use std::sync::Arc;

use aa_inspect::{
    api::create_router,
    config::Config,
    inspection::{MemoryTemplateStore, StandardParameterSet, TemplateInfo, TemplateStatus},
    AppState,
};
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

// == Helper Functions ==

fn config() -> Config {
    Config {
        cluster_password: Some("im@2024".to_string()),
        ..Default::default()
    }
}

fn create_test_state() -> AppState {
    let store = MemoryTemplateStore::from_records([
        TemplateInfo::online(
            "M-ONLINE",
            StandardParameterSet::new()
                .with_value("aa1", "10")
                .with_value("aa2", "ROI")
                .with_value("mtf", "0.5"),
        ),
        TemplateInfo {
            module_id: "M-OFFLINE".to_string(),
            status: TemplateStatus::Offline,
            template: Some(StandardParameterSet::new()),
        },
        TemplateInfo {
            module_id: "M-EMPTY".to_string(),
            status: TemplateStatus::Online,
            template: None,
        },
    ]);
    AppState::with_store(&config(), Arc::new(store))
}

fn create_test_app() -> Router {
    create_router(create_test_state())
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn inspect(app: Router, body: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/inspect")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

// == Inspect Endpoint Tests ==

#[tokio::test]
async fn test_inspect_clean_parameters() {
    let (status, json) = inspect(
        create_test_app(),
        r#"{"simId":"S1","moduleId":"M-ONLINE","parameterValues":{"aa1":"10","aa2":"ROI","mtf":"0.5"}}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["code"], 0);
    assert_eq!(json["passed"], true);
    assert_eq!(json["description"], "Ok.");
    assert_eq!(json["label"], "NORMAL");
    assert_eq!(json["source"], "aa-list");
    assert_eq!(json["moduleId"], "M-ONLINE");
    assert!(json["checkedAt"].is_string());
}

#[tokio::test]
async fn test_inspect_reports_each_anomaly_group() {
    let (_, json) = inspect(
        create_test_app(),
        r#"{"simId":"S1","moduleId":"M-ONLINE","parameterValues":{"aa1":"12","mtf":"0.5","zoom":"3"}}"#,
    )
    .await;

    assert_eq!(json["code"], 5);
    assert_eq!(json["passed"], false);
    assert_eq!(json["description"], "zoom+;aa2-;aa1:10!=12");
}

#[tokio::test]
async fn test_inspect_missing_parameter_only() {
    let (_, json) = inspect(
        create_test_app(),
        r#"{"simId":"S1","moduleId":"M-ONLINE","parameterValues":{"aa1":"10","aa2":"ROI"}}"#,
    )
    .await;

    assert_eq!(json["code"], 2);
    assert_eq!(json["description"], "mtf-");
}

#[tokio::test]
async fn test_inspect_unknown_module() {
    let (status, json) = inspect(create_test_app(), r#"{"simId":"S1","moduleId":"M-NONE"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["code"], 1);
    assert_eq!(json["description"], "Missing Template Information.");
}

#[tokio::test]
async fn test_inspect_offline_template() {
    let (_, json) = inspect(
        create_test_app(),
        r#"{"simId":"S1","moduleId":"M-OFFLINE","parameterValues":{"x":"1"}}"#,
    )
    .await;

    assert_eq!(json["code"], 6);
    assert_eq!(json["description"], "Template Offline.");
}

#[tokio::test]
async fn test_inspect_template_without_detail() {
    let (_, json) = inspect(create_test_app(), r#"{"simId":"S1","moduleId":"M-EMPTY"}"#).await;

    assert_eq!(json["code"], 7);
    assert_eq!(json["description"], "Missing Template Detail.");
}

#[tokio::test]
async fn test_inspect_null_body() {
    let (status, json) = inspect(create_test_app(), "null").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("Invalid argument"));
}

// == Ignore Endpoint Tests ==

#[tokio::test]
async fn test_ignored_sim_is_labelled() {
    let app = create_test_app();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/ignored/S-IGN")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let (_, ignored) = inspect(app.clone(), r#"{"simId":"S-IGN","moduleId":"M-NONE"}"#).await;
    let (_, normal) = inspect(app, r#"{"simId":"S-OTHER","moduleId":"M-NONE"}"#).await;

    assert_eq!(ignored["label"], "IGNORE");
    assert_eq!(normal["label"], "NORMAL");
    assert_eq!(ignored["code"], normal["code"]);
}

// == Caches Endpoint Tests ==

#[tokio::test]
async fn test_caches_lists_provisioned_caches() {
    let app = create_test_app();
    inspect(app.clone(), r#"{"simId":"S1","moduleId":"M-ONLINE"}"#).await;

    let response = app
        .oneshot(Request::builder().uri("/caches").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    let caches = json["caches"].as_array().unwrap();
    assert_eq!(caches.len(), 2);
    assert_eq!(caches[0]["name"], "ignored-sims");
    assert_eq!(caches[1]["name"], "template-info");
    // the template was fetched from the store and written back
    assert_eq!(caches[1]["stats"]["total_entries"], 1);
}

#[tokio::test]
async fn test_misconfigured_cluster_surfaces_error() {
    let bad = Config {
        cluster_nodes: "no-port-here".to_string(),
        ..config()
    };
    let app = create_router(AppState::from_config(&bad));

    let (status, json) = inspect(app, r#"{"simId":"S1","moduleId":"M1"}"#).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(json["error"].as_str().unwrap().contains("Configuration error"));
}

// == Health Endpoint Tests ==

#[tokio::test]
async fn test_health_endpoint() {
    let response = create_test_app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "healthy");
}
