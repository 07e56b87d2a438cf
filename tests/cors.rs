//! Cross-origin behavior in development and production mode.

use lms_gateway::config::{Environment, RouteConfig};
use reqwest::StatusCode;

mod common;

use common::{client, config_for, start_gateway, start_mock_backend};

fn route() -> RouteConfig {
    RouteConfig::new("/courses", "COURSE", "/api/v1/courses", "Course management endpoints")
}

#[tokio::test]
async fn test_development_allows_any_origin() {
    let backend = start_mock_backend("courses").await;
    let gateway = start_gateway(config_for(&[("COURSE", backend.base_url())], vec![route()])).await;

    let res = client()
        .get(gateway.url("/courses"))
        .header("origin", "http://localhost:5173")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["access-control-allow-origin"], "*");

    gateway.shutdown.trigger();
}

#[tokio::test]
async fn test_production_only_allows_listed_origins() {
    let backend = start_mock_backend("courses").await;
    let mut config = config_for(&[("COURSE", backend.base_url())], vec![route()]);
    config.environment = Environment::Production;
    config.cors.allowed_origins = vec!["https://lms.example".into()];
    let gateway = start_gateway(config).await;

    let preflight = client()
        .request(reqwest::Method::OPTIONS, gateway.url("/courses"))
        .header("origin", "https://lms.example")
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "x-api-key")
        .send()
        .await
        .unwrap();
    assert!(preflight.status().is_success());
    assert_eq!(
        preflight.headers()["access-control-allow-origin"],
        "https://lms.example"
    );
    let allowed_methods = preflight.headers()["access-control-allow-methods"]
        .to_str()
        .unwrap()
        .to_string();
    assert!(allowed_methods.contains("PATCH"));

    // Preflight is answered by the gateway, not forwarded.
    assert!(backend.requests().is_empty());

    let res = client()
        .get(gateway.url("/courses"))
        .header("origin", "https://evil.example")
        .send()
        .await
        .unwrap();
    assert!(res.headers().get("access-control-allow-origin").is_none());

    gateway.shutdown.trigger();
}

#[tokio::test]
async fn test_production_not_found_envelope_has_no_stack() {
    let backend = start_mock_backend("courses").await;
    let mut config = config_for(&[("COURSE", backend.base_url())], vec![route()]);
    config.environment = Environment::Production;
    let gateway = start_gateway(config).await;

    let res = client().get(gateway.url("/nope")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["code"], 404);
    assert!(body.get("stack").is_none());

    gateway.shutdown.trigger();
}
