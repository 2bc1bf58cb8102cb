use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use tilab::config::Config;
use tilab::{db, server};
use tower::util::ServiceExt; // for `oneshot`

// Helper to build the full application on an in-memory database
async fn setup_test_app() -> Router {
    let db = db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB");
    let config = Config {
        app_name: "TI-LAB Test".to_string(),
        database_url: "sqlite::memory:".to_string(),
        port: 0,
        cors_allowed_origins: vec![],
        seed_demo: false,
    };
    server::build_router(db, &config)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().uri(uri).method(method);
    let req = match body {
        Some(payload) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&payload).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, value)
}

async fn create_component(app: &Router, serial_number: &str) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        "/api/v1/components",
        Some(json!({
            "name": "Raspberry Pi 4",
            "serial_number": serial_number,
            "category": "boards"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_health_and_root() {
    let app = setup_test_app().await;

    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["app"], "TI-LAB Test");

    let (status, body) = send(&app, "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().contains("TI-LAB Test"));
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = setup_test_app().await;

    let (status, body) = send(&app, "GET", "/api-docs/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/v1/loans/{id}/return"].is_object());
}

#[tokio::test]
async fn test_component_endpoints() {
    let app = setup_test_app().await;

    let id = create_component(&app, "SN1").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/components",
        Some(json!({"name": "Copy", "serial_number": "SN1"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Serial number already exists");

    let (status, body) = send(&app, "GET", &format!("/api/v1/components/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "available");
    assert_eq!(body["is_active"], true);

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/v1/components/{}", id),
        Some(json!({"description": "4GB RAM"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["description"], "4GB RAM");

    // Status is owned by the loan lifecycle
    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/v1/components/{}", id),
        Some(json!({"status": "loaned"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = send(&app, "GET", "/api/v1/components?skip=0&limit=10", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = send(&app, "DELETE", &format!("/api/v1/components/{}", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, body) = send(&app, "GET", &format!("/api/v1/components/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Component not found");

    let (status, _) = send(&app, "DELETE", &format!("/api/v1/components/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_kit_endpoints() {
    let app = setup_test_app().await;
    let led = create_component(&app, "LED-1").await;
    let switch = create_component(&app, "SW-1").await;

    let (status, kit) = send(
        &app,
        "POST",
        "/api/v1/kits",
        Some(json!({
            "name": "Kit de Redes",
            "kit_code": "KIT-NET-01",
            "components": [{"component_id": led, "quantity": 2}]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(kit["status"], "available");
    assert_eq!(kit["components"][0]["quantity"], 2);
    let kit_id = kit["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/kits",
        Some(json!({"name": "Dup", "kit_code": "KIT-NET-01"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Kit code already exists");

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/v1/kits/{}/components/{}", kit_id, switch),
        Some(json!({"quantity": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["components"].as_array().unwrap().len(), 2);

    let (status, body) = send(
        &app,
        "DELETE",
        &format!("/api/v1/kits/{}/components/{}", kit_id, led),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["components"][0]["component_id"], switch);

    let (status, body) = send(
        &app,
        "DELETE",
        &format!("/api/v1/kits/{}/components/{}", kit_id, led),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Component is not part of this kit");

    let (status, body) = send(
        &app,
        "DELETE",
        &format!("/api/v1/kits/999/components/{}", led),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Kit not found");

    let (status, _) = send(&app, "GET", "/api/v1/kits/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", &format!("/api/v1/kits/{}", kit_id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, "GET", "/api/v1/kits", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_loan_lifecycle_over_http() {
    let app = setup_test_app().await;
    let component_id = create_component(&app, "SN1").await;

    let (status, loan) = send(
        &app,
        "POST",
        "/api/v1/loans",
        Some(json!({
            "user_name": "Luis Rojas",
            "user_email": "luis@uni.edu",
            "component_id": component_id,
            "expected_return_date": "2026-11-30T17:00:00Z"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(loan["status"], "active");
    assert_eq!(loan["return_date"], Value::Null);
    assert_eq!(loan["component"]["status"], "loaned");
    let loan_id = loan["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/loans",
        Some(json!({
            "user_name": "Other",
            "user_email": "other@uni.edu",
            "component_id": component_id,
            "expected_return_date": "2026-11-30T17:00:00Z"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Component is not available");

    let (status, body) = send(&app, "GET", "/api/v1/loans/active", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    // The generic update cannot move the loan through its lifecycle
    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/v1/loans/{}", loan_id),
        Some(json!({"status": "returned"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/v1/loans/{}", loan_id),
        Some(json!({"notes": "Charger included"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["notes"], "Charger included");
    assert_eq!(body["status"], "active");

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/v1/loans/{}/return", loan_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "returned");
    assert!(body["return_date"].is_string());
    assert_eq!(body["component"]["status"], "available");

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/v1/loans/{}/return", loan_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Loan is already returned");

    let (status, body) = send(&app, "PUT", "/api/v1/loans/999/return", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Loan not found");

    let (status, body) = send(&app, "GET", "/api/v1/loans?status=returned", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = send(&app, "GET", &format!("/api/v1/components/{}", component_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "available");
}

#[tokio::test]
async fn test_loan_requires_exactly_one_item() {
    let app = setup_test_app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/loans",
        Some(json!({
            "user_name": "Luis Rojas",
            "user_email": "luis@uni.edu",
            "expected_return_date": "2026-11-30T17:00:00Z"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("component or a kit"));

    let (status, _) = send(&app, "GET", "/api/v1/loans/12", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_oversized_paging_is_clamped() {
    let app = setup_test_app().await;
    create_component(&app, "SN1").await;

    let (status, body) = send(
        &app,
        "GET",
        "/api/v1/components?limit=9223372036854775808",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/v1/components?skip={}", u64::MAX),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());

    for uri in [
        "/api/v1/kits?skip=18446744073709551615&limit=18446744073709551615",
        "/api/v1/loans?skip=18446744073709551615&limit=18446744073709551615",
    ] {
        let (status, body) = send(&app, "GET", uri, None).await;
        assert_eq!(status, StatusCode::OK, "{}", uri);
        assert!(body.is_array());
    }
}
