//! End-to-end tests driving the router directly, one temporary
//! database per test.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

use pms_api_rest::{router, AppState};
use pms_core::CoreConfig;
use pms_predict::{FeatureVector, PredictError, PredictResult, Prediction, PremiumModel};

fn app(temp: &TempDir) -> Router {
    let cfg = CoreConfig::new(temp.path().join("patients.json")).unwrap();
    router(AppState::with_rule_model(&cfg))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

fn ali() -> Value {
    json!({
        "id": "p1",
        "name": "Ali",
        "city": "Lahore",
        "age": 30,
        "gender": "male",
        "height": 1.75,
        "weight": 85.0
    })
}

fn sara() -> Value {
    json!({
        "id": "p2",
        "name": "Sara",
        "city": "Multan",
        "age": 25,
        "gender": "female",
        "height": 1.6,
        "weight": 40.0
    })
}

#[tokio::test]
async fn informational_endpoints_respond() {
    let temp = TempDir::new().unwrap();
    let app = app(&temp);

    for uri in ["/", "/about", "/health"] {
        let (status, body) = send(&app, get(uri)).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert!(body.is_object());
    }
}

#[tokio::test]
async fn create_returns_record_with_derived_fields() {
    let temp = TempDir::new().unwrap();
    let app = app(&temp);

    let (status, body) = send(&app, json_request("POST", "/create", &ali())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], "p1");
    assert_eq!(body["bmi"], 27.76);
    assert_eq!(body["verdict"], "Overweight");
}

#[tokio::test]
async fn duplicate_create_conflicts() {
    let temp = TempDir::new().unwrap();
    let app = app(&temp);

    send(&app, json_request("POST", "/create", &ali())).await;
    let (status, body) = send(&app, json_request("POST", "/create", &ali())).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["detail"].as_str().unwrap().contains("p1"));
}

#[tokio::test]
async fn create_rejects_out_of_range_age() {
    let temp = TempDir::new().unwrap();
    let app = app(&temp);

    let mut patient = ali();
    patient["age"] = json!(120);
    let (status, body) = send(&app, json_request("POST", "/create", &patient)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].as_str().unwrap().contains("age"));
}

#[tokio::test]
async fn create_rejects_nonpositive_height() {
    let temp = TempDir::new().unwrap();
    let app = app(&temp);

    let mut patient = ali();
    patient["height"] = json!(0.0);
    let (status, body) = send(&app, json_request("POST", "/create", &patient)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].as_str().unwrap().contains("height"));
}

#[tokio::test]
async fn view_returns_the_full_mapping() {
    let temp = TempDir::new().unwrap();
    let app = app(&temp);

    send(&app, json_request("POST", "/create", &ali())).await;
    send(&app, json_request("POST", "/create", &sara())).await;

    let (status, body) = send(&app, get("/view")).await;
    assert_eq!(status, StatusCode::OK);
    let map = body.as_object().unwrap();
    assert_eq!(map.len(), 2);
    assert_eq!(map["p2"]["name"], "Sara");
}

#[tokio::test]
async fn get_by_id_and_missing_id() {
    let temp = TempDir::new().unwrap();
    let app = app(&temp);

    send(&app, json_request("POST", "/create", &ali())).await;

    let (status, body) = send(&app, get("/patient/p1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Ali");

    let (status, _) = send(&app, get("/patient/p9")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn edit_rederives_bmi_and_verdict() {
    let temp = TempDir::new().unwrap();
    let app = app(&temp);

    send(&app, json_request("POST", "/create", &ali())).await;

    let patch = json!({ "weight": 60.0 });
    let (status, body) = send(&app, json_request("PUT", "/edit/p1", &patch)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["bmi"], 19.59);
    assert_eq!(body["verdict"], "Normal");

    // The re-derived fields are persisted, not just echoed
    let (_, body) = send(&app, get("/patient/p1")).await;
    assert_eq!(body["bmi"], 19.59);
}

#[tokio::test]
async fn edit_missing_id_is_not_found() {
    let temp = TempDir::new().unwrap();
    let app = app(&temp);

    let patch = json!({ "city": "Quetta" });
    let (status, _) = send(&app, json_request("PUT", "/edit/p9", &patch)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn edit_rejects_invalid_patch_fields() {
    let temp = TempDir::new().unwrap();
    let app = app(&temp);

    send(&app, json_request("POST", "/create", &ali())).await;

    let patch = json!({ "weight": -1.0 });
    let (status, _) = send(&app, json_request("PUT", "/edit/p1", &patch)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, body) = send(&app, get("/patient/p1")).await;
    assert_eq!(body["weight"], 85.0);
}

#[tokio::test]
async fn delete_then_get_is_not_found() {
    let temp = TempDir::new().unwrap();
    let app = app(&temp);

    send(&app, json_request("POST", "/create", &ali())).await;
    send(&app, json_request("POST", "/create", &sara())).await;

    let (status, _) = send(&app, delete("/delete/p1")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, get("/patient/p1")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(&app, get("/view")).await;
    assert_eq!(body.as_object().unwrap().len(), 1);

    let (status, _) = send(&app, delete("/delete/p1")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn sort_by_bmi_ascending_orders_records() {
    let temp = TempDir::new().unwrap();
    let app = app(&temp);

    send(&app, json_request("POST", "/create", &ali())).await;
    send(&app, json_request("POST", "/create", &sara())).await;

    let (status, body) = send(&app, get("/sort?sort_by=bmi&order=asc")).await;
    assert_eq!(status, StatusCode::OK);
    let list = body.as_array().unwrap();
    assert_eq!(list[0]["id"], "p2");
    assert_eq!(list[1]["id"], "p1");
}

#[tokio::test]
async fn sort_descending_reverses_order() {
    let temp = TempDir::new().unwrap();
    let app = app(&temp);

    send(&app, json_request("POST", "/create", &ali())).await;
    send(&app, json_request("POST", "/create", &sara())).await;

    let (_, body) = send(&app, get("/sort?sort_by=weight&order=desc")).await;
    let list = body.as_array().unwrap();
    assert_eq!(list[0]["id"], "p1");
}

#[tokio::test]
async fn sort_with_unknown_field_is_bad_request() {
    let temp = TempDir::new().unwrap();
    let app = app(&temp);

    let (status, body) = send(&app, get("/sort?sort_by=age")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("age"));
}

#[tokio::test]
async fn sort_with_unknown_order_defaults_to_ascending() {
    let temp = TempDir::new().unwrap();
    let app = app(&temp);

    send(&app, json_request("POST", "/create", &ali())).await;
    send(&app, json_request("POST", "/create", &sara())).await;

    let (status, body) = send(&app, get("/sort?sort_by=bmi&order=sideways")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap()[0]["id"], "p2");
}

#[tokio::test]
async fn predict_returns_a_category() {
    let temp = TempDir::new().unwrap();
    let app = app(&temp);

    let profile = json!({
        "age": 35,
        "weight": 70.0,
        "height": 1.7,
        "income_lpa": 10.0,
        "smoker": false,
        "city": "Lahore",
        "occupation": "private_job"
    });
    let (status, body) = send(&app, json_request("POST", "/predict", &profile)).await;
    assert_eq!(status, StatusCode::OK);
    let category = body["predicted_category"].as_str().unwrap();
    assert!(["low", "medium", "high"].contains(&category));
}

#[tokio::test]
async fn corrupt_database_maps_to_internal_error() {
    let temp = TempDir::new().unwrap();
    let app = app(&temp);

    std::fs::write(temp.path().join("patients.json"), "{ not json").unwrap();

    let (status, body) = send(&app, get("/view")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["detail"], "internal error");
}

/// Model whose artifact never loads; every invocation fails.
struct OfflineModel;

impl PremiumModel for OfflineModel {
    fn predict(&self, _features: &FeatureVector) -> PredictResult<Prediction> {
        Err(PredictError::Unavailable("artifact not loaded".into()))
    }
}

#[tokio::test]
async fn model_failure_maps_to_service_unavailable() {
    let temp = TempDir::new().unwrap();
    let cfg = CoreConfig::new(temp.path().join("patients.json")).unwrap();
    let app = router(AppState::new(&cfg, Arc::new(OfflineModel)));

    let profile = json!({
        "age": 35,
        "weight": 70.0,
        "height": 1.7,
        "income_lpa": 10.0,
        "smoker": false,
        "city": "Lahore",
        "occupation": "private_job"
    });
    let (status, body) = send(&app, json_request("POST", "/predict", &profile)).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["detail"], "prediction model unavailable");
}

#[tokio::test]
async fn predict_rejects_out_of_range_profile() {
    let temp = TempDir::new().unwrap();
    let app = app(&temp);

    let profile = json!({
        "age": 35,
        "weight": 70.0,
        "height": 2.6,
        "income_lpa": 10.0,
        "smoker": false,
        "city": "Lahore",
        "occupation": "private_job"
    });
    let (status, body) = send(&app, json_request("POST", "/predict", &profile)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].as_str().unwrap().contains("height"));
}
