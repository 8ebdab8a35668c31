use axum::{
    body::{to_bytes, Body},
    http::Request,
    Router,
};
use backwash::api::{router, HEALTH_ROUTE, MODEL_INFO_ROUTE, PREDICT_ADVANCED_ROUTE, PREDICT_ROUTE};
use backwash::test::utils::set_app_state;
use chrono::{TimeZone, Utc};
use hyper::StatusCode;
use serde_json::{json, Value};
use tower::ServiceExt;

fn start_time() -> i64 {
    Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap().timestamp()
}

fn app() -> Router {
    router(set_app_state(start_time()))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn call(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn request(ph: f64, temperature: f64, turbidity: f64) -> Value {
    json!({
        "parameters": {
            "turbidity": turbidity,
            "ph": ph,
            "temperature": temperature,
            "flow_rate": 20.0,
            "inlet_pressure": 40.0
        },
        "fouling_status": "clean",
        "time_steps": 20,
        "pressure_threshold": 7.0
    })
}

#[tokio::test]
async fn root_and_health() {
    let (status, body) = call(app(), get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["version"], "1.0.0");

    let (status, body) = call(app(), get(HEALTH_ROUTE)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["timestamp"], "2024-01-15T10:30:00Z");
}

#[tokio::test]
async fn model_info_lists_ranges() {
    let (status, body) = call(app(), get(MODEL_INFO_ROUTE)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["supported_parameters"]["turbidity"]["max"], 2.0);
    assert_eq!(body["supported_parameters"]["inlet_pressure"]["unit"], "PSIG");
    assert_eq!(body["fouling_statuses"].as_array().unwrap().len(), 5);
    assert_eq!(body["fouling_statuses"][4], "critical");
    assert_eq!(body["pressure_threshold"], 7.0);
    assert_eq!(body["max_time_steps"], 50);
}

#[tokio::test]
async fn predict_returns_a_full_series() {
    let (status, body) = call(app(), post_json(PREDICT_ROUTE, &request(10.0, 35.0, 2.0))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["metadata"]["model_version"], "1.0.0");
    assert_eq!(body["metadata"]["prediction_timestamp"], "2024-01-15T10:30:00Z");

    let data = &body["prediction_data"];
    assert_eq!(data["pressure_data"].as_array().unwrap().len(), 20);
    assert_eq!(data["confidence_score"], 0.9);

    let points = data["backwash_points"].as_array().unwrap();
    assert!(points.len() > 1);
    let steps: Vec<u64> = points.iter().map(|p| p["time_step"].as_u64().unwrap()).collect();
    assert!(steps.windows(2).all(|w| w[1] - w[0] > 4));
    assert!(points.iter().all(|p| p["reason"] == "pressure_threshold_exceeded"));
    assert!(points.iter().all(|p| p["pressure"].as_f64().unwrap() >= 7.0));
    assert!(!data["recommendations"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn predict_honours_time_steps() {
    let mut req = request(7.0, 25.0, 0.5);
    req["time_steps"] = json!(35);
    let (status, body) = call(app(), post_json(PREDICT_ROUTE, &req)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["prediction_data"]["pressure_data"].as_array().unwrap().len(), 35);
}

#[tokio::test]
async fn predict_is_reproducible_with_a_seed() {
    let req = request(8.5, 30.0, 1.2);
    let (_, a) = call(app(), post_json(PREDICT_ROUTE, &req)).await;
    let (_, b) = call(app(), post_json(PREDICT_ROUTE, &req)).await;
    assert_eq!(a["prediction_data"], b["prediction_data"]);
}

#[tokio::test]
async fn predict_defaults_optional_fields() {
    let req = json!({ "parameters": { "turbidity": 0.5, "ph": 7.0, "temperature": 25.0 } });
    let (status, body) = call(app(), post_json(PREDICT_ROUTE, &req)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["prediction_data"]["pressure_data"][0], 5.0);
}

#[tokio::test]
async fn out_of_range_parameters_are_rejected() {
    let (status, body) = call(app(), post_json(PREDICT_ROUTE, &request(11.0, 25.0, 0.5))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["detail"].as_str().unwrap().contains("ph"));

    let mut req = request(7.0, 25.0, 0.5);
    req["time_steps"] = json!(0);
    let (status, _) = call(app(), post_json(PREDICT_ROUTE, &req)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_fouling_status_is_rejected() {
    let mut req = request(7.0, 25.0, 0.5);
    req["fouling_status"] = json!("filthy");
    let (status, body) = call(app(), post_json(PREDICT_ROUTE, &req)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("filthy"));
}

#[tokio::test]
async fn malformed_body_is_unprocessable() {
    let resp = app().oneshot(post_json(PREDICT_ROUTE, &json!({ "fouling_status": "clean" }))).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn advanced_prediction_with_curves() {
    let req = json!({
        "parameters": { "turbidity": 0.5, "ph": 7.0, "temperature": 25.0 },
        "curve_data": {
            "turbidity_curve": [0.5, 0.8, 1.1, 1.4, 1.7, 2.0],
            "temperature_curve": [25.0, 28.0, 31.0]
        },
        "fouling_status": "mild",
        "time_steps": 6
    });
    let (status, body) = call(app(), post_json(PREDICT_ADVANCED_ROUTE, &req)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["metadata"]["uses_curve_data"], true);
    assert_eq!(body["prediction_data"]["confidence_score"], 0.85);
    assert_eq!(body["prediction_data"]["pressure_data"].as_array().unwrap().len(), 6);
    // the last step runs at 2.0 NTU
    let recs = body["prediction_data"]["recommendations"].as_array().unwrap();
    assert!(recs.iter().any(|r| r.as_str().unwrap().starts_with("High turbidity")));
}

#[tokio::test]
async fn advanced_prediction_without_curves() {
    let req = json!({ "parameters": { "turbidity": 0.5, "ph": 7.0, "temperature": 25.0 } });
    let (status, body) = call(app(), post_json(PREDICT_ADVANCED_ROUTE, &req)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["metadata"]["uses_curve_data"], false);
    assert_eq!(body["prediction_data"]["pressure_data"].as_array().unwrap().len(), 20);
}

#[tokio::test]
async fn empty_curve_is_rejected() {
    let req = json!({
        "parameters": { "turbidity": 0.5, "ph": 7.0, "temperature": 25.0 },
        "curve_data": { "ph_curve": [] }
    });
    let (status, body) = call(app(), post_json(PREDICT_ADVANCED_ROUTE, &req)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("ph_curve"));
}
