use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use proproute_core::{AppConfig, Environment, SheetsSettings};
use proproute_routing::{RouteAssembler, RouteWebhookClient};
use proproute_sheets::{PropertyStore, SheetsClient};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;

const READ_PATH: &str = "/v4/spreadsheets/sheet-123/values/Sheet1!A2:N";
const APPEND_PATH: &str = "/v4/spreadsheets/sheet-123/values/Sheet1!A:N:append";
const WEBHOOK_PATH: &str = "/webhook/route";

fn test_config(sheets_url: &str, env: Environment, upload_max_bytes: usize) -> AppConfig {
    AppConfig {
        env,
        bind_addr: "127.0.0.1:0".parse().expect("addr"),
        log_level: "info".to_string(),
        sheets: SheetsSettings {
            base_url: sheets_url.to_string(),
            sheet_id: "sheet-123".to_string(),
            sheet_name: "Sheet1".to_string(),
            range: "A2:N".to_string(),
            api_key: Some("test-key".to_string()),
            access_token: None,
        },
        route_webhook_url: None,
        route_fallback: true,
        utc_offset_minutes: 420,
        request_timeout_secs: 5,
        user_agent: "proproute-test".to_string(),
        upload_max_bytes,
    }
}

fn app_with(config: AppConfig, routing: RouteAssembler) -> Router {
    let client = SheetsClient::new(&config.sheets, 5, "proproute-test").expect("client");
    build_app(AppState {
        store: Arc::new(PropertyStore::new(client)),
        routing: Arc::new(routing),
        config: Arc::new(config),
    })
}

fn test_app(server: &MockServer) -> Router {
    app_with(
        test_config(&server.uri(), Environment::Test, 1024 * 1024),
        RouteAssembler::new(None, true, 420),
    )
}

async fn mount_rows(server: &MockServer, rows: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(READ_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "range": "Sheet1!A2:N1000",
            "values": rows,
        })))
        .mount(server)
        .await;
}

fn sample_rows() -> serde_json::Value {
    serde_json::json!([
        ["r1", "ATS-1", "Somchai", "0811111111", "2500", "warehouse", "rent", "150", "Khlong Nueng", "Khlong Luang", "Pathum Thani", "https://maps.example/1", "14.1,100.6", "https://listing.example/1"],
        ["r2", "ATS-2", "Malee", "0822222222", "900", "factory", "sale", "", "Bang Phli Yai", "Bang Phli", "Samut Prakan", "", "13.6,100.7", ""]
    ])
}

fn json_request(method: &str, uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).expect("request")
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    serde_json::from_slice(&bytes).expect("json parse")
}

fn multipart_request(file_name: &str, contents: &str) -> Request<Body> {
    let boundary = "proproute-boundary";
    let body = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n{contents}\r\n--{boundary}--\r\n"
    );
    Request::builder()
        .method("POST")
        .uri("/api/upload-properties")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .expect("request")
}

#[test]
fn api_error_codes_map_to_statuses() {
    let status = |code: &str| ApiError::new("req-1", code, "msg").into_response().status();
    assert_eq!(status("validation_error"), StatusCode::BAD_REQUEST);
    assert_eq!(status("bad_request"), StatusCode::BAD_REQUEST);
    assert_eq!(status("conflict"), StatusCode::CONFLICT);
    assert_eq!(status("payload_too_large"), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(status("upstream_error"), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn health_reports_routing_mode() {
    let server = MockServer::start().await;
    let response = test_app(&server)
        .oneshot(get_request("/api/health"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    let json = json_body(response).await;
    assert_eq!(json["data"]["status"], "ok");
    assert_eq!(json["data"]["route_webhook"], "missing");
    assert_eq!(json["data"]["route_fallback"], true);
    assert!(json["meta"]["request_id"].is_string());
}

#[tokio::test]
async fn list_properties_returns_normalized_records() {
    let server = MockServer::start().await;
    mount_rows(&server, sample_rows()).await;

    let response = test_app(&server)
        .oneshot(get_request("/api/properties"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    let data = json["data"].as_array().expect("array");
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["propertyId"], "ATS-1");
    assert_eq!(data[0]["type"], "warehouse");
    assert_eq!(data[0]["coordinates"]["lat"], 14.1);
}

#[tokio::test]
async fn list_properties_is_empty_when_sheet_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(READ_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let response = test_app(&server)
        .oneshot(get_request("/api/properties"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["data"], serde_json::json!([]));
}

#[tokio::test]
async fn options_carry_formatted_labels() {
    let server = MockServer::start().await;
    mount_rows(&server, sample_rows()).await;

    let response = test_app(&server)
        .oneshot(get_request("/api/properties/options"))
        .await
        .expect("response");

    let json = json_body(response).await;
    assert_eq!(json["data"][0]["value"], "ATS-1");
    assert_eq!(
        json["data"][0]["label"],
        "ATS-1 - Khlong Nueng, Khlong Luang , 2500 sqm , 14.1  , 100.6"
    );
}

#[tokio::test]
async fn create_property_returns_201_with_issued_id() {
    let server = MockServer::start().await;
    mount_rows(&server, sample_rows()).await;
    Mock::given(method("POST"))
        .and(path(APPEND_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "spreadsheetId": "sheet-123"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = test_app(&server)
        .oneshot(json_request(
            "POST",
            "/api/properties",
            &serde_json::json!({
                "propertyId": "ATS-9",
                "landlordName": "Niran",
                "buildingSize": 1200,
                "coordinates": "13.9,100.5"
            }),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = json_body(response).await;
    assert_eq!(json["data"]["property_id"], "ATS-9");
    assert_eq!(json["data"]["row_id"].as_str().map(str::len), Some(36));
}

#[tokio::test]
async fn create_property_rejects_missing_fields_with_400() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let response = test_app(&server)
        .oneshot(json_request(
            "POST",
            "/api/properties",
            &serde_json::json!({ "propertyId": "ATS-9" }),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["error"]["code"], "validation_error");
    assert!(json["error"]["message"]
        .as_str()
        .unwrap()
        .contains("landlordName"));
}

#[tokio::test]
async fn create_property_rejects_malformed_json_with_400() {
    let server = MockServer::start().await;
    let response = test_app(&server)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/properties")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_property_rejects_duplicate_with_409() {
    let server = MockServer::start().await;
    mount_rows(&server, sample_rows()).await;
    Mock::given(method("POST"))
        .and(path(APPEND_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let response = test_app(&server)
        .oneshot(json_request(
            "POST",
            "/api/properties",
            &serde_json::json!({ "propertyId": "ATS-2", "landlordName": "Someone" }),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn create_property_maps_append_failure_to_500() {
    let server = MockServer::start().await;
    mount_rows(&server, sample_rows()).await;
    Mock::given(method("POST"))
        .and(path(APPEND_PATH))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let response = test_app(&server)
        .oneshot(json_request(
            "POST",
            "/api/properties",
            &serde_json::json!({ "propertyId": "ATS-10", "landlordName": "Someone" }),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = json_body(response).await;
    assert_eq!(json["error"]["code"], "upstream_error");
}

#[tokio::test]
async fn route_planning_falls_back_without_webhook() {
    let server = MockServer::start().await;
    mount_rows(&server, sample_rows()).await;

    let response = test_app(&server)
        .oneshot(json_request(
            "POST",
            "/api/route-planning",
            &serde_json::json!({
                "user_latitude": 13.75,
                "user_longtitude": 100.5,
                "propertyid_list": "ATS-1,ATS-2,UNKNOWN",
                "start_time": "09:00"
            }),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    let data = &json["data"];
    assert_eq!(data["source"], "fallback");
    let steps = data["steps"].as_array().expect("steps");
    assert_eq!(steps.len(), 3);
    assert_eq!(steps[0]["distance_value"], 0);
    assert_eq!(steps[0]["arrival_time"], "09:00");
    assert_eq!(steps[0]["contact"], "K.Somchai 0811111111");
    assert_eq!(steps[2]["contact"], "Contact information unavailable");
    for step in &steps[1..] {
        let meters = step["distance_value"].as_u64().unwrap();
        assert!((5_000..=35_000).contains(&meters));
    }
}

#[tokio::test]
async fn route_planning_reads_epoch_start_in_local_offset() {
    let server = MockServer::start().await;
    mount_rows(&server, sample_rows()).await;

    let response = test_app(&server)
        .oneshot(json_request(
            "POST",
            "/api/route-planning",
            &serde_json::json!({
                "user_latitude": 13.75,
                "user_longtitude": 100.5,
                "propertyid_list": "ATS-1,ATS-2",
                "user_timeselect": 1_672_554_600
            }),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["data"]["steps"][0]["arrival_time"], "13:30");
}

#[tokio::test]
async fn route_planning_uses_webhook_when_reachable() {
    let server = MockServer::start().await;
    mount_rows(&server, sample_rows()).await;
    Mock::given(method("POST"))
        .and(path(WEBHOOK_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [
                { "goto": "ATS-2", "distance_value": 0, "duration_value": 0 },
                { "goto": "ATS-1", "distance_value": 21000, "duration_value": 1500 }
            ],
            "origin": "13.75,100.5",
            "destination": "13.75,100.5",
            "waypoints": ["13.6,100.7", "14.1,100.6"],
            "mapsUrl": "https://maps.example/route"
        })))
        .mount(&server)
        .await;

    let webhook = RouteWebhookClient::new(
        &format!("{}{WEBHOOK_PATH}", server.uri()),
        5,
        "proproute-test",
    )
    .expect("webhook client");
    let app = app_with(
        test_config(&server.uri(), Environment::Test, 1024),
        RouteAssembler::new(Some(webhook), false, 420),
    );

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/route-planning",
            &serde_json::json!({
                "user_latitude": 13.75,
                "user_longtitude": 100.5,
                "propertyid_list": "ATS-1,ATS-2",
                "start_time": "08:30"
            }),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["data"]["source"], "webhook");
    assert_eq!(json["data"]["mapsUrl"], "https://maps.example/route");
    assert_eq!(json["data"]["steps"][1]["goto"], "ATS-1");
    assert_eq!(json["data"]["steps"][1]["arrival_time"], "08:55");
}

#[tokio::test]
async fn route_planning_without_fallback_reports_500() {
    let server = MockServer::start().await;
    mount_rows(&server, sample_rows()).await;
    let app = app_with(
        test_config(&server.uri(), Environment::Production, 1024),
        RouteAssembler::new(None, false, 420),
    );

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/route-planning",
            &serde_json::json!({
                "user_latitude": 13.75,
                "user_longtitude": 100.5,
                "propertyid_list": "ATS-1"
            }),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn route_planning_rejects_empty_selection_with_400() {
    let server = MockServer::start().await;
    let response = test_app(&server)
        .oneshot(json_request(
            "POST",
            "/api/route-planning",
            &serde_json::json!({
                "user_latitude": 13.75,
                "user_longtitude": 100.5,
                "propertyid_list": ""
            }),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn upload_imports_csv_rows() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(APPEND_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(2)
        .mount(&server)
        .await;

    let csv = "Property ID (ATS),Landlord name or Company name\nATS-20,Somchai\nATS-21,Malee\n";
    let response = test_app(&server)
        .oneshot(multipart_request("new.csv", csv))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["data"]["total_rows"], 2);
    assert_eq!(json["data"]["imported"], 2);
}

#[tokio::test]
async fn upload_rejects_unsupported_extension_before_any_write() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let response = test_app(&server)
        .oneshot(multipart_request("notes.txt", "ATS-1,Somchai\n"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert!(json["error"]["message"]
        .as_str()
        .unwrap()
        .contains("unsupported file type"));
}

#[tokio::test]
async fn upload_over_limit_is_413() {
    let server = MockServer::start().await;
    let app = app_with(
        test_config(&server.uri(), Environment::Test, 64),
        RouteAssembler::new(None, true, 420),
    );
    let big = "ATS-1,Somchai\n".repeat(50);

    let response = app
        .oneshot(multipart_request("big.csv", &big))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn webhook_stub_only_mounted_in_development() {
    let server = MockServer::start().await;
    let payload = serde_json::json!({
        "user_latitude": 13.75,
        "user_longtitude": 100.5,
        "propertyid_list": "A,B",
        "user_timeselect": 1_672_538_400
    });

    let dev = app_with(
        test_config(&server.uri(), Environment::Development, 1024),
        RouteAssembler::new(None, true, 420),
    );
    let response = dev
        .oneshot(json_request(
            "POST",
            "/webhook-test/googlemap-route-calculator",
            &payload,
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["data"].as_array().map(Vec::len), Some(2));
    assert_eq!(json["data"][0]["goto"], "A");

    let response = test_app(&server)
        .oneshot(json_request(
            "POST",
            "/webhook-test/googlemap-route-calculator",
            &payload,
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
