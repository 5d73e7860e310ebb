mod helpers;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use gusto_registration::error::StoreError;
use gusto_registration::repositories::FailPoint;
use gusto_registration::routes;
use helpers::*;
use serde_json::{json, Value};
use tower::ServiceExt;

const BOUNDARY: &str = "----gusto-test-boundary";
const MAX_UPLOAD: usize = 5 * 1024 * 1024;

/// Hand-built `multipart/form-data` body
struct Form {
    body: Vec<u8>,
}

impl Form {
    fn new() -> Self {
        Self { body: Vec::new() }
    }

    fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
        self
    }

    fn file(mut self, name: &str, filename: &str, content_type: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                BOUNDARY, name, filename, content_type
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    fn into_request(mut self) -> Request<Body> {
        self.body
            .extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
        Request::builder()
            .method("POST")
            .uri("/api/register")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(self.body))
            .unwrap()
    }
}

fn valid_form(email: &str, mobile: &str, events: &str) -> Form {
    Form::new()
        .text("name", "A")
        .text("email", email)
        .text("mobile", mobile)
        .text("college", "C")
        .text("year", "2nd Year")
        .text("selectedEventIds", events)
        .text("transactionId", "TXN1")
        .file("screenshot", "payment.png", "image/png", PNG_BYTES)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_register_returns_receipt() {
    let app = TestApp::new();
    let router = routes::app(app.state(), MAX_UPLOAD);

    let (status, body) = send(
        router,
        valid_form("a@x.com", "9000000001", r#"["icon-iq"]"#).into_request(),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["events"], json!(["Icon IQ"]));
    assert_eq!(body["amount"], json!(400.0));
    assert_eq!(body["hasSubmissionEvents"], json!(false));
    let code = body["uniqueCode"].as_str().unwrap();
    assert!(gusto_registration::models::is_unique_code(code), "{}", code);

    let participant = &app.store.participants()[0];
    assert_eq!(participant.name, "A");
    assert_eq!(participant.food_preference, "VEG");
}

#[tokio::test]
async fn test_register_with_fallback_and_food_preference() {
    let app = TestApp::new();
    let router = routes::app(app.state(), MAX_UPLOAD);

    let request = valid_form("a@x.com", "9000000001", r#"["paper-presentation"]"#)
        .text("fallbackSelections", r#"{"paper-presentation":"icon-iq"}"#)
        .text("foodPreference", "NON_VEG")
        .into_request();
    let (status, body) = send(router, request).await;

    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["hasSubmissionEvents"], json!(true));
    assert_eq!(app.store.participants()[0].food_preference, "NON_VEG");
    assert_eq!(
        app.store.registrations()[0].fallback_event_id.as_deref(),
        Some("icon-iq")
    );
}

#[tokio::test]
async fn test_register_validation_error_shape() {
    let app = TestApp::new();
    let router = routes::app(app.state(), MAX_UPLOAD);

    let (status, body) = send(
        router,
        valid_form("a@x.com", "12345", r#"["icon-iq"]"#).into_request(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Mobile must be 10 digits" }));
    app.assert_nothing_written();
}

#[tokio::test]
async fn test_register_unknown_event() {
    let app = TestApp::new();
    let router = routes::app(app.state(), MAX_UPLOAD);

    let (status, body) = send(
        router,
        valid_form("a@x.com", "9000000001", r#"["does-not-exist"]"#).into_request(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("Invalid event id(s): does-not-exist"));
    app.assert_nothing_written();
}

#[tokio::test]
async fn test_register_missing_screenshot() {
    let app = TestApp::new();
    let router = routes::app(app.state(), MAX_UPLOAD);

    let request = Form::new()
        .text("name", "A")
        .text("email", "a@x.com")
        .text("mobile", "9000000001")
        .text("college", "C")
        .text("year", "2nd Year")
        .text("selectedEventIds", r#"["icon-iq"]"#)
        .text("transactionId", "TXN1")
        .into_request();
    let (status, body) = send(router, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("Payment screenshot is required"));
}

#[tokio::test]
async fn test_register_malformed_fields() {
    let app = TestApp::new();

    let (status, body) = send(
        routes::app(app.state(), MAX_UPLOAD),
        valid_form("a@x.com", "9000000001", "icon-iq").into_request(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        json!("selectedEventIds must be a JSON array of event ids")
    );

    let (status, body) = send(
        routes::app(app.state(), MAX_UPLOAD),
        valid_form("a@x.com", "9000000001", r#"["icon-iq"]"#)
            .text("foodPreference", "vegan")
            .into_request(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("Invalid food preference: vegan"));

    app.assert_nothing_written();
}

#[tokio::test]
async fn test_malformed_fields_do_not_jump_the_validation_order() {
    let app = TestApp::new();

    let request = Form::new()
        .text("email", "a@x.com")
        .text("mobile", "12345")
        .text("college", "C")
        .text("year", "2nd Year")
        .text("selectedEventIds", "icon-iq")
        .text("fallbackSelections", "[]")
        .text("foodPreference", "vegan")
        .text("transactionId", "TXN1")
        .into_request();
    let (status, body) = send(routes::app(app.state(), MAX_UPLOAD), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("Missing required field: name"));

    // Once the contact fields are valid the food preference is next
    let request = Form::new()
        .text("name", "A")
        .text("email", "a@x.com")
        .text("mobile", "9000000001")
        .text("college", "C")
        .text("year", "2nd Year")
        .text("selectedEventIds", "icon-iq")
        .text("foodPreference", "vegan")
        .text("transactionId", "TXN1")
        .file("screenshot", "payment.png", "image/png", PNG_BYTES)
        .into_request();
    let (_, body) = send(routes::app(app.state(), MAX_UPLOAD), request).await;
    assert_eq!(body["error"], json!("Invalid food preference: vegan"));

    app.assert_nothing_written();
}

#[tokio::test]
async fn test_oversized_upload_is_reported_as_too_large() {
    let app = TestApp::new();
    let router = routes::app(app.state(), 4 * 1024);

    let request = valid_form("a@x.com", "9000000001", r#"["icon-iq"]"#)
        .file("screenshot", "huge.png", "image/png", &vec![0u8; 16 * 1024])
        .into_request();
    let (status, body) = send(router, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("Screenshot is too large"));
    app.assert_nothing_written();
}

#[tokio::test]
async fn test_register_conflict_shape() {
    let app = TestApp::new();

    let (status, _) = send(
        routes::app(app.state(), MAX_UPLOAD),
        valid_form("a@x.com", "9000000001", r#"["icon-iq"]"#).into_request(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        routes::app(app.state(), MAX_UPLOAD),
        valid_form("a@x.com", "9000000002", r#"["icon-iq"]"#).into_request(),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body, json!({ "error": "Email or mobile already registered" }));
}

#[tokio::test]
async fn test_register_dependency_failure_shape() {
    let app = TestApp::new();
    app.store.fail_at(
        FailPoint::Begin,
        StoreError::Connection("connection refused".to_string()),
    );

    let (status, body) = send(
        routes::app(app.state(), MAX_UPLOAD),
        valid_form("a@x.com", "9000000001", r#"["icon-iq"]"#).into_request(),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], json!("Registration failed."));
    assert!(body["detail"].as_str().unwrap().len() > 0);
    assert!(body["reason"]
        .as_str()
        .unwrap()
        .contains("connection refused"));
}

#[tokio::test]
async fn test_upload_failure_shape() {
    let app = TestApp::new();
    app.blobs.set_failing(true);

    let (status, body) = send(
        routes::app(app.state(), MAX_UPLOAD),
        valid_form("a@x.com", "9000000001", r#"["icon-iq"]"#).into_request(),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], json!("Registration failed."));
    app.assert_nothing_written();
}

#[tokio::test]
async fn test_catalog_endpoints() {
    let app = TestApp::new();

    let (status, events) = send(routes::app(app.state(), MAX_UPLOAD), get("/api/events")).await;
    assert_eq!(status, StatusCode::OK);
    let events = events.as_array().unwrap();
    assert_eq!(events.len(), 8);
    let paper = events.iter().find(|e| e["id"] == "paper-presentation").unwrap();
    assert_eq!(paper["admissionMode"], json!("ABSTRACT"));
    assert_eq!(paper["category"], json!("Technical"));

    let (status, passes) = send(routes::app(app.state(), MAX_UPLOAD), get("/api/passes")).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = passes
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["solo", "duo", "all-access"]);
}

#[tokio::test]
async fn test_selection_check_endpoint() {
    let app = TestApp::new();

    let (status, body) = send(
        routes::app(app.state(), MAX_UPLOAD),
        json_request(
            "POST",
            "/api/selection/check",
            json!({ "selectedEventIds": ["icon-iq"], "candidateId": "meme-hunt" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], json!(true));
    assert!(body.get("reason").is_none());
    assert_eq!(body["counts"]["nonTech"], json!(2));
    assert_eq!(body["counts"]["maxTotal"], json!(4));

    let (status, body) = send(
        routes::app(app.state(), MAX_UPLOAD),
        json_request(
            "POST",
            "/api/selection/check",
            json!({ "passId": "solo", "selectedEventIds": ["icon-iq"], "candidateId": "meme-hunt" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], json!(false));
    assert_eq!(body["reason"], json!("Your pass allows at most 1 event(s)"));
    assert_eq!(body["counts"]["total"], json!(1));
}

#[tokio::test]
async fn test_fallbacks_endpoint() {
    let app = TestApp::new();

    let (status, body) = send(
        routes::app(app.state(), MAX_UPLOAD),
        json_request(
            "POST",
            "/api/selection/fallbacks",
            json!({ "selectedEventIds": ["paper-presentation", "icon-iq"], "abstractEventId": "paper-presentation" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = body["fallbacks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["id"].as_str().unwrap())
        .collect();
    assert!(!ids.contains(&"paper-presentation"));
    assert!(!ids.contains(&"project-expo"));
    assert!(!ids.contains(&"icon-iq"));
    assert!(ids.contains(&"meme-hunt"));

    let (status, _) = send(
        routes::app(app.state(), MAX_UPLOAD),
        json_request(
            "POST",
            "/api/selection/fallbacks",
            json!({ "selectedEventIds": [], "abstractEventId": "icon-iq" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health_without_database() {
    let app = TestApp::new();
    let (status, body) = send(routes::app(app.state(), MAX_UPLOAD), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("ok"));
}
