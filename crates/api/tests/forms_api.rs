//! HTTP-level integration tests for the contact and registration endpoints.
//!
//! Uses Axum's `tower::ServiceExt` to send requests directly to the router.
//! The form endpoints never touch the database, so the pool is a lazy
//! handle and no live PostgreSQL instance is required.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use tokio::sync::mpsc;
use tower::ServiceExt;

use kvp_api::config::ServerConfig;
use kvp_api::mailer::{ContactNotifier, MailError};
use kvp_api::router::build_app_router;
use kvp_api::state::AppState;
use kvp_core::contact::ContactSubmission;

/// Records each delivery by sending the submitter's email on a channel.
struct RecordingNotifier {
    deliveries: mpsc::UnboundedSender<String>,
}

impl RecordingNotifier {
    fn channel() -> (Arc<Self>, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Arc::new(Self { deliveries: tx }), rx)
    }
}

#[async_trait]
impl ContactNotifier for RecordingNotifier {
    async fn notify(&self, submission: &ContactSubmission) -> Result<(), MailError> {
        let _ = self.deliveries.send(submission.email.clone());
        Ok(())
    }
}

/// Build a test `ServerConfig` with safe defaults.
fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
    }
}

/// Build the application router with the production middleware stack and a
/// lazy (never-connected) database pool.
fn build_test_app() -> Router {
    build_test_app_with_notifier(None)
}

fn build_test_app_with_notifier(mailer: Option<Arc<dyn ContactNotifier>>) -> Router {
    let pool = PgPoolOptions::new()
        .connect_lazy("postgres://unused@localhost/unused")
        .expect("lazy pool");
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        mailer,
    };
    build_app_router(state, &config)
}

async fn post_json(app: Router, uri: &str, body: Value) -> Response<axum::body::Body> {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

async fn get(app: Router, uri: &str) -> Response<axum::body::Body> {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_string(response: Response<axum::body::Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: Response<axum::body::Body>) -> Value {
    serde_json::from_str(&body_string(response).await).unwrap()
}

fn valid_entry_payload() -> Value {
    json!({
        "name_kanji": "高専 太郎",
        "name_kana": "こうせん たろう",
        "email": "taro@example.com",
        "gender": "男性",
        "birth_year": "1995",
        "birth_month": "2",
        "birth_day": "28",
        "school": "仙台高等専門学校",
        "grade": "本科4年生",
        "major": "情報工学科",
        "chat_handle": "taro.kosen",
        "twitter": "foo",
        "motivation": "起業に興味があります",
        "referral_sources": ["その他"],
        "mail_opt_in": "1",
    })
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_reports_unreachable_database() {
    let response = get(build_test_app(), "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["database"], "unreachable");
}

// ---------------------------------------------------------------------------
// Contact
// ---------------------------------------------------------------------------

#[tokio::test]
async fn contact_valid_submission_is_accepted() {
    let payload = json!({
        "name_kanji": "高専 花子",
        "name_kana": "こうせん はなこ",
        "email": "hanako@example.com",
        "affiliation": "明石工業高等専門学校",
        "body": "質問があります。",
    });
    let response = post_json(build_test_app(), "/api/v1/contact", payload).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "accepted");
}

#[tokio::test]
async fn contact_valid_submission_is_delivered_to_notifier() {
    let (notifier, mut deliveries) = RecordingNotifier::channel();
    let app = build_test_app_with_notifier(Some(notifier));
    let payload = json!({
        "name_kanji": "高専 花子",
        "name_kana": "こうせん はなこ",
        "email": "hanako@example.com",
        "affiliation": "明石工業高等専門学校",
        "body": "質問があります。",
    });
    let response = post_json(app, "/api/v1/contact", payload).await;
    assert_eq!(response.status(), StatusCode::OK);

    // Delivery is spawned after the response; wait for it.
    assert_eq!(deliveries.recv().await.as_deref(), Some("hanako@example.com"));
}

#[tokio::test]
async fn contact_invalid_submission_never_reaches_notifier() {
    let (notifier, mut deliveries) = RecordingNotifier::channel();
    let app = build_test_app_with_notifier(Some(notifier));
    let response = post_json(
        app,
        "/api/v1/contact",
        json!({ "email": "hanako@example.com" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // The handler rejects before delivery; nothing is ever spawned.
    assert!(deliveries.try_recv().is_err());
}

#[tokio::test]
async fn contact_missing_fields_return_field_keyed_errors() {
    let response = post_json(
        build_test_app(),
        "/api/v1/contact",
        json!({ "email": "hanako@example.com" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["fields"]["body"][0], "is required");
    assert!(json["fields"].get("email").is_none());
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

#[tokio::test]
async fn registration_options_lists_all_schools() {
    let response = get(build_test_app(), "/api/v1/event/options").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["schools"].as_array().unwrap().len(), 56);
    assert_eq!(json["data"]["grades"].as_array().unwrap().len(), 7);
    assert_eq!(json["data"]["referral_sources"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn valid_entry_is_returned_as_csv_attachment() {
    let response = post_json(
        build_test_app(),
        "/api/v1/event/entries",
        valid_entry_payload(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"],
        "text/csv; charset=utf-8"
    );

    let csv = body_string(response).await;
    let rows: Vec<&str> = csv.split("\r\n").filter(|r| !r.is_empty()).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].split(',').count(), 16);
    assert!(csv.contains("http://twitter.com/foo"));
}

#[tokio::test]
async fn invalid_entry_reports_every_failing_field() {
    let mut payload = valid_entry_payload();
    payload["email"] = json!("a..b@example.com");
    payload["birth_day"] = json!("31"); // 1995-02-31
    payload["motivation"] = json!("");

    let response = post_json(build_test_app(), "/api/v1/event/entries", payload).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let json = body_json(response).await;
    assert_eq!(json["fields"]["email"][0], "is not a valid email address");
    assert_eq!(json["fields"]["birthday"][0], "must be a valid date");
    assert_eq!(json["fields"]["motivation"][0], "is required");
}

#[tokio::test]
async fn unknown_payload_keys_are_ignored() {
    let mut payload = valid_entry_payload();
    payload["is_admin"] = json!(true);
    let response = post_json(build_test_app(), "/api/v1/event/entries", payload).await;
    assert_eq!(response.status(), StatusCode::OK);
}
