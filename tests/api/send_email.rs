use campaign_mailer::domain::notification::NotificationStatus;
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::helper::spawn_app;

#[tokio::test]
async fn send_email_delivers_a_rendered_template() {
    let app = spawn_app().await;

    Mock::given(path("/v3/smtp/email"))
        .and(method("POST"))
        .and(header("api-key", "test-key"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "messageId": "abc123" })))
        .expect(1)
        .mount(&app.email_server)
        .await;

    let response = app
        .post_send_email(json!({
            "to": "alice@example.com",
            "template": "bloodTest",
            "data": { "user_name": "Alice", "health_score": 82 }
        }))
        .await;

    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["messageId"], "abc123");
    assert_eq!(body["message"], "Email processed successfully");
    assert_eq!(body["preview"]["to"], "alice@example.com");
    assert!(body["preview"]["subject"]
        .as_str()
        .unwrap()
        .ends_with("Score: 82"));
    assert!(body["preview"]["html"].as_str().unwrap().ends_with("..."));

    let records = app.store.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].status, NotificationStatus::Sent);
    assert_eq!(records[0].email, "alice@example.com");
    assert!(records[0].sent_at.is_some());
}

#[tokio::test]
async fn send_email_rejects_unknown_templates() {
    let app = spawn_app().await;

    Mock::given(path("/v3/smtp/email"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&app.email_server)
        .await;

    let response = app
        .post_send_email(json!({ "to": "alice@example.com", "template": "newsletter" }))
        .await;

    assert_eq!(400, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], 400);
    assert!(body["message"].as_str().unwrap().contains("newsletter"));
    assert!(app.store.records().is_empty());
}

#[tokio::test]
async fn send_email_returns_a_400_when_fields_are_missing_or_invalid() {
    let app = spawn_app().await;

    Mock::given(path("/v3/smtp/email"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&app.email_server)
        .await;

    let test_cases = [
        (json!({ "template": "waitlist" }), "missing recipient"),
        (json!({ "to": "alice@example.com" }), "missing template"),
        (
            json!({ "to": "definitely-not-an-email", "template": "waitlist" }),
            "invalid recipient",
        ),
        (json!({}), "empty body"),
    ];

    for (body, description) in test_cases {
        let response = app.post_send_email(body).await;
        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not return a 400 Bad Request when the payload was {}.",
            description
        );
    }
}

#[tokio::test]
async fn send_email_reports_provider_failures_in_the_body() {
    let app = spawn_app().await;

    Mock::given(path("/v3/smtp/email"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .expect(1)
        .mount(&app.email_server)
        .await;

    let response = app
        .post_send_email(json!({ "to": "alice@example.com", "template": "waitlist" }))
        .await;

    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Email could not be delivered");
    assert!(body["error"].as_str().unwrap().contains("upstream exploded"));
    assert!(body.get("messageId").is_none());

    let records = app.store.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].status, NotificationStatus::Failed);
    assert!(records[0].sent_at.is_none());
}

#[tokio::test]
async fn options_requests_are_answered_by_the_cors_layer_on_every_route() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    for route in ["send-email", "subscribe", "notifications"] {
        for origin in [Some("https://wuksy.com"), None] {
            let mut request =
                client.request(reqwest::Method::OPTIONS, format!("{}/{}", app.addr, route));
            if let Some(origin) = origin {
                request = request.header("Origin", origin);
            }
            let response = request.send().await.expect("The request should succeed.");

            assert_eq!(200, response.status().as_u16(), "OPTIONS /{}", route);
            assert_eq!(
                response
                    .headers()
                    .get("access-control-allow-origin")
                    .and_then(|v| v.to_str().ok()),
                Some("*")
            );
            assert_eq!(response.text().await.unwrap(), "");
        }
    }
}

#[tokio::test]
async fn preflight_requests_allow_the_client_headers() {
    let app = spawn_app().await;

    let response = reqwest::Client::new()
        .request(reqwest::Method::OPTIONS, format!("{}/send-email", app.addr))
        .header("Origin", "https://wuksy.com")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "apikey, x-client-info, content-type")
        .send()
        .await
        .expect("The request should succeed.");

    assert_eq!(200, response.status().as_u16());
    let allowed = response
        .headers()
        .get("access-control-allow-headers")
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_lowercase();
    for header in ["authorization", "content-type", "x-client-info", "apikey"] {
        assert!(allowed.contains(header), "{} is not allowed", header);
    }
}
