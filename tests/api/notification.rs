use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::helper::spawn_app;

#[tokio::test]
async fn notifications_lists_the_latest_attempts_first() {
    let app = spawn_app().await;

    Mock::given(path("/v3/smtp/email"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "messageId": "m-1" })))
        .expect(2)
        .mount(&app.email_server)
        .await;

    for template in ["waitlist", "healthAudit"] {
        app.post_send_email(json!({ "to": "bob@example.com", "template": template }))
            .await;
    }

    let response = app.get_notifications("email=bob@example.com").await;

    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["notification_type"], "health_audit_completion");
    assert_eq!(data[1]["notification_type"], "waitlist_confirmation");
    assert_eq!(data[0]["status"], "sent");
}

#[tokio::test]
async fn notifications_honours_the_limit() {
    let app = spawn_app().await;

    Mock::given(path("/v3/smtp/email"))
        .respond_with(ResponseTemplate::new(201))
        .mount(&app.email_server)
        .await;

    for _ in 0..3 {
        app.post_send_email(json!({ "to": "bob@example.com", "template": "waitlist" }))
            .await;
    }

    let response = app.get_notifications("email=bob@example.com&limit=2").await;
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn notifications_returns_a_400_for_an_invalid_email() {
    let app = spawn_app().await;

    let response = app.get_notifications("email=not-an-email").await;

    assert_eq!(400, response.status().as_u16());
}
