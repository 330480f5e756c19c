use campaign_mailer::domain::notification::NotificationType;
use serde_json::Value;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::helper::spawn_app;

#[tokio::test]
async fn subscribe_sends_a_waitlist_confirmation_to_new_subscribers() {
    let app = spawn_app().await;

    Mock::given(path("/v3/smtp/email"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&app.email_server)
        .await;

    let body = r#"{"name": "bulbasaur", "email": "bulbasaur@mail.com", "source": "landing"}"#;
    let response = app.post_subscriptions(body).await;

    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["isNew"], true);
    assert_eq!(body["confirmation"]["success"], true);

    assert_eq!(app.store.subscribers(), vec!["bulbasaur@mail.com"]);
    let records = app.store.records();
    assert_eq!(records.len(), 1);
    assert_eq!(
        records[0].notification_type,
        NotificationType::WaitlistConfirmation
    );
    assert_eq!(records[0].metadata["template_data"]["signup_source"], "landing");
}

#[tokio::test]
async fn subscribe_does_not_email_existing_subscribers() {
    let app = spawn_app().await;

    Mock::given(path("/v3/smtp/email"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&app.email_server)
        .await;

    let body = r#"{"email": "bulbasaur@mail.com"}"#;
    app.post_subscriptions(body).await;
    let response = app.post_subscriptions(body).await;

    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["isNew"], false);
    assert_eq!(body["message"], "Welcome back! You're already subscribed.");
    assert!(body.get("confirmation").is_none());
}

#[tokio::test]
async fn subscribe_returns_a_422_when_the_email_is_missing() {
    let app = spawn_app().await;
    let test_cases = [
        (r#"{"name": "bulbasaur"}"#, "missing the email"),
        ("{}", "missing both name and email"),
    ];

    for (invalid_body, error_message) in test_cases {
        let response = app.post_subscriptions(invalid_body).await;

        assert_eq!(
            422,
            response.status().as_u16(),
            "The API did not fail with 422 when the payload was {}",
            error_message
        )
    }
}

#[tokio::test]
async fn subscribe_returns_a_400_when_fields_are_present_but_invalid() {
    let app = spawn_app().await;
    let test_cases = vec![
        (r#"{"name": "bulbasaur", "email": ""}"#, "empty email"),
        (
            r#"{"name": "bulbasaur", "email": "definitely-not-an-email"}"#,
            "invalid email",
        ),
        (
            r#"{"name": "<script>", "email": "bulbasaur@mail.com"}"#,
            "markup in the name",
        ),
    ];

    for (body, description) in test_cases {
        let response = app.post_subscriptions(body).await;
        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not return a 400 Bad Request when the payload was {}.",
            description
        );
    }
    assert!(app.store.subscribers().is_empty());
}
