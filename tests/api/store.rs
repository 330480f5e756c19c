use campaign_mailer::domain::notification::{NotificationRecord, NotificationStatus};
use campaign_mailer::domain::subscriber::{email::Email, CaptureOutcome, NewSubscriber};
use campaign_mailer::domain::template::TemplateId;
use campaign_mailer::store::{NotificationLog, SubscriberStore};
use chrono::{Duration, Utc};
use serde_json::{json, Value};

use crate::helper::spawn_store;

fn bob() -> Email {
    Email::try_from("bob@example.com").unwrap()
}

fn subscriber(source: &str) -> NewSubscriber {
    NewSubscriber {
        email: bob(),
        name: None,
        source: source.into(),
    }
}

fn attempt(template_id: TemplateId, status: NotificationStatus, minutes_ago: i64) -> NotificationRecord {
    let mut record = NotificationRecord::attempt(&bob(), template_id, status, json!({ "subject": "hi" }));
    record.created_at = Utc::now() - Duration::minutes(minutes_ago);
    record.sent_at = record.sent_at.map(|_| record.created_at);
    record
}

#[tokio::test]
async fn recorded_attempts_come_back_newest_first_within_the_limit() {
    let (store, _) = spawn_store().await;

    let oldest = attempt(TemplateId::Waitlist, NotificationStatus::Sent, 30);
    let middle = attempt(TemplateId::BloodTest, NotificationStatus::Failed, 20);
    let newest = attempt(TemplateId::HealthAudit, NotificationStatus::Sent, 10);
    for record in [&middle, &oldest, &newest] {
        store.record(record.clone()).await.unwrap();
    }
    let mut other = attempt(TemplateId::Waitlist, NotificationStatus::Sent, 0);
    other.email = "carol@example.com".into();
    store.record(other).await.unwrap();

    let history = store.history("bob@example.com", 2).await.unwrap();

    assert_eq!(history.len(), 2);
    assert_eq!(history[0].id, newest.id);
    assert_eq!(history[1].id, middle.id);
    assert_eq!(history[1].status, NotificationStatus::Failed);
    assert!(history[1].sent_at.is_none());
    assert_eq!(history[1].template_id, TemplateId::BloodTest);
    assert_eq!(history[0].metadata["subject"], "hi");
}

#[tokio::test]
async fn a_sent_record_without_sent_at_is_refused() {
    let (store, _) = spawn_store().await;

    let mut record = attempt(TemplateId::Waitlist, NotificationStatus::Sent, 0);
    record.sent_at = None;

    assert!(store.record(record).await.is_err());
    assert!(store.history("bob@example.com", 10).await.unwrap().is_empty());
}

#[tokio::test]
async fn concurrent_captures_of_one_email_create_a_single_subscriber() {
    let (store, db_pool) = spawn_store().await;

    let first = subscriber("main");
    let second = subscriber("main");
    let (a, b) = tokio::join!(store.capture(&first), store.capture(&second));
    let mut outcomes = [a.unwrap(), b.unwrap()];
    outcomes.sort_by_key(|outcome| !outcome.is_new());

    assert_eq!(
        outcomes,
        [CaptureOutcome::Created, CaptureOutcome::AlreadySubscribed]
    );
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM subscribers")
        .fetch_one(&db_pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn a_new_signup_source_is_merged_once() {
    let (store, db_pool) = spawn_store().await;

    store.capture(&subscriber("main")).await.unwrap();
    store.capture(&subscriber("quiz")).await.unwrap();
    store.capture(&subscriber("quiz")).await.unwrap();
    let outcome = store.capture(&subscriber("main")).await.unwrap();

    assert_eq!(outcome, CaptureOutcome::AlreadySubscribed);
    let (source, metadata): (String, sqlx::types::Json<Value>) =
        sqlx::query_as("SELECT source, metadata FROM subscribers WHERE email = $1")
            .bind("bob@example.com")
            .fetch_one(&db_pool)
            .await
            .unwrap();
    assert_eq!(source, "main");
    assert_eq!(metadata.0["sources"], json!(["main", "quiz"]));
}
