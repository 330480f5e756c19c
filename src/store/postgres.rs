use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use super::{NotificationLog, SubscriberStore};
use crate::domain::notification::NotificationRecord;
use crate::domain::subscriber::{CaptureOutcome, NewSubscriber};

/// Postgres-backed implementation of every store trait.
#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.db).await
    }
}

#[derive(sqlx::FromRow)]
struct NotificationRow {
    id: Uuid,
    email: String,
    notification_type: String,
    template_id: String,
    status: String,
    metadata: Json<serde_json::Value>,
    sent_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl TryFrom<NotificationRow> for NotificationRecord {
    type Error = anyhow::Error;

    fn try_from(row: NotificationRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            email: row.email,
            notification_type: row
                .notification_type
                .parse()
                .with_context(|| format!("unknown notification type {:?}", row.notification_type))?,
            template_id: row
                .template_id
                .parse()
                .with_context(|| format!("unknown template id {:?}", row.template_id))?,
            status: row
                .status
                .parse()
                .with_context(|| format!("unknown notification status {:?}", row.status))?,
            metadata: row.metadata.0,
            sent_at: row.sent_at,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl NotificationLog for PgStore {
    #[tracing::instrument(
        name = "Insert notification record",
        skip(self, record),
        fields(email = %record.email, status = %record.status)
    )]
    async fn record(&self, record: NotificationRecord) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO email_notifications
                (id, email, notification_type, template_id, status, metadata, sent_at, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(record.id)
        .bind(&record.email)
        .bind(record.notification_type.as_ref())
        .bind(record.template_id.as_ref())
        .bind(record.status.as_ref())
        .bind(Json(&record.metadata))
        .bind(record.sent_at)
        .bind(record.created_at)
        .execute(&self.db)
        .await
        .context("Failed to insert the notification record.")?;

        Ok(())
    }

    #[tracing::instrument(name = "Fetch notification history", skip(self))]
    async fn history(&self, email: &str, limit: i64) -> anyhow::Result<Vec<NotificationRecord>> {
        sqlx::query_as::<_, NotificationRow>(
            r#"
            SELECT id, email, notification_type, template_id, status, metadata, sent_at, created_at
            FROM email_notifications
            WHERE email = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(email)
        .bind(limit)
        .fetch_all(&self.db)
        .await
        .context("Failed to fetch the notification history.")?
        .into_iter()
        .map(NotificationRecord::try_from)
        .collect()
    }
}

#[async_trait]
impl SubscriberStore for PgStore {
    #[tracing::instrument(
        name = "Capture waitlist subscriber",
        skip(self, subscriber),
        fields(email = %subscriber.email, source = %subscriber.source)
    )]
    async fn capture(&self, subscriber: &NewSubscriber) -> anyhow::Result<CaptureOutcome> {
        let now = Utc::now();
        let inserted: Option<(Uuid,)> = sqlx::query_as(
            r#"
            INSERT INTO subscribers (id, email, name, source, metadata, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            ON CONFLICT (email) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(subscriber.email.as_ref())
        .bind(subscriber.name.as_ref().map(AsRef::<str>::as_ref))
        .bind(&subscriber.source)
        .bind(Json(json!({ "timestamp": now })))
        .bind(now)
        .fetch_optional(&self.db)
        .await
        .context("Failed to insert the subscriber.")?;

        if inserted.is_some() {
            return Ok(CaptureOutcome::Created);
        }

        // Already subscribed: remember any new signup source.
        sqlx::query(
            r#"
            UPDATE subscribers
            SET metadata = metadata || jsonb_build_object(
                    'sources',
                    COALESCE(metadata->'sources', jsonb_build_array(source)) || to_jsonb($2::text)
                ),
                updated_at = $3
            WHERE email = $1
              AND source <> $2
              AND NOT COALESCE(metadata->'sources', '[]'::jsonb) ? $2
            "#,
        )
        .bind(subscriber.email.as_ref())
        .bind(&subscriber.source)
        .bind(now)
        .execute(&self.db)
        .await
        .context("Failed to record the additional signup source.")?;

        Ok(CaptureOutcome::AlreadySubscribed)
    }
}
