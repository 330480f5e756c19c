use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::subscriber::email::Email;
use super::template::TemplateId;

/// Audit category of a notification email.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NotificationType {
    WaitlistConfirmation,
    BloodTestCompletion,
    HealthScoreCompletion,
    HealthAuditCompletion,
    SupplementCheckCompletion,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum NotificationStatus {
    Sent,
    Failed,
}

/// One row of the notification audit log. Written once per dispatch attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationRecord {
    pub id: Uuid,
    pub email: String,
    pub notification_type: NotificationType,
    pub template_id: TemplateId,
    pub status: NotificationStatus,
    pub metadata: serde_json::Value,
    pub sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl NotificationRecord {
    /// A record for an attempt that just finished. `sent_at` is set iff the
    /// email was sent.
    pub fn attempt(
        recipient: &Email,
        template_id: TemplateId,
        status: NotificationStatus,
        metadata: serde_json::Value,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email: recipient.as_ref().to_owned(),
            notification_type: template_id.notification_type(),
            template_id,
            status,
            metadata,
            sent_at: (status == NotificationStatus::Sent).then_some(now),
            created_at: now,
        }
    }
}
