//! The notification dispatch facade.
//!
//! Every dispatch renders one template, makes one delivery attempt and
//! appends one audit record, in that order. Sending and logging are not
//! transactional: a crash between the two leaves a sent email unlogged.
//! Nothing here retries or deduplicates; callers own both.

mod input;

use std::sync::Arc;

use chrono::Utc;
use reqwest::Url;
use serde::Serialize;
use serde_json::json;
use tracing::Instrument;

pub use self::input::{
    BloodTestAnalysis, HealthAuditResult, HealthScoreResult, SupplementCheck, WaitlistSignup,
};
use crate::domain::notification::{NotificationRecord, NotificationStatus};
use crate::domain::subscriber::email::Email;
use crate::domain::subscriber::DEFAULT_SOURCE;
use crate::domain::template::{
    self, format_date, RenderedEmail, TemplateData, TemplateError, TemplateId,
    DEFAULT_MEMBER_COUNT,
};
use crate::email::{DeliveryOutcome, EmailClient};
use crate::store::NotificationLog;

const PROVIDER: &str = "brevo";

/// What the caller of a dispatch gets back, whatever happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DispatchResult {
    fn failure(error: String) -> Self {
        Self {
            success: false,
            message_id: None,
            error: Some(error),
        }
    }
}

impl From<DeliveryOutcome> for DispatchResult {
    fn from(outcome: DeliveryOutcome) -> Self {
        match outcome {
            DeliveryOutcome::Delivered { message_id } => Self {
                success: true,
                message_id,
                error: None,
            },
            DeliveryOutcome::Failed(e) => Self::failure(e.to_string()),
        }
    }
}

/// A finished dispatch together with the email that was attempted.
#[derive(Debug, Clone)]
pub struct Dispatched {
    pub result: DispatchResult,
    pub email: RenderedEmail,
}

#[derive(Clone)]
pub struct Dispatcher {
    email_client: EmailClient,
    log: Arc<dyn NotificationLog>,
    site_url: String,
}

impl Dispatcher {
    pub fn new(email_client: EmailClient, log: Arc<dyn NotificationLog>, site_url: String) -> Self {
        Self {
            email_client,
            log,
            site_url: site_url.trim_end_matches('/').to_owned(),
        }
    }

    pub async fn send_waitlist_confirmation(
        &self,
        recipient: &Email,
        signup: WaitlistSignup,
    ) -> DispatchResult {
        self.dispatch_or_report(recipient, TemplateId::Waitlist, signup.into())
            .await
    }

    pub async fn send_blood_test_notification(
        &self,
        recipient: &Email,
        analysis: BloodTestAnalysis,
    ) -> DispatchResult {
        self.dispatch_or_report(recipient, TemplateId::BloodTest, analysis.into())
            .await
    }

    pub async fn send_health_score_notification(
        &self,
        recipient: &Email,
        result: HealthScoreResult,
    ) -> DispatchResult {
        self.dispatch_or_report(recipient, TemplateId::HealthScore, result.into())
            .await
    }

    pub async fn send_health_audit_notification(
        &self,
        recipient: &Email,
        result: HealthAuditResult,
    ) -> DispatchResult {
        self.dispatch_or_report(recipient, TemplateId::HealthAudit, result.into())
            .await
    }

    pub async fn send_supplement_notification(
        &self,
        recipient: &Email,
        check: SupplementCheck,
    ) -> DispatchResult {
        self.dispatch_or_report(recipient, TemplateId::Supplements, check.into())
            .await
    }

    async fn dispatch_or_report(
        &self,
        recipient: &Email,
        template_id: TemplateId,
        data: TemplateData,
    ) -> DispatchResult {
        match self.dispatch(recipient, template_id, data).await {
            Ok(dispatched) => dispatched.result,
            Err(e) => {
                tracing::error!(error = ?e, "failed to render the notification email");
                DispatchResult::failure(e.to_string())
            }
        }
    }

    /// Renders `template_id` with `data`, sends it to `recipient` and records
    /// the attempt. Only a rendering failure is returned as an error; delivery
    /// failures are part of the result.
    #[tracing::instrument(
        name = "Dispatch notification email",
        skip(self, data),
        fields(recipient = %recipient, template = %template_id)
    )]
    pub async fn dispatch(
        &self,
        recipient: &Email,
        template_id: TemplateId,
        data: TemplateData,
    ) -> Result<Dispatched, TemplateError> {
        let data = self.with_defaults(recipient, template_id, data);
        let email = template::render(template_id, &data)?;
        let notification_type = template_id.notification_type();

        let outcome = self
            .email_client
            .send_email(
                recipient,
                &email.subject,
                &email.html,
                None,
                &[notification_type.as_ref()],
            )
            .await;

        let (status, metadata) = match &outcome {
            DeliveryOutcome::Delivered { message_id } => (
                NotificationStatus::Sent,
                json!({
                    "subject": email.subject,
                    "template_data": data,
                    "sent_via": PROVIDER,
                    "provider_response": { "message_id": message_id },
                }),
            ),
            DeliveryOutcome::Failed(e) => (
                NotificationStatus::Failed,
                json!({
                    "subject": email.subject,
                    "template_data": data,
                    "sent_via": PROVIDER,
                    "error": e.to_string(),
                }),
            ),
        };
        tracing::info!(%status, "notification email attempted");

        self.record(NotificationRecord::attempt(
            recipient,
            template_id,
            status,
            metadata,
        ))
        .await;

        Ok(Dispatched {
            result: outcome.into(),
            email,
        })
    }

    /// The latest notification records for `recipient`, newest first.
    pub async fn history(
        &self,
        recipient: &Email,
        limit: i64,
    ) -> anyhow::Result<Vec<NotificationRecord>> {
        self.log.history(recipient.as_ref(), limit).await
    }

    /// Writes the audit record on its own task. Failures are reported and
    /// swallowed: the email has already been attempted.
    async fn record(&self, record: NotificationRecord) {
        let log = Arc::clone(&self.log);
        let task = tokio::spawn(async move { log.record(record).await }.in_current_span());

        match task.await {
            Ok(Ok(())) => tracing::debug!("notification attempt logged"),
            Ok(Err(e)) => tracing::warn!(error = ?e, "failed to log the notification attempt"),
            Err(e) => tracing::warn!(error = %e, "notification log task did not complete"),
        }
    }

    fn with_defaults(
        &self,
        recipient: &Email,
        template_id: TemplateId,
        mut data: TemplateData,
    ) -> TemplateData {
        let (date_key, link_key, path) = match template_id {
            TemplateId::Waitlist => ("signup_date", "early_access_link", "/early-access"),
            TemplateId::BloodTest => ("analysis_date", "view_results_link", "/results"),
            TemplateId::HealthScore => ("assessment_date", "view_results_link", "/health-score"),
            TemplateId::HealthAudit => ("audit_date", "download_report_link", "/audit-report"),
            TemplateId::Supplements => {
                ("check_date", "view_results_link", "/supplement-results")
            }
        };

        data.insert_default("to_email", recipient.as_ref());
        data.insert_default("unsubscribe_link", self.unsubscribe_link(recipient));
        data.insert_default(date_key, format_date(Utc::now().date_naive()));
        data.insert_default(link_key, format!("{}{}", self.site_url, path));
        if template_id == TemplateId::Waitlist {
            data.insert_default("member_count", DEFAULT_MEMBER_COUNT);
            data.insert_default("signup_source", DEFAULT_SOURCE);
        }
        data
    }

    fn unsubscribe_link(&self, recipient: &Email) -> String {
        let base = format!("{}/unsubscribe", self.site_url);
        match Url::parse_with_params(&base, &[("email", recipient.as_ref())]) {
            Ok(url) => url.into(),
            Err(_) => base,
        }
    }
}
