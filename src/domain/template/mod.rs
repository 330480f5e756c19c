//! Registry of the transactional email templates.
//!
//! Each [`TemplateId`] maps to exactly one [`EmailTemplate`] variant, which
//! owns fully-defaulted render data. Rendering never fails on missing input:
//! every field has a fallback.

mod data;
mod emails;

use askama::Template;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub use self::data::TemplateData;
pub use self::emails::{
    BloodTestEmail, HealthAuditEmail, HealthScoreEmail, SupplementsEmail, WaitlistEmail,
    DEFAULT_MEMBER_COUNT, DEFAULT_SITE_URL, DEFAULT_USER_NAME,
};
use super::notification::NotificationType;

#[derive(thiserror::Error, Debug)]
pub enum TemplateError {
    #[error("unknown email template `{0}`")]
    UnknownTemplate(String),
    #[error("failed to render the email body")]
    Render(#[from] askama::Error),
}

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
    strum::EnumIter,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum TemplateId {
    Waitlist,
    BloodTest,
    HealthScore,
    HealthAudit,
    Supplements,
}

impl TemplateId {
    /// Looks up a template by its public identifier, e.g. `bloodTest`.
    pub fn lookup(name: &str) -> Result<Self, TemplateError> {
        name.parse()
            .map_err(|_| TemplateError::UnknownTemplate(name.to_owned()))
    }

    pub fn notification_type(&self) -> NotificationType {
        match self {
            Self::Waitlist => NotificationType::WaitlistConfirmation,
            Self::BloodTest => NotificationType::BloodTestCompletion,
            Self::HealthScore => NotificationType::HealthScoreCompletion,
            Self::HealthAudit => NotificationType::HealthAuditCompletion,
            Self::Supplements => NotificationType::SupplementCheckCompletion,
        }
    }
}

#[derive(Debug, Clone)]
pub enum EmailTemplate {
    Waitlist(WaitlistEmail),
    BloodTest(BloodTestEmail),
    HealthScore(HealthScoreEmail),
    HealthAudit(HealthAuditEmail),
    Supplements(SupplementsEmail),
}

impl EmailTemplate {
    /// Builds the template for `id`, filling every absent field with its default.
    /// Missing dates fall back to `today`.
    pub fn from_data(id: TemplateId, data: &TemplateData, today: NaiveDate) -> Self {
        let today = format_date(today);
        match id {
            TemplateId::Waitlist => Self::Waitlist(WaitlistEmail::from_data(data, &today)),
            TemplateId::BloodTest => Self::BloodTest(BloodTestEmail::from_data(data, &today)),
            TemplateId::HealthScore => {
                Self::HealthScore(HealthScoreEmail::from_data(data, &today))
            }
            TemplateId::HealthAudit => {
                Self::HealthAudit(HealthAuditEmail::from_data(data, &today))
            }
            TemplateId::Supplements => {
                Self::Supplements(SupplementsEmail::from_data(data, &today))
            }
        }
    }

    pub fn subject(&self) -> String {
        match self {
            Self::Waitlist(t) => t.subject(),
            Self::BloodTest(t) => t.subject(),
            Self::HealthScore(t) => t.subject(),
            Self::HealthAudit(t) => t.subject(),
            Self::Supplements(t) => t.subject(),
        }
    }

    pub fn render(&self) -> Result<RenderedEmail, TemplateError> {
        let html = match self {
            Self::Waitlist(t) => t.render(),
            Self::BloodTest(t) => t.render(),
            Self::HealthScore(t) => t.render(),
            Self::HealthAudit(t) => t.render(),
            Self::Supplements(t) => t.render(),
        }?;

        Ok(RenderedEmail {
            subject: self.subject(),
            html,
        })
    }
}

/// Subject line and HTML body of an email, ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub subject: String,
    pub html: String,
}

impl RenderedEmail {
    /// The first `max_chars` characters of the body, followed by `...`.
    pub fn preview(&self, max_chars: usize) -> String {
        let mut preview: String = self.html.chars().take(max_chars).collect();
        preview.push_str("...");
        preview
    }
}

/// Renders the template registered under `id` with today's date as fallback.
pub fn render(id: TemplateId, data: &TemplateData) -> Result<RenderedEmail, TemplateError> {
    render_on(id, data, Utc::now().date_naive())
}

pub fn render_on(
    id: TemplateId,
    data: &TemplateData,
    today: NaiveDate,
) -> Result<RenderedEmail, TemplateError> {
    EmailTemplate::from_data(id, data, today).render()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}
