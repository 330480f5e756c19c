//! Persistence seams. The dispatch path only sees these traits so the
//! hosted store can be swapped for a fake in tests.

mod postgres;

use async_trait::async_trait;

pub use self::postgres::PgStore;
use crate::domain::notification::NotificationRecord;
use crate::domain::subscriber::{CaptureOutcome, NewSubscriber};

/// Append-only audit log of notification attempts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationLog: Send + Sync {
    async fn record(&self, record: NotificationRecord) -> anyhow::Result<()>;

    /// The most recent `limit` records for `email`, newest first.
    async fn history(&self, email: &str, limit: i64) -> anyhow::Result<Vec<NotificationRecord>>;
}

#[async_trait]
pub trait SubscriberStore: Send + Sync {
    /// Stores a waitlist signup unless the email is already subscribed.
    async fn capture(&self, subscriber: &NewSubscriber) -> anyhow::Result<CaptureOutcome>;
}
