use serde::{Deserialize, Serialize};

use crate::domain::notification::NotificationRecord;

const DEFAULT_LIMIT: i64 = 10;
const MAX_LIMIT: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub email: String,
    pub limit: Option<i64>,
}

impl HistoryParams {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }
}

#[derive(Serialize)]
pub struct HistoryResponseBody {
    pub success: bool,
    pub data: Vec<NotificationRecord>,
}
