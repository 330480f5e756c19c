use anyhow::Context;
use axum::extract::{Query, State};
use axum::Json;

use super::schema::{HistoryParams, HistoryResponseBody};
use crate::app::error::{AppError, AppResult};
use crate::app::AppState;
use crate::domain::subscriber::email::Email;

#[tracing::instrument(name = "Get notification history", skip(state))]
pub async fn notification_history(
    State(state): State<AppState>,
    Query(params): Query<HistoryParams>,
) -> AppResult<Json<HistoryResponseBody>> {
    let email = Email::try_from(params.email.as_str()).map_err(AppError::ValidationError)?;

    let data = state
        .dispatcher
        .history(&email, params.limit())
        .await
        .context("Failed to retrieve the notification history.")?;

    Ok(Json(HistoryResponseBody {
        success: true,
        data,
    }))
}
