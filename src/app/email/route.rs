use anyhow::Context;
use axum::extract::rejection::JsonRejection;
use axum::{extract::State, Json};

use super::schema::{EmailRequest, Preview, SendEmailBody, SendEmailResponseBody};
use crate::app::error::{AppError, AppResult};
use crate::app::AppState;

const PREVIEW_CHARS: usize = 200;

/// Renders and sends one templated email. Provider failures still answer
/// `200`, with `success` telling whether the email went out.
#[tracing::instrument(name = "Send templated email", skip(state, body))]
pub async fn send_email(
    State(state): State<AppState>,
    body: Result<Json<SendEmailBody>, JsonRejection>,
) -> AppResult<Json<SendEmailResponseBody>> {
    let Json(body) = body?;
    let request = EmailRequest::try_from(body).map_err(AppError::ValidationError)?;

    let dispatched = state
        .dispatcher
        .dispatch(&request.to, request.template, request.data)
        .await
        .context("Failed to render the email template.")?;

    let message = if dispatched.result.success {
        "Email processed successfully"
    } else {
        "Email could not be delivered"
    };

    Ok(Json(SendEmailResponseBody {
        success: dispatched.result.success,
        message,
        message_id: dispatched.result.message_id,
        error: dispatched.result.error,
        preview: Preview {
            to: request.to.to_string(),
            subject: dispatched.email.subject.clone(),
            html: dispatched.email.preview(PREVIEW_CHARS),
        },
    }))
}
