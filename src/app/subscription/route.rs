use anyhow::Context;
use axum::{extract::State, Json};

use super::schema::{SubscribeBody, SubscribeResponseBody};
use crate::app::error::{AppError, AppResult};
use crate::app::AppState;
use crate::domain::subscriber::NewSubscriber;
use crate::notification::WaitlistSignup;

/// Joins the waitlist. Only new subscribers get a confirmation email, and its
/// failure does not undo the signup.
#[tracing::instrument(name = "Adding a new subscriber", skip(state, body), fields(email = %body.email))]
pub async fn subscribe(
    State(state): State<AppState>,
    Json(body): Json<SubscribeBody>,
) -> AppResult<Json<SubscribeResponseBody>> {
    let subscriber = NewSubscriber::try_from(body).map_err(AppError::ValidationError)?;

    let outcome = state
        .subscribers
        .capture(&subscriber)
        .await
        .context("Failed to store the subscriber.")?;

    if !outcome.is_new() {
        return Ok(Json(SubscribeResponseBody {
            success: true,
            is_new: false,
            message: "Welcome back! You're already subscribed.",
            confirmation: None,
        }));
    }

    let confirmation = state
        .dispatcher
        .send_waitlist_confirmation(
            &subscriber.email,
            WaitlistSignup {
                name: subscriber.name.as_ref().map(ToString::to_string),
                source: Some(subscriber.source.clone()),
            },
        )
        .await;
    if !confirmation.success {
        tracing::warn!(error = ?confirmation.error, "waitlist confirmation was not delivered");
    }

    Ok(Json(SubscribeResponseBody {
        success: true,
        is_new: true,
        message: "You're on the waitlist!",
        confirmation: Some(confirmation),
    }))
}
