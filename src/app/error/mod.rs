use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

mod schema;

pub type AppResult<T, E = AppError> = std::result::Result<T, E>;

/// A common error type that can be used throughout the API.
///
/// Validation problems become a `400` carrying the reason; anything else is
/// logged and answered with an opaque `500`.
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    ValidationError(String),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::ValidationError(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match self {
            Self::ValidationError(s) => {
                tracing::warn!(detail = %s, "rejecting invalid request");
                s
            }
            Self::UnexpectedError(e) => {
                tracing::error!("{:?}", e);
                "Unexpected error".to_owned()
            }
        };

        (
            status,
            Json(schema::Error {
                code: status.as_u16(),
                message,
            }),
        )
            .into_response()
    }
}
