use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::{
    models::{RecordKind, SubmissionResponse},
    submission::ValidationError,
};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Malformed payload")]
    MalformedPayload,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{}", .kind.failure_message())]
    Persistence {
        kind: RecordKind,
        details: Option<String>,
    },
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::MalformedPayload | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Persistence { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = self.to_string();
        let details = match self {
            AppError::Persistence { details, .. } => details,
            _ => None,
        };

        (status, Json(SubmissionResponse::failed(message, details))).into_response()
    }
}
