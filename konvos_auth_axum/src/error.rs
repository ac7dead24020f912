use axum::Json;
use http::StatusCode;
use serde::Serialize;

use konvos_auth::AuthError;

/// JSON body of every failed request
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

pub(crate) type ErrorResponse = (StatusCode, Json<ErrorBody>);

pub(crate) fn error_response(status: StatusCode, error: impl Into<String>) -> ErrorResponse {
    (
        status,
        Json(ErrorBody {
            error: error.into(),
            details: None,
        }),
    )
}

pub(crate) fn status_for(err: &AuthError) -> StatusCode {
    match err {
        AuthError::Validation(_) => StatusCode::BAD_REQUEST,
        AuthError::Conflict => StatusCode::CONFLICT,
        AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        AuthError::Store(_) | AuthError::Provider { .. } | AuthError::Password(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Helper trait for converting auth errors to a JSON error response
pub(crate) trait IntoResponseError<T> {
    fn into_response_error(self) -> Result<T, ErrorResponse>;
}

impl<T> IntoResponseError<T> for Result<T, AuthError> {
    fn into_response_error(self) -> Result<T, ErrorResponse> {
        self.map_err(|e| {
            (
                status_for(&e),
                Json(ErrorBody {
                    error: e.public_message(),
                    details: e.details(),
                }),
            )
        })
    }
}
