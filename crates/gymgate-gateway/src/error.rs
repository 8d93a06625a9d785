//! HTTP rendering of `GateError`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use gymgate_core::error::{ClientCode, GateError};

/// Handler-facing error; wraps the shared error so it can implement
/// `IntoResponse` in this crate.
#[derive(Debug)]
pub struct ApiError(pub GateError);

pub type ApiResult<T> = std::result::Result<T, ApiError>;

impl From<GateError> for ApiError {
    fn from(e: GateError) -> Self {
        Self(e)
    }
}

fn body(status: StatusCode, code: ClientCode, message: String) -> Response {
    let body = Json(json!({
        "error": code.as_str(),
        "message": message,
    }));
    (status, body).into_response()
}

/// Status for a gate rejection (401 or 403) with the generic body.
pub fn rejection(status: StatusCode) -> Response {
    if status == StatusCode::FORBIDDEN {
        body(status, ClientCode::Forbidden, "forbidden".into())
    } else {
        body(StatusCode::UNAUTHORIZED, ClientCode::AuthFailed, "authentication failed".into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let e = self.0;
        let status = match &e {
            GateError::BadRequest(_) | GateError::QuotaExceeded(_) => StatusCode::BAD_REQUEST,
            GateError::AuthFailed(_) | GateError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            GateError::ForbiddenRole => StatusCode::FORBIDDEN,
            GateError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            GateError::NotFound => StatusCode::NOT_FOUND,
            GateError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            GateError::Config(_) | GateError::UnsupportedVersion | GateError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        if status.is_server_error() {
            tracing::error!(error = %e, "request failed");
        }
        body(status, e.client_code(), e.client_message())
    }
}
