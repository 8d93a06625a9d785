use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};

use gymgate_core::error::{AuthFailure, AuthFailureReason, GateError};
use gymgate_core::Principal;

use crate::error::ApiError;

/// Principal attached by the gate. Rejects with 401 when the request carried
/// no valid session.
#[derive(Debug, Clone)]
pub struct Session(pub Principal);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Session {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(Session)
            .ok_or_else(|| {
                ApiError(GateError::AuthFailed(AuthFailure::new(
                    AuthFailureReason::MissingClaim,
                )))
            })
    }
}
