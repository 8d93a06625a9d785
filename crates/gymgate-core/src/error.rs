//! Shared error type across gymgate crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Invalid input / malformed request.
    BadRequest,
    /// Missing, malformed, tampered or expired session token.
    AuthFailed,
    /// Valid token, wrong role for the namespace.
    Forbidden,
    /// Login rejected. Never says which half of the credentials was wrong.
    InvalidCredentials,
    /// Member ceiling reached.
    QuotaExceeded,
    /// Daily allowance used up.
    RateLimited,
    /// Unknown record.
    NotFound,
    /// Backing store unreachable or timed out; the request was denied.
    StoreUnavailable,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::AuthFailed => "AUTH_FAILED",
            ClientCode::Forbidden => "FORBIDDEN",
            ClientCode::InvalidCredentials => "INVALID_CREDENTIALS",
            ClientCode::QuotaExceeded => "QUOTA_EXCEEDED",
            ClientCode::RateLimited => "RATE_LIMITED",
            ClientCode::NotFound => "NOT_FOUND",
            ClientCode::StoreUnavailable => "STORE_UNAVAILABLE",
            ClientCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Why a token was rejected. Logged server-side, never shown to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailureReason {
    /// Not a structurally valid token (encoding, segments, JSON).
    Malformed,
    /// MAC does not match header + payload.
    SignatureMismatch,
    /// Embedded expiry has passed.
    Expired,
    /// A required claim is absent or empty.
    MissingClaim,
}

impl AuthFailureReason {
    pub fn as_str(self) -> &'static str {
        match self {
            AuthFailureReason::Malformed => "malformed",
            AuthFailureReason::SignatureMismatch => "signature_mismatch",
            AuthFailureReason::Expired => "expired",
            AuthFailureReason::MissingClaim => "missing_claim",
        }
    }
}

/// Token verification failure.
///
/// `Display` is identical for every reason so nothing derived from it can act
/// as an oracle; use [`AuthFailure::reason`] for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("authentication failed")]
pub struct AuthFailure {
    pub reason: AuthFailureReason,
}

impl AuthFailure {
    pub fn new(reason: AuthFailureReason) -> Self {
        Self { reason }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, GateError>;

/// Unified error type used by core and gateway.
#[derive(Debug, Error)]
pub enum GateError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error(transparent)]
    AuthFailed(#[from] AuthFailure),
    #[error("forbidden")]
    ForbiddenRole,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("{0}")]
    QuotaExceeded(String),
    #[error("rate limited")]
    RateLimited,
    #[error("not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("config: {0}")]
    Config(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl GateError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            GateError::BadRequest(_) | GateError::Config(_) => ClientCode::BadRequest,
            GateError::AuthFailed(_) => ClientCode::AuthFailed,
            GateError::ForbiddenRole => ClientCode::Forbidden,
            GateError::InvalidCredentials => ClientCode::InvalidCredentials,
            GateError::QuotaExceeded(_) => ClientCode::QuotaExceeded,
            GateError::RateLimited => ClientCode::RateLimited,
            GateError::NotFound => ClientCode::NotFound,
            GateError::StoreUnavailable(_) => ClientCode::StoreUnavailable,
            GateError::UnsupportedVersion => ClientCode::UnsupportedVersion,
            GateError::Internal(_) => ClientCode::Internal,
        }
    }

    /// Message safe to return to a client.
    ///
    /// Store and internal details stay in the logs.
    pub fn client_message(&self) -> String {
        match self {
            GateError::StoreUnavailable(_) => "service temporarily unavailable".into(),
            GateError::Internal(_) => "internal error".into(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn auth_failure_display_does_not_leak_reason() {
        let msgs: Vec<String> = [
            AuthFailureReason::Malformed,
            AuthFailureReason::SignatureMismatch,
            AuthFailureReason::Expired,
            AuthFailureReason::MissingClaim,
        ]
        .into_iter()
        .map(|r| GateError::from(AuthFailure::new(r)).client_message())
        .collect();

        assert!(msgs.iter().all(|m| m == "authentication failed"));
    }

    #[test]
    fn store_details_stay_server_side() {
        let err = GateError::StoreUnavailable("redis://10.0.0.3 refused".into());
        assert_eq!(err.client_code().as_str(), "STORE_UNAVAILABLE");
        assert!(!err.client_message().contains("10.0.0.3"));
    }
}
