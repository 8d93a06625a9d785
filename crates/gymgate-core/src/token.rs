//! Session token issue/verify (HS256 JWS).
//!
//! Security notes:
//! - HS256 only; the algorithm is pinned in validation so a token that names
//!   another algorithm in its header is rejected.
//! - Expiry is judged against the injected [`Clock`], with no leeway.
//! - `verify` is total over attacker-controlled input: every failure becomes an
//!   [`AuthFailure`], nothing panics.

use std::sync::Arc;

use chrono::Duration;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::error::{AuthFailure, AuthFailureReason, GateError, Result};
use crate::principal::{Principal, Role};

/// Fixed validity window of every session token.
pub const SESSION_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// Minimum signing secret length in bytes.
pub const MIN_SECRET_LEN: usize = 32;

/// Signed payload.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    email: String,
    role: String,
    name: String,
    iat: i64,
    exp: i64,
}

pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl TokenService {
    /// Returns an error if the secret is shorter than [`MIN_SECRET_LEN`].
    pub fn new(secret: &[u8], clock: Arc<dyn Clock>) -> Result<Self> {
        if secret.len() < MIN_SECRET_LEN {
            return Err(GateError::Config(format!(
                "token secret must be at least {MIN_SECRET_LEN} bytes"
            )));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against our own clock below.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            clock,
        })
    }

    pub fn ttl(&self) -> Duration {
        Duration::seconds(SESSION_TTL_SECS)
    }

    /// Sign a token for `principal`, valid for seven days from now.
    pub fn issue(&self, principal: &Principal) -> Result<String> {
        let iat = self.clock.now().timestamp();
        let claims = Claims {
            sub: principal.subject_id.clone(),
            email: principal.email.clone(),
            role: principal.role.as_str().to_string(),
            name: principal.display_name.clone(),
            iat,
            exp: iat + SESSION_TTL_SECS,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| GateError::Internal(format!("token signing failed: {e}")))
    }

    /// Verify signature, structure and expiry; yield a fresh [`Principal`].
    pub fn verify(&self, raw: &str) -> std::result::Result<Principal, AuthFailure> {
        let data = decode::<Claims>(raw, &self.decoding, &self.validation)
            .map_err(|e| AuthFailure::new(classify(e.kind())))?;
        let c = data.claims;

        if self.clock.now().timestamp() >= c.exp {
            return Err(AuthFailure::new(AuthFailureReason::Expired));
        }

        if c.sub.is_empty() || c.email.is_empty() || c.name.is_empty() {
            return Err(AuthFailure::new(AuthFailureReason::MissingClaim));
        }

        let role: Role = c
            .role
            .parse()
            .map_err(|_| AuthFailure::new(AuthFailureReason::Malformed))?;

        Ok(Principal {
            subject_id: c.sub,
            email: c.email,
            role,
            display_name: c.name,
        })
    }
}

fn classify(kind: &ErrorKind) -> AuthFailureReason {
    match kind {
        ErrorKind::InvalidSignature => AuthFailureReason::SignatureMismatch,
        ErrorKind::ExpiredSignature => AuthFailureReason::Expired,
        ErrorKind::MissingRequiredClaim(_) => AuthFailureReason::MissingClaim,
        // serde "data" errors are missing/mistyped fields; syntax errors are garbage.
        ErrorKind::Json(e) if e.is_data() => AuthFailureReason::MissingClaim,
        _ => AuthFailureReason::Malformed,
    }
}
