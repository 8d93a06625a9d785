//! Picks which raw token applies to a request.
//!
//! Two session cookies can coexist in one browser. The route namespace decides:
//!
//! | bearer | namespace     | token used                        |
//! |--------|---------------|-----------------------------------|
//! | yes    | any           | bearer                            |
//! | no     | trainer       | `trainer-session` only            |
//! | no     | administrator | `admin-session` only              |
//! | no     | none          | `admin-session`, else `trainer-session` |
//!
//! No verification happens here.

use axum::http::{header, HeaderMap};
use axum_extra::extract::cookie::CookieJar;

use gymgate_core::Role;

/// Where the chosen token came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    Bearer,
    Cookie(Role),
}

impl TokenSource {
    pub fn as_str(self) -> &'static str {
        match self {
            TokenSource::Bearer => "bearer",
            TokenSource::Cookie(Role::Administrator) => "admin_cookie",
            TokenSource::Cookie(Role::Trainer) => "trainer_cookie",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedToken {
    pub raw: String,
    pub source: TokenSource,
}

/// Credentials present on a request, extracted once.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Presented {
    pub bearer: Option<String>,
    pub admin_cookie: Option<String>,
    pub trainer_cookie: Option<String>,
}

impl Presented {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let bearer = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(extract_bearer)
            .map(str::to_string);

        let jar = CookieJar::from_headers(headers);
        let value = |role: Role| {
            jar.get(role.cookie_name())
                .map(|c| c.value().trim())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        Self {
            bearer,
            admin_cookie: value(Role::Administrator),
            trainer_cookie: value(Role::Trainer),
        }
    }

    fn cookie(&self, role: Role) -> Option<ResolvedToken> {
        let raw = match role {
            Role::Administrator => self.admin_cookie.as_ref(),
            Role::Trainer => self.trainer_cookie.as_ref(),
        }?;
        Some(ResolvedToken {
            raw: raw.clone(),
            source: TokenSource::Cookie(role),
        })
    }
}

/// `Authorization: Bearer <token>`; anything else is ignored.
pub fn extract_bearer(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

pub fn resolve(presented: &Presented, namespace: Option<Role>) -> Option<ResolvedToken> {
    if let Some(raw) = &presented.bearer {
        return Some(ResolvedToken {
            raw: raw.clone(),
            source: TokenSource::Bearer,
        });
    }

    match namespace {
        Some(role) => presented.cookie(role),
        None => presented
            .cookie(Role::Administrator)
            .or_else(|| presented.cookie(Role::Trainer)),
    }
}
