//! Request pipeline guard.
//!
//! Runs for every request before routing reaches a handler:
//! route lookup -> token resolution -> verification -> decision.
//! Only `Allow` lets the request through; the verified principal travels in
//! request extensions.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use gymgate_core::Principal;

use crate::app_state::AppState;
use crate::error::rejection;
use crate::policy::Decision;
use crate::session::{resolve, Presented};

pub async fn gate(State(app): State<AppState>, mut req: Request, next: Next) -> Response {
    let path = req.uri().path().to_string();
    let route = app.policy().lookup(&path);

    let presented = Presented::from_headers(req.headers());
    let principal: Option<Principal> = match resolve(&presented, route.namespace) {
        Some(tok) => match app.tokens().verify(&tok.raw) {
            Ok(p) => Some(p),
            Err(f) => {
                tracing::debug!(
                    path = %path,
                    source = tok.source.as_str(),
                    reason = f.reason.as_str(),
                    "session token rejected"
                );
                None
            }
        },
        None => None,
    };

    match app.policy().decide(route, principal.as_ref()) {
        Decision::Allow => {
            if let Some(p) = principal {
                req.extensions_mut().insert(p);
            }
            next.run(req).await
        }
        Decision::Redirect(location) => {
            tracing::debug!(path = %path, %location, "redirecting to login");
            Redirect::temporary(&location).into_response()
        }
        Decision::Reject(status) => {
            tracing::debug!(path = %path, status = status.as_u16(), "request rejected");
            rejection(status)
        }
    }
}
