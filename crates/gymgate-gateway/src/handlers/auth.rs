//! Login/logout for both roles.
//!
//! Credential checks belong to the `AccountDirectory`; these handlers only
//! turn a successful check into a signed session cookie.

use axum::{extract::State, response::IntoResponse, Json};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use serde_json::json;

use gymgate_core::error::GateError;
use gymgate_core::Role;

use crate::app_state::AppState;
use crate::error::ApiResult;
use crate::transport::Session;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub async fn admin_login(
    State(app): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    login(&app, jar, Role::Administrator, req).await
}

pub async fn trainer_login(
    State(app): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    login(&app, jar, Role::Trainer, req).await
}

async fn login(
    app: &AppState,
    jar: CookieJar,
    role: Role,
    req: LoginRequest,
) -> ApiResult<impl IntoResponse> {
    let Some(principal) = app
        .accounts()
        .authenticate(role, &req.email, &req.password)
        .await?
    else {
        tracing::info!(%role, "login rejected");
        return Err(GateError::InvalidCredentials.into());
    };

    let token = app.tokens().issue(&principal)?;

    tracing::info!(%role, subject = %principal.subject_id, "login");
    Ok((
        jar.add(app.cookies().session(role, &token)),
        Json(json!({
            "role": role,
            "display_name": principal.display_name,
        })),
    ))
}

/// Clears both session cookies. The tokens themselves stay valid until expiry.
pub async fn logout(State(app): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let jar = [Role::Administrator, Role::Trainer]
        .into_iter()
        .fold(jar, |jar, role| jar.add(app.cookies().clear(role)));
    (jar, Json(json!({ "ok": true })))
}

pub async fn current_session(Session(p): Session) -> impl IntoResponse {
    Json(p)
}
