//! Public AI fitness-plan intake, limited per client per UTC day.
//!
//! Plan generation itself is an external service; this endpoint only admits
//! or refuses the request.

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::json;

use crate::app_state::AppState;
use crate::error::ApiResult;

/// Client key for the daily allowance: the socket peer, or the first
/// `X-Forwarded-For` hop when the gateway sits behind a trusted proxy.
/// `anonymous` when neither is known.
pub fn client_identity(
    headers: &HeaderMap,
    peer: Option<SocketAddr>,
    trust_forwarded_for: bool,
) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .filter(|_| trust_forwarded_for)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    forwarded
        .or_else(|| peer.map(|p| p.ip().to_string()))
        .unwrap_or_else(|| "anonymous".into())
}

pub async fn request_plan(
    State(app): State<AppState>,
    req: Request,
) -> ApiResult<impl IntoResponse> {
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ci| ci.0);
    let client = client_identity(req.headers(), peer, app.cfg().gateway.trust_forwarded_for);

    let remaining = app.ai_plan_quota().hit(&client).await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(json!({ "accepted": true, "remaining_today": remaining })),
    ))
}
