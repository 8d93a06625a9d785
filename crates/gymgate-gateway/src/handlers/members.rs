//! Administrator member endpoints. Creation goes through the member quota;
//! every mutation is recorded in the notification window afterwards.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use gymgate_core::error::GateError;

use crate::app_state::AppState;
use crate::error::ApiResult;
use crate::store::{
    MemberPatch, MemberRecord, NewMember, NewNotification, Notification, NotificationKind,
};
use crate::transport::Session;

async fn notify(app: &AppState, kind: NotificationKind, message: String) {
    // The domain write already committed; a lost audit entry is logged, not surfaced.
    if let Err(e) = app
        .notifications()
        .record_and_trim(NewNotification::new(kind, message))
        .await
    {
        tracing::warn!(error = %e, ?kind, "notification not recorded");
    }
}

pub async fn list(State(app): State<AppState>) -> ApiResult<Json<Vec<MemberRecord>>> {
    let members = app
        .guard()
        .read("list_members", || app.members().list_members())
        .await?;
    Ok(Json(members))
}

pub async fn create(
    State(app): State<AppState>,
    Session(admin): Session,
    Json(new): Json<NewMember>,
) -> ApiResult<impl IntoResponse> {
    if new.name.trim().is_empty() {
        return Err(GateError::BadRequest("name must not be empty".into()).into());
    }

    let rec = app.member_quota().create(new).await?;
    tracing::info!(member = rec.id, by = %admin.subject_id, "member created");
    notify(
        &app,
        NotificationKind::MemberAdded,
        format!("{} added member {}", admin.display_name, rec.name),
    )
    .await;

    Ok((StatusCode::CREATED, Json(rec)))
}

pub async fn update(
    State(app): State<AppState>,
    Session(admin): Session,
    Path(id): Path<u64>,
    Json(patch): Json<MemberPatch>,
) -> ApiResult<Json<MemberRecord>> {
    let rec = app
        .guard()
        .once("update_member", app.members().update_member(id, patch))
        .await?
        .ok_or(GateError::NotFound)?;
    notify(
        &app,
        NotificationKind::MemberUpdated,
        format!("{} updated member {}", admin.display_name, rec.name),
    )
    .await;
    Ok(Json(rec))
}

pub async fn delete(
    State(app): State<AppState>,
    Session(admin): Session,
    Path(id): Path<u64>,
) -> ApiResult<StatusCode> {
    let rec = app
        .guard()
        .once("delete_member", app.members().delete_member(id))
        .await?
        .ok_or(GateError::NotFound)?;
    notify(
        &app,
        NotificationKind::MemberDeleted,
        format!("{} deleted member {}", admin.display_name, rec.name),
    )
    .await;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn notifications(State(app): State<AppState>) -> ApiResult<Json<Vec<Notification>>> {
    let limit = app.cfg().quota.notification_retention as usize;
    Ok(Json(app.notifications().recent(limit).await?))
}
