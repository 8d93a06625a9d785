use axum::{extract::State, Json};
use serde::Serialize;

use gymgate_core::Principal;

use crate::app_state::AppState;
use crate::error::ApiResult;
use crate::store::MemberRecord;
use crate::transport::Session;

#[derive(Debug, Serialize)]
pub struct TrainerOverview {
    pub trainer: Principal,
    pub members: Vec<MemberRecord>,
}

/// The signed-in trainer and the members assigned to them.
pub async fn me(
    State(app): State<AppState>,
    Session(trainer): Session,
) -> ApiResult<Json<TrainerOverview>> {
    let members = app
        .guard()
        .read("list_members", || app.members().list_members())
        .await?
        .into_iter()
        .filter(|m| m.trainer_id.as_deref() == Some(trainer.subject_id.as_str()))
        .collect();

    Ok(Json(TrainerOverview { trainer, members }))
}
