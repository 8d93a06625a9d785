//! HTTP handlers. Authorization has already happened in the gate by the time
//! any of these run.

pub mod ai_plan;
pub mod auth;
pub mod members;
pub mod trainer;

use gymgate_core::error::GateError;

use crate::error::ApiError;

pub async fn not_found() -> ApiError {
    ApiError(GateError::NotFound)
}
