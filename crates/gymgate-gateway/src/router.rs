//! Axum router wiring.
//!
//! The gate middleware wraps every route and the fallback, so no handler is
//! reachable without an `Allow` decision.

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::{app_state::AppState, handlers, ops, transport};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(ops::healthz))
        .route("/readyz", get(ops::readyz))
        .route("/api/auth/admin/login", post(handlers::auth::admin_login))
        .route("/api/auth/trainer/login", post(handlers::auth::trainer_login))
        .route("/api/auth/logout", post(handlers::auth::logout))
        .route("/api/auth/session", get(handlers::auth::current_session))
        .route(
            "/api/admin/members",
            get(handlers::members::list).post(handlers::members::create),
        )
        .route(
            "/api/admin/members/:id",
            put(handlers::members::update).delete(handlers::members::delete),
        )
        .route("/api/admin/notifications", get(handlers::members::notifications))
        .route("/api/trainer/me", get(handlers::trainer::me))
        .route("/api/ai-plan", post(handlers::ai_plan::request_plan))
        .fallback(handlers::not_found)
        .layer(middleware::from_fn_with_state(state.clone(), transport::gate::gate))
        .with_state(state)
}
