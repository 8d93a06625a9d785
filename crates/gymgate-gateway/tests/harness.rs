//! Shared setup for gateway integration tests.

#![allow(dead_code)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Algorithm, Argon2, Params, Version,
};
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, Response},
    Router,
};
use chrono::{TimeZone, Utc};
use serde_json::Value;
use tower::ServiceExt;

use gymgate_core::{FixedClock, Role};
use gymgate_gateway::app_state::{AppState, Backends};
use gymgate_gateway::config::{self, AccountConfig, GatewayConfig};
use gymgate_gateway::router::build_router;
use gymgate_gateway::store::{InMemoryAccounts, InMemoryStore};

pub const SECRET: &str = "integration-secret-for-gateway-tests-0001";

pub const ADMIN_EMAIL: &str = "owner@gym.test";
pub const ADMIN_PASSWORD: &str = "deadlift-500";
pub const TRAINER_EMAIL: &str = "coach@gym.test";
pub const TRAINER_PASSWORD: &str = "kettlebell-24";

/// Cheap Argon2id parameters; verification reads them back from the PHC string.
pub fn quick_hash(password: &str) -> String {
    let params = Params::new(1024, 1, 1, None).unwrap();
    let salt = SaltString::generate(&mut OsRng);
    Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
        .hash_password(password.as_bytes(), &salt)
        .unwrap()
        .to_string()
}

/// Minimal valid config plus `extra` YAML appended at top level.
pub fn config(extra: &str) -> GatewayConfig {
    let yaml = format!("version: 1\nauth:\n  secret: \"{SECRET}\"\n{extra}");
    let mut cfg = config::load_from_str(&yaml).unwrap();
    cfg.accounts = vec![
        AccountConfig {
            subject_id: "adm-1".into(),
            email: ADMIN_EMAIL.into(),
            display_name: "Gym Owner".into(),
            role: Role::Administrator,
            password_hash: quick_hash(ADMIN_PASSWORD),
        },
        AccountConfig {
            subject_id: "trn-7".into(),
            email: TRAINER_EMAIL.into(),
            display_name: "Coach Kim".into(),
            role: Role::Trainer,
            password_hash: quick_hash(TRAINER_PASSWORD),
        },
    ];
    cfg
}

pub struct Harness {
    pub app: Router,
    pub state: AppState,
    pub clock: Arc<FixedClock>,
    pub store: Arc<InMemoryStore>,
}

pub fn harness(cfg: GatewayConfig) -> Harness {
    let clock = Arc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2026, 10, 14, 8, 30, 0).unwrap(),
    ));
    let store = Arc::new(InMemoryStore::new(clock.clone()));
    let backends = Backends {
        members: store.clone(),
        notifications: store.clone(),
        counters: store.clone(),
        accounts: Arc::new(InMemoryAccounts::from_config(&cfg.accounts).unwrap()),
    };
    let state = AppState::build(cfg, clock.clone(), backends).unwrap();
    let app = build_router(state.clone());
    Harness {
        app,
        state,
        clock,
        store,
    }
}

impl Harness {
    pub async fn send(&self, req: Request<Body>) -> Response<Body> {
        self.app.clone().oneshot(req).await.unwrap()
    }

    /// Log in and return the `name=value` cookie pair.
    pub async fn login(&self, role: Role) -> String {
        let (path, email, password) = match role {
            Role::Administrator => ("/api/auth/admin/login", ADMIN_EMAIL, ADMIN_PASSWORD),
            Role::Trainer => ("/api/auth/trainer/login", TRAINER_EMAIL, TRAINER_PASSWORD),
        };
        let body = serde_json::json!({ "email": email, "password": password });
        let resp = self.send(post_json(path, &body)).await;
        assert_eq!(resp.status(), 200, "login as {role} failed");
        cookie_pair(&resp, role.cookie_name()).expect("session cookie set")
    }
}

pub fn get(path: &str) -> Request<Body> {
    Request::builder().uri(path).body(Body::empty()).unwrap()
}

pub fn get_with_cookies(path: &str, cookies: &[&str]) -> Request<Body> {
    Request::builder()
        .uri(path)
        .header(header::COOKIE, cookies.join("; "))
        .body(Body::empty())
        .unwrap()
}

pub fn post_json(path: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn post_json_with_cookies(path: &str, body: &Value, cookies: &[&str]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::COOKIE, cookies.join("; "))
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn json_body(resp: Response<Body>) -> Value {
    let bytes = to_bytes(resp.into_body(), 1 << 20).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// `name=value` from the response's `Set-Cookie` for `name`.
pub fn cookie_pair(resp: &Response<Body>, name: &str) -> Option<String> {
    resp.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|s| s.starts_with(&format!("{name}=")))
        .and_then(|s| s.split(';').next())
        .map(str::to_string)
}

pub fn set_cookies(resp: &Response<Body>) -> Vec<String> {
    resp.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok().map(str::to_string))
        .collect()
}

pub fn location(resp: &Response<Body>) -> Option<&str> {
    resp.headers().get(header::LOCATION).and_then(|v| v.to_str().ok())
}
