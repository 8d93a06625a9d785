//! Shared application state for the gymgate gateway.
//!
//! Everything here is built once at startup and read-only afterwards, except
//! the drain flag. Mutable quota state lives in the backing store.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use gymgate_core::error::Result;
use gymgate_core::{Clock, SystemClock, TokenService};

use crate::config::GatewayConfig;
use crate::policy::RoutePolicy;
use crate::quota::{DailyQuota, MemberQuota, NotificationWindow, StoreGuard};
use crate::session::CookiePolicy;
use crate::store::{
    AccountDirectory, CounterStore, InMemoryAccounts, InMemoryStore, MemberStore,
    NotificationStore,
};

/// Counter scope of the public AI-plan endpoint.
pub const AI_PLAN_SCOPE: &str = "ai-plan";

/// External collaborators the gateway talks to.
#[derive(Clone)]
pub struct Backends {
    pub members: Arc<dyn MemberStore>,
    pub notifications: Arc<dyn NotificationStore>,
    pub counters: Arc<dyn CounterStore>,
    pub accounts: Arc<dyn AccountDirectory>,
}

impl Backends {
    /// Single in-memory store plus config-seeded accounts.
    pub fn in_memory(cfg: &GatewayConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        let store = Arc::new(InMemoryStore::new(clock));
        Ok(Self {
            members: store.clone(),
            notifications: store.clone(),
            counters: store,
            accounts: Arc::new(InMemoryAccounts::from_config(&cfg.accounts)?),
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: GatewayConfig,
    tokens: TokenService,
    policy: RoutePolicy,
    cookies: CookiePolicy,
    guard: StoreGuard,
    backends: Backends,
    member_quota: MemberQuota,
    notifications: NotificationWindow,
    ai_plan_quota: DailyQuota,
    draining: AtomicBool,
}

impl AppState {
    /// Production wiring: system clock, in-memory backends.
    pub fn new(cfg: GatewayConfig) -> Result<Self> {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let backends = Backends::in_memory(&cfg, clock.clone())?;
        Self::build(cfg, clock, backends)
    }

    /// Returns Result so main can handle errors gracefully (no panic).
    pub fn build(cfg: GatewayConfig, clock: Arc<dyn Clock>, backends: Backends) -> Result<Self> {
        let secret = cfg.auth.resolve_secret()?;
        let tokens = TokenService::new(&secret, clock.clone())?;
        let policy = RoutePolicy::compile(&cfg.routes, &cfg.auth)?;
        let cookies = CookiePolicy::from_config(&cfg.auth);

        let q = &cfg.quota;
        let guard = StoreGuard::from_config(q);
        let member_quota = MemberQuota::new(
            backends.members.clone(),
            q.member_ceiling,
            q.member_cap_mode,
            guard,
        );
        let notifications = NotificationWindow::new(
            backends.notifications.clone(),
            q.notification_retention,
            guard,
        );
        let ai_plan_quota = DailyQuota::new(
            backends.counters.clone(),
            clock,
            AI_PLAN_SCOPE,
            q.ai_plan_daily_limit,
            guard,
        );

        if !cfg.auth.secure_cookies {
            tracing::warn!(
                "auth.secure_cookies is off; session cookies will be sent over plain http"
            );
        }

        Ok(Self {
            inner: Arc::new(AppStateInner {
                cfg,
                tokens,
                policy,
                cookies,
                guard,
                backends,
                member_quota,
                notifications,
                ai_plan_quota,
                draining: AtomicBool::new(false),
            }),
        })
    }

    pub fn cfg(&self) -> &GatewayConfig {
        &self.inner.cfg
    }

    pub fn tokens(&self) -> &TokenService {
        &self.inner.tokens
    }

    pub fn policy(&self) -> &RoutePolicy {
        &self.inner.policy
    }

    pub fn cookies(&self) -> &CookiePolicy {
        &self.inner.cookies
    }

    pub fn guard(&self) -> StoreGuard {
        self.inner.guard
    }

    pub fn accounts(&self) -> &dyn AccountDirectory {
        self.inner.backends.accounts.as_ref()
    }

    pub fn members(&self) -> &dyn MemberStore {
        self.inner.backends.members.as_ref()
    }

    pub fn member_quota(&self) -> &MemberQuota {
        &self.inner.member_quota
    }

    pub fn notifications(&self) -> &NotificationWindow {
        &self.inner.notifications
    }

    pub fn ai_plan_quota(&self) -> &DailyQuota {
        &self.inner.ai_plan_quota
    }

    pub fn is_draining(&self) -> bool {
        self.inner.draining.load(Ordering::Relaxed)
    }

    pub fn begin_drain(&self) {
        self.inner.draining.store(true, Ordering::Relaxed);
    }
}
