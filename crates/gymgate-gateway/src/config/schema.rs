use serde::Deserialize;
use gymgate_core::error::{GateError, Result};
use gymgate_core::Role;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    pub version: u32,

    #[serde(default)]
    pub gateway: GatewaySection,

    pub auth: AuthSection,

    #[serde(default = "default_routes")]
    pub routes: Vec<RouteRuleConfig>,

    #[serde(default)]
    pub quota: QuotaSection,

    #[serde(default)]
    pub accounts: Vec<AccountConfig>,
}

impl GatewayConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(GateError::UnsupportedVersion);
        }
        if self.routes.is_empty() {
            return Err(GateError::Config("routes must not be empty".into()));
        }

        self.gateway.validate()?;
        self.auth.validate()?;
        // Unambiguous table, login pages reachable without a session.
        crate::policy::RoutePolicy::compile(&self.routes, &self.auth)?;
        self.quota.validate()?;

        for a in &self.accounts {
            a.validate()?;
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewaySection {
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Take the client address from `X-Forwarded-For`. Only enable behind a
    /// proxy that overwrites the header; otherwise clients choose their own
    /// identity for per-client limits.
    #[serde(default)]
    pub trust_forwarded_for: bool,
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            trust_forwarded_for: false,
        }
    }
}

impl GatewaySection {
    pub fn validate(&self) -> Result<()> {
        if self.listen.parse::<std::net::SocketAddr>().is_err() {
            return Err(GateError::Config(
                "gateway.listen must be a valid socket address".into(),
            ));
        }
        Ok(())
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthSection {
    /// Inline signing secret. Prefer `secret_env` outside development.
    #[serde(default)]
    pub secret: Option<String>,

    /// Name of the environment variable holding the signing secret.
    #[serde(default)]
    pub secret_env: Option<String>,

    /// Adds `Secure` to session cookies. Turn on in production.
    #[serde(default)]
    pub secure_cookies: bool,

    #[serde(default)]
    pub cookie_domain: Option<String>,

    #[serde(default = "default_admin_login_path")]
    pub admin_login_path: String,

    #[serde(default = "default_trainer_login_path")]
    pub trainer_login_path: String,
}

impl AuthSection {
    pub fn validate(&self) -> Result<()> {
        match (&self.secret, &self.secret_env) {
            (Some(_), Some(_)) => {
                return Err(GateError::Config(
                    "auth.secret and auth.secret_env are mutually exclusive".into(),
                ))
            }
            (None, None) => {
                return Err(GateError::Config(
                    "one of auth.secret or auth.secret_env is required".into(),
                ))
            }
            _ => {}
        }
        for p in [&self.admin_login_path, &self.trainer_login_path] {
            if !p.starts_with('/') {
                return Err(GateError::Config(format!(
                    "login path must start with '/': {p}"
                )));
            }
        }
        Ok(())
    }

    /// Resolve the signing secret bytes (inline or from the environment).
    pub fn resolve_secret(&self) -> Result<Vec<u8>> {
        if let Some(s) = &self.secret {
            return Ok(s.as_bytes().to_vec());
        }
        let var = self
            .secret_env
            .as_deref()
            .ok_or_else(|| GateError::Config("no signing secret configured".into()))?;
        std::env::var(var)
            .map(String::into_bytes)
            .map_err(|_| GateError::Config(format!("environment variable {var} is not set")))
    }

    pub fn login_path(&self, role: Role) -> &str {
        match role {
            Role::Administrator => &self.admin_login_path,
            Role::Trainer => &self.trainer_login_path,
        }
    }
}

fn default_admin_login_path() -> String {
    "/admin/login".into()
}
fn default_trainer_login_path() -> String {
    "/trainer/login".into()
}

/// Who may pass a route prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    Public,
    Administrator,
    Trainer,
}

impl Access {
    pub fn required_role(self) -> Option<Role> {
        match self {
            Access::Public => None,
            Access::Administrator => Some(Role::Administrator),
            Access::Trainer => Some(Role::Trainer),
        }
    }
}

/// UI routes redirect on failure, API routes answer with a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Surface {
    #[default]
    Ui,
    Api,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteRuleConfig {
    pub prefix: String,
    pub access: Access,
    #[serde(default)]
    pub surface: Surface,
    /// Role namespace for public entries that live inside one (a login page).
    #[serde(default)]
    pub namespace: Option<Role>,
}

impl RouteRuleConfig {
    fn new(prefix: &str, access: Access, surface: Surface, namespace: Option<Role>) -> Self {
        Self {
            prefix: prefix.into(),
            access,
            surface,
            namespace,
        }
    }
}

pub fn default_routes() -> Vec<RouteRuleConfig> {
    use Access::*;
    use Surface::*;
    vec![
        RouteRuleConfig::new("/", Public, Ui, None),
        RouteRuleConfig::new("/trainers", Public, Ui, None),
        RouteRuleConfig::new("/about", Public, Ui, None),
        RouteRuleConfig::new("/pricing", Public, Ui, None),
        RouteRuleConfig::new("/healthz", Public, Api, None),
        RouteRuleConfig::new("/readyz", Public, Api, None),
        RouteRuleConfig::new("/api/auth", Public, Api, None),
        RouteRuleConfig::new("/api/ai-plan", Public, Api, None),
        RouteRuleConfig::new("/api/upload", Public, Api, None),
        RouteRuleConfig::new("/admin", Administrator, Ui, None),
        RouteRuleConfig::new("/admin/login", Public, Ui, Some(Role::Administrator)),
        RouteRuleConfig::new("/api/admin", Administrator, Api, None),
        RouteRuleConfig::new("/trainer", Trainer, Ui, None),
        RouteRuleConfig::new("/trainer/login", Public, Ui, Some(Role::Trainer)),
        RouteRuleConfig::new("/api/trainer", Trainer, Api, None),
        // AI planner UI is admin-only although it sits outside /admin.
        RouteRuleConfig::new("/ai-planner", Administrator, Ui, None),
    ]
}

/// Soft: count then insert (may overshoot under concurrent writers).
/// Hard: one atomic conditional insert in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapMode {
    #[default]
    Soft,
    Hard,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuotaSection {
    #[serde(default = "default_member_ceiling")]
    pub member_ceiling: u64,

    #[serde(default)]
    pub member_cap_mode: CapMode,

    #[serde(default = "default_notification_retention")]
    pub notification_retention: u64,

    #[serde(default = "default_ai_plan_daily_limit")]
    pub ai_plan_daily_limit: u32,

    #[serde(default = "default_store_timeout_ms")]
    pub store_timeout_ms: u64,

    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

impl Default for QuotaSection {
    fn default() -> Self {
        Self {
            member_ceiling: default_member_ceiling(),
            member_cap_mode: CapMode::default(),
            notification_retention: default_notification_retention(),
            ai_plan_daily_limit: default_ai_plan_daily_limit(),
            store_timeout_ms: default_store_timeout_ms(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

impl QuotaSection {
    pub fn validate(&self) -> Result<()> {
        if self.member_ceiling == 0 {
            return Err(GateError::Config("quota.member_ceiling must be > 0".into()));
        }
        if self.notification_retention == 0 {
            return Err(GateError::Config(
                "quota.notification_retention must be > 0".into(),
            ));
        }
        if !(10..=30000).contains(&self.store_timeout_ms) {
            return Err(GateError::Config(
                "quota.store_timeout_ms must be between 10 and 30000".into(),
            ));
        }
        if self.retry_backoff_ms >= self.store_timeout_ms {
            return Err(GateError::Config(
                "quota.retry_backoff_ms must be less than store_timeout_ms".into(),
            ));
        }
        Ok(())
    }
}

fn default_member_ceiling() -> u64 {
    450
}
fn default_notification_retention() -> u64 {
    100
}
fn default_ai_plan_daily_limit() -> u32 {
    5
}
fn default_store_timeout_ms() -> u64 {
    2000
}
fn default_retry_backoff_ms() -> u64 {
    50
}

/// Account seeded into the in-memory directory.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AccountConfig {
    pub subject_id: String,
    pub email: String,
    pub display_name: String,
    pub role: Role,
    /// Argon2id PHC string.
    pub password_hash: String,
}

impl AccountConfig {
    /// Every field ends up as a required token claim; a blank one would issue
    /// sessions that never verify.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("subject_id", &self.subject_id),
            ("email", &self.email),
            ("display_name", &self.display_name),
        ] {
            if value.trim().is_empty() {
                return Err(GateError::Config(format!(
                    "accounts[].{field} must not be empty (account {:?})",
                    self.subject_id
                )));
            }
        }
        Ok(())
    }
}
