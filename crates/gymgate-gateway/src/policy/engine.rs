use axum::http::StatusCode;

use gymgate_core::error::{GateError, Result};
use gymgate_core::{Principal, Role};

use crate::config::{Access, AuthSection, RouteRuleConfig, Surface};

use super::table::{compile_rules, longest_match, RouteRule};

/// Outcome of route authorization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Redirect(String),
    Reject(StatusCode),
}

/// Effective rule for a path. Unmatched paths are public with no namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteMatch {
    pub access: Access,
    pub surface: Surface,
    pub namespace: Option<Role>,
}

impl RouteMatch {
    const DEFAULT_PUBLIC: RouteMatch = RouteMatch {
        access: Access::Public,
        surface: Surface::Ui,
        namespace: None,
    };

    pub fn is_public(&self) -> bool {
        self.access == Access::Public
    }
}

impl From<&RouteRule> for RouteMatch {
    fn from(r: &RouteRule) -> Self {
        Self {
            access: r.access,
            surface: r.surface,
            namespace: r.namespace,
        }
    }
}

/// Compiled route table. Construct once at startup, then share via Arc.
#[derive(Debug)]
pub struct RoutePolicy {
    rules: Vec<RouteRule>,
    admin_login: String,
    trainer_login: String,
}

impl RoutePolicy {
    pub fn compile(routes: &[RouteRuleConfig], auth: &AuthSection) -> Result<Self> {
        let rules = compile_rules(routes)?;
        let policy = Self {
            rules,
            admin_login: auth.login_path(Role::Administrator).to_string(),
            trainer_login: auth.login_path(Role::Trainer).to_string(),
        };

        // A gated login page would bounce UI failures back to itself.
        for role in [Role::Administrator, Role::Trainer] {
            let path = policy.login_path(role);
            if !policy.lookup(path).is_public() {
                return Err(GateError::Config(format!(
                    "{role} login path {path} is behind a gated route"
                )));
            }
        }

        tracing::debug!(rules = policy.rules.len(), "route policy compiled");
        Ok(policy)
    }

    pub fn rules(&self) -> &[RouteRule] {
        &self.rules
    }

    pub fn lookup(&self, path: &str) -> RouteMatch {
        longest_match(&self.rules, path)
            .map(RouteMatch::from)
            .unwrap_or(RouteMatch::DEFAULT_PUBLIC)
    }

    fn login_path(&self, role: Role) -> &str {
        match role {
            Role::Administrator => &self.admin_login,
            Role::Trainer => &self.trainer_login,
        }
    }

    /// Decide for `path` given the verified principal (None when there was
    /// no token or it failed verification).
    pub fn authorize(&self, path: &str, principal: Option<&Principal>) -> Decision {
        self.decide(self.lookup(path), principal)
    }

    pub fn decide(&self, m: RouteMatch, principal: Option<&Principal>) -> Decision {
        let Some(required) = m.access.required_role() else {
            return Decision::Allow;
        };

        match (principal, m.surface) {
            (Some(p), _) if p.is(required) => Decision::Allow,
            // UI failures never reveal whether it was a missing or a wrong-role session.
            (_, Surface::Ui) => Decision::Redirect(self.login_path(required).to_string()),
            (None, Surface::Api) => Decision::Reject(StatusCode::UNAUTHORIZED),
            (Some(_), Surface::Api) => Decision::Reject(StatusCode::FORBIDDEN),
        }
    }
}
