//! `Set-Cookie` values for role session cookies.

use cookie::time::{Duration, OffsetDateTime};
use cookie::{Cookie, CookieBuilder, SameSite};

use gymgate_core::{Role, SESSION_TTL_SECS};

use crate::config::AuthSection;

#[derive(Debug, Clone)]
pub struct CookiePolicy {
    secure: bool,
    domain: Option<String>,
}

impl CookiePolicy {
    pub fn from_config(auth: &AuthSection) -> Self {
        Self {
            secure: auth.secure_cookies,
            domain: auth.cookie_domain.clone(),
        }
    }

    fn builder(&self, role: Role, value: String) -> CookieBuilder<'static> {
        let b = Cookie::build((role.cookie_name(), value))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure);
        match &self.domain {
            Some(d) => b.domain(d.clone()),
            None => b,
        }
    }

    /// Session cookie carrying `token` for `role`, valid seven days.
    pub fn session(&self, role: Role, token: &str) -> Cookie<'static> {
        self.builder(role, token.to_string())
            .max_age(Duration::seconds(SESSION_TTL_SECS))
            .build()
    }

    /// Expired value with matching path/domain so the browser drops it.
    pub fn clear(&self, role: Role) -> Cookie<'static> {
        self.builder(role, String::new())
            .max_age(Duration::ZERO)
            .expires(OffsetDateTime::UNIX_EPOCH)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn production_cookie_attributes() {
        let p = CookiePolicy {
            secure: true,
            domain: Some("gym.example".into()),
        };
        let c = p.session(Role::Trainer, "tok");
        assert_eq!((c.name(), c.value()), ("trainer-session", "tok"));
        assert_eq!(c.max_age(), Some(Duration::seconds(604_800)));

        let s = c.to_string();
        for attr in ["Path=/", "HttpOnly", "SameSite=Lax", "Domain=gym.example", "Secure"] {
            assert!(s.contains(attr), "missing {attr} in {s}");
        }
    }

    #[test]
    fn clear_keeps_path_and_domain() {
        let p = CookiePolicy {
            secure: false,
            domain: Some("gym.example".into()),
        };
        let s = p.clear(Role::Administrator).to_string();
        assert!(s.starts_with("admin-session=;"), "{s}");
        for attr in ["Max-Age=0", "Expires=Thu, 01 Jan 1970 00:00:00 GMT", "Path=/"] {
            assert!(s.contains(attr), "missing {attr} in {s}");
        }
        assert!(s.contains("Domain=gym.example"));
        assert!(!s.contains("Secure"));
    }
}
