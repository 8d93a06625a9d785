//! Route table compilation and prefix matching.
//!
//! Prefixes match on path-segment boundaries: `/admin` covers `/admin` and
//! `/admin/members` but not `/administrators`. The root prefix `/` covers
//! every path.

use std::collections::HashMap;

use gymgate_core::error::{GateError, Result};
use gymgate_core::Role;

use crate::config::{Access, RouteRuleConfig, Surface};

/// Compiled route rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRule {
    pub prefix: String,
    pub access: Access,
    pub surface: Surface,
    /// Which session cookie applies under this prefix, if any.
    pub namespace: Option<Role>,
}

impl RouteRule {
    pub fn matches(&self, path: &str) -> bool {
        prefix_matches(&self.prefix, path)
    }
}

fn prefix_matches(prefix: &str, path: &str) -> bool {
    if prefix == "/" {
        return path.starts_with('/');
    }
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

fn normalize(prefix: &str) -> String {
    if prefix.len() > 1 {
        prefix.trim_end_matches('/').to_string()
    } else {
        prefix.to_string()
    }
}

/// Compile config entries into rules sorted longest prefix first.
///
/// Fails on a prefix not starting with `/`, on a public namespace that does
/// not agree with a gated role, and on two entries with the same prefix but
/// different requirements. Exact duplicates are collapsed.
pub fn compile_rules(raw: &[RouteRuleConfig]) -> Result<Vec<RouteRule>> {
    let mut seen: HashMap<String, RouteRule> = HashMap::with_capacity(raw.len());

    for r in raw {
        if !r.prefix.starts_with('/') {
            return Err(GateError::Config(format!(
                "invalid route prefix: {} (must start with '/')",
                r.prefix
            )));
        }

        let gated = r.access.required_role();
        if let (Some(role), Some(ns)) = (gated, r.namespace) {
            if role != ns {
                return Err(GateError::Config(format!(
                    "route {} requires {role} but declares namespace {ns}",
                    r.prefix
                )));
            }
        }

        let rule = RouteRule {
            prefix: normalize(&r.prefix),
            access: r.access,
            surface: r.surface,
            namespace: gated.or(r.namespace),
        };

        match seen.get(&rule.prefix) {
            Some(existing) if *existing == rule => {
                tracing::warn!(prefix = %rule.prefix, "duplicate route entry collapsed");
            }
            Some(existing) => {
                return Err(GateError::Config(format!(
                    "conflicting route entries for prefix {}: {:?}/{:?} vs {:?}/{:?}",
                    rule.prefix, existing.access, existing.surface, rule.access, rule.surface
                )));
            }
            None => {
                seen.insert(rule.prefix.clone(), rule);
            }
        }
    }

    let mut out: Vec<RouteRule> = seen.into_values().collect();
    // Longest first; equal lengths cannot both match one path on segment
    // boundaries, so ties only need a stable order.
    out.sort_by(|a, b| b.prefix.len().cmp(&a.prefix.len()).then(a.prefix.cmp(&b.prefix)));
    Ok(out)
}

/// Longest matching rule for `path`.
pub fn longest_match<'a>(rules: &'a [RouteRule], path: &str) -> Option<&'a RouteRule> {
    rules.iter().find(|r| r.matches(path))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn rule(prefix: &str, access: Access) -> RouteRuleConfig {
        RouteRuleConfig {
            prefix: prefix.into(),
            access,
            surface: Surface::Ui,
            namespace: None,
        }
    }

    #[test]
    fn segment_boundaries() {
        assert!(prefix_matches("/admin", "/admin"));
        assert!(prefix_matches("/admin", "/admin/members/3"));
        assert!(!prefix_matches("/admin", "/administrators"));
        assert!(prefix_matches("/", "/anything"));
        assert!(!prefix_matches("/", ""));
    }

    #[test]
    fn trailing_slash_is_normalized() {
        let rules = compile_rules(&[rule("/admin/", Access::Administrator)]).unwrap();
        assert_eq!(rules[0].prefix, "/admin");
    }

    #[test]
    fn conflicting_prefix_rejected() {
        let err = compile_rules(&[
            rule("/admin", Access::Administrator),
            rule("/admin", Access::Public),
        ])
        .unwrap_err();
        assert_eq!(err.client_code().as_str(), "BAD_REQUEST");
    }

    #[test]
    fn conflict_detected_after_normalization() {
        assert!(compile_rules(&[
            rule("/trainer", Access::Trainer),
            rule("/trainer/", Access::Administrator)
        ])
        .is_err());
    }

    #[test]
    fn exact_duplicate_collapsed() {
        let rules = compile_rules(&[
            rule("/admin", Access::Administrator),
            rule("/admin", Access::Administrator),
        ])
        .unwrap();
        assert_eq!(rules.len(), 1);
    }

    #[test]
    fn relative_prefix_rejected() {
        assert!(compile_rules(&[rule("admin", Access::Administrator)]).is_err());
    }

    #[test]
    fn namespace_must_agree_with_gated_role() {
        let mut r = rule("/admin", Access::Administrator);
        r.namespace = Some(Role::Trainer);
        assert!(compile_rules(&[r]).is_err());
    }

    #[test]
    fn longest_prefix_wins() {
        let rules = compile_rules(&[
            rule("/", Access::Public),
            rule("/admin", Access::Administrator),
            rule("/admin/login", Access::Public),
        ])
        .unwrap();
        assert_eq!(longest_match(&rules, "/admin/login").unwrap().access, Access::Public);
        assert_eq!(longest_match(&rules, "/admin/x").unwrap().access, Access::Administrator);
        assert_eq!(longest_match(&rules, "/shop").unwrap().prefix, "/");
    }
}
