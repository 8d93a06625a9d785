//! Credential checking for the two login flows.
//!
//! Unknown account and wrong password are indistinguishable to the caller;
//! an unknown email still pays for one Argon2 verification.

use std::collections::HashMap;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;

use gymgate_core::error::{GateError, Result};
use gymgate_core::{Principal, Role};

use crate::config::AccountConfig;

#[async_trait]
pub trait AccountDirectory: Send + Sync {
    /// `Ok(None)` for any credential mismatch.
    async fn authenticate(&self, role: Role, email: &str, password: &str)
        -> Result<Option<Principal>>;
}

/// Hash a password using Argon2id, returning the PHC string.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| GateError::Internal(format!("password hashing failed: {e}")))
}

fn verify_password(password: &str, phc: &str) -> bool {
    match PasswordHash::new(phc) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

struct Account {
    principal: Principal,
    password_hash: String,
}

/// Accounts loaded from config; keyed by role and lowercased email.
pub struct InMemoryAccounts {
    accounts: HashMap<(Role, String), Account>,
    decoy_hash: String,
}

impl InMemoryAccounts {
    pub fn from_config(accounts: &[AccountConfig]) -> Result<Self> {
        let mut map = HashMap::with_capacity(accounts.len());
        for a in accounts {
            a.validate()?;
            if PasswordHash::new(&a.password_hash).is_err() {
                return Err(GateError::Config(format!(
                    "account {} has an invalid password_hash",
                    a.subject_id
                )));
            }
            let key = (a.role, a.email.to_ascii_lowercase());
            if map.contains_key(&key) {
                return Err(GateError::Config(format!(
                    "duplicate {} account for {}",
                    a.role, a.email
                )));
            }
            map.insert(
                key,
                Account {
                    principal: Principal::new(&a.subject_id, &a.email, a.role, &a.display_name),
                    password_hash: a.password_hash.clone(),
                },
            );
        }

        Ok(Self {
            accounts: map,
            decoy_hash: hash_password("decoy-password-for-unknown-accounts")?,
        })
    }
}

#[async_trait]
impl AccountDirectory for InMemoryAccounts {
    async fn authenticate(
        &self,
        role: Role,
        email: &str,
        password: &str,
    ) -> Result<Option<Principal>> {
        let account = self.accounts.get(&(role, email.to_ascii_lowercase()));
        let phc = account
            .map(|a| a.password_hash.clone())
            .unwrap_or_else(|| self.decoy_hash.clone());
        let password = password.to_string();

        let ok = tokio::task::spawn_blocking(move || verify_password(&password, &phc))
            .await
            .map_err(|e| GateError::Internal(format!("password verification task: {e}")))?;

        Ok(match account {
            Some(a) if ok => Some(a.principal.clone()),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn directory() -> InMemoryAccounts {
        InMemoryAccounts::from_config(&[AccountConfig {
            subject_id: "trn-1".into(),
            email: "Coach@Gym.test".into(),
            display_name: "Coach".into(),
            role: Role::Trainer,
            password_hash: hash_password("squat-rack").unwrap(),
        }])
        .unwrap()
    }

    #[tokio::test]
    async fn matches_role_email_and_password() {
        let d = directory();
        let ok = |r: Result<Option<Principal>>| r.unwrap().map(|p| p.subject_id);

        let p = d.authenticate(Role::Trainer, "coach@gym.test", "squat-rack").await;
        assert_eq!(ok(p).as_deref(), Some("trn-1"));

        let wrong_password = d.authenticate(Role::Trainer, "coach@gym.test", "bench").await;
        assert_eq!(ok(wrong_password), None);
        let wrong_role = d
            .authenticate(Role::Administrator, "coach@gym.test", "squat-rack")
            .await;
        assert_eq!(ok(wrong_role), None);
        let unknown = d.authenticate(Role::Trainer, "nobody@gym.test", "squat-rack").await;
        assert_eq!(ok(unknown), None);
    }

    #[test]
    fn rejects_blank_display_name() {
        let err = InMemoryAccounts::from_config(&[AccountConfig {
            subject_id: "trn-2".into(),
            email: "blank@gym.test".into(),
            display_name: " ".into(),
            role: Role::Trainer,
            password_hash: hash_password("squat-rack").unwrap(),
        }]);
        assert!(err.is_err());
    }

    #[test]
    fn rejects_bad_hash_in_config() {
        let err = InMemoryAccounts::from_config(&[AccountConfig {
            subject_id: "x".into(),
            email: "x@gym.test".into(),
            display_name: "X".into(),
            role: Role::Administrator,
            password_hash: "plaintext".into(),
        }]);
        assert!(err.is_err());
    }
}
