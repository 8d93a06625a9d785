//! Authenticated identity carried by a session token.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GateError;

/// The two principal roles. A token carries exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Administrator,
    Trainer,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Administrator => "administrator",
            Role::Trainer => "trainer",
        }
    }

    /// Name of the cookie that carries this role's session.
    pub fn cookie_name(self) -> &'static str {
        match self {
            Role::Administrator => "admin-session",
            Role::Trainer => "trainer-session",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = GateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "administrator" => Ok(Role::Administrator),
            "trainer" => Ok(Role::Trainer),
            other => Err(GateError::BadRequest(format!("unknown role: {other}"))),
        }
    }
}

/// Verified identity. Built fresh on every successful verification and
/// dropped with the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    /// Opaque id of the underlying account record. This is the trust anchor.
    pub subject_id: String,
    /// Display/audit only.
    pub email: String,
    pub role: Role,
    pub display_name: String,
}

impl Principal {
    pub fn new(
        subject_id: impl Into<String>,
        email: impl Into<String>,
        role: Role,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            subject_id: subject_id.into(),
            email: email.into(),
            role,
            display_name: display_name.into(),
        }
    }

    pub fn is(&self, role: Role) -> bool {
        self.role == role
    }
}
