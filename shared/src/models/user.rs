//! Admin user, role and session models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::types::ParseEnumError;

/// Dashboard roles
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AdminRole {
    Admin,
    Supervisor,
}

impl AdminRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdminRole::Admin => "admin",
            AdminRole::Supervisor => "supervisor",
        }
    }

    /// Whether this role may perform `action` on `resource`
    pub fn permits(&self, resource: Resource, action: Action) -> bool {
        let allowed = match self {
            AdminRole::Admin => true,
            AdminRole::Supervisor => resource != Resource::User,
        };
        allowed && resource.supports(action)
    }
}

impl FromStr for AdminRole {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(AdminRole::Admin),
            "supervisor" => Ok(AdminRole::Supervisor),
            other => Err(ParseEnumError::new("role", other)),
        }
    }
}

/// Resources guarded by role checks
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Dashboard,
    Tank,
    Reading,
    Token,
    Report,
    User,
}

impl Resource {
    fn supports(&self, action: Action) -> bool {
        match self {
            // Tokens are issued and redeemed elsewhere; the dashboard only reads them.
            Resource::Dashboard | Resource::Tank | Resource::Token => action == Action::View,
            Resource::Report => matches!(action, Action::View | Action::Export),
            Resource::Reading => matches!(action, Action::View | Action::Edit),
            Resource::User => matches!(action, Action::View | Action::Create),
        }
    }
}

/// Actions that can be performed on resources
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    View,
    Create,
    Edit,
    Export,
}

/// The signed-in identity shown in the dashboard header
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdminProfile {
    pub id: i64,
    pub name: String,
    pub role: AdminRole,
}

/// State of a refresh-token backed session
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Active,
    Expired,
    Revoked,
}

impl SessionStatus {
    /// Revocation wins over expiry; a session expires at exactly `expires_at`.
    pub fn evaluate(
        expires_at: DateTime<Utc>,
        revoked_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Self {
        match revoked_at {
            Some(revoked) if revoked <= now => SessionStatus::Revoked,
            _ if now >= expires_at => SessionStatus::Expired,
            _ => SessionStatus::Active,
        }
    }

    pub fn is_active(&self) -> bool {
        *self == SessionStatus::Active
    }
}
