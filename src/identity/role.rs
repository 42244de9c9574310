//! The closed set of authorization roles.
//!
//! Role tags travel as snake_case strings (`"health_officer"`). Anything
//! outside the five known tags is read as [`Role::Public`], the lowest
//! privilege, rather than rejected.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Authorization level controlling navigation and menu contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Platform administrator. Passes every subtree guard.
    Admin,
    /// District health officer: alerts, predictions, heatmaps, reports.
    HealthOfficer,
    /// Community field worker submitting case and water-quality reports.
    AshaWorker,
    /// Clinic or lab staff uploading clinical data.
    ClinicStaff,
    /// Public visitor with access to awareness content only.
    Public,
}

impl Role {
    /// Every role, in declaration order.
    pub const ALL: [Role; 5] = [
        Role::Admin,
        Role::HealthOfficer,
        Role::AshaWorker,
        Role::ClinicStaff,
        Role::Public,
    ];

    /// Wire tag used in persisted records and auth payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::HealthOfficer => "health_officer",
            Role::AshaWorker => "asha_worker",
            Role::ClinicStaff => "clinic_staff",
            Role::Public => "public",
        }
    }

    /// Parse a wire tag, falling back to [`Role::Public`] for anything unknown.
    pub fn from_tag_lossy(tag: &str) -> Role {
        tag.parse().unwrap_or(Role::Public)
    }

    /// Human-readable label, e.g. `HEALTH OFFICER`.
    pub fn label(self) -> String {
        self.as_str().replace('_', " ").to_uppercase()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned by [`Role::from_str`] for a tag outside the known set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized role tag: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| UnknownRole(s.to_owned()))
    }
}
