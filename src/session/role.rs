//! Ordinal organization roles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Role of a user within their organization.
///
/// Roles are ordered: a higher role satisfies every requirement a lower role
/// does. The discriminants are the values carried on the wire and must not be
/// renumbered.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    ::prost::Enumeration,
)]
#[serde(rename_all = "snake_case")]
#[repr(i32)]
pub enum Role {
    /// No role assigned. Fails every gate that requires a real role.
    Unspecified = 0,
    /// External contact with the narrowest access.
    Contact = 3,
    /// Read-only member.
    Viewer = 6,
    /// May publish data.
    Publisher = 7,
    /// May build and modify resources.
    Builder = 9,
    /// Organization administrator.
    Admin = 12,
    /// Operator with access across organizations.
    SysAdmin = 15,
}

impl Role {
    /// Every role, lowest first.
    pub const ALL: [Role; 7] = [
        Role::Unspecified,
        Role::Contact,
        Role::Viewer,
        Role::Publisher,
        Role::Builder,
        Role::Admin,
        Role::SysAdmin,
    ];

    /// Returns the snake_case name of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Unspecified => "unspecified",
            Role::Contact => "contact",
            Role::Viewer => "viewer",
            Role::Publisher => "publisher",
            Role::Builder => "builder",
            Role::Admin => "admin",
            Role::SysAdmin => "sys_admin",
        }
    }

    /// Returns `true` if this role meets the `minimum` requirement.
    pub fn satisfies(self, minimum: Role) -> bool {
        self >= minimum
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown role name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "unspecified" => Ok(Role::Unspecified),
            "contact" => Ok(Role::Contact),
            "viewer" => Ok(Role::Viewer),
            "publisher" => Ok(Role::Publisher),
            "builder" => Ok(Role::Builder),
            "admin" => Ok(Role::Admin),
            "sys_admin" | "sysadmin" => Ok(Role::SysAdmin),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}
