//! Role - the closed, totally ordered account role hierarchy

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Account role.
///
/// Variants are declared lowest first so the derived `Ord` is the hierarchy:
/// `User < Moderator < Admin < Owner`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Moderator,
    Admin,
    Owner,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::User, Role::Moderator, Role::Admin, Role::Owner];

    /// Whether this role meets a required minimum
    #[inline]
    pub fn satisfies(self, required: Role) -> bool {
        self >= required
    }

    /// Fail with `InsufficientRole` unless this role meets `required`
    pub fn require(self, required: Role) -> Result<(), DomainError> {
        if self.satisfies(required) {
            Ok(())
        } else {
            Err(DomainError::InsufficientRole { required })
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Moderator => "moderator",
            Self::Admin => "admin",
            Self::Owner => "owner",
        }
    }

    #[inline]
    pub fn is_staff(self) -> bool {
        self.satisfies(Role::Moderator)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(Self::User),
            "moderator" => Ok(Self::Moderator),
            "admin" => Ok(Self::Admin),
            "owner" => Ok(Self::Owner),
            other => Err(DomainError::InvalidRole(other.to_string())),
        }
    }
}
